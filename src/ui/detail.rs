//! School detail view: header, metric tabs, trend and historical tables.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, Tabs},
    Frame,
};

use super::theme::Theme;
use crate::data::{SchoolDetail, TrendWindow, YearSeries};
use crate::trend::{self, MetricKind, TrendDirection};

/// Years shown in the historical table, newest first.
const HISTORY_YEARS: [u16; 7] = [2025, 2024, 2023, 2022, 2021, 2020, 2019];

/// Which metric tab is active in the detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailTab {
    Overview,
    Academics,
    Demographics,
}

impl DetailTab {
    pub const TITLES: [&'static str; 3] = ["Overview", "Academics", "Demographics"];

    pub fn index(self) -> usize {
        match self {
            DetailTab::Overview => 0,
            DetailTab::Academics => 1,
            DetailTab::Demographics => 2,
        }
    }

    pub fn next(self) -> Self {
        match self {
            DetailTab::Overview => DetailTab::Academics,
            DetailTab::Academics => DetailTab::Demographics,
            DetailTab::Demographics => DetailTab::Overview,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            DetailTab::Overview => DetailTab::Demographics,
            DetailTab::Academics => DetailTab::Overview,
            DetailTab::Demographics => DetailTab::Academics,
        }
    }
}

/// One displayable metric with its optional trend and history.
pub struct MetricEntry<'a> {
    pub label: &'static str,
    pub value: Option<f64>,
    pub kind: MetricKind,
    pub unit: &'static str,
    pub trend: Option<&'a TrendWindow>,
    pub history: Option<&'a YearSeries>,
}

/// Metric rows for a tab, in display order.
pub fn metric_entries(school: &SchoolDetail, tab: DetailTab) -> Vec<MetricEntry<'_>> {
    let metrics = &school.metrics;
    let trends = metrics.trends.as_ref();
    let history = metrics.historical.as_ref();
    let act = metrics.act.as_ref();

    match tab {
        DetailTab::Overview => vec![MetricEntry {
            label: "Enrollment",
            value: metrics.enrollment.map(|v| v as f64),
            kind: MetricKind::Count,
            unit: "students",
            trend: trends.and_then(|t| t.enrollment.as_ref()),
            history: history.and_then(|h| h.enrollment.as_ref()),
        }],
        DetailTab::Academics => vec![
            MetricEntry {
                label: "ACT Overall Average",
                value: act.and_then(|a| a.overall_avg),
                kind: MetricKind::Score,
                unit: "points",
                trend: trends.and_then(|t| t.act.as_ref()),
                history: history.and_then(|h| h.act.as_ref()),
            },
            MetricEntry {
                label: "ACT ELA Average",
                value: act.and_then(|a| a.ela_avg),
                kind: MetricKind::Score,
                unit: "points",
                trend: None,
                history: history.and_then(|h| h.act_ela.as_ref()),
            },
            MetricEntry {
                label: "ACT Math Average",
                value: act.and_then(|a| a.math_avg),
                kind: MetricKind::Score,
                unit: "points",
                trend: None,
                history: history.and_then(|h| h.act_math.as_ref()),
            },
            MetricEntry {
                label: "ACT Science Average",
                value: act.and_then(|a| a.science_avg),
                kind: MetricKind::Score,
                unit: "points",
                trend: None,
                history: history.and_then(|h| h.act_science.as_ref()),
            },
            MetricEntry {
                label: "IAR Overall Proficiency",
                value: metrics.iar_overall_proficiency_pct,
                kind: MetricKind::Percentage,
                unit: "percentage points",
                trend: None,
                history: None,
            },
            MetricEntry {
                label: "IAR ELA Proficiency",
                value: metrics.iar_ela_proficiency_pct,
                kind: MetricKind::Percentage,
                unit: "percentage points",
                trend: None,
                history: None,
            },
            MetricEntry {
                label: "IAR Math Proficiency",
                value: metrics.iar_math_proficiency_pct,
                kind: MetricKind::Percentage,
                unit: "percentage points",
                trend: None,
                history: None,
            },
        ],
        DetailTab::Demographics => {
            let demographics = &metrics.demographics;
            let diversity = &metrics.diversity;
            vec![
                MetricEntry {
                    label: "English Learners",
                    value: demographics.el_percentage,
                    kind: MetricKind::Percentage,
                    unit: "percentage points",
                    trend: trends.and_then(|t| t.el.as_ref()),
                    history: history.and_then(|h| h.el.as_ref()),
                },
                MetricEntry {
                    label: "Low Income",
                    value: demographics.low_income_percentage,
                    kind: MetricKind::Percentage,
                    unit: "percentage points",
                    trend: trends.and_then(|t| t.low_income.as_ref()),
                    history: history.and_then(|h| h.low_income.as_ref()),
                },
                MetricEntry {
                    label: "White",
                    value: diversity.white,
                    kind: MetricKind::Percentage,
                    unit: "percentage points",
                    trend: trends.and_then(|t| t.white.as_ref()),
                    history: history.and_then(|h| h.white.as_ref()),
                },
                MetricEntry {
                    label: "Black",
                    value: diversity.black,
                    kind: MetricKind::Percentage,
                    unit: "percentage points",
                    trend: trends.and_then(|t| t.black.as_ref()),
                    history: history.and_then(|h| h.black.as_ref()),
                },
                MetricEntry {
                    label: "Hispanic",
                    value: diversity.hispanic,
                    kind: MetricKind::Percentage,
                    unit: "percentage points",
                    trend: trends.and_then(|t| t.hispanic.as_ref()),
                    history: history.and_then(|h| h.hispanic.as_ref()),
                },
                MetricEntry {
                    label: "Asian",
                    value: diversity.asian,
                    kind: MetricKind::Percentage,
                    unit: "percentage points",
                    trend: trends.and_then(|t| t.asian.as_ref()),
                    history: history.and_then(|h| h.asian.as_ref()),
                },
                MetricEntry {
                    label: "Pacific Islander",
                    value: diversity.pacific_islander,
                    kind: MetricKind::Percentage,
                    unit: "percentage points",
                    trend: trends.and_then(|t| t.pacific_islander.as_ref()),
                    history: history.and_then(|h| h.pacific_islander.as_ref()),
                },
                MetricEntry {
                    label: "Native American",
                    value: diversity.native_american,
                    kind: MetricKind::Percentage,
                    unit: "percentage points",
                    trend: trends.and_then(|t| t.native_american.as_ref()),
                    history: history.and_then(|h| h.native_american.as_ref()),
                },
                MetricEntry {
                    label: "Two or More Races",
                    value: diversity.two_or_more,
                    kind: MetricKind::Percentage,
                    unit: "percentage points",
                    trend: trends.and_then(|t| t.two_or_more.as_ref()),
                    history: history.and_then(|h| h.two_or_more.as_ref()),
                },
                MetricEntry {
                    label: "MENA",
                    value: diversity.mena,
                    kind: MetricKind::Percentage,
                    unit: "percentage points",
                    trend: trends.and_then(|t| t.mena.as_ref()),
                    history: history.and_then(|h| h.mena.as_ref()),
                },
            ]
        }
    }
}

fn format_optional(value: Option<f64>, kind: MetricKind) -> String {
    match value {
        Some(v) => trend::format_value(v, kind),
        None => "N/A".to_string(),
    }
}

/// School detail view with tabbed metrics
pub struct DetailView<'a> {
    school: &'a SchoolDetail,
    tab: DetailTab,
    selected_metric: usize,
    in_comparison: bool,
    can_add_more: bool,
    theme: &'a Theme,
}

impl<'a> DetailView<'a> {
    pub fn new(
        school: &'a SchoolDetail,
        tab: DetailTab,
        selected_metric: usize,
        in_comparison: bool,
        can_add_more: bool,
        theme: &'a Theme,
    ) -> Self {
        DetailView {
            school,
            tab,
            selected_metric,
            in_comparison,
            can_add_more,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // Header
                Constraint::Length(1), // Tab bar
                Constraint::Min(8),    // Body
            ])
            .split(area);

        self.render_header(frame, chunks[0]);

        let tabs = Tabs::new(DetailTab::TITLES.to_vec())
            .select(self.tab.index())
            .style(self.theme.muted_style())
            .highlight_style(self.theme.title_style());
        frame.render_widget(tabs, chunks[1]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(chunks[2]);

        let entries = metric_entries(self.school, self.tab);
        self.render_metric_list(frame, body[0], &entries);
        self.render_trend_panel(frame, body[1], &entries);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let mut badges: Vec<Span> = Vec::new();
        if let Some(school_type) = &self.school.school_type {
            badges.push(Span::styled(
                format!("[{school_type}] "),
                self.theme.title_style(),
            ));
        }
        if let Some(grades) = &self.school.grades_served {
            badges.push(Span::styled(
                format!("[Grades {grades}] "),
                self.theme.muted_style(),
            ));
        }

        let compare_status = if self.in_comparison {
            Span::styled("● in comparison — press s to remove", self.theme.title_style())
        } else if self.can_add_more {
            Span::styled("press s to add to comparison", self.theme.muted_style())
        } else {
            Span::styled("comparison list is full", self.theme.muted_style())
        };

        let lines = vec![
            Line::from(Span::styled(
                self.school.school_name.clone(),
                self.theme.title_style().add_modifier(Modifier::UNDERLINED),
            )),
            Line::from(Span::styled(
                self.school.location_line(),
                self.theme.muted_style(),
            )),
            Line::from(badges),
            Line::from(compare_status),
        ];

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(self.theme.border_style()),
        );
        frame.render_widget(paragraph, area);
    }

    fn render_metric_list(&self, frame: &mut Frame, area: Rect, entries: &[MetricEntry]) {
        let items: Vec<ListItem> = entries
            .iter()
            .map(|entry| {
                let value = format_optional(entry.value, entry.kind);
                let value_style = if entry.value.is_some() {
                    self.theme.normal_style()
                } else {
                    self.theme.muted_style()
                };
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{:<22}", entry.label)),
                    Span::styled(value, value_style),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!(" {} ", DetailTab::TITLES[self.tab.index()]))
                    .borders(Borders::ALL)
                    .border_style(self.theme.border_style())
                    .title_style(self.theme.title_style()),
            )
            .highlight_style(self.theme.highlight_style())
            .highlight_symbol("> ");

        let mut state = ListState::default();
        if !entries.is_empty() {
            state.select(Some(self.selected_metric.min(entries.len() - 1)));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_trend_panel(&self, frame: &mut Frame, area: Rect, entries: &[MetricEntry]) {
        let Some(entry) = entries.get(self.selected_metric.min(entries.len().saturating_sub(1)))
        else {
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(9), Constraint::Min(5)])
            .split(area);

        self.render_trend_table(frame, chunks[0], entry);
        self.render_history_table(frame, chunks[1], entry);
    }

    fn render_trend_table(&self, frame: &mut Frame, area: Rect, entry: &MetricEntry) {
        let block = Block::default()
            .title(format!(" {} Trends ", entry.label))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style())
            .title_style(self.theme.title_style());

        let (Some(window), Some(current)) = (entry.trend, entry.value) else {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let message = Paragraph::new("Trend data unavailable")
                .style(self.theme.muted_style())
                .alignment(Alignment::Center);
            frame.render_widget(message, inner);
            return;
        };

        let rows: Vec<Row> = window
            .periods()
            .into_iter()
            .map(|(label, delta)| match delta {
                None => Row::new(vec![
                    Cell::from(label),
                    Cell::from(Span::styled("N/A", self.theme.muted_style())),
                    Cell::from(Span::styled("N/A", self.theme.muted_style())),
                ]),
                Some(delta) => {
                    let direction = TrendDirection::from_delta(delta);
                    let arrow_style = self.theme.trend_style(direction);
                    let change = trend::format_change(delta, entry.unit);
                    let percent = trend::format_percentage(trend::percentage_change(
                        current,
                        delta,
                        entry.kind,
                    ));
                    Row::new(vec![
                        Cell::from(label),
                        Cell::from(Line::from(vec![
                            Span::styled(direction.arrow(), arrow_style),
                            Span::raw(" "),
                            Span::raw(change),
                        ])),
                        Cell::from(Line::from(vec![
                            Span::styled(direction.arrow(), arrow_style),
                            Span::raw(" "),
                            Span::raw(percent),
                        ])),
                    ])
                }
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(8),
                Constraint::Min(18),
                Constraint::Min(10),
            ],
        )
        .header(
            Row::new(vec!["Period", "Change", "Percent"]).style(self.theme.muted_style()),
        )
        .block(block);

        frame.render_widget(table, area);
    }

    fn render_history_table(&self, frame: &mut Frame, area: Rect, entry: &MetricEntry) {
        let block = Block::default()
            .title(format!(" Historical {} ", entry.label))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style())
            .title_style(self.theme.title_style());

        let Some(series) = entry.history.filter(|s| !s.is_empty()) else {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let message = Paragraph::new("No historical data")
                .style(self.theme.muted_style())
                .alignment(Alignment::Center);
            frame.render_widget(message, inner);
            return;
        };

        let rows: Vec<Row> = HISTORY_YEARS
            .iter()
            .map(|&year| {
                let value = series.value(year);
                let cell = match value {
                    Some(v) => Cell::from(trend::format_value(v, entry.kind)),
                    None => Cell::from(Span::styled("N/A", self.theme.muted_style())),
                };
                Row::new(vec![Cell::from(year.to_string()), cell])
            })
            .collect();

        let table = Table::new(rows, [Constraint::Length(8), Constraint::Min(10)])
            .header(Row::new(vec!["Year", "Value"]).style(self.theme.muted_style()))
            .block(block);

        frame.render_widget(table, area);
    }
}

/// Shown when a detail fetch came back 404: the identifier is unknown,
/// which is different from the backend being unreachable.
pub struct NotFoundView<'a> {
    rcdts: &'a str,
    theme: &'a Theme,
}

impl<'a> NotFoundView<'a> {
    pub fn new(rcdts: &'a str, theme: &'a Theme) -> Self {
        NotFoundView { rcdts, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled("School not found", self.theme.title_style())),
            Line::from(""),
            Line::from(Span::raw(format!(
                "No school exists with RCDTS {}",
                self.rcdts
            ))),
            Line::from(Span::styled(
                "Press Esc to go back to search",
                self.theme.muted_style(),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.border_style()),
            );
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SchoolMetrics, TrendMetrics};

    fn school_with_enrollment_trend() -> SchoolDetail {
        SchoolDetail {
            id: 1,
            rcdts: "r".into(),
            school_name: "s".into(),
            city: "c".into(),
            district: None,
            county: None,
            school_type: None,
            grades_served: None,
            metrics: SchoolMetrics {
                enrollment: Some(500),
                trends: Some(TrendMetrics {
                    enrollment: Some(TrendWindow {
                        one_year: Some(25.0),
                        ..TrendWindow::default()
                    }),
                    ..TrendMetrics::default()
                }),
                ..SchoolMetrics::default()
            },
        }
    }

    #[test]
    fn test_overview_has_single_enrollment_entry() {
        let school = school_with_enrollment_trend();
        let entries = metric_entries(&school, DetailTab::Overview);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].label, "Enrollment");
        assert_eq!(entries[0].value, Some(500.0));
        assert!(entries[0].trend.is_some());
    }

    #[test]
    fn test_academics_and_demographics_row_counts() {
        let school = school_with_enrollment_trend();
        assert_eq!(metric_entries(&school, DetailTab::Academics).len(), 7);
        assert_eq!(metric_entries(&school, DetailTab::Demographics).len(), 10);
    }

    #[test]
    fn test_tab_cycle() {
        assert_eq!(DetailTab::Overview.next(), DetailTab::Academics);
        assert_eq!(DetailTab::Demographics.next(), DetailTab::Overview);
        assert_eq!(DetailTab::Overview.prev(), DetailTab::Demographics);
    }

    #[test]
    fn test_format_optional_uses_na_for_missing() {
        assert_eq!(format_optional(None, MetricKind::Score), "N/A");
        assert_eq!(format_optional(Some(21.0), MetricKind::Score), "21.0");
    }
}
