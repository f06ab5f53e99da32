//! Side-by-side comparison table for 2-5 schools.

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use super::theme::Theme;
use crate::data::SchoolDetail;
use crate::trend::{self, MetricKind};

/// Whether a row's best value is its highest or lowest, or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Best {
    Highest,
    Lowest,
    None,
}

struct CompareRow {
    label: &'static str,
    kind: MetricKind,
    best: Best,
    get: fn(&SchoolDetail) -> Option<f64>,
}

/// Rows of the comparison table. Academic metrics highlight the highest
/// value; need-related percentages highlight the lowest; enrollment and
/// composition shares carry no judgement and are not highlighted.
const ROWS: [CompareRow; 14] = [
    CompareRow {
        label: "Enrollment",
        kind: MetricKind::Count,
        best: Best::None,
        get: |s| s.metrics.enrollment.map(|v| v as f64),
    },
    CompareRow {
        label: "ACT ELA Average",
        kind: MetricKind::Score,
        best: Best::Highest,
        get: |s| s.metrics.act.as_ref().and_then(|a| a.ela_avg),
    },
    CompareRow {
        label: "ACT Math Average",
        kind: MetricKind::Score,
        best: Best::Highest,
        get: |s| s.metrics.act.as_ref().and_then(|a| a.math_avg),
    },
    CompareRow {
        label: "ACT Science Average",
        kind: MetricKind::Score,
        best: Best::Highest,
        get: |s| s.metrics.act.as_ref().and_then(|a| a.science_avg),
    },
    CompareRow {
        label: "IAR Overall Proficiency",
        kind: MetricKind::Percentage,
        best: Best::Highest,
        get: |s| s.metrics.iar_overall_proficiency_pct,
    },
    CompareRow {
        label: "IAR ELA Proficiency",
        kind: MetricKind::Percentage,
        best: Best::Highest,
        get: |s| s.metrics.iar_ela_proficiency_pct,
    },
    CompareRow {
        label: "IAR Math Proficiency",
        kind: MetricKind::Percentage,
        best: Best::Highest,
        get: |s| s.metrics.iar_math_proficiency_pct,
    },
    CompareRow {
        label: "English Learner %",
        kind: MetricKind::Percentage,
        best: Best::Lowest,
        get: |s| s.metrics.demographics.el_percentage,
    },
    CompareRow {
        label: "Low Income %",
        kind: MetricKind::Percentage,
        best: Best::Lowest,
        get: |s| s.metrics.demographics.low_income_percentage,
    },
    CompareRow {
        label: "White %",
        kind: MetricKind::Percentage,
        best: Best::None,
        get: |s| s.metrics.diversity.white,
    },
    CompareRow {
        label: "Black %",
        kind: MetricKind::Percentage,
        best: Best::None,
        get: |s| s.metrics.diversity.black,
    },
    CompareRow {
        label: "Hispanic %",
        kind: MetricKind::Percentage,
        best: Best::None,
        get: |s| s.metrics.diversity.hispanic,
    },
    CompareRow {
        label: "Asian %",
        kind: MetricKind::Percentage,
        best: Best::None,
        get: |s| s.metrics.diversity.asian,
    },
    CompareRow {
        label: "Two or More Races %",
        kind: MetricKind::Percentage,
        best: Best::None,
        get: |s| s.metrics.diversity.two_or_more,
    },
];

/// Index of the best value in a row, if the row ranks values at all.
fn best_index(values: &[Option<f64>], best: Best) -> Option<usize> {
    let mut winner: Option<(usize, f64)> = None;
    for (idx, value) in values.iter().enumerate() {
        let Some(value) = *value else { continue };
        let beats = match (best, winner) {
            (Best::None, _) => return None,
            (_, None) => true,
            (Best::Highest, Some((_, current))) => value > current,
            (Best::Lowest, Some((_, current))) => value < current,
        };
        if beats {
            winner = Some((idx, value));
        }
    }
    winner.map(|(idx, _)| idx)
}

/// Comparison table view
pub struct CompareView<'a> {
    schools: &'a [SchoolDetail],
    selected: usize,
    theme: &'a Theme,
}

impl<'a> CompareView<'a> {
    pub fn new(schools: &'a [SchoolDetail], selected: usize, theme: &'a Theme) -> Self {
        CompareView {
            schools,
            selected,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Compare Schools ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style())
            .title_style(self.theme.title_style());

        let header_cells: Vec<Cell> = std::iter::once(Cell::from("Metric"))
            .chain(self.schools.iter().enumerate().map(|(idx, school)| {
                let style = if idx == self.selected {
                    self.theme.highlight_style()
                } else {
                    self.theme.title_style()
                };
                Cell::from(Line::from(vec![
                    Span::styled(school.school_name.clone(), style),
                    Span::styled(format!(" ({})", school.city), self.theme.muted_style()),
                ]))
            }))
            .collect();

        let rows: Vec<Row> = ROWS
            .iter()
            .map(|row| {
                let values: Vec<Option<f64>> =
                    self.schools.iter().map(|school| (row.get)(school)).collect();
                let best = best_index(&values, row.best);

                let cells: Vec<Cell> = std::iter::once(Cell::from(Span::styled(
                    row.label,
                    self.theme.muted_style(),
                )))
                .chain(values.iter().enumerate().map(|(idx, value)| match value {
                    Some(v) => {
                        let text = trend::format_value(*v, row.kind);
                        if best == Some(idx) {
                            Cell::from(Span::styled(text, self.theme.best_value_style()))
                        } else {
                            Cell::from(text)
                        }
                    }
                    None => Cell::from(Span::styled("N/A", self.theme.muted_style())),
                }))
                .collect();

                Row::new(cells)
            })
            .collect();

        let mut widths = vec![Constraint::Length(24)];
        widths.extend(
            std::iter::repeat(Constraint::Min(14)).take(self.schools.len()),
        );

        let table = Table::new(rows, widths)
            .header(Row::new(header_cells).bottom_margin(1))
            .block(block)
            .column_spacing(1);

        frame.render_widget(table, area);
    }
}

/// Local guidance shown instead of the table when the selection cannot be
/// compared; no request is sent in these states.
pub struct CompareGuidance<'a> {
    selection_len: usize,
    theme: &'a Theme,
}

impl<'a> CompareGuidance<'a> {
    pub fn new(selection_len: usize, theme: &'a Theme) -> Self {
        CompareGuidance {
            selection_len,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let (title, body) = if self.selection_len == 0 {
            (
                "No Schools Selected",
                "Search for schools and add them to your comparison list to get started."
                    .to_string(),
            )
        } else {
            (
                "Not Enough Schools",
                format!(
                    "Select at least 2 schools to compare. You currently have {} school selected.",
                    self.selection_len
                ),
            )
        };

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(title, self.theme.title_style())),
            Line::from(""),
            Line::from(Span::raw(body)),
            Line::from(Span::styled(
                "Press Esc to go back to search",
                self.theme.muted_style(),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .title(" Compare Schools ")
                    .borders(Borders::ALL)
                    .border_style(self.theme.border_style())
                    .title_style(self.theme.title_style()),
            );
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_index_highest() {
        let values = vec![Some(20.0), Some(24.5), None, Some(18.0)];
        assert_eq!(best_index(&values, Best::Highest), Some(1));
    }

    #[test]
    fn test_best_index_lowest_skips_missing() {
        let values = vec![None, Some(61.0), Some(12.5)];
        assert_eq!(best_index(&values, Best::Lowest), Some(2));
    }

    #[test]
    fn test_best_index_none_kind_never_highlights() {
        let values = vec![Some(1.0), Some(2.0)];
        assert_eq!(best_index(&values, Best::None), None);
    }

    #[test]
    fn test_best_index_all_missing() {
        let values = vec![None, None];
        assert_eq!(best_index(&values, Best::Highest), None);
    }
}
