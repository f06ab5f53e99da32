//! Ranked top-scores view with assessment/level presets.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use super::theme::Theme;
use crate::data::{Assessment, GradeLevel, TopScoreEntry};
use crate::trend::{self, MetricKind};

/// A selectable assessment/level pairing.
#[derive(Debug, Clone, Copy)]
pub struct ScorePreset {
    pub label: &'static str,
    pub assessment: Assessment,
    pub level: GradeLevel,
}

/// The rankings the backend publishes.
pub const PRESETS: [ScorePreset; 3] = [
    ScorePreset {
        label: "High School ACT",
        assessment: Assessment::Act,
        level: GradeLevel::High,
    },
    ScorePreset {
        label: "Middle School IAR",
        assessment: Assessment::Iar,
        level: GradeLevel::Middle,
    },
    ScorePreset {
        label: "Elementary IAR",
        assessment: Assessment::Iar,
        level: GradeLevel::Elementary,
    },
];

/// Preset filter bar
pub struct PresetBar<'a> {
    selected: usize,
    theme: &'a Theme,
}

impl<'a> PresetBar<'a> {
    pub fn new(selected: usize, theme: &'a Theme) -> Self {
        PresetBar { selected, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let spans: Vec<Span> = PRESETS
            .iter()
            .enumerate()
            .flat_map(|(idx, preset)| {
                let style = if idx == self.selected {
                    self.theme.highlight_style()
                } else {
                    self.theme.normal_style()
                };
                vec![
                    Span::styled(format!("[{}] ", idx + 1), self.theme.muted_style()),
                    Span::styled(format!("{}  ", preset.label), style),
                ]
            })
            .collect();

        let paragraph = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .title(" Top Scores ")
                .borders(Borders::ALL)
                .border_style(self.theme.border_style())
                .title_style(self.theme.title_style()),
        );
        frame.render_widget(paragraph, area);
    }
}

/// Ranked results table
pub struct TopScoresTable<'a> {
    entries: &'a [TopScoreEntry],
    selected: usize,
    theme: &'a Theme,
}

impl<'a> TopScoresTable<'a> {
    pub fn new(entries: &'a [TopScoreEntry], selected: usize, theme: &'a Theme) -> Self {
        TopScoresTable {
            entries,
            selected,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style());

        if self.entries.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let message = Paragraph::new("No rankings available")
                .style(self.theme.muted_style())
                .alignment(ratatui::layout::Alignment::Center);
            frame.render_widget(message, inner);
            return;
        }

        let rows: Vec<Row> = self
            .entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                let enrollment = entry
                    .enrollment
                    .map(|v| trend::format_value(v as f64, MetricKind::Count))
                    .unwrap_or_else(|| "N/A".to_string());

                let row = Row::new(vec![
                    Cell::from(format!("{}", entry.rank)),
                    Cell::from(entry.school_name.clone()),
                    Cell::from(entry.city.clone()),
                    Cell::from(entry.district.clone().unwrap_or_default()),
                    Cell::from(enrollment),
                    Cell::from(format!("{:.2}", entry.score)),
                ]);

                if idx == self.selected {
                    row.style(self.theme.highlight_style())
                } else {
                    row
                }
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(5),
                Constraint::Min(24),
                Constraint::Min(12),
                Constraint::Min(16),
                Constraint::Length(10),
                Constraint::Length(7),
            ],
        )
        .header(
            Row::new(vec!["Rank", "School", "City", "District", "Enroll", "Score"])
                .style(self.theme.muted_style())
                .bottom_margin(1),
        )
        .block(block)
        .column_spacing(1);

        frame.render_widget(table, area);
    }
}
