//! Shared widgets: search input, result list, comparison basket, status bar.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::theme::Theme;
use crate::comparison::{ComparisonList, MAX_COMPARE};
use crate::data::School;

/// Search query input box
pub struct SearchInput<'a> {
    query: &'a str,
    theme: &'a Theme,
}

impl<'a> SearchInput<'a> {
    pub fn new(query: &'a str, theme: &'a Theme) -> Self {
        SearchInput { query, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let block = Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_type(if focused {
                BorderType::Double
            } else {
                BorderType::Plain
            })
            .border_style(if focused {
                self.theme.focused_border_style()
            } else {
                self.theme.border_style()
            });

        let content = if self.query.is_empty() && !focused {
            Line::from(Span::styled(
                "Search for schools by name or city...",
                self.theme.muted_style(),
            ))
        } else {
            let cursor = if focused { "▏" } else { "" };
            Line::from(vec![
                Span::styled(self.query, self.theme.normal_style()),
                Span::styled(cursor, self.theme.muted_style()),
            ])
        };

        let paragraph = Paragraph::new(content).block(block);
        frame.render_widget(paragraph, area);
    }
}

/// Search result list with comparison marks
pub struct SchoolList<'a> {
    schools: &'a [School],
    selected: usize,
    comparison: &'a ComparisonList,
    theme: &'a Theme,
}

impl<'a> SchoolList<'a> {
    pub fn new(
        schools: &'a [School],
        selected: usize,
        comparison: &'a ComparisonList,
        theme: &'a Theme,
    ) -> Self {
        SchoolList {
            schools,
            selected,
            comparison,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let items: Vec<ListItem> = self
            .schools
            .iter()
            .map(|school| {
                let mark = if self.comparison.contains(&school.rcdts) {
                    "● "
                } else {
                    "  "
                };
                let mut spans = vec![
                    Span::styled(mark, self.theme.title_style()),
                    Span::raw(school.school_name.clone()),
                    Span::styled(format!(" · {}", school.city), self.theme.muted_style()),
                ];
                if let Some(district) = &school.district {
                    spans.push(Span::styled(
                        format!(" · {district}"),
                        self.theme.muted_style(),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let block = Block::default()
            .title(format!(" Results ({}) ", self.schools.len()))
            .borders(Borders::ALL)
            .border_type(if focused {
                BorderType::Double
            } else {
                BorderType::Plain
            })
            .border_style(if focused {
                self.theme.focused_border_style()
            } else {
                self.theme.border_style()
            });

        let list = List::new(items)
            .block(block)
            .highlight_style(self.theme.highlight_style())
            .highlight_symbol("> ");

        let mut state = ListState::default();
        if !self.schools.is_empty() {
            state.select(Some(self.selected.min(self.schools.len() - 1)));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }
}

/// One-line basket summary showing the comparison selection
pub struct BasketPanel<'a> {
    comparison: &'a ComparisonList,
    theme: &'a Theme,
}

impl<'a> BasketPanel<'a> {
    pub fn new(comparison: &'a ComparisonList, theme: &'a Theme) -> Self {
        BasketPanel { comparison, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            format!(" Compare {}/{MAX_COMPARE}: ", self.comparison.len()),
            self.theme.title_style(),
        )];

        if self.comparison.is_empty() {
            spans.push(Span::styled(
                "press s on a result to add a school",
                self.theme.muted_style(),
            ));
        } else {
            spans.push(Span::raw(self.comparison.ids().join(", ")));
        }

        let paragraph = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).border_style(self.theme.border_style()));
        frame.render_widget(paragraph, area);
    }
}

/// Status bar widget. Errors win over notices, notices over key hints.
pub struct StatusBar<'a> {
    hints: &'a str,
    error: Option<&'a str>,
    notice: Option<&'a str>,
    loading: bool,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(
        hints: &'a str,
        error: Option<&'a str>,
        notice: Option<&'a str>,
        loading: bool,
        theme: &'a Theme,
    ) -> Self {
        StatusBar {
            hints,
            error,
            notice,
            loading,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(error) = self.error {
            Line::from(Span::styled(format!("Error: {error}"), self.theme.error_style()))
        } else if let Some(notice) = self.notice {
            Line::from(Span::styled(notice, self.theme.title_style()))
        } else if self.loading {
            Line::from(vec![
                Span::styled("Loading… ", self.theme.title_style()),
                Span::styled(self.hints, self.theme.muted_style()),
            ])
        } else {
            Line::from(Span::raw(self.hints))
        };

        let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::TOP));
        frame.render_widget(paragraph, area);
    }
}
