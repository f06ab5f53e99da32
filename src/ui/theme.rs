//! Theme configuration for the TUI.

use ratatui::style::{Color, Modifier, Style};

use crate::trend::TrendDirection;

/// Color theme for the application
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
    pub border: Color,
    pub title: Color,
    pub muted: Color,
    pub error: Color,
    pub trend_up: Color,
    pub trend_down: Color,
    pub best_value: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            bg: Color::Reset,
            fg: Color::White,
            highlight_bg: Color::Rgb(60, 60, 80),
            highlight_fg: Color::White,
            border: Color::Rgb(100, 100, 120),
            title: Color::Cyan,
            muted: Color::DarkGray,
            error: Color::Red,
            trend_up: Color::Green,
            trend_down: Color::Red,
            best_value: Color::Green,
        }
    }
}

impl Theme {
    /// Get style for normal text
    pub fn normal_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Get style for highlighted/selected items
    pub fn highlight_style(&self) -> Style {
        Style::default()
            .fg(self.highlight_fg)
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for borders
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Get style for focused panel borders (distinct from normal borders)
    pub fn focused_border_style(&self) -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for titles
    pub fn title_style(&self) -> Style {
        Style::default().fg(self.title).add_modifier(Modifier::BOLD)
    }

    /// Get style for secondary text (labels, hints, N/A values)
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Get style for error messages
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    /// Style for trend arrows by direction
    pub fn trend_style(&self, direction: TrendDirection) -> Style {
        match direction {
            TrendDirection::Up => Style::default().fg(self.trend_up),
            TrendDirection::Down => Style::default().fg(self.trend_down),
            TrendDirection::Flat => self.muted_style(),
        }
    }

    /// Style for the best value in a comparison row
    pub fn best_value_style(&self) -> Style {
        Style::default()
            .fg(self.best_value)
            .add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_styles_are_distinct() {
        let theme = Theme::default();
        let up = theme.trend_style(TrendDirection::Up);
        let down = theme.trend_style(TrendDirection::Down);
        let flat = theme.trend_style(TrendDirection::Flat);
        assert_ne!(up, down);
        assert_ne!(up, flat);
        assert_ne!(down, flat);
    }
}
