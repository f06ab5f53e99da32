//! Terminal rendering for the schoolscope views.

pub mod compare;
pub mod detail;
mod help;
pub mod theme;
pub mod top_scores;
pub mod widgets;

pub use help::HelpOverlay;
pub use theme::Theme;
