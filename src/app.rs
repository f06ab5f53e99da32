//! Main application logic and TUI event loop.

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    widgets::Paragraph,
    Terminal,
};

use crate::cli::AppConfig;
use crate::comparison::{ComparisonList, MAX_COMPARE};
use crate::data::{
    ApiClient, ApiError, FetchEvent, FetchRequest, Fetcher, JsonFileStore, School, SchoolDetail,
    TopScoreEntry,
};
use crate::ui::{
    compare::{CompareGuidance, CompareView},
    detail::{metric_entries, DetailTab, DetailView, NotFoundView},
    top_scores::{PresetBar, TopScoresTable, PRESETS},
    widgets::{BasketPanel, SchoolList, SearchInput, StatusBar},
    HelpOverlay, Theme,
};

/// Keystrokes pause this long before a search request is dispatched.
const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);
/// Event poll timeout; bounds how quickly completed fetches are applied.
const TICK_INTERVAL: Duration = Duration::from_millis(100);
/// Rows requested from the top-scores endpoint.
const TOP_SCORES_LIMIT: usize = 100;

/// Which screen is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Search,
    Detail,
    Compare,
    TopScores,
}

/// Focus within the search view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchFocus {
    Input,
    Results,
}

/// Application state
pub struct App {
    theme: Theme,
    fetcher: Fetcher,
    comparison: ComparisonList,
    search_limit: usize,

    view: View,

    // Search state
    focus: SearchFocus,
    query: String,
    dispatched_query: String,
    last_edit: Option<Instant>,
    results: Vec<School>,
    selected_result: usize,
    search_seq: u64,
    search_in_flight: bool,

    // Detail state
    detail_rcdts: Option<String>,
    detail: Option<SchoolDetail>,
    detail_not_found: bool,
    detail_tab: DetailTab,
    selected_metric: usize,
    detail_return: View,
    detail_seq: u64,
    detail_in_flight: bool,

    // Compare state
    compare_schools: Vec<SchoolDetail>,
    selected_compare: usize,
    compare_seq: u64,
    compare_in_flight: bool,

    // Top scores state
    preset: usize,
    top_entries: Vec<TopScoreEntry>,
    selected_top: usize,
    top_seq: u64,
    top_in_flight: bool,
    top_loaded_preset: Option<usize>,

    next_seq: u64,
    show_help: bool,
    should_quit: bool,

    // Messages surfaced on the status bar (non-fatal)
    error_message: Option<String>,
    notice: Option<String>,
}

impl App {
    /// Create a new App instance
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = ApiClient::new(&config.api_url)
            .with_context(|| format!("failed to build API client for {}", config.api_url))?;
        let store = JsonFileStore::new(config.state_path.clone());
        let comparison = ComparisonList::load(Box::new(store));

        Ok(App {
            theme: Theme::default(),
            fetcher: Fetcher::spawn(client),
            comparison,
            search_limit: config.search_limit,
            view: View::Search,
            focus: SearchFocus::Input,
            query: String::new(),
            dispatched_query: String::new(),
            last_edit: None,
            results: Vec::new(),
            selected_result: 0,
            search_seq: 0,
            search_in_flight: false,
            detail_rcdts: None,
            detail: None,
            detail_not_found: false,
            detail_tab: DetailTab::Overview,
            selected_metric: 0,
            detail_return: View::Search,
            detail_seq: 0,
            detail_in_flight: false,
            compare_schools: Vec::new(),
            selected_compare: 0,
            compare_seq: 0,
            compare_in_flight: false,
            preset: 0,
            top_entries: Vec::new(),
            selected_top: 0,
            top_seq: 0,
            top_in_flight: false,
            top_loaded_preset: None,
            next_seq: 0,
            show_help: false,
            should_quit: false,
            error_message: None,
            notice: None,
        })
    }

    /// Set an error message to display (non-fatal)
    pub fn set_error(&mut self, message: String) {
        self.error_message = Some(message);
    }

    fn set_notice(&mut self, message: String) {
        self.notice = Some(message);
    }

    fn clear_messages(&mut self) {
        self.error_message = None;
        self.notice = None;
    }

    fn bump_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Advance time-driven work: the search debounce and completed fetches.
    fn tick(&mut self) {
        if let Some(edited_at) = self.last_edit {
            if edited_at.elapsed() >= SEARCH_DEBOUNCE {
                self.last_edit = None;
                self.dispatch_search(false);
            }
        }

        for event in self.fetcher.poll() {
            self.apply_fetch_event(event);
        }
    }

    /// Apply a completed fetch. Results from superseded requests are
    /// dropped here by comparing sequence numbers; a stale response must
    /// never overwrite newer state.
    fn apply_fetch_event(&mut self, event: FetchEvent) {
        match event {
            FetchEvent::Search { seq, result } => {
                if seq != self.search_seq {
                    return;
                }
                self.search_in_flight = false;
                match result {
                    Ok(response) => {
                        self.results = response.results;
                        if self.selected_result >= self.results.len() {
                            self.selected_result = self.results.len().saturating_sub(1);
                        }
                        self.error_message = None;
                    }
                    Err(err) => self.set_error(format!("failed to load search results: {err}")),
                }
            }
            FetchEvent::Detail { seq, rcdts, result } => {
                if seq != self.detail_seq {
                    return;
                }
                self.detail_in_flight = false;
                match result {
                    Ok(detail) => {
                        self.detail = Some(detail);
                        self.detail_not_found = false;
                        self.error_message = None;
                    }
                    Err(ApiError::NotFound) => {
                        self.detail = None;
                        self.detail_not_found = true;
                    }
                    Err(err) => self.set_error(format!("failed to load school {rcdts}: {err}")),
                }
            }
            FetchEvent::Compare { seq, result } => {
                if seq != self.compare_seq {
                    return;
                }
                self.compare_in_flight = false;
                match result {
                    Ok(response) => {
                        self.compare_schools = response.schools;
                        if self.selected_compare >= self.compare_schools.len() {
                            self.selected_compare = self.compare_schools.len().saturating_sub(1);
                        }
                        self.error_message = None;
                    }
                    Err(err) => self.set_error(format!("failed to load school comparison: {err}")),
                }
            }
            FetchEvent::TopScores { seq, result } => {
                if seq != self.top_seq {
                    return;
                }
                self.top_in_flight = false;
                match result {
                    Ok(response) => {
                        self.top_entries = response.results;
                        if self.selected_top >= self.top_entries.len() {
                            self.selected_top = self.top_entries.len().saturating_sub(1);
                        }
                        self.error_message = None;
                    }
                    Err(err) => self.set_error(format!("failed to load top scores: {err}")),
                }
            }
        }
    }

    /// Send the current query to the worker. An empty query clears the
    /// results locally without a request.
    fn dispatch_search(&mut self, force: bool) {
        let query = self.query.trim().to_string();
        if query.is_empty() {
            // Invalidate anything in flight for the old query
            self.search_seq = self.bump_seq();
            self.results.clear();
            self.selected_result = 0;
            self.search_in_flight = false;
            self.dispatched_query.clear();
            return;
        }
        if !force && query == self.dispatched_query {
            return;
        }

        self.clear_messages();
        self.search_seq = self.bump_seq();
        self.fetcher.request(FetchRequest::Search {
            seq: self.search_seq,
            query: query.clone(),
            limit: self.search_limit,
        });
        self.dispatched_query = query;
        self.search_in_flight = true;
    }

    fn open_detail(&mut self, rcdts: String) {
        if self.view != View::Detail {
            self.detail_return = self.view;
        }
        self.view = View::Detail;
        self.detail_tab = DetailTab::Overview;
        self.selected_metric = 0;
        self.detail_not_found = false;
        if self.detail_rcdts.as_deref() != Some(rcdts.as_str()) {
            self.detail = None;
        }
        self.detail_rcdts = Some(rcdts.clone());

        self.clear_messages();
        self.detail_seq = self.bump_seq();
        self.fetcher.request(FetchRequest::Detail {
            seq: self.detail_seq,
            rcdts,
        });
        self.detail_in_flight = true;
    }

    fn open_compare(&mut self) {
        self.view = View::Compare;
        self.selected_compare = 0;
        self.dispatch_compare();
    }

    /// Request comparison data for the current selection. Selections
    /// outside 2-5 never produce a request; the view shows guidance.
    fn dispatch_compare(&mut self) {
        self.compare_seq = self.bump_seq();
        if self.comparison.len() < 2 {
            self.compare_schools.clear();
            self.compare_in_flight = false;
            return;
        }

        self.clear_messages();
        self.fetcher.request(FetchRequest::Compare {
            seq: self.compare_seq,
            ids: self.comparison.ids().to_vec(),
        });
        self.compare_in_flight = true;
    }

    fn open_top_scores(&mut self) {
        self.view = View::TopScores;
        if self.top_loaded_preset != Some(self.preset) {
            self.dispatch_top_scores();
        }
    }

    fn dispatch_top_scores(&mut self) {
        let preset = PRESETS[self.preset];
        self.clear_messages();
        self.top_seq = self.bump_seq();
        self.fetcher.request(FetchRequest::TopScores {
            seq: self.top_seq,
            assessment: preset.assessment,
            level: preset.level,
            limit: TOP_SCORES_LIMIT,
        });
        self.top_in_flight = true;
        self.top_loaded_preset = Some(self.preset);
        self.selected_top = 0;
    }

    /// Add or remove a school from the comparison list. A full list is a
    /// no-op beyond a status notice; persistence failures propagate.
    fn toggle_comparison(&mut self, rcdts: String) -> Result<()> {
        if self.comparison.contains(&rcdts) {
            self.comparison.remove(&rcdts)?;
        } else if !self.comparison.add(&rcdts)? {
            self.set_notice(format!(
                "comparison list is full ({MAX_COMPARE} schools max)"
            ));
            return Ok(());
        }

        // Keep an open comparison view in sync with the new membership
        if self.view == View::Compare {
            self.dispatch_compare();
        }
        Ok(())
    }

    /// Handle keyboard input
    fn handle_input(&mut self, key: KeyCode) -> Result<()> {
        if self.show_help {
            if matches!(
                key,
                KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Esc | KeyCode::F(1)
            ) {
                self.show_help = false;
            }
            return Ok(());
        }

        match self.view {
            View::Search => self.handle_search_input(key),
            View::Detail => self.handle_detail_input(key),
            View::Compare => self.handle_compare_input(key),
            View::TopScores => self.handle_top_scores_input(key),
        }
    }

    fn handle_search_input(&mut self, key: KeyCode) -> Result<()> {
        match self.focus {
            SearchFocus::Input => match key {
                KeyCode::Char(c) => {
                    self.query.push(c);
                    self.last_edit = Some(Instant::now());
                }
                KeyCode::Backspace => {
                    self.query.pop();
                    self.last_edit = Some(Instant::now());
                }
                KeyCode::Esc | KeyCode::Down | KeyCode::Tab => {
                    self.focus = SearchFocus::Results;
                }
                KeyCode::Enter => {
                    self.last_edit = None;
                    self.dispatch_search(false);
                    self.focus = SearchFocus::Results;
                }
                _ => {}
            },
            SearchFocus::Results => match key {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::F(1) => self.show_help = true,
                KeyCode::Char('/') | KeyCode::Char('i') | KeyCode::Tab => {
                    self.focus = SearchFocus::Input;
                }
                KeyCode::Char('j') | KeyCode::Down => {
                    if !self.results.is_empty() {
                        self.selected_result = (self.selected_result + 1) % self.results.len();
                    }
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    if !self.results.is_empty() {
                        self.selected_result = self
                            .selected_result
                            .checked_sub(1)
                            .unwrap_or(self.results.len() - 1);
                    }
                }
                KeyCode::Enter => {
                    if let Some(school) = self.results.get(self.selected_result) {
                        let rcdts = school.rcdts.clone();
                        self.open_detail(rcdts);
                    }
                }
                KeyCode::Char('s') => {
                    if let Some(school) = self.results.get(self.selected_result) {
                        let rcdts = school.rcdts.clone();
                        self.toggle_comparison(rcdts)?;
                    }
                }
                KeyCode::Char('S') => {
                    self.comparison.clear()?;
                    self.compare_schools.clear();
                }
                KeyCode::Char('c') => self.open_compare(),
                KeyCode::Char('t') => self.open_top_scores(),
                KeyCode::Char('r') => self.dispatch_search(true),
                _ => {}
            },
        }
        Ok(())
    }

    fn handle_detail_input(&mut self, key: KeyCode) -> Result<()> {
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::F(1) => self.show_help = true,
            KeyCode::Esc | KeyCode::Backspace => self.view = self.detail_return,
            KeyCode::Tab => {
                self.detail_tab = self.detail_tab.next();
                self.selected_metric = 0;
            }
            KeyCode::BackTab => {
                self.detail_tab = self.detail_tab.prev();
                self.selected_metric = 0;
            }
            KeyCode::Char('1') => {
                self.detail_tab = DetailTab::Overview;
                self.selected_metric = 0;
            }
            KeyCode::Char('2') => {
                self.detail_tab = DetailTab::Academics;
                self.selected_metric = 0;
            }
            KeyCode::Char('3') => {
                self.detail_tab = DetailTab::Demographics;
                self.selected_metric = 0;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if let Some(detail) = &self.detail {
                    let count = metric_entries(detail, self.detail_tab).len();
                    if count > 0 {
                        self.selected_metric = (self.selected_metric + 1) % count;
                    }
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if let Some(detail) = &self.detail {
                    let count = metric_entries(detail, self.detail_tab).len();
                    if count > 0 {
                        self.selected_metric =
                            self.selected_metric.checked_sub(1).unwrap_or(count - 1);
                    }
                }
            }
            KeyCode::Char('s') => {
                if let Some(rcdts) = self.detail_rcdts.clone() {
                    self.toggle_comparison(rcdts)?;
                }
            }
            KeyCode::Char('c') => self.open_compare(),
            KeyCode::Char('t') => self.open_top_scores(),
            KeyCode::Char('r') => {
                if let Some(rcdts) = self.detail_rcdts.clone() {
                    self.open_detail(rcdts);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_compare_input(&mut self, key: KeyCode) -> Result<()> {
        let count = if self.compare_schools.is_empty() {
            self.comparison.len()
        } else {
            self.compare_schools.len()
        };

        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::F(1) => self.show_help = true,
            KeyCode::Esc => self.view = View::Search,
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Char('l') | KeyCode::Right => {
                if count > 0 {
                    self.selected_compare = (self.selected_compare + 1) % count;
                }
            }
            KeyCode::Char('k') | KeyCode::Up | KeyCode::Left => {
                if count > 0 {
                    self.selected_compare =
                        self.selected_compare.checked_sub(1).unwrap_or(count - 1);
                }
            }
            KeyCode::Enter => {
                if let Some(school) = self.compare_schools.get(self.selected_compare) {
                    let rcdts = school.rcdts.clone();
                    self.open_detail(rcdts);
                }
            }
            KeyCode::Char('d') | KeyCode::Char('x') => {
                let removed = self
                    .compare_schools
                    .get(self.selected_compare)
                    .map(|school| school.rcdts.clone())
                    .or_else(|| self.comparison.ids().get(self.selected_compare).cloned());
                if let Some(rcdts) = removed {
                    self.comparison.remove(&rcdts)?;
                    self.dispatch_compare();
                }
            }
            KeyCode::Char('S') => {
                self.comparison.clear()?;
                self.compare_schools.clear();
            }
            KeyCode::Char('t') => self.open_top_scores(),
            KeyCode::Char('r') => self.dispatch_compare(),
            _ => {}
        }
        Ok(())
    }

    fn handle_top_scores_input(&mut self, key: KeyCode) -> Result<()> {
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::F(1) => self.show_help = true,
            KeyCode::Esc => self.view = View::Search,
            KeyCode::Tab => {
                self.preset = (self.preset + 1) % PRESETS.len();
                self.dispatch_top_scores();
            }
            KeyCode::Char(c @ '1'..='3') => {
                let preset = (c as usize) - ('1' as usize);
                if preset != self.preset || self.top_loaded_preset != Some(preset) {
                    self.preset = preset;
                    self.dispatch_top_scores();
                }
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if !self.top_entries.is_empty() {
                    self.selected_top = (self.selected_top + 1) % self.top_entries.len();
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if !self.top_entries.is_empty() {
                    self.selected_top = self
                        .selected_top
                        .checked_sub(1)
                        .unwrap_or(self.top_entries.len() - 1);
                }
            }
            KeyCode::Enter => {
                if let Some(entry) = self.top_entries.get(self.selected_top) {
                    let rcdts = entry.rcdts.clone();
                    self.open_detail(rcdts);
                }
            }
            KeyCode::Char('s') => {
                if let Some(entry) = self.top_entries.get(self.selected_top) {
                    let rcdts = entry.rcdts.clone();
                    self.toggle_comparison(rcdts)?;
                }
            }
            KeyCode::Char('c') => self.open_compare(),
            KeyCode::Char('r') => self.dispatch_top_scores(),
            _ => {}
        }
        Ok(())
    }

    fn view_loading(&self) -> bool {
        match self.view {
            View::Search => self.search_in_flight,
            View::Detail => self.detail_in_flight,
            View::Compare => self.compare_in_flight,
            View::TopScores => self.top_in_flight,
        }
    }

    fn view_hints(&self) -> &'static str {
        match self.view {
            View::Search => {
                "[/] query  [j/k] move  [Enter] detail  [s] compare  [c] compare view  [t] top scores  [?] help  [q] quit"
            }
            View::Detail => "[Tab] tabs  [j/k] metrics  [s] compare  [c] compare view  [Esc] back  [?] help",
            View::Compare => "[j/k] select  [Enter] detail  [d] remove  [S] clear  [Esc] back  [?] help",
            View::TopScores => "[1-3] ranking  [j/k] move  [Enter] detail  [s] compare  [Esc] back  [?] help",
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Body
                Constraint::Length(2), // Status bar
            ])
            .split(size);

        match self.view {
            View::Search => self.render_search(frame, main_chunks[0]),
            View::Detail => self.render_detail(frame, main_chunks[0]),
            View::Compare => self.render_compare(frame, main_chunks[0]),
            View::TopScores => self.render_top_scores(frame, main_chunks[0]),
        }

        let status_bar = StatusBar::new(
            self.view_hints(),
            self.error_message.as_deref(),
            self.notice.as_deref(),
            self.view_loading(),
            &self.theme,
        );
        status_bar.render(frame, main_chunks[1]);

        if self.show_help {
            let help = HelpOverlay::new(&self.theme);
            help.render(frame, size);
        }
    }

    fn render_search(&self, frame: &mut ratatui::Frame, area: ratatui::layout::Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Query input
                Constraint::Min(5),    // Results
                Constraint::Length(3), // Comparison basket
            ])
            .split(area);

        let input = SearchInput::new(&self.query, &self.theme);
        input.render(frame, chunks[0], self.focus == SearchFocus::Input);

        let list = SchoolList::new(
            &self.results,
            self.selected_result,
            &self.comparison,
            &self.theme,
        );
        list.render(frame, chunks[1], self.focus == SearchFocus::Results);

        let basket = BasketPanel::new(&self.comparison, &self.theme);
        basket.render(frame, chunks[2]);
    }

    fn render_detail(&self, frame: &mut ratatui::Frame, area: ratatui::layout::Rect) {
        if self.detail_not_found {
            let rcdts = self.detail_rcdts.as_deref().unwrap_or("");
            NotFoundView::new(rcdts, &self.theme).render(frame, area);
            return;
        }

        match &self.detail {
            Some(school) => {
                let in_comparison = self.comparison.contains(&school.rcdts);
                let view = DetailView::new(
                    school,
                    self.detail_tab,
                    self.selected_metric,
                    in_comparison,
                    self.comparison.can_add_more(),
                    &self.theme,
                );
                view.render(frame, area);
            }
            None => {
                let message = Paragraph::new("Loading school…")
                    .style(self.theme.muted_style())
                    .alignment(ratatui::layout::Alignment::Center);
                frame.render_widget(message, area);
            }
        }
    }

    fn render_compare(&self, frame: &mut ratatui::Frame, area: ratatui::layout::Rect) {
        if self.comparison.len() < 2 {
            CompareGuidance::new(self.comparison.len(), &self.theme).render(frame, area);
            return;
        }

        if self.compare_schools.is_empty() {
            let message = Paragraph::new("Loading comparison…")
                .style(self.theme.muted_style())
                .alignment(ratatui::layout::Alignment::Center);
            frame.render_widget(message, area);
            return;
        }

        let view = CompareView::new(&self.compare_schools, self.selected_compare, &self.theme);
        view.render(frame, area);
    }

    fn render_top_scores(&self, frame: &mut ratatui::Frame, area: ratatui::layout::Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Preset bar
                Constraint::Min(5),    // Rankings
            ])
            .split(area);

        PresetBar::new(self.preset, &self.theme).render(frame, chunks[0]);
        TopScoresTable::new(&self.top_entries, self.selected_top, &self.theme)
            .render(frame, chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;
    use crate::data::{SchoolMetrics, SearchResponse};

    fn test_app() -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            api_url: "http://localhost:8000".to_string(),
            search_limit: 10,
            state_path: dir.path().join("comparison.json"),
        };
        (App::new(config).unwrap(), dir)
    }

    fn search_hit(rcdts: &str) -> SearchResponse {
        SearchResponse {
            results: vec![School {
                id: 1,
                rcdts: rcdts.to_string(),
                school_name: "s".to_string(),
                city: "c".to_string(),
                district: None,
                school_type: None,
            }],
            total: 1,
        }
    }

    fn detail_for(rcdts: &str) -> SchoolDetail {
        SchoolDetail {
            id: 1,
            rcdts: rcdts.to_string(),
            school_name: "s".to_string(),
            city: "c".to_string(),
            district: None,
            county: None,
            school_type: None,
            grades_served: None,
            metrics: SchoolMetrics::default(),
        }
    }

    #[test]
    fn test_stale_search_response_is_dropped() {
        let (mut app, _dir) = test_app();
        app.search_seq = 5;

        // A response from a superseded request never applies
        app.apply_fetch_event(FetchEvent::Search {
            seq: 4,
            result: Ok(search_hit("old")),
        });
        assert!(app.results.is_empty());

        // The latest sequence does
        app.apply_fetch_event(FetchEvent::Search {
            seq: 5,
            result: Ok(search_hit("new")),
        });
        assert_eq!(app.results.len(), 1);
        assert_eq!(app.results[0].rcdts, "new");
    }

    #[test]
    fn test_stale_detail_response_is_dropped() {
        let (mut app, _dir) = test_app();
        app.detail_seq = 3;

        app.apply_fetch_event(FetchEvent::Detail {
            seq: 2,
            rcdts: "old".to_string(),
            result: Ok(detail_for("old")),
        });
        assert!(app.detail.is_none());

        app.apply_fetch_event(FetchEvent::Detail {
            seq: 3,
            rcdts: "new".to_string(),
            result: Ok(detail_for("new")),
        });
        assert_eq!(app.detail.as_ref().unwrap().rcdts, "new");
    }

    #[test]
    fn test_detail_not_found_is_distinct_from_network_error() {
        let (mut app, _dir) = test_app();
        app.detail_seq = 1;
        app.detail_rcdts = Some("x".to_string());

        app.apply_fetch_event(FetchEvent::Detail {
            seq: 1,
            rcdts: "x".to_string(),
            result: Err(ApiError::NotFound),
        });
        assert!(app.detail_not_found);
        assert!(app.error_message.is_none());

        app.apply_fetch_event(FetchEvent::Detail {
            seq: 1,
            rcdts: "x".to_string(),
            result: Err(ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
            }),
        });
        assert!(app.error_message.is_some());
    }

    #[test]
    fn test_search_failure_keeps_previous_results() {
        let (mut app, _dir) = test_app();
        app.search_seq = 1;
        app.apply_fetch_event(FetchEvent::Search {
            seq: 1,
            result: Ok(search_hit("a")),
        });

        app.search_seq = 2;
        app.apply_fetch_event(FetchEvent::Search {
            seq: 2,
            result: Err(ApiError::Status {
                status: StatusCode::BAD_GATEWAY,
            }),
        });
        assert_eq!(app.results.len(), 1);
        assert!(app.error_message.as_deref().unwrap().starts_with("failed to load"));
    }

    #[test]
    fn test_compare_dispatch_requires_two_schools() {
        let (mut app, _dir) = test_app();
        app.comparison.add("a").unwrap();

        app.dispatch_compare();
        assert!(!app.compare_in_flight);
        assert!(app.compare_schools.is_empty());
    }

    #[test]
    fn test_toggle_comparison_on_full_list_is_a_notice_not_an_error() {
        let (mut app, _dir) = test_app();
        for id in ["a", "b", "c", "d", "e"] {
            app.comparison.add(id).unwrap();
        }

        app.toggle_comparison("f".to_string()).unwrap();
        assert_eq!(app.comparison.len(), 5);
        assert!(!app.comparison.contains("f"));
        assert!(app.notice.is_some());
        assert!(app.error_message.is_none());
    }
}

/// Restore terminal to normal state
fn restore_terminal() {
    // Best effort cleanup - ignore errors since we may be in a panic
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

/// Run the TUI application
pub fn run(config: AppConfig) -> Result<()> {
    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        restore_terminal();
        return Err(e).context("Failed to setup terminal");
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(t) => t,
        Err(e) => {
            restore_terminal();
            return Err(e).context("Failed to create terminal");
        }
    };

    // Create app - if this fails, restore terminal first
    let mut app = match App::new(config) {
        Ok(a) => a,
        Err(e) => {
            restore_terminal();
            return Err(e).context("Failed to initialize application");
        }
    };

    // Main loop - wrap so cleanup always runs
    let result = run_main_loop(&mut terminal, &mut app);

    // Always restore terminal, regardless of result
    restore_terminal();
    terminal.show_cursor().ok();

    result
}

/// Main application loop
fn run_main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Render - if this fails, we should exit
        terminal.draw(|f| app.render(f))?;

        // Apply the debounce timer and any completed fetches
        app.tick();

        // Handle input with timeout
        if event::poll(TICK_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = app.handle_input(key.code) {
                    // Log error but don't crash
                    app.set_error(format!("Input error: {e}"));
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
