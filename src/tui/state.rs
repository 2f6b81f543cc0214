// Manages the application state for the TUI.
use crate::library::{Settings, Statistics};
use crate::model::{Bookmark, Catalog, ViewedEntry};
use crate::search::{SearchHit, Searcher};
use crate::tui::action::QuickTab;
use crate::viewer::Viewer;
use ratatui::widgets::ListState;
use std::collections::BTreeMap;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Screen {
    Titles,
    Viewer,
    Search,
    QuickAccess,
    Favorites,
    Viewed,
    Notes,
    Bookmarks,
    Statistics,
    Settings,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum InputMode {
    Normal,
    Searching,
    EditingNote,
    GoToNumber,
}

/// Rows of the settings screen, in display order.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SettingsRow {
    FontSmall,
    FontMedium,
    FontLarge,
    DarkMode,
    Reset,
}

pub const SETTINGS_ROWS: [SettingsRow; 5] = [
    SettingsRow::FontSmall,
    SettingsRow::FontMedium,
    SettingsRow::FontLarge,
    SettingsRow::DarkMode,
    SettingsRow::Reset,
];

pub struct AppState {
    // Data
    pub catalog: Catalog,
    searcher: Searcher,
    pub favorites: Vec<usize>,
    pub recent: Vec<usize>,
    pub viewed: Vec<ViewedEntry>,
    pub notes: BTreeMap<usize, String>,
    pub bookmarks: Vec<Bookmark>,
    pub settings: Settings,
    pub statistics: Option<Statistics>,
    pub search_results: Vec<SearchHit>,

    // Navigation
    pub screen: Screen,
    back_stack: Vec<Screen>,
    pub viewer: Option<Viewer>,
    pub quick_tab: QuickTab,

    // UI State
    pub titles_state: ListState,
    pub search_state: ListState,
    pub quick_state: ListState,
    pub favorites_state: ListState,
    pub viewed_state: ListState,
    pub notes_state: ListState,
    pub bookmarks_state: ListState,
    pub settings_state: ListState,
    pub mode: InputMode,
    pub message: String,
    pub loading: bool,
    pub show_full_help: bool,
    pub confirming_reset: bool,
    pub rtl: bool,

    // Input Buffers
    pub input_buffer: String,
    pub cursor_position: usize,
    pub note_target: Option<usize>,
}

fn selected(state: Option<usize>) -> ListState {
    let mut s = ListState::default();
    s.select(state);
    s
}

impl AppState {
    pub fn new(catalog: Catalog, rtl: bool) -> Self {
        let searcher = Searcher::new(&catalog);
        let first = if catalog.is_empty() { None } else { Some(0) };
        Self {
            catalog,
            searcher,
            favorites: vec![],
            recent: vec![],
            viewed: vec![],
            notes: BTreeMap::new(),
            bookmarks: vec![],
            settings: Settings::default(),
            statistics: None,
            search_results: vec![],
            screen: Screen::Titles,
            back_stack: vec![],
            viewer: None,
            quick_tab: QuickTab::Favorites,
            titles_state: selected(first),
            search_state: ListState::default(),
            quick_state: ListState::default(),
            favorites_state: ListState::default(),
            viewed_state: ListState::default(),
            notes_state: ListState::default(),
            bookmarks_state: ListState::default(),
            settings_state: selected(Some(0)),
            mode: InputMode::Normal,
            message: rust_i18n::t!("loading").to_string(),
            loading: true,
            show_full_help: false,
            confirming_reset: false,
            rtl,
            input_buffer: String::new(),
            cursor_position: 0,
            note_target: None,
        }
    }

    pub fn title(&self, index: usize) -> String {
        self.catalog.title_or_placeholder(index)
    }

    // --- SCREENS ---
    pub fn open_screen(&mut self, screen: Screen) {
        if self.screen == screen {
            return;
        }
        self.back_stack.push(self.screen);
        self.screen = screen;
        self.confirming_reset = false;
        match screen {
            Screen::Search => {
                self.mode = InputMode::Searching;
                self.reset_input();
                self.search_results.clear();
                self.search_state.select(None);
            }
            Screen::QuickAccess => {
                self.quick_tab = QuickTab::Favorites;
                self.fix_selection();
            }
            _ => self.fix_selection(),
        }
    }

    /// Pops the navigation stack. Returns false at the root screen.
    pub fn go_back(&mut self) -> bool {
        match self.back_stack.pop() {
            Some(prev) => {
                if self.screen == Screen::Viewer {
                    self.viewer = None;
                }
                self.screen = prev;
                self.mode = match prev {
                    Screen::Search => InputMode::Searching,
                    Screen::QuickAccess if self.quick_tab == QuickTab::Number => {
                        InputMode::GoToNumber
                    }
                    _ => InputMode::Normal,
                };
                self.confirming_reset = false;
                true
            }
            None => false,
        }
    }

    /// Opens the viewer on `index`, replacing any open viewer.
    pub fn open_viewer(&mut self, index: usize) {
        self.viewer = Some(Viewer::open(index, self.catalog.len()));
        if let Some(pos) = self.back_stack.iter().position(|s| *s == Screen::Viewer) {
            // Only one viewer lives on the stack; unwind to where it was opened.
            self.back_stack.truncate(pos);
            self.screen = Screen::Viewer;
        } else if self.screen != Screen::Viewer {
            self.back_stack.push(self.screen);
            self.screen = Screen::Viewer;
        }
        self.mode = InputMode::Normal;
    }

    pub fn switch_quick_tab(&mut self) {
        self.quick_tab = self.quick_tab.next();
        self.mode = if self.quick_tab == QuickTab::Number {
            self.reset_input();
            InputMode::GoToNumber
        } else {
            InputMode::Normal
        };
        self.fix_selection();
    }

    // --- SEARCH ---
    pub fn run_search(&mut self) {
        self.search_results = self.searcher.search(&self.input_buffer);
        let sel = if self.search_results.is_empty() {
            None
        } else {
            Some(0)
        };
        self.search_state.select(sel);
    }

    // --- LISTS ---
    fn list_len(&self) -> usize {
        match self.screen {
            Screen::Titles => self.catalog.len(),
            Screen::Search => self.search_results.len(),
            Screen::QuickAccess => match self.quick_tab {
                QuickTab::Favorites => self.favorites.len(),
                QuickTab::Recent => self.recent.len(),
                QuickTab::Number => 0,
            },
            Screen::Favorites => self.favorites.len(),
            Screen::Viewed => self.viewed.len(),
            Screen::Notes => self.notes.len(),
            Screen::Bookmarks => self.bookmarks.len(),
            Screen::Settings => SETTINGS_ROWS.len(),
            Screen::Viewer | Screen::Statistics => 0,
        }
    }

    fn active_list_state(&mut self) -> Option<&mut ListState> {
        match self.screen {
            Screen::Titles => Some(&mut self.titles_state),
            Screen::Search => Some(&mut self.search_state),
            Screen::QuickAccess => Some(&mut self.quick_state),
            Screen::Favorites => Some(&mut self.favorites_state),
            Screen::Viewed => Some(&mut self.viewed_state),
            Screen::Notes => Some(&mut self.notes_state),
            Screen::Bookmarks => Some(&mut self.bookmarks_state),
            Screen::Settings => Some(&mut self.settings_state),
            Screen::Viewer | Screen::Statistics => None,
        }
    }

    /// Keeps the active selection inside the (possibly shrunk) list.
    pub fn fix_selection(&mut self) {
        let len = self.list_len();
        if let Some(ls) = self.active_list_state() {
            let sel = match (len, ls.selected()) {
                (0, _) => None,
                (_, Some(i)) if i >= len => Some(len - 1),
                (_, None) => Some(0),
                (_, s) => s,
            };
            ls.select(sel);
        }
    }

    /// Clamps every list selection after a data reload.
    pub fn refresh_selections(&mut self) {
        let quick_len = match self.quick_tab {
            QuickTab::Favorites => self.favorites.len(),
            QuickTab::Recent => self.recent.len(),
            QuickTab::Number => 0,
        };
        clamp(&mut self.favorites_state, self.favorites.len());
        clamp(&mut self.viewed_state, self.viewed.len());
        clamp(&mut self.notes_state, self.notes.len());
        clamp(&mut self.bookmarks_state, self.bookmarks.len());
        clamp(&mut self.quick_state, quick_len);
    }

    /// Catalog index behind the highlighted row, if any.
    pub fn selected_hymn(&self) -> Option<usize> {
        match self.screen {
            Screen::Titles => self.titles_state.selected(),
            Screen::Search => self
                .search_state
                .selected()
                .and_then(|i| self.search_results.get(i))
                .map(|hit| hit.index),
            Screen::QuickAccess => {
                let i = self.quick_state.selected()?;
                match self.quick_tab {
                    QuickTab::Favorites => self.favorites.get(i).copied(),
                    QuickTab::Recent => self.recent.get(i).copied(),
                    QuickTab::Number => None,
                }
            }
            Screen::Favorites => self
                .favorites_state
                .selected()
                .and_then(|i| self.favorites.get(i).copied()),
            Screen::Viewed => self
                .viewed_state
                .selected()
                .and_then(|i| self.viewed.get(i))
                .map(|v| v.index),
            Screen::Notes => self
                .notes_state
                .selected()
                .and_then(|i| self.notes.keys().nth(i).copied()),
            Screen::Bookmarks => self.selected_bookmark().map(|b| b.index),
            Screen::Viewer => self.viewer.as_ref().map(|v| v.index()),
            Screen::Statistics | Screen::Settings => None,
        }
    }

    pub fn selected_bookmark(&self) -> Option<&Bookmark> {
        self.bookmarks_state
            .selected()
            .and_then(|i| self.bookmarks.get(i))
    }

    pub fn selected_settings_row(&self) -> Option<SettingsRow> {
        self.settings_state
            .selected()
            .and_then(|i| SETTINGS_ROWS.get(i).copied())
    }

    // --- NAVIGATION ---
    pub fn next(&mut self) {
        let len = self.list_len();
        if len == 0 {
            return;
        }
        if let Some(ls) = self.active_list_state() {
            let i = match ls.selected() {
                Some(i) if i + 1 >= len => 0,
                Some(i) => i + 1,
                None => 0,
            };
            ls.select(Some(i));
        }
    }

    pub fn previous(&mut self) {
        let len = self.list_len();
        if len == 0 {
            return;
        }
        if let Some(ls) = self.active_list_state() {
            let i = match ls.selected() {
                Some(0) | None => len - 1,
                Some(i) => i - 1,
            };
            ls.select(Some(i));
        }
    }

    pub fn jump_forward(&mut self, step: usize) {
        let len = self.list_len();
        if len == 0 {
            return;
        }
        if let Some(ls) = self.active_list_state() {
            let current = ls.selected().unwrap_or(0);
            ls.select(Some((current + step).min(len - 1)));
        }
    }

    pub fn jump_backward(&mut self, step: usize) {
        if self.list_len() == 0 {
            return;
        }
        if let Some(ls) = self.active_list_state() {
            let current = ls.selected().unwrap_or(0);
            ls.select(Some(current.saturating_sub(step)));
        }
    }

    // --- INPUT HELPERS ---
    pub fn move_cursor_left(&mut self) {
        let cursor_moved_left = self.cursor_position.saturating_sub(1);
        self.cursor_position = self.clamp_cursor(cursor_moved_left);
    }
    pub fn move_cursor_right(&mut self) {
        let cursor_moved_right = self.cursor_position.saturating_add(1);
        self.cursor_position = self.clamp_cursor(cursor_moved_right);
    }
    pub fn enter_char(&mut self, new_char: char) {
        let byte_index = self
            .input_buffer
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor_position)
            .unwrap_or(self.input_buffer.len());

        self.input_buffer.insert(byte_index, new_char);
        self.move_cursor_right();
    }
    pub fn delete_char(&mut self) {
        if self.cursor_position != 0 {
            let current_index = self.cursor_position;
            let before = self.input_buffer.chars().take(current_index - 1);
            let after = self.input_buffer.chars().skip(current_index);
            self.input_buffer = before.chain(after).collect();
            self.move_cursor_left();
        }
    }
    pub fn reset_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }
    /// Replaces the buffer and puts the cursor at its end.
    pub fn set_input(&mut self, text: &str) {
        self.input_buffer = text.to_string();
        self.cursor_position = self.input_buffer.chars().count();
    }
    fn clamp_cursor(&self, new_cursor_pos: usize) -> usize {
        new_cursor_pos.clamp(0, self.input_buffer.chars().count())
    }
}

fn clamp(ls: &mut ListState, len: usize) {
    match ls.selected() {
        _ if len == 0 => ls.select(None),
        Some(i) if i >= len => ls.select(Some(len - 1)),
        None => ls.select(Some(0)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(Catalog::builtin(), false)
    }

    #[test]
    fn test_navigation_next_wraps() {
        let mut state = state();
        let len = state.catalog.len();
        state.titles_state.select(Some(len - 2));

        state.next();
        assert_eq!(state.titles_state.selected(), Some(len - 1));

        state.next(); // Wrap to 0
        assert_eq!(state.titles_state.selected(), Some(0));
    }

    #[test]
    fn test_navigation_previous_wraps() {
        let mut state = state();
        let len = state.catalog.len();
        state.titles_state.select(Some(0));

        state.previous();
        assert_eq!(state.titles_state.selected(), Some(len - 1));
    }

    #[test]
    fn test_reopening_viewer_from_quick_access_unwinds_stack() {
        let mut state = state();
        state.open_viewer(0);
        state.open_screen(Screen::QuickAccess);
        state.open_viewer(2);
        assert_eq!(state.screen, Screen::Viewer);
        assert_eq!(state.viewer.as_ref().map(|v| v.index()), Some(2));

        assert!(state.go_back());
        assert_eq!(state.screen, Screen::Titles);
        assert!(state.viewer.is_none());
        assert!(!state.go_back());
    }

    #[test]
    fn test_back_to_search_resumes_typing() {
        let mut state = state();
        state.open_screen(Screen::Search);
        state.set_input("رب");
        state.open_viewer(1);
        assert_eq!(state.mode, InputMode::Normal);

        assert!(state.go_back());
        assert_eq!(state.screen, Screen::Search);
        assert_eq!(state.mode, InputMode::Searching);
        assert_eq!(state.input_buffer, "رب");
    }

    #[test]
    fn test_navigation_empty_list_safety() {
        let mut state = state();
        state.open_screen(Screen::Favorites);
        state.next();
        state.previous();
        state.jump_forward(10);
        assert_eq!(state.favorites_state.selected(), None);
        assert_eq!(state.selected_hymn(), None);
    }

    #[test]
    fn test_back_stack_and_viewer() {
        let mut state = state();
        state.open_screen(Screen::Favorites);
        state.favorites = vec![2];
        state.fix_selection();
        let idx = state.selected_hymn().unwrap();
        state.open_viewer(idx);
        assert_eq!(state.screen, Screen::Viewer);
        assert_eq!(state.selected_hymn(), Some(2));

        assert!(state.go_back());
        assert_eq!(state.screen, Screen::Favorites);
        assert!(state.viewer.is_none());
        assert!(state.go_back());
        assert_eq!(state.screen, Screen::Titles);
        assert!(!state.go_back());
    }

    #[test]
    fn test_search_selects_first_hit() {
        let mut state = state();
        state.open_screen(Screen::Search);
        assert_eq!(state.mode, InputMode::Searching);
        state.set_input("sudanese");
        state.run_search();
        assert_eq!(state.search_results.len(), 1);
        assert_eq!(state.selected_hymn(), Some(4));

        state.set_input("zzz");
        state.run_search();
        assert_eq!(state.selected_hymn(), None);
    }

    #[test]
    fn test_quick_tabs_cycle_into_number_input() {
        let mut state = state();
        state.recent = vec![3, 1];
        state.open_screen(Screen::QuickAccess);
        state.switch_quick_tab();
        assert_eq!(state.quick_tab, QuickTab::Recent);
        assert_eq!(state.selected_hymn(), Some(3));
        state.switch_quick_tab();
        assert_eq!(state.mode, InputMode::GoToNumber);
        assert_eq!(state.selected_hymn(), None);
    }

    #[test]
    fn test_selection_clamped_after_reload() {
        let mut state = state();
        state.bookmarks = vec![
            Bookmark {
                index: 1,
                page: 0,
                timestamp: 0,
            },
            Bookmark {
                index: 2,
                page: 0,
                timestamp: 0,
            },
        ];
        state.bookmarks_state.select(Some(1));
        state.bookmarks.pop();
        state.refresh_selections();
        assert_eq!(state.bookmarks_state.selected(), Some(0));
    }

    #[test]
    fn test_cursor_clamping_multibyte() {
        let mut state = state();
        state.set_input("بحث");
        assert_eq!(state.cursor_position, 3);
        state.move_cursor_right();
        assert_eq!(state.cursor_position, 3);
        state.delete_char();
        assert_eq!(state.input_buffer, "بح");
        state.move_cursor_left();
        state.move_cursor_left();
        state.move_cursor_left();
        assert_eq!(state.cursor_position, 0);
        state.enter_char('x');
        assert_eq!(state.input_buffer, "xبح");
    }
}
