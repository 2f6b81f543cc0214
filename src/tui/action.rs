// Defines actions and events for TUI interaction and state updates.
use crate::library::{Settings, SettingsPatch, Statistics};
use crate::model::{Bookmark, ViewedEntry};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickTab {
    Favorites,
    Recent,
    Number,
}

impl QuickTab {
    pub fn next(self) -> Self {
        match self {
            QuickTab::Favorites => QuickTab::Recent,
            QuickTab::Recent => QuickTab::Number,
            QuickTab::Number => QuickTab::Favorites,
        }
    }
}

/// Requests sent to the storage worker.
#[derive(Debug)]
pub enum Action {
    Refresh,
    ToggleFavorite(usize),
    RemoveFavorite(usize),
    AddRecent(usize),
    ClearRecent,
    AddViewed(usize),
    ClearViewed,
    SaveNote(usize, String),
    DeleteNote(usize),
    ToggleBookmark(usize, u32),
    RemoveBookmark(usize, u32),
    UpdateSettings(SettingsPatch),
    ResetSettings,
    Quit,
}

/// Results coming back from the storage worker.
#[derive(Debug)]
pub enum AppEvent {
    FavoritesLoaded(Vec<usize>),
    RecentLoaded(Vec<usize>),
    ViewedLoaded(Vec<ViewedEntry>),
    NotesLoaded(BTreeMap<usize, String>),
    BookmarksLoaded(Vec<Bookmark>),
    SettingsLoaded(Settings),
    StatisticsLoaded(Statistics),
    Error(String),
}
