// Handles keyboard input and worker events for the TUI.
use crate::library::{FontSize, SettingsPatch};
use crate::tui::action::{Action, AppEvent, QuickTab};
use crate::tui::state::{AppState, InputMode, Screen, SettingsRow};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEventKind};
use rust_i18n::t;
use tokio::sync::mpsc::Sender;

const PAGE_STEP: usize = 10;

pub fn handle_app_event(state: &mut AppState, event: AppEvent) {
    match event {
        AppEvent::Error(s) => {
            state.message = t!("error_prefix", error = s).to_string();
            state.loading = false;
        }
        AppEvent::FavoritesLoaded(list) => state.favorites = list,
        AppEvent::RecentLoaded(list) => state.recent = list,
        AppEvent::ViewedLoaded(list) => state.viewed = list,
        AppEvent::NotesLoaded(notes) => state.notes = notes,
        AppEvent::BookmarksLoaded(list) => state.bookmarks = list,
        AppEvent::SettingsLoaded(settings) => state.settings = settings,
        AppEvent::StatisticsLoaded(stats) => {
            state.statistics = Some(stats);
            if state.loading {
                state.loading = false;
                state.message = t!("ready").to_string();
            }
        }
    }
    state.refresh_selections();
}

/// Opens `index` in the viewer and queues the history updates.
/// Search and quick access also feed the Recent list.
async fn open_hymn(state: &mut AppState, index: usize, action_tx: &Sender<Action>) {
    let feeds_recent = matches!(state.screen, Screen::Search | Screen::QuickAccess);
    state.open_viewer(index);
    if feeds_recent {
        let _ = action_tx.send(Action::AddRecent(index)).await;
    }
    let _ = action_tx.send(Action::AddViewed(index)).await;
}

fn begin_note_edit(state: &mut AppState, index: usize) {
    let existing = state.notes.get(&index).cloned().unwrap_or_default();
    state.set_input(&existing);
    state.note_target = Some(index);
    state.mode = InputMode::EditingNote;
}

fn favorite_toggled_message(state: &AppState, index: usize) -> String {
    if state.favorites.contains(&index) {
        t!("removed_from_favorites").to_string()
    } else {
        t!("added_to_favorites").to_string()
    }
}

pub fn handle_mouse(kind: MouseEventKind, state: &mut AppState) {
    if state.screen == Screen::Viewer {
        // Wheel acts as a pinch on the current page
        if let Some(viewer) = state.viewer.as_mut() {
            match kind {
                MouseEventKind::ScrollUp => viewer.zoom_in(),
                MouseEventKind::ScrollDown => viewer.zoom_out(),
                _ => {}
            }
        }
        return;
    }
    match kind {
        MouseEventKind::ScrollDown => state.next(),
        MouseEventKind::ScrollUp => state.previous(),
        _ => {}
    }
}

pub async fn handle_key_event(
    key: KeyEvent,
    state: &mut AppState,
    action_tx: &Sender<Action>,
) -> Option<Action> {
    // --- SANITY CHECK ---
    let char_count = state.input_buffer.chars().count();
    if state.cursor_position > char_count {
        state.cursor_position = char_count;
    }

    match state.mode {
        InputMode::Searching => handle_search_input(key, state, action_tx).await,
        InputMode::GoToNumber => handle_number_input(key, state, action_tx).await,
        InputMode::EditingNote => handle_note_input(key, state),
        InputMode::Normal => handle_normal(key, state, action_tx).await,
    }
}

async fn handle_search_input(
    key: KeyEvent,
    state: &mut AppState,
    action_tx: &Sender<Action>,
) -> Option<Action> {
    match key.code {
        KeyCode::Esc => {
            state.go_back();
        }
        KeyCode::Enter => {
            if let Some(index) = state.selected_hymn() {
                open_hymn(state, index, action_tx).await;
            }
        }
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        KeyCode::PageDown => state.jump_forward(PAGE_STEP),
        KeyCode::PageUp => state.jump_backward(PAGE_STEP),
        KeyCode::Left => state.move_cursor_left(),
        KeyCode::Right => state.move_cursor_right(),
        KeyCode::Backspace => {
            state.delete_char();
            state.run_search();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.reset_input();
            state.run_search();
        }
        KeyCode::Char(c) => {
            state.enter_char(c);
            state.run_search();
        }
        _ => {}
    }
    None
}

async fn handle_number_input(
    key: KeyEvent,
    state: &mut AppState,
    action_tx: &Sender<Action>,
) -> Option<Action> {
    match key.code {
        KeyCode::Esc => {
            state.go_back();
        }
        KeyCode::Tab => state.switch_quick_tab(),
        KeyCode::Enter => match state.catalog.resolve_number(&state.input_buffer) {
            Some(index) => {
                state.reset_input();
                open_hymn(state, index, action_tx).await;
            }
            None => {
                state.message = t!("invalid_number", max = state.catalog.len()).to_string();
            }
        },
        KeyCode::Left => state.move_cursor_left(),
        KeyCode::Right => state.move_cursor_right(),
        KeyCode::Backspace => state.delete_char(),
        KeyCode::Char(c) => state.enter_char(c),
        _ => {}
    }
    None
}

fn handle_note_input(key: KeyEvent, state: &mut AppState) -> Option<Action> {
    match key.code {
        KeyCode::Esc => {
            state.mode = InputMode::Normal;
            state.note_target = None;
            state.reset_input();
        }
        KeyCode::Enter => {
            state.mode = InputMode::Normal;
            let target = state.note_target.take()?;
            let text = std::mem::take(&mut state.input_buffer);
            state.cursor_position = 0;
            state.message = if text.trim().is_empty() {
                t!("note_deleted").to_string()
            } else {
                t!("note_saved").to_string()
            };
            return Some(Action::SaveNote(target, text));
        }
        KeyCode::Left => state.move_cursor_left(),
        KeyCode::Right => state.move_cursor_right(),
        KeyCode::Backspace => state.delete_char(),
        KeyCode::Char(c) => state.enter_char(c),
        _ => {}
    }
    None
}

async fn handle_normal(
    key: KeyEvent,
    state: &mut AppState,
    action_tx: &Sender<Action>,
) -> Option<Action> {
    // Pending settings reset swallows the next key
    if state.confirming_reset {
        state.confirming_reset = false;
        if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
            state.message = t!("settings_reset").to_string();
            return Some(Action::ResetSettings);
        }
        state.message = t!("cancelled").to_string();
        return None;
    }

    match key.code {
        KeyCode::Char('q') => return Some(Action::Quit),
        KeyCode::Char('?') => state.show_full_help = !state.show_full_help,
        KeyCode::Esc | KeyCode::Backspace => {
            if state.show_full_help {
                state.show_full_help = false;
            } else {
                state.go_back();
            }
        }
        KeyCode::Char('/') => state.open_screen(Screen::Search),
        KeyCode::Char('g') => state.open_screen(Screen::QuickAccess),
        KeyCode::Char('F') => state.open_screen(Screen::Favorites),
        KeyCode::Char('V') => state.open_screen(Screen::Viewed),
        KeyCode::Char('N') => state.open_screen(Screen::Notes),
        KeyCode::Char('B') => state.open_screen(Screen::Bookmarks),
        KeyCode::Char('S') => {
            state.open_screen(Screen::Statistics);
            return Some(Action::Refresh);
        }
        KeyCode::Char(',') => state.open_screen(Screen::Settings),
        _ if state.screen == Screen::Viewer => return handle_viewer(key, state),
        _ => return handle_list(key, state, action_tx).await,
    }
    None
}

fn handle_viewer(key: KeyEvent, state: &mut AppState) -> Option<Action> {
    let viewer = state.viewer.as_mut()?;
    let index = viewer.index();
    match key.code {
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
            if viewer.next() {
                return Some(Action::AddViewed(viewer.index()));
            }
        }
        KeyCode::Left | KeyCode::Char('h') => {
            if viewer.previous() {
                return Some(Action::AddViewed(viewer.index()));
            }
        }
        KeyCode::Char('+') | KeyCode::Char('=') => viewer.zoom_in(),
        KeyCode::Char('-') => viewer.zoom_out(),
        KeyCode::Char('0') => viewer.reset_zoom(),
        KeyCode::Char('f') => {
            state.message = favorite_toggled_message(state, index);
            return Some(Action::ToggleFavorite(index));
        }
        KeyCode::Char('b') => {
            let exists = state.bookmarks.iter().any(|b| b.matches(index, 0));
            state.message = if exists {
                t!("bookmark_removed").to_string()
            } else {
                t!("bookmark_added").to_string()
            };
            return Some(Action::ToggleBookmark(index, 0));
        }
        KeyCode::Char('n') => begin_note_edit(state, index),
        _ => {}
    }
    None
}

async fn handle_list(
    key: KeyEvent,
    state: &mut AppState,
    action_tx: &Sender<Action>,
) -> Option<Action> {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => state.next(),
        KeyCode::Up | KeyCode::Char('k') => state.previous(),
        KeyCode::PageDown => state.jump_forward(PAGE_STEP),
        KeyCode::PageUp => state.jump_backward(PAGE_STEP),
        KeyCode::Home => state.jump_backward(usize::MAX),
        KeyCode::End => state.jump_forward(usize::MAX),
        KeyCode::Tab if state.screen == Screen::QuickAccess => state.switch_quick_tab(),
        KeyCode::Enter if state.screen == Screen::Settings => return settings_enter(state),
        KeyCode::Enter => {
            if let Some(index) = state.selected_hymn() {
                open_hymn(state, index, action_tx).await;
            }
        }
        KeyCode::Char('f') => {
            let index = state.selected_hymn()?;
            state.message = favorite_toggled_message(state, index);
            return Some(Action::ToggleFavorite(index));
        }
        KeyCode::Char('n') => {
            let index = state.selected_hymn()?;
            begin_note_edit(state, index);
        }
        KeyCode::Char('d') | KeyCode::Delete => return remove_selected(state),
        KeyCode::Char('C') => match state.screen {
            Screen::Viewed => {
                state.message = t!("history_cleared").to_string();
                return Some(Action::ClearViewed);
            }
            Screen::QuickAccess if state.quick_tab == QuickTab::Recent => {
                state.message = t!("recent_cleared").to_string();
                return Some(Action::ClearRecent);
            }
            _ => {}
        },
        _ => {}
    }
    None
}

fn remove_selected(state: &mut AppState) -> Option<Action> {
    match state.screen {
        Screen::Favorites => {
            let index = state.selected_hymn()?;
            state.message = t!("removed_from_favorites").to_string();
            Some(Action::RemoveFavorite(index))
        }
        Screen::QuickAccess if state.quick_tab == QuickTab::Favorites => {
            let index = state.selected_hymn()?;
            state.message = t!("removed_from_favorites").to_string();
            Some(Action::RemoveFavorite(index))
        }
        Screen::Notes => {
            let index = state.selected_hymn()?;
            state.message = t!("note_deleted").to_string();
            Some(Action::DeleteNote(index))
        }
        Screen::Bookmarks => {
            let b = state.selected_bookmark()?;
            let action = Action::RemoveBookmark(b.index, b.page);
            state.message = t!("bookmark_removed").to_string();
            Some(action)
        }
        _ => None,
    }
}

fn settings_enter(state: &mut AppState) -> Option<Action> {
    let patch = match state.selected_settings_row()? {
        SettingsRow::FontSmall => SettingsPatch::font(FontSize::Small),
        SettingsRow::FontMedium => SettingsPatch::font(FontSize::Medium),
        SettingsRow::FontLarge => SettingsPatch::font(FontSize::Large),
        SettingsRow::DarkMode => SettingsPatch::dark_mode(!state.settings.dark_mode),
        SettingsRow::Reset => {
            state.confirming_reset = true;
            state.message = t!("confirm_reset").to_string();
            return None;
        }
    };
    Some(Action::UpdateSettings(patch))
}
