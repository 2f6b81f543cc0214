// Background storage worker for the TUI.
//
// Owns the `Library`; the UI thread never touches storage directly. Every
// mutation is followed by a reload of the lists it affects plus statistics.
use crate::library::Library;
use crate::tui::action::{Action, AppEvent};
use anyhow::Result;
use tokio::sync::mpsc::{Receiver, Sender};

#[derive(Debug, Clone, Copy)]
pub struct WorkerLimits {
    pub total_hymns: usize,
    pub recent_limit: usize,
    pub viewed_limit: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Affects {
    Favorites,
    Recent,
    Viewed,
    Notes,
    Bookmarks,
    Settings,
    Everything,
}

pub async fn run_storage_actor(
    library: Library,
    limits: WorkerLimits,
    mut action_rx: Receiver<Action>,
    event_tx: Sender<AppEvent>,
) {
    publish(&library, limits, Affects::Everything, &event_tx).await;

    while let Some(action) = action_rx.recv().await {
        if matches!(action, Action::Quit) {
            break;
        }
        log::debug!("Storage action: {:?}", action);

        match apply(&library, action) {
            Ok(affects) => publish(&library, limits, affects, &event_tx).await,
            Err(e) => {
                log::error!("Storage action failed: {:#}", e);
                let _ = event_tx.send(AppEvent::Error(e.to_string())).await;
            }
        }
    }
    log::debug!("Storage worker stopped");
}

fn apply(library: &Library, action: Action) -> Result<Affects> {
    let affects = match action {
        Action::Refresh | Action::Quit => Affects::Everything,
        Action::ToggleFavorite(i) => {
            library.toggle_favorite(i)?;
            Affects::Favorites
        }
        Action::RemoveFavorite(i) => {
            library.remove_favorite(i)?;
            Affects::Favorites
        }
        Action::AddRecent(i) => {
            library.add_recent(i)?;
            Affects::Recent
        }
        Action::ClearRecent => {
            library.clear_recent()?;
            Affects::Recent
        }
        Action::AddViewed(i) => {
            library.add_viewed(i)?;
            Affects::Viewed
        }
        Action::ClearViewed => {
            library.clear_viewed()?;
            Affects::Viewed
        }
        Action::SaveNote(i, text) => {
            library.save_note(i, &text)?;
            Affects::Notes
        }
        Action::DeleteNote(i) => {
            library.delete_note(i)?;
            Affects::Notes
        }
        Action::ToggleBookmark(i, page) => {
            library.toggle_bookmark(i, page)?;
            Affects::Bookmarks
        }
        Action::RemoveBookmark(i, page) => {
            library.remove_bookmark(i, page)?;
            Affects::Bookmarks
        }
        Action::UpdateSettings(patch) => {
            library.update_settings(&patch)?;
            Affects::Settings
        }
        Action::ResetSettings => {
            library.reset_settings()?;
            Affects::Settings
        }
    };
    Ok(affects)
}

async fn publish(library: &Library, limits: WorkerLimits, affects: Affects, tx: &Sender<AppEvent>) {
    let events = match collect(library, limits, affects) {
        Ok(events) => events,
        Err(e) => {
            log::error!("Failed to reload lists: {:#}", e);
            vec![AppEvent::Error(e.to_string())]
        }
    };
    for event in events {
        if tx.send(event).await.is_err() {
            // UI is gone
            return;
        }
    }
}

fn collect(library: &Library, limits: WorkerLimits, affects: Affects) -> Result<Vec<AppEvent>> {
    let all = affects == Affects::Everything;
    let mut events = Vec::new();

    if all || affects == Affects::Favorites {
        events.push(AppEvent::FavoritesLoaded(library.get_favorites()?));
    }
    if all || affects == Affects::Recent {
        events.push(AppEvent::RecentLoaded(
            library.get_recent(limits.recent_limit)?,
        ));
    }
    if all || affects == Affects::Viewed {
        events.push(AppEvent::ViewedLoaded(
            library.get_viewed(limits.viewed_limit)?,
        ));
    }
    if all || affects == Affects::Notes {
        events.push(AppEvent::NotesLoaded(library.get_all_notes()?));
    }
    if all || affects == Affects::Bookmarks {
        events.push(AppEvent::BookmarksLoaded(library.get_bookmarks()?));
    }
    if all || affects == Affects::Settings {
        events.push(AppEvent::SettingsLoaded(library.get_settings()?));
    }
    if affects != Affects::Settings && affects != Affects::Recent {
        events.push(AppEvent::StatisticsLoaded(
            library.statistics(limits.total_hymns)?,
        ));
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn limits() -> WorkerLimits {
        WorkerLimits {
            total_hymns: 4,
            recent_limit: 10,
            viewed_limit: 50,
        }
    }

    #[tokio::test]
    async fn test_initial_publish_then_updates() {
        let library = Library::in_memory();
        let (action_tx, action_rx) = mpsc::channel(10);
        let (event_tx, mut event_rx) = mpsc::channel(64);

        let handle = tokio::spawn(run_storage_actor(
            library.clone(),
            limits(),
            action_rx,
            event_tx,
        ));

        // Initial snapshot: six lists + statistics
        for _ in 0..7 {
            event_rx.recv().await.unwrap();
        }

        action_tx.send(Action::ToggleFavorite(2)).await.unwrap();
        match event_rx.recv().await.unwrap() {
            AppEvent::FavoritesLoaded(favs) => assert_eq!(favs, vec![2]),
            other => panic!("unexpected event {:?}", other),
        }
        match event_rx.recv().await.unwrap() {
            AppEvent::StatisticsLoaded(stats) => assert_eq!(stats.favorites, 1),
            other => panic!("unexpected event {:?}", other),
        }

        action_tx.send(Action::Quit).await.unwrap();
        handle.await.unwrap();
        assert!(library.is_favorite(2).unwrap());
    }

    #[test]
    fn test_recent_change_skips_statistics() {
        let library = Library::in_memory();
        let affects = apply(&library, Action::AddRecent(1)).unwrap();
        let events = collect(&library, limits(), affects).unwrap();
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], AppEvent::RecentLoaded(r) if r == &vec![1]));
    }
}
