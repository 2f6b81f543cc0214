// File: ./src/tui/mod.rs
// Entry point and main loop for the TUI application.
pub mod action;
pub mod handlers;
pub mod state;
pub mod view;
pub mod worker;

use crate::config::Config;
use crate::context::AppContext;
use crate::library::Library;
use crate::tui::action::Action;
use crate::tui::state::AppState;
use crate::tui::view::draw;
use crate::tui::worker::WorkerLimits;
use crate::{i18n, logging};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{io, path::PathBuf, sync::Arc, time::Duration};
use tokio::sync::mpsc;

/// Starts the interactive viewer. `catalog_override` wins over the config file.
pub async fn run(ctx: Arc<dyn AppContext>, catalog_override: Option<PathBuf>) -> Result<()> {
    // --- 1. PREAMBLE & CONFIG ---
    logging::install_panic_hook(ctx.as_ref());

    let mut cfg = match Config::load_or_init(ctx.as_ref()) {
        Ok(c) => c,
        Err(e) => {
            // Syntax or permission problems are not silently replaced by defaults
            eprintln!("Error loading configuration:\n{}", e);
            std::process::exit(1);
        }
    };
    if catalog_override.is_some() {
        cfg.catalog = catalog_override;
    }

    if let Err(e) = logging::init_file_logger(ctx.as_ref(), &cfg) {
        eprintln!("Warning: logging disabled: {}", e);
    }
    let lang = i18n::apply(&cfg);
    log::info!("Starting hosanna TUI v{}", env!("CARGO_PKG_VERSION"));

    let catalog = cfg.open_catalog()?;
    let library = Library::open(ctx.as_ref())?;
    log::info!("Catalog has {} hymns", catalog.len());

    // --- 2. TERMINAL SETUP ---
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // --- 3. STATE INIT ---
    let limits = WorkerLimits {
        total_hymns: catalog.len(),
        recent_limit: cfg.recent_limit,
        viewed_limit: cfg.viewed_limit,
    };
    let mut app_state = AppState::new(catalog, i18n::is_rtl(&lang));

    let (action_tx, action_rx) = mpsc::channel(32);
    let (event_tx, mut event_rx) = mpsc::channel(64);

    // --- 4. STORAGE WORKER ---
    let worker = tokio::spawn(worker::run_storage_actor(
        library, limits, action_rx, event_tx,
    ));

    // --- 5. UI LOOP ---
    let loop_result: Result<()> = async {
        loop {
            terminal.draw(|f| draw(f, &mut app_state))?;

            // A. Worker Events
            while let Ok(event) = event_rx.try_recv() {
                handlers::handle_app_event(&mut app_state, event);
            }

            // B. Input Events
            if event::poll(Duration::from_millis(50))? {
                match event::read()? {
                    Event::Mouse(mouse) => handlers::handle_mouse(mouse.kind, &mut app_state),
                    Event::Key(key) => {
                        // Filter out KeyRelease events to prevent double input on Windows
                        if key.kind == event::KeyEventKind::Release {
                            continue;
                        }
                        if let Some(action) =
                            handlers::handle_key_event(key, &mut app_state, &action_tx).await
                        {
                            if matches!(action, Action::Quit) {
                                break;
                            }
                            let _ = action_tx.send(action).await;
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
    .await;

    // --- 6. CLEANUP ---
    let _ = action_tx.send(Action::Quit).await;
    if let Err(e) = worker.await {
        log::error!("Storage worker panicked: {}", e);
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    log::info!("TUI closed");
    loop_result
}
