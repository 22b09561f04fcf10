// File: ./src/tui/mod.rs
// Entry point and main loop for the TUI application.
pub mod action;
pub mod handlers;
pub mod network;
pub mod state;
pub mod view;

use crate::config::Config;
use crate::context::SharedContext;
use crate::market::{CoinLimit, MarketClient};
use crate::preferences::Preferences;
use crate::storage::FileStore;
use crate::tui::action::Action;
use crate::tui::state::AppState;
use crate::tui::view::draw;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{io, sync::Arc, time::Duration};
use tokio::sync::mpsc;

pub async fn run(
    ctx: SharedContext,
    config: Config,
    prefs: Arc<Preferences<FileStore>>,
    limit: CoinLimit,
) -> Result<()> {
    // Panic Hook
    let panic_log = ctx.get_cache_dir()?.join("coindeck_panic.log");
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        use std::io::Write;
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        if let Ok(mut file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&panic_log)
        {
            let _ = writeln!(file, "PANIC: {:?}", info);
        }
        default_hook(info);
    }));

    prefs.initialize();

    // --- TERMINAL SETUP ---
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app_state = AppState::new(limit);

    let (action_tx, action_rx) = mpsc::channel(10);
    let (event_tx, mut event_rx) = mpsc::channel(10);

    // --- NETWORK THREAD ---
    tokio::spawn(network::run_network_actor(
        MarketClient::new(&config),
        action_rx,
        event_tx.clone(),
    ));

    // --- UI LOOP ---
    let result: Result<()> = async {
        loop {
            if let Some(action) = handlers::sync_preferences(&mut app_state, &*prefs) {
                let _ = action_tx.send(action).await;
            }

            terminal.draw(|f| draw(f, &mut app_state))?;

            while let Ok(event) = event_rx.try_recv() {
                handlers::handle_app_event(&mut app_state, event);
            }

            if event::poll(Duration::from_millis(50))? {
                match event::read()? {
                    Event::Mouse(mouse) => match mouse.kind {
                        MouseEventKind::ScrollDown => app_state.next(),
                        MouseEventKind::ScrollUp => app_state.previous(),
                        _ => {}
                    },
                    Event::Key(key) => {
                        // Filter out KeyRelease events to prevent double input on Windows
                        if key.kind == event::KeyEventKind::Release {
                            continue;
                        }
                        if let Some(action) =
                            handlers::handle_key_event(key, &mut app_state, &*prefs, &event_tx)
                        {
                            let quit = matches!(action, Action::Quit);
                            let _ = action_tx.send(action).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
    .await;

    // --- CLEANUP ---
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result
}
