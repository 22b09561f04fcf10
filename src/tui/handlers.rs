// File: src/tui/handlers.rs
// Handles keyboard input and network events for the TUI.
use crate::market::CoinLimit;
use crate::model::{Currency, FontSizeSetting};
use crate::preferences::Preferences;
use crate::storage::{KeyValueStore, StoreError};
use crate::tui::action::{Action, AppEvent};
use crate::tui::state::{AppState, Screen};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::future::Future;
use tokio::sync::mpsc::Sender;

pub fn handle_app_event(state: &mut AppState, event: AppEvent) {
    match event {
        AppEvent::Status(s) => state.message = s,
        AppEvent::MarketsLoaded {
            limit,
            currency,
            coins,
        } => {
            if limit != state.coin_limit || currency != state.currency {
                log::debug!("Ignoring stale market page ({} / {})", limit, currency);
                return;
            }
            state.message = format!("Loaded {} coins.", coins.len());
            state.set_coins(coins);
            state.error = None;
            state.loading = false;
        }
        AppEvent::FetchFailed {
            limit,
            currency,
            message,
        } => {
            if limit != state.coin_limit || currency != state.currency {
                return;
            }
            state.set_coins(vec![]);
            state.message = message.clone();
            state.error = Some(message);
            state.loading = false;
        }
    }
}

/// Copies the shared preference state into the UI state.
///
/// Returns the first market fetch once the currency preference has loaded.
pub fn sync_preferences<S: KeyValueStore + 'static>(
    state: &mut AppState,
    prefs: &Preferences<S>,
) -> Option<Action> {
    let was_loading = state.prefs_loading;
    state.font = prefs.font.snapshot();
    state.prefs_loading = prefs.is_loading();

    let currency = prefs.currency.snapshot();
    state.currency = currency.value;
    if was_loading && !state.prefs_loading {
        state.currency_state.select(Some(currency.value.position()));
        state.message = "Ready.".to_string();
    }

    if !state.initial_fetch_sent && !currency.is_loading {
        state.initial_fetch_sent = true;
        state.loading = true;
        return Some(Action::FetchMarkets {
            limit: state.coin_limit,
            currency: state.currency,
        });
    }
    None
}

/// Switches the page size. Picking the current size does nothing.
pub fn select_limit(state: &mut AppState, limit: CoinLimit) -> Option<Action> {
    if limit == state.coin_limit {
        return None;
    }
    state.coin_limit = limit;
    start_fetch(state)
}

fn start_fetch(state: &mut AppState) -> Option<Action> {
    state.loading = true;
    state.error = None;
    state.message = format!("Loading top {} coins...", state.coin_limit);
    // Before the first fetch the preference sync issues it.
    if !state.initial_fetch_sent {
        return None;
    }
    Some(Action::FetchMarkets {
        limit: state.coin_limit,
        currency: state.currency,
    })
}

pub fn select_font_size<S: KeyValueStore + 'static>(
    state: &mut AppState,
    prefs: &Preferences<S>,
    setting: FontSizeSetting,
    event_tx: &Sender<AppEvent>,
) {
    if setting == state.font.setting {
        return;
    }
    persist(prefs.font.set_font_size(setting), "font size", event_tx);
    state.font = prefs.font.snapshot();
    state.font_changed = true;
}

pub fn select_currency<S: KeyValueStore + 'static>(
    state: &mut AppState,
    prefs: &Preferences<S>,
    currency: Currency,
    event_tx: &Sender<AppEvent>,
) -> Option<Action> {
    if currency == state.currency {
        return None;
    }
    persist(prefs.currency.set_currency(currency), "currency", event_tx);
    state.currency = currency;
    start_fetch(state)
}

// The in-memory value is already updated; only report write failures.
fn persist<F>(write: F, what: &'static str, event_tx: &Sender<AppEvent>)
where
    F: Future<Output = Result<(), StoreError>> + Send + 'static,
{
    let tx = event_tx.clone();
    tokio::spawn(async move {
        if let Err(e) = write.await {
            let _ = tx
                .send(AppEvent::Status(format!("Could not save {}: {}", what, e)))
                .await;
        }
    });
}

fn step_font(current: FontSizeSetting, up: bool) -> FontSizeSetting {
    use FontSizeSetting::*;
    match (current, up) {
        (Small, true) => Medium,
        (Medium, true) | (Large, true) => Large,
        (Large, false) => Medium,
        (Medium, false) | (Small, false) => Small,
    }
}

/// Returns the action for the network actor, if the key produced one.
pub fn handle_key_event<S: KeyValueStore + 'static>(
    key: KeyEvent,
    state: &mut AppState,
    prefs: &Preferences<S>,
    event_tx: &Sender<AppEvent>,
) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(Action::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Some(Action::Quit);
        }
        KeyCode::Tab | KeyCode::BackTab => {
            state.toggle_screen();
            return None;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.next();
            return None;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.previous();
            return None;
        }
        _ => {}
    }

    match state.screen {
        Screen::Markets => match key.code {
            KeyCode::Char('1') => select_limit(state, CoinLimit::Ten),
            KeyCode::Char('2') => select_limit(state, CoinLimit::Twenty),
            KeyCode::Char('3') => select_limit(state, CoinLimit::Thirty),
            _ => None,
        },
        Screen::Settings => {
            if state.prefs_loading {
                return None;
            }
            match key.code {
                KeyCode::Char('s') => {
                    select_font_size(state, prefs, FontSizeSetting::Small, event_tx);
                    None
                }
                KeyCode::Char('m') => {
                    select_font_size(state, prefs, FontSizeSetting::Medium, event_tx);
                    None
                }
                KeyCode::Char('l') => {
                    select_font_size(state, prefs, FontSizeSetting::Large, event_tx);
                    None
                }
                KeyCode::Left | KeyCode::Char('-') => {
                    let next = step_font(state.font.setting, false);
                    select_font_size(state, prefs, next, event_tx);
                    None
                }
                KeyCode::Right | KeyCode::Char('+') => {
                    let next = step_font(state.font.setting, true);
                    select_font_size(state, prefs, next, event_tx);
                    None
                }
                KeyCode::Enter | KeyCode::Char(' ') => {
                    let currency = state.highlighted_currency()?;
                    select_currency(state, prefs, currency, event_tx)
                }
                _ => None,
            }
        }
    }
}
