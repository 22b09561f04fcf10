// Tests for TUI key handling and event application.
#![cfg(feature = "tui")]
use coindeck::market::{Coin, CoinLimit};
use coindeck::model::{CURRENCY_KEY, Currency, FONT_SIZE_KEY, FontSizeSetting};
use coindeck::preferences::Preferences;
use coindeck::storage::MemoryStore;
use coindeck::tui::action::{Action, AppEvent};
use coindeck::tui::handlers::{handle_app_event, handle_key_event, sync_preferences};
use coindeck::tui::state::{AppState, Screen};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn coin(id: &str) -> Coin {
    Coin {
        id: id.to_string(),
        name: id.to_string(),
        ..Coin::default()
    }
}

async fn loaded_prefs(store: Arc<MemoryStore>) -> Preferences<MemoryStore> {
    let prefs = Preferences::new(store);
    prefs.initialize();
    prefs.wait_loaded().await;
    prefs
}

#[tokio::test]
async fn test_first_fetch_waits_for_currency() {
    let store = Arc::new(MemoryStore::with_values([(CURRENCY_KEY, "gbp")]));
    let prefs = Preferences::new(store);
    let mut state = AppState::new(CoinLimit::Ten);

    assert_eq!(sync_preferences(&mut state, &prefs), None);
    assert!(state.prefs_loading);

    prefs.initialize();
    prefs.wait_loaded().await;
    let gbp = Currency::parse("gbp").unwrap();
    assert_eq!(
        sync_preferences(&mut state, &prefs),
        Some(Action::FetchMarkets {
            limit: CoinLimit::Ten,
            currency: gbp,
        })
    );
    assert!(state.loading);
    assert_eq!(state.highlighted_currency(), Some(gbp));
    // Only once.
    assert_eq!(sync_preferences(&mut state, &prefs), None);
}

#[tokio::test]
async fn test_limit_keys_fetch_once_per_change() {
    let prefs = loaded_prefs(Arc::new(MemoryStore::new())).await;
    let (tx, _rx) = mpsc::channel(4);
    let mut state = AppState::new(CoinLimit::Ten);
    sync_preferences(&mut state, &prefs);

    // Re-selecting the active limit does nothing.
    assert_eq!(handle_key_event(key(KeyCode::Char('1')), &mut state, &prefs, &tx), None);

    let action = handle_key_event(key(KeyCode::Char('2')), &mut state, &prefs, &tx);
    assert_eq!(
        action,
        Some(Action::FetchMarkets {
            limit: CoinLimit::Twenty,
            currency: Currency::USD,
        })
    );
    assert_eq!(state.coin_limit, CoinLimit::Twenty);
    assert!(state.loading);
    assert_eq!(handle_key_event(key(KeyCode::Char('2')), &mut state, &prefs, &tx), None);
}

#[tokio::test]
async fn test_stale_results_are_ignored() {
    let prefs = loaded_prefs(Arc::new(MemoryStore::new())).await;
    let (tx, _rx) = mpsc::channel(4);
    let mut state = AppState::new(CoinLimit::Ten);
    sync_preferences(&mut state, &prefs);
    handle_key_event(key(KeyCode::Char('3')), &mut state, &prefs, &tx);

    // The page requested before the switch arrives late.
    handle_app_event(
        &mut state,
        AppEvent::MarketsLoaded {
            limit: CoinLimit::Ten,
            currency: Currency::USD,
            coins: vec![coin("bitcoin")],
        },
    );
    assert!(state.loading);
    assert!(state.coins.is_empty());

    handle_app_event(
        &mut state,
        AppEvent::MarketsLoaded {
            limit: CoinLimit::Thirty,
            currency: Currency::USD,
            coins: vec![coin("bitcoin"), coin("ethereum")],
        },
    );
    assert!(!state.loading);
    assert_eq!(state.coins.len(), 2);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn test_fetch_failure_replaces_the_list() {
    let prefs = loaded_prefs(Arc::new(MemoryStore::new())).await;
    let mut state = AppState::new(CoinLimit::Ten);
    sync_preferences(&mut state, &prefs);
    handle_app_event(
        &mut state,
        AppEvent::MarketsLoaded {
            limit: CoinLimit::Ten,
            currency: Currency::USD,
            coins: vec![coin("bitcoin")],
        },
    );

    handle_app_event(
        &mut state,
        AppEvent::FetchFailed {
            limit: CoinLimit::Ten,
            currency: Currency::USD,
            message: "Failed to fetch crypto data.".to_string(),
        },
    );
    assert!(!state.loading);
    assert!(state.coins.is_empty());
    assert_eq!(state.error.as_deref(), Some("Failed to fetch crypto data."));
}

#[tokio::test]
async fn test_font_keys_update_immediately() {
    let store = Arc::new(MemoryStore::new());
    let prefs = loaded_prefs(store.clone()).await;
    let (tx, _rx) = mpsc::channel(4);
    let mut state = AppState::new(CoinLimit::Ten);
    sync_preferences(&mut state, &prefs);

    handle_key_event(key(KeyCode::Tab), &mut state, &prefs, &tx);
    assert_eq!(state.screen, Screen::Settings);

    let action = handle_key_event(key(KeyCode::Char('l')), &mut state, &prefs, &tx);
    assert_eq!(action, None);
    assert_eq!(state.font.setting, FontSizeSetting::Large);
    assert_eq!(prefs.font.active_setting(), FontSizeSetting::Large);

    let mut rx = prefs.font.subscribe();
    rx.wait_for(|s| s.persisted).await.unwrap();
    assert_eq!(store.peek(FONT_SIZE_KEY).as_deref(), Some("Large"));

    handle_key_event(key(KeyCode::Left), &mut state, &prefs, &tx);
    assert_eq!(prefs.font.active_setting(), FontSizeSetting::Medium);
}

#[tokio::test]
async fn test_settings_ignore_keys_while_loading() {
    let store = Arc::new(MemoryStore::new());
    let prefs = Preferences::new(store.clone());
    let (tx, _rx) = mpsc::channel(4);
    let mut state = AppState::new(CoinLimit::Ten);
    state.toggle_screen();

    assert_eq!(handle_key_event(key(KeyCode::Char('l')), &mut state, &prefs, &tx), None);
    assert_eq!(prefs.font.active_setting(), FontSizeSetting::Medium);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_currency_selection_refetches() {
    let store = Arc::new(MemoryStore::new());
    let prefs = loaded_prefs(store.clone()).await;
    let (tx, _rx) = mpsc::channel(4);
    let mut state = AppState::new(CoinLimit::Twenty);
    sync_preferences(&mut state, &prefs);
    state.toggle_screen();

    // Cursor starts on the active currency (usd); eur is next.
    handle_key_event(key(KeyCode::Down), &mut state, &prefs, &tx);
    let eur = Currency::parse("eur").unwrap();
    assert_eq!(state.highlighted_currency(), Some(eur));

    let action = handle_key_event(key(KeyCode::Enter), &mut state, &prefs, &tx);
    assert_eq!(
        action,
        Some(Action::FetchMarkets {
            limit: CoinLimit::Twenty,
            currency: eur,
        })
    );
    assert_eq!(prefs.currency.active_currency(), eur);
    assert_eq!(state.currency, eur);

    // Picking it again is not a change.
    assert_eq!(handle_key_event(key(KeyCode::Enter), &mut state, &prefs, &tx), None);
}

#[tokio::test]
async fn test_failed_save_is_reported() {
    let store = Arc::new(MemoryStore::new());
    let prefs = loaded_prefs(store.clone()).await;
    let (tx, mut rx) = mpsc::channel(4);
    let mut state = AppState::new(CoinLimit::Ten);
    sync_preferences(&mut state, &prefs);
    state.toggle_screen();

    store.fail_writes(true);
    handle_key_event(key(KeyCode::Char('s')), &mut state, &prefs, &tx);
    assert_eq!(prefs.font.active_setting(), FontSizeSetting::Small);

    match rx.recv().await {
        Some(AppEvent::Status(msg)) => {
            assert!(msg.starts_with("Could not save font size"), "{}", msg)
        }
        other => panic!("unexpected event: {:?}", other),
    }
    assert!(!prefs.font.snapshot().persisted);
}

#[test]
fn test_quit_keys() {
    let prefs = Preferences::new(Arc::new(MemoryStore::new()));
    let (tx, _rx) = mpsc::channel(1);
    let mut state = AppState::new(CoinLimit::Ten);
    for code in [KeyCode::Char('q'), KeyCode::Esc] {
        assert_eq!(handle_key_event(key(code), &mut state, &prefs, &tx), Some(Action::Quit));
    }
    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert_eq!(handle_key_event(ctrl_c, &mut state, &prefs, &tx), Some(Action::Quit));
}

#[tokio::test]
async fn test_failed_save_of_default_size_stays_unsaved() {
    let store = Arc::new(MemoryStore::with_values([(FONT_SIZE_KEY, "Large")]));
    let prefs = loaded_prefs(store.clone()).await;
    let (tx, mut rx) = mpsc::channel(4);
    let mut state = AppState::new(CoinLimit::Ten);
    sync_preferences(&mut state, &prefs);
    state.toggle_screen();
    assert!(!state.font_changed);

    store.fail_writes(true);
    handle_key_event(key(KeyCode::Char('m')), &mut state, &prefs, &tx);
    assert!(matches!(rx.recv().await, Some(AppEvent::Status(_))));

    sync_preferences(&mut state, &prefs);
    assert_eq!(state.font.setting, FontSizeSetting::Medium);
    assert!(state.font_changed);
    assert!(!state.font.persisted);
    assert_eq!(store.peek(FONT_SIZE_KEY).as_deref(), Some("Large"));
}
