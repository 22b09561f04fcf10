// File: ./src/tui/state.rs
// Manages the application state for the TUI.
use crate::market::{Coin, CoinLimit};
use crate::model::{Currency, FontSizeSetting};
use crate::preferences::FontScaleSnapshot;
use ratatui::widgets::{ListState, TableState};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Screen {
    Markets,
    Settings,
}

pub struct AppState {
    pub screen: Screen,
    pub message: String,

    // Markets
    pub coins: Vec<Coin>,
    pub coin_limit: CoinLimit,
    pub loading: bool,
    pub error: Option<String>,
    pub table_state: TableState,
    pub initial_fetch_sent: bool,

    // Preferences (mirrors of the shared preference state)
    pub font: FontScaleSnapshot,
    /// Set once the font size was changed in this session.
    pub font_changed: bool,
    pub currency: Currency,
    pub prefs_loading: bool,

    // Settings
    pub currency_state: ListState,
}

impl AppState {
    pub fn new(coin_limit: CoinLimit) -> Self {
        let mut currency_state = ListState::default();
        currency_state.select(Some(Currency::USD.position()));

        Self {
            screen: Screen::Markets,
            message: "Loading...".to_string(),
            coins: vec![],
            coin_limit,
            loading: true,
            error: None,
            table_state: TableState::default(),
            initial_fetch_sent: false,
            font: FontScaleSnapshot {
                setting: FontSizeSetting::default(),
                scale_factor: FontSizeSetting::default().scale_factor(),
                is_loading: true,
                persisted: false,
            },
            font_changed: false,
            currency: Currency::USD,
            prefs_loading: true,
            currency_state,
        }
    }

    pub fn toggle_screen(&mut self) {
        self.screen = match self.screen {
            Screen::Markets => Screen::Settings,
            Screen::Settings => Screen::Markets,
        };
    }

    /// Replaces the list, keeping the selection inside bounds.
    pub fn set_coins(&mut self, coins: Vec<Coin>) {
        self.coins = coins;
        if self.coins.is_empty() {
            self.table_state.select(None);
        } else {
            let current = self.table_state.selected().unwrap_or(0);
            self.table_state.select(Some(current.min(self.coins.len() - 1)));
        }
    }

    pub fn next(&mut self) {
        match self.screen {
            Screen::Markets => {
                if self.coins.is_empty() {
                    return;
                }
                let i = match self.table_state.selected() {
                    Some(i) if i + 1 < self.coins.len() => i + 1,
                    _ => 0,
                };
                self.table_state.select(Some(i));
            }
            Screen::Settings => {
                let len = Currency::all().count();
                let i = match self.currency_state.selected() {
                    Some(i) if i + 1 < len => i + 1,
                    _ => 0,
                };
                self.currency_state.select(Some(i));
            }
        }
    }

    pub fn previous(&mut self) {
        match self.screen {
            Screen::Markets => {
                if self.coins.is_empty() {
                    return;
                }
                let i = match self.table_state.selected() {
                    Some(0) | None => self.coins.len() - 1,
                    Some(i) => i - 1,
                };
                self.table_state.select(Some(i));
            }
            Screen::Settings => {
                let len = Currency::all().count();
                let i = match self.currency_state.selected() {
                    Some(0) | None => len - 1,
                    Some(i) => i - 1,
                };
                self.currency_state.select(Some(i));
            }
        }
    }

    /// Currency under the cursor on the settings screen.
    pub fn highlighted_currency(&self) -> Option<Currency> {
        self.currency_state.selected().and_then(Currency::from_position)
    }
}
