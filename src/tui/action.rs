// Defines actions and events for TUI interaction and state updates.
use crate::market::{Coin, CoinLimit};
use crate::model::Currency;

/// Work handed to the network actor.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    FetchMarkets { limit: CoinLimit, currency: Currency },
    Quit,
}

/// Results coming back to the UI loop.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    MarketsLoaded {
        limit: CoinLimit,
        currency: Currency,
        coins: Vec<Coin>,
    },
    FetchFailed {
        limit: CoinLimit,
        currency: Currency,
        message: String,
    },
    Status(String),
}
