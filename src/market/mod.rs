// File: ./src/market/mod.rs
//! Market data: the coin record, the page-size selector and the HTTP client.
pub mod client;
pub mod format;
pub mod middleware;

pub use client::{FETCH_ERROR_MESSAGE, FetchError, MarketClient};
pub use format::{ChangeDisplay, Trend, format_amount, format_change, format_price};

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

/// How many coins a market page shows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter,
)]
#[serde(try_from = "u32", into = "u32")]
pub enum CoinLimit {
    #[default]
    Ten,
    Twenty,
    Thirty,
}

impl CoinLimit {
    pub const fn value(self) -> u32 {
        match self {
            CoinLimit::Ten => 10,
            CoinLimit::Twenty => 20,
            CoinLimit::Thirty => 30,
        }
    }
}

impl TryFrom<u32> for CoinLimit {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            10 => Ok(CoinLimit::Ten),
            20 => Ok(CoinLimit::Twenty),
            30 => Ok(CoinLimit::Thirty),
            other => Err(format!("coin limit must be 10, 20 or 30 (got {})", other)),
        }
    }
}

impl From<CoinLimit> for u32 {
    fn from(limit: CoinLimit) -> Self {
        limit.value()
    }
}

impl fmt::Display for CoinLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Roi {
    pub times: f64,
    pub currency: String,
    pub percentage: f64,
}

/// One row of the `coins/markets` response.
///
/// The API sends `null` for many numeric fields on thinly traded coins, so
/// they are all optional; missing fields decode to their defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Coin {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub image: String,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub market_cap_rank: Option<u32>,
    pub fully_diluted_valuation: Option<f64>,
    pub total_volume: Option<f64>,
    pub high_24h: Option<f64>,
    pub low_24h: Option<f64>,
    pub price_change_24h: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub market_cap_change_24h: Option<f64>,
    pub market_cap_change_percentage_24h: Option<f64>,
    pub circulating_supply: Option<f64>,
    pub total_supply: Option<f64>,
    pub max_supply: Option<f64>,
    pub ath: Option<f64>,
    pub ath_change_percentage: Option<f64>,
    pub ath_date: Option<String>,
    pub atl: Option<f64>,
    pub atl_change_percentage: Option<f64>,
    pub atl_date: Option<String>,
    pub roi: Option<Roi>,
    pub last_updated: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn limits_are_ten_twenty_thirty() {
        let values: Vec<u32> = CoinLimit::iter().map(CoinLimit::value).collect();
        assert_eq!(values, vec![10, 20, 30]);
        assert_eq!(CoinLimit::try_from(25).ok(), None);
    }

    #[test]
    fn coin_tolerates_nulls_and_missing_fields() {
        let json = r#"{
            "id": "bitcoin", "symbol": "btc", "name": "Bitcoin",
            "current_price": 64123.5, "market_cap_rank": 1,
            "max_supply": null, "roi": null,
            "price_change_percentage_24h": -1.25
        }"#;
        let coin: Coin = serde_json::from_str(json).unwrap();
        assert_eq!(coin.id, "bitcoin");
        assert_eq!(coin.market_cap_rank, Some(1));
        assert_eq!(coin.max_supply, None);
        assert_eq!(coin.total_volume, None);
        assert_eq!(coin.price_change_percentage_24h, Some(-1.25));
    }
}
