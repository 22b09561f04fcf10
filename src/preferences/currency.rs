// Quote currency preference.
use super::{Preference, PreferenceSnapshot, PreferenceValue};
use crate::model::currency::{CURRENCY_KEY, Currency};
use crate::storage::{KeyValueStore, StoreError};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

impl PreferenceValue for Currency {
    const KEY: &'static str = CURRENCY_KEY;

    fn fallback() -> Self {
        Currency::USD
    }

    fn decode(raw: &str) -> Option<Self> {
        Currency::parse(raw)
    }

    fn encode(self) -> &'static str {
        self.code()
    }
}

pub struct CurrencyState<S: KeyValueStore + 'static> {
    pref: Preference<Currency, S>,
}

impl<S: KeyValueStore + 'static> CurrencyState<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            pref: Preference::new(store),
        }
    }

    pub fn initialize(&self) {
        self.pref.initialize();
    }

    pub async fn wait_loaded(&self) {
        self.pref.wait_loaded().await;
    }

    pub fn set_currency(
        &self,
        currency: Currency,
    ) -> impl Future<Output = Result<(), StoreError>> + Send + use<S> {
        log::info!("Currency set to {}", currency);
        self.pref.set(currency)
    }

    pub fn active_currency(&self) -> Currency {
        self.pref.value()
    }

    pub fn is_loading(&self) -> bool {
        self.pref.is_loading()
    }

    pub fn snapshot(&self) -> PreferenceSnapshot<Currency> {
        self.pref.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<PreferenceSnapshot<Currency>> {
        self.pref.subscribe()
    }
}
