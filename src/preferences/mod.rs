//! User preferences backed by a `KeyValueStore`.
//!
//! A `Preference<T, S>` owns the in-memory value of one setting and mediates
//! between the UI and the store:
//!
//! - `initialize` reads the stored string once, in the background. Missing,
//!   unreadable or unrecognised values resolve to the built-in default, and
//!   `is_loading` flips to `false` exactly once when the read settles.
//! - `set` applies the new value in memory *before* returning its
//!   persistence future. A failed write is logged and reported but never
//!   rolled back; the snapshot's `persisted` flag stays `false` until a later
//!   write succeeds. Until then the store still holds the old value and a
//!   restart would bring it back.
//! - Writes of one preference run one at a time. A write that was superseded
//!   by a later `set` before it got its turn is skipped, so the store always
//!   ends on the last value set.
//! - Consumers subscribe to a `watch` channel instead of keeping copies.
//!
//! `Preferences` bundles the font scale and currency preferences over one store
//! and is meant to be created once and shared by every screen.

pub mod currency;
pub mod font;

pub use currency::CurrencyState;
pub use font::{FontScaleSnapshot, FontScaleState};

use crate::storage::{KeyValueStore, StoreError};
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use tokio::sync::{Mutex as AsyncMutex, watch};
use tokio::task::JoinHandle;

/// A value that can live in the preference store under a fixed key.
pub trait PreferenceValue: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
    const KEY: &'static str;

    /// Used while loading and whenever the stored value is absent or invalid.
    fn fallback() -> Self;

    fn decode(raw: &str) -> Option<Self>;

    fn encode(self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreferenceSnapshot<T> {
    pub value: T,
    pub is_loading: bool,
    /// Whether the store is known to hold `value`.
    pub persisted: bool,
}

struct Shared<T> {
    tx: watch::Sender<PreferenceSnapshot<T>>,
    // Set once the user picked a value; a late load must not overwrite it.
    user_set: AtomicBool,
}

// Write ordering for one preference.
#[derive(Default)]
struct Writes {
    lock: AsyncMutex<()>,
    latest: AtomicU64,
}

pub struct Preference<T: PreferenceValue, S: KeyValueStore + 'static> {
    store: Arc<S>,
    shared: Arc<Shared<T>>,
    writes: Arc<Writes>,
    loader: Mutex<Option<JoinHandle<()>>>,
}

impl<T: PreferenceValue, S: KeyValueStore + 'static> Preference<T, S> {
    pub fn new(store: Arc<S>) -> Self {
        let (tx, _) = watch::channel(PreferenceSnapshot {
            value: T::fallback(),
            is_loading: true,
            persisted: false,
        });
        Self {
            store,
            shared: Arc::new(Shared {
                tx,
                user_set: AtomicBool::new(false),
            }),
            writes: Arc::new(Writes::default()),
            loader: Mutex::new(None),
        }
    }

    /// Starts the background load. Calling it again is a no-op.
    ///
    /// Must be called from within a tokio runtime.
    pub fn initialize(&self) {
        let mut loader = self.loader.lock().unwrap_or_else(|p| p.into_inner());
        if loader.is_some() {
            log::debug!("Preference '{}' already initialized", T::KEY);
            return;
        }

        let store = Arc::clone(&self.store);
        let weak = Arc::downgrade(&self.shared);
        *loader = Some(tokio::spawn(async move {
            let (value, persisted) = match store.get(T::KEY).await {
                Ok(Some(raw)) => match T::decode(&raw) {
                    Some(v) => (v, true),
                    None => {
                        log::warn!(
                            "Unrecognized stored value '{}' for '{}', using {:?}",
                            raw,
                            T::KEY,
                            T::fallback()
                        );
                        (T::fallback(), false)
                    }
                },
                Ok(None) => (T::fallback(), false),
                Err(e) => {
                    log::error!("Failed to load initial '{}' setting: {}", T::KEY, e);
                    (T::fallback(), false)
                }
            };
            Self::finish_load(&weak, value, persisted);
        }));
    }

    fn finish_load(weak: &Weak<Shared<T>>, value: T, persisted: bool) {
        let Some(shared) = weak.upgrade() else {
            log::debug!("Preference '{}' dropped before its load finished", T::KEY);
            return;
        };
        let keep_user_value = shared.user_set.load(Ordering::SeqCst);
        shared.tx.send_modify(|s| {
            if !keep_user_value {
                s.value = value;
                s.persisted = persisted;
            }
            s.is_loading = false;
        });
    }

    /// Resolves once the initial load has settled.
    pub async fn wait_loaded(&self) {
        let mut rx = self.shared.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|s| !s.is_loading).await;
    }

    /// Applies `value` in memory immediately, then persists it when the
    /// returned future is awaited.
    ///
    /// The future yields the store's error on failure; the in-memory value is
    /// kept either way. If another `set` follows before this write starts,
    /// the write is skipped and resolves to `Ok(())`.
    pub fn set(
        &self,
        value: T,
    ) -> impl Future<Output = Result<(), StoreError>> + Send + use<T, S> {
        self.shared.user_set.store(true, Ordering::SeqCst);
        self.shared.tx.send_modify(|s| {
            s.value = value;
            s.persisted = false;
        });

        let generation = self.writes.latest.fetch_add(1, Ordering::SeqCst) + 1;

        let store = Arc::clone(&self.store);
        let weak = Arc::downgrade(&self.shared);
        let writes = Arc::clone(&self.writes);
        async move {
            let _turn = writes.lock.lock().await;
            if writes.latest.load(Ordering::SeqCst) != generation {
                log::debug!("Skipping superseded write of '{}'", T::KEY);
                return Ok(());
            }

            let result = store.set(T::KEY, value.encode()).await;
            match &result {
                Ok(()) => {
                    if let Some(shared) = weak.upgrade() {
                        shared.tx.send_if_modified(|s| {
                            let is_latest = writes.latest.load(Ordering::SeqCst) == generation;
                            let confirm = is_latest && s.value == value && !s.persisted;
                            if confirm {
                                s.persisted = true;
                            }
                            confirm
                        });
                    }
                }
                Err(e) => log::error!("Failed to save '{}' setting: {}", T::KEY, e),
            }
            result
        }
    }

    pub fn snapshot(&self) -> PreferenceSnapshot<T> {
        *self.shared.tx.borrow()
    }

    pub fn value(&self) -> T {
        self.snapshot().value
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot().is_loading
    }

    pub fn subscribe(&self) -> watch::Receiver<PreferenceSnapshot<T>> {
        self.shared.tx.subscribe()
    }
}

impl<T: PreferenceValue, S: KeyValueStore + 'static> Drop for Preference<T, S> {
    fn drop(&mut self) {
        let loader = self.loader.get_mut().unwrap_or_else(|p| p.into_inner());
        if let Some(handle) = loader.take() {
            handle.abort();
        }
    }
}

/// Every preference of the application, over one shared store.
pub struct Preferences<S: KeyValueStore + 'static> {
    pub font: FontScaleState<S>,
    pub currency: CurrencyState<S>,
}

impl<S: KeyValueStore + 'static> Preferences<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            font: FontScaleState::new(Arc::clone(&store)),
            currency: CurrencyState::new(store),
        }
    }

    /// Starts all loads. Each preference loads independently.
    pub fn initialize(&self) {
        self.font.initialize();
        self.currency.initialize();
    }

    pub async fn wait_loaded(&self) {
        tokio::join!(self.font.wait_loaded(), self.currency.wait_loaded());
    }

    pub fn is_loading(&self) -> bool {
        self.font.is_loading() || self.currency.is_loading()
    }
}
