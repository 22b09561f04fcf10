// Font scale preference: the active size setting and its derived factor.
use super::{Preference, PreferenceSnapshot, PreferenceValue};
use crate::model::font::{DEFAULT_FONT_SETTING, FONT_SIZE_KEY, FontSizeSetting};
use crate::storage::{KeyValueStore, StoreError};
use crate::typography::{TextStyle, TextType, scaled_style};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

impl PreferenceValue for FontSizeSetting {
    const KEY: &'static str = FONT_SIZE_KEY;

    fn fallback() -> Self {
        DEFAULT_FONT_SETTING
    }

    fn decode(raw: &str) -> Option<Self> {
        FontSizeSetting::from_stored(raw)
    }

    fn encode(self) -> &'static str {
        self.as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontScaleSnapshot {
    pub setting: FontSizeSetting,
    pub scale_factor: f64,
    pub is_loading: bool,
    pub persisted: bool,
}

impl From<PreferenceSnapshot<FontSizeSetting>> for FontScaleSnapshot {
    fn from(s: PreferenceSnapshot<FontSizeSetting>) -> Self {
        Self {
            setting: s.value,
            scale_factor: s.value.scale_factor(),
            is_loading: s.is_loading,
            persisted: s.persisted,
        }
    }
}

pub struct FontScaleState<S: KeyValueStore + 'static> {
    pref: Preference<FontSizeSetting, S>,
}

impl<S: KeyValueStore + 'static> FontScaleState<S> {
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

    /// Updates the setting and factor right away; the returned future writes
    /// the setting to the store.
    pub fn set_font_size(
        &self,
        setting: FontSizeSetting,
    ) -> impl Future<Output = Result<(), StoreError>> + Send + use<S> {
        log::info!("Font size set to {}", setting);
        self.pref.set(setting)
    }

    pub fn snapshot(&self) -> FontScaleSnapshot {
        self.pref.snapshot().into()
    }

    pub fn active_setting(&self) -> FontSizeSetting {
        self.pref.value()
    }

    /// Factor for the active setting; the default factor while loading.
    pub fn scale_factor(&self) -> f64 {
        self.active_setting().scale_factor()
    }

    pub fn is_loading(&self) -> bool {
        self.pref.is_loading()
    }

    pub fn subscribe(&self) -> watch::Receiver<PreferenceSnapshot<FontSizeSetting>> {
        self.pref.subscribe()
    }

    /// Preset style scaled by the active factor.
    pub fn style(&self, text_type: TextType) -> TextStyle {
        scaled_style(text_type, self.scale_factor())
    }
}
