// Font size preference and its static scale table.
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumIter, EnumString, IntoStaticStr};

/// Storage key of the font size preference.
pub const FONT_SIZE_KEY: &str = "app-font-size";

pub const DEFAULT_FONT_SETTING: FontSizeSetting = FontSizeSetting::Medium;

/// User-selectable text size.
///
/// Stored verbatim as `"Small"`, `"Medium"` or `"Large"`. Parsing is
/// case-sensitive; anything else is not a setting.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
pub enum FontSizeSetting {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSizeSetting {
    /// Multiplier applied to size-bearing text properties.
    /// Small is 15% smaller, Large 25% larger.
    pub const fn scale_factor(self) -> f64 {
        match self {
            FontSizeSetting::Small => 0.85,
            FontSizeSetting::Medium => 1.0,
            FontSizeSetting::Large => 1.25,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Lenient lookup used for stored values: `None` for anything unknown.
    pub fn from_stored(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl fmt::Display for FontSizeSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
