//! Text style presets and font-scale application.
//!
//! Every piece of text in the UI picks a `TextType`. Its base style is defined
//! for a scale factor of 1.0; `scaled_style` multiplies the size-bearing
//! properties (font size, line height) by the active factor and leaves weight
//! and colour alone.

use std::fmt;
use strum::{EnumIter, EnumString, IntoStaticStr};

pub const LINK_COLOR: &str = "#0a7ea4";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum TextType {
    #[default]
    Default,
    Title,
    DefaultSemiBold,
    Subtitle,
    Link,
    Small,
    Large,
}

impl TextType {
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Runtime lookup by preset name (`"defaultSemiBold"`, `"title"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    /// Style at scale 1.0.
    pub fn base_style(self) -> TextStyle {
        match self {
            TextType::Default => TextStyle::sized(16, Some(24)),
            TextType::Small => TextStyle::sized(12, Some(14)),
            TextType::Large => TextStyle::sized(18, Some(20)),
            TextType::DefaultSemiBold => {
                TextStyle::sized(16, Some(24)).with_weight(FontWeight::SemiBold)
            }
            TextType::Title => TextStyle::sized(32, Some(32)).with_weight(FontWeight::Bold),
            TextType::Subtitle => TextStyle::sized(20, None).with_weight(FontWeight::Bold),
            TextType::Link => TextStyle::sized(16, Some(30)).with_color(LINK_COLOR),
        }
    }
}

impl fmt::Display for TextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Normal,
    Medium,
    SemiBold,
    Bold,
}

impl FontWeight {
    pub const fn value(self) -> u16 {
        match self {
            FontWeight::Normal => 400,
            FontWeight::Medium => 500,
            FontWeight::SemiBold => 600,
            FontWeight::Bold => 700,
        }
    }
}

/// A (partial) text style. `None` fields inherit from whatever is underneath.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextStyle {
    pub font_size: Option<u16>,
    pub line_height: Option<u16>,
    pub font_weight: Option<FontWeight>,
    pub color: Option<String>,
}

impl TextStyle {
    fn sized(font_size: u16, line_height: Option<u16>) -> Self {
        Self {
            font_size: Some(font_size),
            line_height,
            ..Self::default()
        }
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = Some(weight);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn has_size(&self) -> bool {
        self.font_size.is_some() || self.line_height.is_some()
    }

    /// Multiplies font size and line height by `factor`, rounding half up.
    ///
    /// `factor` must be positive. A style without size fields comes back as is.
    pub fn scaled(&self, factor: f64) -> TextStyle {
        if !self.has_size() {
            return self.clone();
        }
        TextStyle {
            font_size: self.font_size.map(|v| scale_value(v, factor)),
            line_height: self.line_height.map(|v| scale_value(v, factor)),
            ..self.clone()
        }
    }

    /// Field-wise overlay: every field set on `top` wins.
    pub fn merge(&self, top: &TextStyle) -> TextStyle {
        TextStyle {
            font_size: top.font_size.or(self.font_size),
            line_height: top.line_height.or(self.line_height),
            font_weight: top.font_weight.or(self.font_weight),
            color: top.color.clone().or_else(|| self.color.clone()),
        }
    }
}

fn scale_value(value: u16, factor: f64) -> u16 {
    (f64::from(value) * factor).round() as u16
}

/// Preset style with the font scale applied.
pub fn scaled_style(text_type: TextType, factor: f64) -> TextStyle {
    text_type.base_style().scaled(factor)
}

/// Name-based variant of `scaled_style`; unknown names give `None` and the
/// caller renders without a preset.
pub fn resolve(preset_name: &str, factor: f64) -> Option<TextStyle> {
    TextType::from_name(preset_name).map(|t| scaled_style(t, factor))
}

/// Everything a text element needs to compute its effective style.
///
/// Layers, lowest first: theme colour, scaled preset, caller overrides.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ThemedText {
    pub text_type: TextType,
    pub theme_color: Option<String>,
    pub overrides: TextStyle,
}

impl ThemedText {
    pub fn new(text_type: TextType) -> Self {
        Self {
            text_type,
            ..Self::default()
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.theme_color = Some(color.into());
        self
    }

    pub fn overrides(mut self, overrides: TextStyle) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn effective_style(&self, factor: f64) -> TextStyle {
        let base = TextStyle {
            color: self.theme_color.clone(),
            ..TextStyle::default()
        };
        base.merge(&scaled_style(self.text_type, factor))
            .merge(&self.overrides)
    }
}
