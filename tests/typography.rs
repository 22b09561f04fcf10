// Tests for scaled text style resolution.
use coindeck::model::FontSizeSetting;
use coindeck::preferences::Preferences;
use coindeck::storage::MemoryStore;
use coindeck::typography::{
    FontWeight, LINK_COLOR, TextStyle, TextType, ThemedText, resolve, scaled_style,
};
use std::sync::Arc;
use strum::IntoEnumIterator;

fn sizes(style: &TextStyle) -> (Option<u16>, Option<u16>) {
    (style.font_size, style.line_height)
}

#[test]
fn test_default_preset_at_each_setting() {
    let expected = [
        (FontSizeSetting::Small, (Some(14), Some(20))),
        (FontSizeSetting::Medium, (Some(16), Some(24))),
        (FontSizeSetting::Large, (Some(20), Some(30))),
    ];
    for (setting, want) in expected {
        let style = scaled_style(TextType::Default, setting.scale_factor());
        assert_eq!(sizes(&style), want, "{}", setting);
    }
}

#[test]
fn test_presets_at_large() {
    let factor = FontSizeSetting::Large.scale_factor();
    assert_eq!(sizes(&scaled_style(TextType::Title, factor)), (Some(40), Some(40)));
    assert_eq!(sizes(&scaled_style(TextType::Small, factor)), (Some(15), Some(18)));
    // Subtitle has no line height; it stays unset.
    assert_eq!(sizes(&scaled_style(TextType::Subtitle, factor)), (Some(25), None));
}

#[test]
fn test_medium_matches_base_styles() {
    for t in TextType::iter() {
        assert_eq!(scaled_style(t, 1.0), t.base_style(), "{}", t);
    }
}

#[test]
fn test_weight_and_color_are_not_scaled() {
    let link = scaled_style(TextType::Link, 0.85);
    assert_eq!(link.color.as_deref(), Some(LINK_COLOR));
    assert_eq!(sizes(&link), (Some(14), Some(26)));

    let title = scaled_style(TextType::Title, 0.85);
    assert_eq!(title.font_weight, Some(FontWeight::Bold));
    assert_eq!(FontWeight::SemiBold.value(), 600);
}

#[test]
fn test_sizeless_style_is_returned_unchanged() {
    let style = TextStyle {
        font_weight: Some(FontWeight::Medium),
        color: Some("#333".to_string()),
        ..TextStyle::default()
    };
    assert_eq!(style.scaled(1.25), style);
    assert_eq!(TextStyle::default().scaled(0.85), TextStyle::default());
}

#[test]
fn test_resolve_by_name() {
    let style = resolve("defaultSemiBold", 1.25).unwrap();
    assert_eq!(sizes(&style), (Some(20), Some(30)));
    assert_eq!(style.font_weight, Some(FontWeight::SemiBold));
    assert_eq!(resolve("headline", 1.0), None);
}

#[test]
fn test_overrides_win_over_scaled_preset() {
    let text = ThemedText::new(TextType::Title)
        .color("#111111")
        .overrides(TextStyle {
            line_height: Some(50),
            ..TextStyle::default()
        });
    let style = text.effective_style(0.85);
    assert_eq!(style.font_size, Some(27));
    assert_eq!(style.line_height, Some(50));
    assert_eq!(style.color.as_deref(), Some("#111111"));

    // The preset colour beats the theme colour.
    let link = ThemedText::new(TextType::Link).color("#111111");
    assert_eq!(link.effective_style(1.0).color.as_deref(), Some(LINK_COLOR));
}

#[tokio::test]
async fn test_styles_follow_the_font_preference() {
    let prefs = Preferences::new(Arc::new(MemoryStore::new()));
    prefs.initialize();
    prefs.wait_loaded().await;
    assert_eq!(sizes(&prefs.font.style(TextType::Default)), (Some(16), Some(24)));

    prefs
        .font
        .set_font_size(FontSizeSetting::Small)
        .await
        .unwrap();
    assert_eq!(sizes(&prefs.font.style(TextType::Default)), (Some(14), Some(20)));
}
