// File: ./src/model/mod.rs
pub mod currency;
pub mod font;

pub use currency::{CURRENCY_KEY, Currency, SUPPORTED_CURRENCIES};
pub use font::{DEFAULT_FONT_SETTING, FONT_SIZE_KEY, FontSizeSetting};
