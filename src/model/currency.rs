// Quote currency preference and the fixed list of supported codes.
use std::fmt;

/// Storage key of the currency preference.
pub const CURRENCY_KEY: &str = "app-currency";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyInfo {
    /// Lowercase code as understood by the market API (`vs_currency`).
    pub code: &'static str,
    pub name: &'static str,
    /// Prefix used when rendering amounts; `None` renders the code after the amount.
    pub symbol: Option<&'static str>,
}

const fn info(
    code: &'static str,
    name: &'static str,
    symbol: Option<&'static str>,
) -> CurrencyInfo {
    CurrencyInfo { code, name, symbol }
}

pub const SUPPORTED_CURRENCIES: [CurrencyInfo; 16] = [
    info("usd", "US Dollar", Some("$")),
    info("eur", "Euro", Some("€")),
    info("gbp", "British Pound", Some("£")),
    info("jpy", "Japanese Yen", Some("¥")),
    info("cad", "Canadian Dollar", Some("CA$")),
    info("aud", "Australian Dollar", Some("A$")),
    info("chf", "Swiss Franc", None),
    info("cny", "Chinese Yuan", Some("CN¥")),
    info("inr", "Indian Rupee", Some("₹")),
    info("krw", "South Korean Won", Some("₩")),
    info("brl", "Brazilian Real", Some("R$")),
    info("rub", "Russian Ruble", Some("₽")),
    info("try", "Turkish Lira", Some("₺")),
    info("btc", "Bitcoin", Some("₿")),
    info("eth", "Ether", Some("Ξ")),
    info("sats", "Satoshi", None),
];

/// A currency code from `SUPPORTED_CURRENCIES`.
///
/// The only way to build one from text is `Currency::parse`, so every value
/// held by the application is a code the market API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Currency {
    index: usize,
}

impl Currency {
    pub const USD: Currency = Currency { index: 0 };

    /// Case-insensitive lookup in the allow-list.
    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = raw.trim();
        SUPPORTED_CURRENCIES
            .iter()
            .position(|c| c.code.eq_ignore_ascii_case(wanted))
            .map(|index| Currency { index })
    }

    pub fn all() -> impl Iterator<Item = Currency> {
        (0..SUPPORTED_CURRENCIES.len()).map(|index| Currency { index })
    }

    pub fn info(self) -> &'static CurrencyInfo {
        &SUPPORTED_CURRENCIES[self.index]
    }

    pub fn code(self) -> &'static str {
        self.info().code
    }

    /// Upper-case code for headers, e.g. `USD`.
    pub fn label(self) -> String {
        self.code().to_uppercase()
    }

    /// Position in `SUPPORTED_CURRENCIES`, used by selectors.
    pub fn position(self) -> usize {
        self.index
    }

    pub fn from_position(index: usize) -> Option<Self> {
        (index < SUPPORTED_CURRENCIES.len()).then_some(Currency { index })
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::USD
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
