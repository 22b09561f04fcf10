// Display helpers for market rows.
use crate::model::Currency;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    pub fn light_color(self) -> &'static str {
        match self {
            Trend::Up => "green",
            Trend::Down => "red",
        }
    }

    pub fn dark_color(self) -> &'static str {
        match self {
            Trend::Up => "lightgreen",
            Trend::Down => "red",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeDisplay {
    pub text: String,
    pub trend: Trend,
}

/// `+1.23%`, `-4.56%` or `0.00%`. Zero counts as up.
pub fn format_change(percentage: f64) -> ChangeDisplay {
    let sign = if percentage > 0.0 { "+" } else { "" };
    ChangeDisplay {
        text: format!("{}{:.2}%", sign, percentage),
        trend: if percentage >= 0.0 { Trend::Up } else { Trend::Down },
    }
}

/// Two decimals with comma thousands separators: `1234567.891` → `1,234,567.89`.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Amount with the currency's symbol, or its code when it has none.
pub fn format_price(value: f64, currency: Currency) -> String {
    let amount = format_amount(value);
    match currency.info().symbol {
        Some(symbol) => format!("{}{}", symbol, amount),
        None => format!("{} {}", amount, currency.label()),
    }
}
