// File: ./src/cli.rs
//! Command-line parsing and the one-shot (non-interactive) commands.
use crate::config::Config;
use crate::market::{CoinLimit, MarketClient, format_change, format_price};
use crate::model::{Currency, FontSizeSetting};
use crate::preferences::Preferences;
use crate::storage::KeyValueStore;
use crate::typography::TextType;
use anyhow::{Result, anyhow, bail};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Interactive terminal UI.
    Tui,
    Markets {
        limit: Option<CoinLimit>,
        currency: Option<Currency>,
    },
    Prefs,
    SetFont(FontSizeSetting),
    SetCurrency(Currency),
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub root: Option<PathBuf>,
    pub command: Command,
}

/// Parses arguments without the program name.
pub fn parse_args<I, A>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = A>,
    A: Into<String>,
{
    let mut root = None;
    let mut rest = Vec::new();
    let mut iter = args.into_iter().map(Into::into);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-r" | "--root" => {
                let path = iter.next().ok_or_else(|| anyhow!("{} needs a path", arg))?;
                root = Some(PathBuf::from(path));
            }
            "-h" | "--help" | "help" => {
                return Ok(CliArgs {
                    root,
                    command: Command::Help,
                });
            }
            _ => rest.push(arg),
        }
    }

    let command = match rest.first().map(String::as_str) {
        None => Command::Tui,
        Some("markets") => parse_markets(&rest[1..])?,
        Some("prefs") => Command::Prefs,
        Some("set-font") => {
            let raw = rest
                .get(1)
                .ok_or_else(|| anyhow!("set-font needs Small, Medium or Large"))?;
            let setting = FontSizeSetting::from_stored(raw)
                .ok_or_else(|| anyhow!("Unknown font size '{}' (Small, Medium, Large)", raw))?;
            Command::SetFont(setting)
        }
        Some("set-currency") => {
            let raw = rest
                .get(1)
                .ok_or_else(|| anyhow!("set-currency needs a currency code"))?;
            Command::SetCurrency(parse_currency(raw)?)
        }
        Some(other) => bail!("Unknown command '{}'. Try --help.", other),
    };
    Ok(CliArgs { root, command })
}

fn parse_markets(args: &[String]) -> Result<Command> {
    let mut limit = None;
    let mut currency = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--limit" | "-n" => {
                let raw = iter.next().ok_or_else(|| anyhow!("--limit needs 10, 20 or 30"))?;
                let n: u32 = raw.parse().map_err(|_| anyhow!("Invalid limit '{}'", raw))?;
                limit = Some(CoinLimit::try_from(n).map_err(|e| anyhow!(e))?);
            }
            "--currency" | "-c" => {
                let raw = iter.next().ok_or_else(|| anyhow!("--currency needs a code"))?;
                currency = Some(parse_currency(raw)?);
            }
            other => bail!("Unknown option '{}' for markets", other),
        }
    }
    Ok(Command::Markets { limit, currency })
}

fn parse_currency(raw: &str) -> Result<Currency> {
    Currency::parse(raw).ok_or_else(|| {
        let codes: Vec<&str> = Currency::all().map(Currency::code).collect();
        anyhow!("Unsupported currency '{}'. Supported: {}", raw, codes.join(", "))
    })
}

pub fn print_help(binary_name: &str) {
    println!(
        "Coindeck v{} - Crypto market watch (TUI)",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [--root <path>]", binary_name);
    println!("    {} markets [--limit 10|20|30] [--currency <code>]", binary_name);
    println!("    {} prefs", binary_name);
    println!("    {} set-font <Small|Medium|Large>", binary_name);
    println!("    {} set-currency <code>", binary_name);
    println!("    {} --help", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("KEYBINDINGS:");
    println!("    Tab:Switch screen  1/2/3:Show 10/20/30  j/k:Move  Enter:Select  q:Quit");
}

/// Prints one market page as a plain table.
pub async fn print_markets(
    client: &MarketClient,
    limit: CoinLimit,
    currency: Currency,
) -> Result<()> {
    let coins = client.fetch_markets(limit, currency).await?;
    println!("Top {} Crypto Markets ({})", limit, currency.label());
    println!("{:>4}  {:<24} {:>10} {:>18}", "#", "Coin", "24h %", "Price");
    for coin in &coins {
        let rank = coin
            .market_cap_rank
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        let change = coin
            .price_change_percentage_24h
            .map(|p| format_change(p).text)
            .unwrap_or_else(|| "-".to_string());
        let price = coin
            .current_price
            .map(|p| format_price(p, currency))
            .unwrap_or_else(|| "-".to_string());
        println!("{:>4}  {:<24} {:>10} {:>18}", rank, coin.name, change, price);
    }
    Ok(())
}

/// Prints the stored preferences after they finished loading.
pub async fn print_prefs<S: KeyValueStore + 'static>(prefs: &Preferences<S>) {
    prefs.wait_loaded().await;
    let font = prefs.font.snapshot();
    let body = prefs.font.style(TextType::Default);
    println!("Font size:  {} (x{})", font.setting, font.scale_factor);
    println!(
        "Body text:  {}pt / {}pt line height",
        body.font_size.unwrap_or_default(),
        body.line_height.unwrap_or_default()
    );
    let currency = prefs.currency.active_currency();
    println!("Currency:   {} ({})", currency.label(), currency.info().name);
}

/// Starting limit for the market screen.
pub fn initial_limit(config: &Config, requested: Option<CoinLimit>) -> CoinLimit {
    requested.unwrap_or(config.default_coin_limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_args_starts_tui() {
        let args = parse_args(Vec::<String>::new()).unwrap();
        assert_eq!(args.command, Command::Tui);
        assert_eq!(args.root, None);
    }

    #[test]
    fn markets_options() {
        let args = parse_args(["markets", "--limit", "30", "-c", "EUR"]).unwrap();
        assert_eq!(
            args.command,
            Command::Markets {
                limit: Some(CoinLimit::Thirty),
                currency: Currency::parse("eur"),
            }
        );
        assert!(parse_args(["markets", "--limit", "25"]).is_err());
    }

    #[test]
    fn setters_validate_input() {
        let args = parse_args(["--root", "/tmp/x", "set-font", "Large"]).unwrap();
        assert_eq!(args.root, Some(PathBuf::from("/tmp/x")));
        assert_eq!(args.command, Command::SetFont(FontSizeSetting::Large));
        assert!(parse_args(["set-font", "ExtraLarge"]).is_err());
        assert!(parse_args(["set-currency", "zzz"]).is_err());
        assert_eq!(
            parse_args(["set-currency", "btc"]).unwrap().command,
            Command::SetCurrency(Currency::parse("btc").unwrap())
        );
    }

    #[test]
    fn help_wins() {
        assert_eq!(parse_args(["prefs", "-h"]).unwrap().command, Command::Help);
    }
}
