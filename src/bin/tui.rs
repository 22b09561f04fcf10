use anyhow::Result;
use coindeck::cli::{self, Command};
use coindeck::config::Config;
use coindeck::context::{AppContext, SharedContext, StandardContext};
use coindeck::market::MarketClient;
use coindeck::preferences::Preferences;
use coindeck::storage::FileStore;
use simplelog::{ColorChoice, TermLogger, TerminalMode, WriteLogger};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let binary_name = env::args().next().unwrap_or_else(|| "coindeck".to_string());
    let args = match cli::parse_args(env::args().skip(1)) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    if args.command == Command::Help {
        cli::print_help(&binary_name);
        return Ok(());
    }

    let ctx: SharedContext = Arc::new(StandardContext::new(args.root.clone()));
    let config = match Config::load_or_default(ctx.as_ref()) {
        Ok(c) => c,
        Err(e) => {
            // A broken config is reported instead of silently replaced.
            eprintln!("Error loading configuration:\n{}", e);
            std::process::exit(1);
        }
    };
    init_logging(ctx.as_ref(), &config, args.command == Command::Tui);

    let store = Arc::new(FileStore::from_context(ctx.as_ref())?);
    let prefs = Arc::new(Preferences::new(store));

    match args.command {
        Command::Tui => {
            let limit = cli::initial_limit(&config, None);
            coindeck::tui::run(ctx, config, prefs, limit).await
        }
        Command::Markets { limit, currency } => {
            let currency = match currency {
                Some(c) => c,
                None => {
                    prefs.initialize();
                    prefs.currency.wait_loaded().await;
                    prefs.currency.active_currency()
                }
            };
            let client = MarketClient::new(&config);
            cli::print_markets(&client, cli::initial_limit(&config, limit), currency).await
        }
        Command::Prefs => {
            prefs.initialize();
            cli::print_prefs(prefs.as_ref()).await;
            Ok(())
        }
        Command::SetFont(setting) => {
            prefs.font.set_font_size(setting).await?;
            println!("Font size set to {}.", setting);
            Ok(())
        }
        Command::SetCurrency(currency) => {
            prefs.currency.set_currency(currency).await?;
            println!("Currency set to {}.", currency.label());
            Ok(())
        }
        Command::Help => Ok(()),
    }
}

/// The TUI owns the terminal, so it logs to a file; other commands log to stderr.
fn init_logging(ctx: &dyn AppContext, config: &Config, to_file: bool) {
    let level = config.log_level_filter();
    let log_config = simplelog::Config::default();
    if to_file {
        let Some(path) = ctx.get_log_path() else {
            return;
        };
        match std::fs::File::create(&path) {
            Ok(file) => {
                let _ = WriteLogger::init(level, log_config, file);
            }
            Err(e) => eprintln!("Could not open log file {}: {}", path.display(), e),
        }
    } else {
        let _ = TermLogger::init(level, log_config, TerminalMode::Stderr, ColorChoice::Auto);
    }
}
