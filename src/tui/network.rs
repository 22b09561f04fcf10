// Manages background network operations for the TUI.
use crate::market::MarketClient;
use crate::tui::action::{Action, AppEvent};
use tokio::sync::mpsc::{Receiver, Sender};

/// Serves fetch requests one at a time until `Quit` or until either channel closes.
///
/// Every `FetchMarkets` issues exactly one request; failures are reported, not
/// retried.
pub async fn run_network_actor(
    client: MarketClient,
    mut action_rx: Receiver<Action>,
    event_tx: Sender<AppEvent>,
) {
    while let Some(action) = action_rx.recv().await {
        match action {
            Action::Quit => break,
            Action::FetchMarkets { limit, currency } => {
                let event = match client.fetch_markets(limit, currency).await {
                    Ok(coins) => AppEvent::MarketsLoaded {
                        limit,
                        currency,
                        coins,
                    },
                    Err(e) => {
                        log::error!("Market fetch failed: {}", e);
                        AppEvent::FetchFailed {
                            limit,
                            currency,
                            message: e.user_message().to_string(),
                        }
                    }
                };
                if event_tx.send(event).await.is_err() {
                    break;
                }
            }
        }
    }
    log::debug!("Network actor stopped");
}
