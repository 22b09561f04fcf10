// File: src/market/client.rs
use crate::config::Config;
use crate::market::middleware::{ApiHeadersLayer, ApiHeadersService};
use crate::market::{Coin, CoinLimit};
use crate::model::Currency;

use http::{Request, Uri};
use http_body_util::BodyExt;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;
use thiserror::Error;
use tower::ServiceExt;
use tower_layer::Layer;

/// Message shown in place of the market list when a fetch fails.
pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch crypto data.";

type HttpsClient =
    ApiHeadersService<Client<hyper_rustls::HttpsConnector<HttpConnector>, String>>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid request URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("HTTP error! status: {status}")]
    Status { status: u16 },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// The text the UI shows; details go to the log.
    pub fn user_message(&self) -> &'static str {
        FETCH_ERROR_MESSAGE
    }
}

/// Client for the `coins/markets` endpoint.
///
/// One call is one GET: no retries, no pagination past the first page and no
/// caching between calls.
#[derive(Clone, Debug)]
pub struct MarketClient {
    base_url: String,
    http: HttpsClient,
    timeout: Option<Duration>,
}

impl MarketClient {
    pub fn new(config: &Config) -> Self {
        let https_connector = HttpsConnectorBuilder::new()
            .with_tls_config(Self::tls_config())
            .https_or_http()
            .enable_http1()
            .build();

        let http_client = Client::builder(TokioExecutor::new()).build(https_connector);
        let http = ApiHeadersLayer::new(&config.user_agent).layer(http_client);

        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            http,
            timeout: (config.request_timeout_secs > 0)
                .then(|| Duration::from_secs(config.request_timeout_secs)),
        }
    }

    fn tls_config() -> rustls::ClientConfig {
        let mut root_store = rustls::RootCertStore::empty();
        let result = rustls_native_certs::load_native_certs();
        for err in &result.errors {
            log::warn!("Skipping system certificate: {}", err);
        }
        root_store.add_parsable_certificates(result.certs);
        if root_store.is_empty() {
            // Plain-HTTP endpoints still work; HTTPS handshakes will fail.
            log::warn!("No valid system certificates found.");
        }
        rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth()
    }

    pub fn markets_url(&self, limit: CoinLimit, currency: Currency) -> String {
        format!(
            "{}/coins/markets?vs_currency={}&order=market_cap_desc&page=1&per_page={}",
            self.base_url,
            currency.code(),
            limit.value()
        )
    }

    /// Fetches the top `limit` coins by market cap, priced in `currency`.
    /// Records keep the order of the response.
    pub async fn fetch_markets(
        &self,
        limit: CoinLimit,
        currency: Currency,
    ) -> Result<Vec<Coin>, FetchError> {
        let url = self.markets_url(limit, currency);
        log::debug!("GET {}", url);

        let uri: Uri = url.parse().map_err(|e: http::uri::InvalidUri| FetchError::InvalidUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        let req = Request::get(uri)
            .body(String::new())
            .map_err(|e| FetchError::InvalidUrl {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let call = self.http.clone().oneshot(req);
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| FetchError::Timeout(limit))?,
            None => call.await,
        };
        let response = result.map_err(|e| FetchError::Transport(format!("{:?}", e)))?;

        let status = response.status();
        if !status.is_success() {
            log::error!("Market request failed with status {}", status);
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?
            .to_bytes();
        let coins: Vec<Coin> = serde_json::from_slice(&body)?;
        log::info!("Fetched {} coins ({} requested)", coins.len(), limit);
        Ok(coins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_carries_limit_and_currency() {
        let config = Config {
            api_base_url: "https://example.test/api/v3/".to_string(),
            ..Config::default()
        };
        let client = MarketClient::new(&config);
        let url = client.markets_url(CoinLimit::Twenty, Currency::parse("eur").unwrap());
        assert_eq!(
            url,
            "https://example.test/api/v3/coins/markets?vs_currency=eur&order=market_cap_desc&page=1&per_page=20"
        );
    }

    #[test]
    fn every_error_shows_the_same_message() {
        let err = FetchError::Status { status: 503 };
        assert_eq!(err.to_string(), "HTTP error! status: 503");
        assert_eq!(err.user_message(), FETCH_ERROR_MESSAGE);
    }
}
