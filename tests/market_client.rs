// Tests for the market endpoint client against a mock server.
use coindeck::config::Config;
use coindeck::market::{CoinLimit, FETCH_ERROR_MESSAGE, FetchError, MarketClient};
use coindeck::model::Currency;
use mockito::{Matcher, Server};

const TWO_COINS: &str = r#"[
    {"id": "bitcoin", "symbol": "btc", "name": "Bitcoin", "image": "https://img.test/btc.png",
     "current_price": 64123.5, "market_cap_rank": 1, "price_change_percentage_24h": 2.5,
     "roi": null, "max_supply": 21000000.0},
    {"id": "ethereum", "symbol": "eth", "name": "Ethereum", "image": "https://img.test/eth.png",
     "current_price": 3120.12, "market_cap_rank": 2, "price_change_percentage_24h": -1.25,
     "roi": {"times": 42.1, "currency": "btc", "percentage": 4210.0}}
]"#;

fn client_for(server: &Server) -> MarketClient {
    let config = Config {
        api_base_url: server.url(),
        request_timeout_secs: 5,
        ..Config::default()
    };
    MarketClient::new(&config)
}

#[tokio::test]
async fn test_fetch_sends_query_and_keeps_order() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/coins/markets")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("vs_currency".into(), "eur".into()),
            Matcher::UrlEncoded("order".into(), "market_cap_desc".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("per_page".into(), "20".into()),
        ]))
        .match_header("accept", "application/json")
        .match_header("user-agent", Matcher::Regex("^coindeck/".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TWO_COINS)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let eur = Currency::parse("eur").unwrap();
    let coins = client.fetch_markets(CoinLimit::Twenty, eur).await.unwrap();

    let ids: Vec<&str> = coins.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["bitcoin", "ethereum"]);
    assert_eq!(coins[0].current_price, Some(64123.5));
    assert_eq!(coins[0].roi, None);
    assert_eq!(coins[1].price_change_percentage_24h, Some(-1.25));
    assert_eq!(coins[1].roi.as_ref().map(|r| r.currency.as_str()), Some("btc"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_short_page_is_returned_as_is() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/coins/markets")
        .match_query(Matcher::UrlEncoded("per_page".into(), "30".into()))
        .with_status(200)
        .with_body(TWO_COINS)
        .create_async()
        .await;

    let coins = client_for(&server)
        .fetch_markets(CoinLimit::Thirty, Currency::USD)
        .await
        .unwrap();
    assert_eq!(coins.len(), 2);
}

#[tokio::test]
async fn test_error_status_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/coins/markets")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_body(r#"{"status":{"error_code":429}}"#)
        .expect(1)
        .create_async()
        .await;

    let err = client_for(&server)
        .fetch_markets(CoinLimit::Ten, Currency::USD)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 429 }), "got {:?}", err);
    assert_eq!(err.to_string(), "HTTP error! status: 429");
    assert_eq!(err.user_message(), FETCH_ERROR_MESSAGE);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_malformed_body_is_a_decode_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/coins/markets")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let err = client_for(&server)
        .fetch_markets(CoinLimit::Ten, Currency::USD)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)), "got {:?}", err);
    assert_eq!(err.user_message(), "Failed to fetch crypto data.");
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    let config = Config {
        // Port 9 (discard) is closed on test machines.
        api_base_url: "http://127.0.0.1:9".to_string(),
        request_timeout_secs: 5,
        ..Config::default()
    };
    let err = MarketClient::new(&config)
        .fetch_markets(CoinLimit::Ten, Currency::USD)
        .await
        .unwrap_err();
    assert!(
        matches!(err, FetchError::Transport(_) | FetchError::Timeout(_)),
        "got {:?}",
        err
    );
}
