use api_client::error::ApiError;
use api_client::{PriceSource, YahooClient};
use chrono::NaiveDate;
use configuration::ProviderConfig;
use core_types::DatedSeries;
use mockito::Matcher;

const TWO_DAYS: &str = r#"{"chart":{"result":[{"meta":{"symbol":"EEM","gmtoffset":-18000},
    "timestamp":[1704205800,1704292200],
    "indicators":{"quote":[{"close":[40.12,39.87]}]}}],"error":null}}"#;

fn client_for(server: &mockito::Server) -> YahooClient {
    YahooClient::new(&ProviderConfig {
        base_url: server.url(),
        ..ProviderConfig::default()
    })
    .unwrap()
}

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

#[tokio::test]
async fn fetches_daily_closes_once() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Regex(r"^/EEM".to_string()))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("period1".into(), "1704067200".into()),
            Matcher::UrlEncoded("interval".into(), "1d".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TWO_DAYS)
        .expect(1)
        .create_async()
        .await;

    let series = client_for(&server).fetch_closes("EEM", start()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(series.len(), 2);
    assert_eq!(series.points()[1].value, 39.87);
}

#[tokio::test]
async fn caret_tickers_reach_the_provider_escaped() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Regex(r"^/(%5E|\^)GSPC".to_string()))
        .with_status(200)
        .with_body(TWO_DAYS)
        .create_async()
        .await;

    let series = client_for(&server).fetch_closes("^GSPC", start()).await.unwrap();

    mock.assert_async().await;
    assert!(!series.is_empty());
}

#[tokio::test]
async fn unknown_ticker_yields_an_empty_series() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Regex(r"^/NOPE".to_string()))
        .with_status(404)
        .with_body(r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#)
        .create_async()
        .await;

    let series = client_for(&server).fetch_closes("NOPE", start()).await.unwrap();
    assert!(series.is_empty());
}

#[tokio::test]
async fn server_errors_are_hard_failures() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Any)
        .with_status(503)
        .with_body("Service Unavailable")
        .create_async()
        .await;

    let err = client_for(&server).fetch_closes("EEM", start()).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 503, .. }));
}

#[tokio::test]
async fn unreachable_provider_is_a_transport_failure() {
    let client = YahooClient::new(&ProviderConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        ..ProviderConfig::default()
    })
    .unwrap();

    let err = client.fetch_closes("EEM", start()).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
