//! Integration tests for request files and the HTTP exchange-rate provider.
//!
//! The provider tests run against a one-shot HTTP server on localhost so no
//! external network access is needed.

use std::path::Path;
use std::time::Duration;

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_core::ScenarioCalculator;
use tax_data::{
    ExchangeRateProvider, ExchangeRateUnavailable, MindicadorProvider, ScenarioLoaderError,
    ScenarioRequestLoader,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const TEST_CSV: &str = include_str!("../test-data/scenario_requests.csv");

fn fixture_path() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("test-data")
        .join("scenario_requests.csv")
        .leak()
}

/// Serves a single HTTP response on an ephemeral port and returns its URL.
async fn serve_once(
    status_line: &'static str,
    body: &'static str,
) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("Failed to accept");
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.expect("Failed to read request");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket
            .write_all(response.as_bytes())
            .await
            .expect("Failed to write response");
        socket.shutdown().await.ok();
    });

    format!("http://{addr}/api/dolar")
}

// =============================================================================
// request files
// =============================================================================

#[test]
fn test_parse_fixture_rows() {
    let records = ScenarioRequestLoader::parse(TEST_CSV.as_bytes()).expect("Failed to parse CSV");

    assert_eq!(records.len(), 4);
    assert_eq!(records[0].exchange_rate, Some(dec!(950.50)));
    assert_eq!(records[2].stock_amount, dec!(0));
    assert_eq!(records[2].exchange_rate, None);
}

#[test]
fn test_load_fixture_file_matches_inline_parse() {
    let from_file =
        ScenarioRequestLoader::load_from_file(fixture_path()).expect("fixture file should load");
    let inline = ScenarioRequestLoader::parse(TEST_CSV.as_bytes()).unwrap();

    assert_eq!(from_file, inline);
}

#[test]
fn test_load_nonexistent_file_returns_io_error() {
    let result = ScenarioRequestLoader::load_from_file(Path::new("/this/path/does/not/exist.csv"));

    assert!(matches!(result, Err(ScenarioLoaderError::Io { .. })));
}

#[test]
fn test_fixture_rows_evaluate() {
    let records = ScenarioRequestLoader::parse(TEST_CSV.as_bytes()).unwrap();
    let calculator = ScenarioCalculator::default();

    let second = calculator
        .evaluate(&records[1].to_request(dec!(950)))
        .expect("row should evaluate");
    assert_eq!(second.base.income, dec!(20000000.04));
    assert_eq!(second.full.extra_amount, dec!(10000000));

    // Row without stock: both scenarios add nothing.
    let third = calculator
        .evaluate(&records[2].to_request(dec!(950)))
        .expect("row should evaluate");
    assert_eq!(third.full.extra_amount, dec!(0));
    assert_eq!(third.optimal.yield_percent, dec!(0));

    // 360M base is already in the top bracket, so optimal == full.
    let fourth = calculator
        .evaluate(&records[3].to_request(dec!(950)))
        .expect("row should evaluate");
    assert_eq!(fourth.base.index, 8);
    assert_eq!(fourth.optimal, fourth.full);
}

// =============================================================================
// mindicador provider
// =============================================================================

#[tokio::test]
async fn test_mindicador_fetches_latest_rate() {
    let url = serve_once(
        "HTTP/1.1 200 OK",
        r#"{"codigo":"dolar","serie":[{"fecha":"2025-03-14T03:00:00.000Z","valor":931.75},{"fecha":"2025-03-13T03:00:00.000Z","valor":929.9}]}"#,
    )
    .await;
    let provider = MindicadorProvider::new(url, Duration::from_secs(5)).unwrap();

    let rate = provider.latest_rate().await.expect("rate should be fetched");

    assert_eq!(rate.value, dec!(931.75));
    assert_eq!(rate.source, "mindicador");
    assert!(rate.observed_at.is_some());
}

#[tokio::test]
async fn test_mindicador_surfaces_http_status() {
    let url = serve_once("HTTP/1.1 503 Service Unavailable", "{}").await;
    let provider = MindicadorProvider::new(url.clone(), Duration::from_secs(5)).unwrap();

    let error = provider.latest_rate().await.unwrap_err();

    assert_eq!(error, ExchangeRateUnavailable::Status { url, status: 503 });
}

#[tokio::test]
async fn test_mindicador_surfaces_empty_series() {
    let url = serve_once("HTTP/1.1 200 OK", r#"{"codigo":"dolar","serie":[]}"#).await;
    let provider = MindicadorProvider::new(url, Duration::from_secs(5)).unwrap();

    let error = provider.latest_rate().await.unwrap_err();

    assert_eq!(error, ExchangeRateUnavailable::EmptySeries);
}

#[tokio::test]
async fn test_mindicador_surfaces_connection_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let provider =
        MindicadorProvider::new(format!("http://{addr}/api/dolar"), Duration::from_secs(5))
            .unwrap();

    let error = provider.latest_rate().await.unwrap_err();

    assert!(matches!(error, ExchangeRateUnavailable::Network { .. }));
}
