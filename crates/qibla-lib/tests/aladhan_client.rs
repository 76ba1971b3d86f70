//! Exercises `AladhanClient` against local axum servers standing in for the
//! AlAdhan API.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde_json::{json, Value};

use qibla_lib::provider::midnight_timestamp;
use qibla_lib::{
    fetch_schedule, AladhanClient, Coordinate, Error, ProviderConfig, TimingsProvider,
};

type Seen = Arc<Mutex<Vec<(String, HashMap<String, String>)>>>;

async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    addr
}

fn client_for(addr: SocketAddr, timeout: Duration) -> AladhanClient {
    AladhanClient::new(ProviderConfig {
        base_url: format!("http://{}/v1", addr),
        timeout,
    })
    .expect("client builds")
}

fn new_york() -> Coordinate {
    Coordinate::new(40.7128, -74.0060).expect("valid coordinate")
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).expect("valid date")
}

fn success_body() -> Value {
    json!({
        "code": 200,
        "status": "OK",
        "data": {
            "timings": {
                "Fajr": "05:58 (EDT)",
                "Sunrise": "07:12 (EDT)",
                "Dhuhr": "12:47 (EDT)",
                "Asr": "15:52 (EDT)",
                "Maghrib": "18:21 (EDT)",
                "Isha": "19:35 (EDT)"
            },
            "date": { "gregorian": { "date": "17-10-2026" } },
            "meta": {
                "timezone": "America/New_York",
                "method": { "id": 2, "name": "Islamic Society of North America (ISNA)" }
            }
        }
    })
}

#[tokio::test]
async fn sends_expected_request_and_parses_success() {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();
    let router = Router::new().route(
        "/v1/timings/{timestamp}",
        get(
            move |Path(timestamp): Path<String>, Query(params): Query<HashMap<String, String>>| {
                let recorder = recorder.clone();
                async move {
                    recorder.lock().unwrap().push((timestamp, params));
                    Json(success_body())
                }
            },
        ),
    );
    let addr = spawn(router).await;
    let client = client_for(addr, Duration::from_secs(5));

    let schedule = fetch_schedule(&client, &new_york(), date())
        .await
        .expect("schedule");

    assert_eq!(schedule.date, "17-10-2026");
    assert_eq!(schedule.times.fajr, "05:58");
    assert_eq!(schedule.times.isha, "19:35");
    assert_eq!(schedule.timezone, "America/New_York");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (timestamp, params) = &seen[0];
    let expected = midnight_timestamp(date()).to_string();
    assert_eq!(timestamp, &expected);
    assert_eq!(params.get("timestamp"), Some(&expected));
    assert_eq!(params.get("method").map(String::as_str), Some("2"));
    assert_eq!(params.get("latitude").map(String::as_str), Some("40.7128"));
    assert_eq!(params.get("longitude").map(String::as_str), Some("-74.006"));
}

#[tokio::test]
async fn non_success_code_is_logical_failure() {
    let router = Router::new().route(
        "/v1/timings/{timestamp}",
        get(|| async {
            Json(json!({
                "code": 400,
                "status": "BAD_REQUEST",
                "data": "Please specify a valid latitude."
            }))
        }),
    );
    let addr = spawn(router).await;
    let client = client_for(addr, Duration::from_secs(5));

    match client.fetch_timings(&new_york(), date()).await {
        Err(Error::UpstreamLogicalFailure { code, status }) => {
            assert_eq!(code, 400);
            assert!(status.contains("BAD_REQUEST"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn http_error_without_json_is_logical_failure() {
    let router = Router::new().route(
        "/v1/timings/{timestamp}",
        get(|| async { (StatusCode::BAD_GATEWAY, "upstream exploded").into_response() }),
    );
    let addr = spawn(router).await;
    let client = client_for(addr, Duration::from_secs(5));

    match client.fetch_timings(&new_york(), date()).await {
        Err(Error::UpstreamLogicalFailure { code, .. }) => assert_eq!(code, 502),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn slow_provider_is_timeout() {
    let router = Router::new().route(
        "/v1/timings/{timestamp}",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(success_body())
        }),
    );
    let addr = spawn(router).await;
    let client = client_for(addr, Duration::from_millis(200));

    let err = client
        .fetch_timings(&new_york(), date())
        .await
        .expect_err("request should time out");
    match err {
        Error::UpstreamTimeout { timeout } => assert_eq!(timeout, Duration::from_millis(200)),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn refused_connection_is_unavailable() {
    // Reserve a port, then free it so nothing is listening there
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let client = client_for(addr, Duration::from_secs(2));
    let err = client
        .fetch_timings(&new_york(), date())
        .await
        .expect_err("connection should fail");
    assert!(
        matches!(err, Error::UpstreamUnavailable { .. }),
        "unexpected error: {:?}",
        err
    );
    assert!(err.is_retryable());
}

#[tokio::test]
async fn success_without_data_is_malformed() {
    let router = Router::new().route(
        "/v1/timings/{timestamp}",
        get(|| async { Json(json!({ "code": 200, "status": "OK" })) }),
    );
    let addr = spawn(router).await;
    let client = client_for(addr, Duration::from_secs(5));

    let err = client
        .fetch_timings(&new_york(), date())
        .await
        .expect_err("payload should be rejected");
    assert!(matches!(err, Error::MalformedResponse { .. }));
}

#[tokio::test]
async fn success_with_unusable_timings_is_malformed() {
    let router = Router::new().route(
        "/v1/timings/{timestamp}",
        get(|| async {
            let mut body = success_body();
            body["data"]["timings"]["Dhuhr"] = json!("noon-ish");
            Json(body)
        }),
    );
    let addr = spawn(router).await;
    let client = client_for(addr, Duration::from_secs(5));

    let err = fetch_schedule(&client, &new_york(), date())
        .await
        .expect_err("time should be rejected");
    assert!(matches!(err, Error::MalformedResponse { .. }));
}
