#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use std::sync::Arc;
use stockdash::adapters::file_config_adapter::FileConfigAdapter;
use stockdash::adapters::sqlite_adapter::SqliteAdapter;
use stockdash::adapters::web::{AppState, build_router};
use stockdash::domain::ohlcv::StockBar;
use stockdash::domain::settings::Settings;
use stockdash::ports::data_port::DataPort;
use tower::ServiceExt;

pub fn default_settings() -> Settings {
    Settings::from_config(&FileConfigAdapter::empty()).unwrap()
}

pub fn settings_from(ini: &str) -> Settings {
    Settings::from_config(&FileConfigAdapter::from_string(ini).unwrap()).unwrap()
}

pub fn migrated_store() -> Arc<SqliteAdapter> {
    let store = SqliteAdapter::in_memory().unwrap();
    store.migrate().unwrap();
    Arc::new(store)
}

pub fn create_test_app() -> Router {
    create_app_with(migrated_store(), default_settings())
}

pub fn create_app_with(store: Arc<SqliteAdapter>, settings: Settings) -> Router {
    build_router(AppState {
        data_port: store.clone(),
        sentiment_port: store,
        settings,
    })
}

/// Daily bars starting 2024-01-01, one per close.
pub fn generate_bars(symbol: &str, closes: &[f64]) -> Vec<StockBar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| StockBar {
            symbol: symbol.to_string(),
            date: start + chrono::Duration::days(i as i64),
            open: close - 0.5,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000_000 + i as i64,
        })
        .collect()
}

pub fn seed_bars(store: &SqliteAdapter, symbol: &str, closes: &[f64]) {
    store.insert_bars(&generate_bars(symbol, closes)).unwrap();
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&body).into_owned())
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_str(&body).unwrap())
}

pub async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Percent-encodes everything outside the URL unreserved set.
pub fn percent_encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() * 3);
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
