//! JSON API handlers.
//!
//! Every response uses the same envelope: `{"status":"success","data":...}`
//! or `{"status":"error","message":...}`.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

use crate::domain::error::DashboardError;
use crate::domain::ohlcv::{STOCK_INFO_LOOKBACK, StockInfo};
use crate::domain::sentiment::{NewsAnalysis, NewsItem, SentimentSummary, analyze_news, summarize};
use crate::domain::symbol::normalize_for_lookup;
use crate::ports::sentiment_port::SentimentRecord;

use super::AppState;
use super::error::status_from_error;

pub const MAX_SENTIMENT_ITEMS: usize = 100;
pub const DEFAULT_HISTORY_LIMIT: usize = 20;
pub const MAX_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            data: Some(data),
            message: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        let status = status_from_error(&err);
        if status.is_server_error() {
            log::error!("{err}");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        log::error!("store task failed: {err}");
        Self::internal("store task failed")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()> {
            status: "error",
            data: None,
            message: Some(self.message),
        };
        (self.status, Json(body)).into_response()
    }
}

pub async fn stock_info(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<ApiResponse<StockInfo>, ApiError> {
    let symbol = normalize_for_lookup(&symbol);
    if symbol.is_empty() {
        return Err(ApiError::bad_request("Stock symbol is required"));
    }

    let port = Arc::clone(&state.data_port);
    let info = tokio::task::spawn_blocking(move || {
        let bars = port.fetch_recent_bars(&symbol, STOCK_INFO_LOOKBACK)?;
        StockInfo::compute(&symbol, &bars)
    })
    .await??;

    Ok(ApiResponse::success(info))
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct SentimentRequest {
    pub texts: Vec<String>,
    pub news: Vec<NewsItem>,
}

impl SentimentRequest {
    /// News items first, then bare texts as title-only items.
    pub fn into_items(self) -> Vec<NewsItem> {
        let mut items = self.news;
        items.extend(self.texts.into_iter().map(|t| NewsItem::new(t, "")));
        items
    }
}

#[derive(Debug, Serialize)]
pub struct SentimentResponse {
    pub analysis: NewsAnalysis,
    pub summary: SentimentSummary,
    pub recorded: Vec<i64>,
}

pub async fn analyze_sentiment(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<ApiResponse<SentimentResponse>, ApiError> {
    let request: SentimentRequest =
        serde_json::from_slice(&body).map_err(|_| ApiError::bad_request("Invalid JSON data"))?;
    let items = request.into_items();
    if items.len() > MAX_SENTIMENT_ITEMS {
        return Err(ApiError::bad_request(format!(
            "Too many items (max {MAX_SENTIMENT_ITEMS})"
        )));
    }

    let analysis = analyze_news(&items).map_err(|e| ApiError::bad_request(e.to_string()))?;
    let summary =
        summarize(&analysis.detailed_results).map_err(|e| ApiError::bad_request(e.to_string()))?;

    let port = Arc::clone(&state.sentiment_port);
    let results = analysis.detailed_results.clone();
    let recorded = tokio::task::spawn_blocking(move || port.record_batch(&results)).await??;
    log::debug!("recorded {} sentiment results", recorded.len());

    Ok(ApiResponse::success(SentimentResponse {
        analysis,
        summary,
        recorded,
    }))
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

pub fn history_limit(requested: Option<usize>) -> usize {
    requested
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT)
}

pub async fn sentiment_history(
    State(state): State<Arc<AppState>>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<ApiResponse<Vec<SentimentRecord>>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let limit = history_limit(query.limit);
    let port = Arc::clone(&state.sentiment_port);
    let records = tokio::task::spawn_blocking(move || port.recent_sentiment(limit)).await??;
    Ok(ApiResponse::success(records))
}
