//! HTTP request handlers for the dashboard pages.

use askama::Template;
use axum::{
    extract::{Query, State, rejection::QueryRejection},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use crate::domain::page::Page;
use crate::domain::sentiment::{analyze_news, sample_news, summarize};
use crate::domain::symbol::Symbol;

use super::templates::{
    AboutTemplate, HomeTemplate, MoodPanel, NewsSentimentTemplate, PageContext,
    PredictionTemplate,
};
use super::{AppState, WebError};

/// Query string as ordered pairs, so repeated keys never reject the request.
pub type QueryPairs = Vec<(String, String)>;

/// The last `symbol` pair wins.
pub fn requested_symbol(pairs: &[(String, String)]) -> Option<&str> {
    pairs
        .iter()
        .rev()
        .find(|(key, _)| key == "symbol")
        .map(|(_, value)| value.as_str())
}

fn page_context(
    state: &AppState,
    page: Page,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<PageContext, WebError> {
    let Query(pairs) = query.map_err(|rejection| {
        log::debug!("rejected query for {}: {rejection}", page.path());
        WebError::bad_request(rejection.body_text())
    })?;
    let symbol = Symbol::from_query(requested_symbol(&pairs), &state.settings.default_symbol);
    Ok(PageContext::new(page, symbol, &state.settings.widgets))
}

pub async fn home(
    State(state): State<Arc<AppState>>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Response, WebError> {
    let page = page_context(&state, Page::Home, query)?;
    let html = HomeTemplate { page: &page }.render()?;
    Ok(Html(html).into_response())
}

pub async fn prediction(
    State(state): State<Arc<AppState>>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Response, WebError> {
    let page = page_context(&state, Page::Prediction, query)?;
    let html = PredictionTemplate { page: &page }.render()?;
    Ok(Html(html).into_response())
}

pub async fn news_sentiment(
    State(state): State<Arc<AppState>>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Response, WebError> {
    let page = page_context(&state, Page::NewsSentiment, query)?;
    let mood = mood_panel();
    let html = NewsSentimentTemplate {
        page: &page,
        mood: mood.as_ref(),
    }
    .render()?;
    Ok(Html(html).into_response())
}

pub async fn about(
    State(state): State<Arc<AppState>>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Response, WebError> {
    let page = page_context(&state, Page::About, query)?;
    let html = AboutTemplate { page: &page }.render()?;
    Ok(Html(html).into_response())
}

/// The page still renders when the sample set yields nothing.
fn mood_panel() -> Option<MoodPanel> {
    let analysis = analyze_news(&sample_news()).ok()?;
    let summary = summarize(&analysis.detailed_results).ok()?;
    Some(MoodPanel {
        summary,
        headlines: analysis.detailed_results,
    })
}

pub async fn not_found() -> WebError {
    WebError::not_found("Page not found")
}

pub async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

pub fn page_handler(page: Page) -> axum::routing::MethodRouter<Arc<AppState>> {
    use axum::routing::get;
    match page {
        Page::Home => get(home),
        Page::Prediction => get(prediction),
        Page::NewsSentiment => get(news_sentiment),
        Page::About => get(about),
    }
}
