//! Web server adapter.
//!
//! Axum router serving the dashboard pages, the JSON API and static assets.
//! Page handlers only read request parameters and settings; store access
//! happens in the API handlers on the blocking pool.

mod access_log;
pub mod api;
mod error;
mod handlers;
mod templates;

pub use error::{WebError, status_from_error};
pub use handlers::*;
pub use templates::*;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::domain::page::Page;
use crate::domain::settings::Settings;
use crate::ports::data_port::DataPort;
use crate::ports::sentiment_port::SentimentPort;

pub struct AppState {
    pub data_port: Arc<dyn DataPort + Send + Sync>,
    pub sentiment_port: Arc<dyn SentimentPort + Send + Sync>,
    pub settings: Settings,
}

pub fn build_router(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.settings.static_dir);

    let mut router = Router::new();
    for page in Page::ALL {
        for path in page.paths() {
            router = router.route(path, handlers::page_handler(page));
        }
    }

    router
        .route("/health", get(handlers::health))
        .route("/api/stock-info/{symbol}", get(api::stock_info))
        .route("/api/stock-info/{symbol}/", get(api::stock_info))
        .route(
            "/api/sentiment",
            post(api::analyze_sentiment).get(api::sentiment_history),
        )
        .route(
            "/api/sentiment/",
            post(api::analyze_sentiment).get(api::sentiment_history),
        )
        .nest_service("/static", static_dir)
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(access_log::access_log))
        .with_state(Arc::new(state))
}
