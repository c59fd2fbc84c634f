//! HTTP error responses for web adapter.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::domain::error::DashboardError;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

pub fn status_from_error(err: &DashboardError) -> StatusCode {
    match err {
        DashboardError::NoData { .. } => StatusCode::NOT_FOUND,
        DashboardError::Import { .. } => StatusCode::BAD_REQUEST,
        DashboardError::ConfigParse { .. }
        | DashboardError::ConfigMissing { .. }
        | DashboardError::ConfigInvalid { .. }
        | DashboardError::Database { .. }
        | DashboardError::DatabaseQuery { .. }
        | DashboardError::Render { .. }
        | DashboardError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<DashboardError> for WebError {
    fn from(err: DashboardError) -> Self {
        let status = status_from_error(&err);
        if status.is_server_error() {
            log::error!("{err}");
        }
        Self::new(status, err.to_string())
    }
}

impl From<askama::Error> for WebError {
    fn from(err: askama::Error) -> Self {
        DashboardError::Render {
            reason: err.to_string(),
        }
        .into()
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        // Server-side details stay in the log.
        let message = if self.status.is_server_error() {
            "Something went wrong while building this page."
        } else {
            self.message.as_str()
        };
        let template = super::templates::ErrorTemplate {
            message,
            status: self.status.as_u16(),
        };
        match template.render() {
            Ok(html) => (self.status, Html(html)).into_response(),
            Err(_) => (self.status, self.message).into_response(),
        }
    }
}
