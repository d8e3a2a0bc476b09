//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use drape_core::SelectionError;

use crate::catalog::CatalogLoadError;

/// HTMX response header asking the browser to reload the page.
const HX_REFRESH: &str = "hx-refresh";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Loading the product catalog failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogLoadError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The configurator this request targets has been unmounted.
    #[error("Gone: {0}")]
    Gone(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SelectionError> for AppError {
    fn from(err: SelectionError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Catalog(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Catalog(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Gone(_) => StatusCode::GONE,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Catalog(_) | Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        let mut response = (status, message).into_response();

        // An expired mount can only recover by remounting, i.e. reloading
        if matches!(self, Self::Gone(_)) {
            response
                .headers_mut()
                .insert(HX_REFRESH, HeaderValue::from_static("true"));
        }

        response
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("configurator", "Selected width", Some(&[("width", "200")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
