//! Integration tests for Drape.
//!
//! Tests drive the complete storefront router (middleware included) in
//! process through `tower::ServiceExt::oneshot`; no server or network is
//! needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p drape-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_configurator` - Product page and configurator fragments

use std::path::PathBuf;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode, header::CONTENT_TYPE},
};
use drape_storefront::config::StorefrontConfig;
use drape_storefront::routes;
use drape_storefront::state::AppState;
use tower::ServiceExt;
use uuid::Uuid;

/// Response reduced to what the tests assert on.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: String,
}

impl TestResponse {
    async fn read(response: Response<Body>) -> Result<Self, axum::Error> {
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        Ok(Self {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    /// A header as a string, if present and visible ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The configurator mount embedded in a product page.
    #[must_use]
    pub fn mount(&self) -> Option<Uuid> {
        let start = self.body.find("/configurator/")? + "/configurator/".len();
        let id = self.body.get(start..start + 36)?;
        Uuid::parse_str(id).ok()
    }
}

/// The storefront application backed by the bundled catalog.
pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    /// Build the app from `crates/storefront/content/products`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn new() -> Result<Self, drape_storefront::catalog::CatalogLoadError> {
        Self::with_config(StorefrontConfig::default())
    }

    /// Build the app with custom configuration; the catalog and static
    /// directories always point at the storefront crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn with_config(
        config: StorefrontConfig,
    ) -> Result<Self, drape_storefront::catalog::CatalogLoadError> {
        let storefront = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront");
        let config = StorefrontConfig {
            catalog_dir: storefront.join("content/products"),
            static_dir: storefront.join("static"),
            ..config
        };
        let state = AppState::new(config)?;
        let router = routes::app(state.clone());
        Ok(Self { state, router })
    }

    async fn send(&self, request: Request<Body>) -> Result<TestResponse, axum::Error> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(axum::Error::new)?;
        TestResponse::read(response).await
    }

    /// `GET` a path.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or the body read.
    pub async fn get(&self, uri: &str) -> Result<TestResponse, axum::Error> {
        let request = Request::get(uri)
            .body(Body::empty())
            .map_err(axum::Error::new)?;
        self.send(request).await
    }

    /// `POST` a url-encoded form.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or the body read.
    pub async fn post_form(&self, uri: &str, form: &str) -> Result<TestResponse, axum::Error> {
        let request = Request::post(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .map_err(axum::Error::new)?;
        self.send(request).await
    }
}
