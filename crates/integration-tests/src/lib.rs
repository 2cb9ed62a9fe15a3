//! Integration tests for the ASN Store.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p asn-store-integration-tests
//! ```
//!
//! Tests drive the storefront router in-process with
//! `tower::ServiceExt::oneshot`; no server or network is needed. Each
//! [`TestContext`] owns a temporary directory holding its cart file.
//!
//! # Test Categories
//!
//! - `storefront_routes` - HTTP routes and the fragments they return
//! - `cart_persistence` - Cart file contents across restarts

use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tempfile::TempDir;
use tower::ServiceExt;

use asn_store_core::Catalog;
use asn_store_storefront::config::StorefrontConfig;
use asn_store_storefront::state::AppState;
use asn_store_storefront::storage::FileStore;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Status and body text of one response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
}

/// A storefront wired to a throwaway cart file.
pub struct TestContext {
    dir: TempDir,
    config: StorefrontConfig,
    state: AppState,
}

impl TestContext {
    /// Fresh store with the sample catalog and an empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> Result<Self, BoxError> {
        Self::with_timing(StorefrontConfig::default().timing.notice_ttl)
    }

    /// Fresh store whose notices live for `notice_ttl`.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn with_timing(notice_ttl: Duration) -> Result<Self, BoxError> {
        let dir = tempfile::tempdir()?;
        let mut config = StorefrontConfig {
            store_path: dir.path().join("asn-store.json"),
            asset_dir: storefront_asset_dir(),
            ..StorefrontConfig::default()
        };
        config.timing.notice_ttl = notice_ttl;

        let state = build_state(&config);
        Ok(Self { dir, config, state })
    }

    /// Simulate a restart: new state over the same cart file.
    #[must_use]
    pub fn restart(self) -> Self {
        let state = build_state(&self.config);
        Self { state, ..self }
    }

    #[must_use]
    pub fn store_path(&self) -> &Path {
        &self.config.store_path
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    #[must_use]
    pub fn router(&self) -> Router {
        asn_store_storefront::app(self.state.clone())
    }

    /// Send a GET request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or the body read.
    pub async fn get(&self, uri: &str) -> Result<TestResponse, BoxError> {
        let request = Request::get(uri).body(Body::empty())?;
        self.send(request).await
    }

    /// Send a form-encoded POST request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or the body read.
    pub async fn post_form(&self, uri: &str, form: &str) -> Result<TestResponse, BoxError> {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))?;
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> Result<TestResponse, BoxError> {
        let response = self.router().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        Ok(TestResponse {
            status,
            body: String::from_utf8(bytes.to_vec())?,
        })
    }
}

fn build_state(config: &StorefrontConfig) -> AppState {
    AppState::new(
        config.clone(),
        Catalog::sample(),
        FileStore::new(&config.store_path),
    )
}

/// The storefront crate's `static/` directory.
#[must_use]
pub fn storefront_asset_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../storefront/static")
}
