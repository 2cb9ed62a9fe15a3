//! Application state shared across handlers.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use asn_store_core::{Catalog, CatalogError, KeyValueStore, Notice, StoreSession};

use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::notice::NoticeBoard;
use crate::storage::FileStore;

/// Session type the server drives: any store that can cross threads.
pub type SharedSession = StoreSession<Box<dyn KeyValueStore + Send>>;

/// Error building the application state at startup.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to read catalog {path}: {source}")]
    CatalogRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The session sits behind one lock, so shopper
/// actions apply one at a time in arrival order.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    session: Mutex<SharedSession>,
    notices: Mutex<NoticeBoard>,
}

impl AppState {
    /// Build state around an already-loaded catalog and store.
    pub fn new(
        config: StorefrontConfig,
        catalog: Catalog,
        store: impl KeyValueStore + Send + 'static,
    ) -> Self {
        let store: Box<dyn KeyValueStore + Send> = Box::new(store);
        let session = StoreSession::open(catalog, store);
        let notices = NoticeBoard::new(config.timing.notice_ttl);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                session: Mutex::new(session),
                notices: Mutex::new(notices),
            }),
        }
    }

    /// Load the catalog named by the config and open the file-backed cart.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured catalog file cannot be read or parsed.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, StateError> {
        let catalog = match &config.catalog_path {
            Some(path) => load_catalog(path)?,
            None => Catalog::sample(),
        };
        tracing::info!(
            products = catalog.len(),
            currency = %catalog.currency().code,
            "catalog loaded"
        );

        let store = FileStore::new(&config.store_path);
        tracing::info!(path = %store.path().display(), "cart store opened");
        Ok(Self::new(config, catalog, store))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Lock the shopper session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if a previous holder panicked.
    pub fn session(&self) -> Result<MutexGuard<'_, SharedSession>, AppError> {
        self.inner
            .session
            .lock()
            .map_err(|_| AppError::Internal("Session lock poisoned".to_string()))
    }

    /// Show a notice until it expires or is superseded.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if a previous holder panicked.
    pub fn post_notice(&self, notice: Notice) -> Result<(), AppError> {
        self.notices()?.post(Instant::now(), notice);
        Ok(())
    }

    /// The notice currently showing, with the time it has left.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if a previous holder panicked.
    pub fn current_notice(&self) -> Result<Option<(Notice, Duration)>, AppError> {
        let now = Instant::now();
        let mut board = self.notices()?;
        let notice = board.current(now);
        Ok(notice.map(|n| (n, board.remaining(now).unwrap_or_default())))
    }

    fn notices(&self) -> Result<MutexGuard<'_, NoticeBoard>, AppError> {
        self.inner
            .notices
            .lock()
            .map_err(|_| AppError::Internal("Notice lock poisoned".to_string()))
    }
}

/// Read and validate a YAML catalog file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not describe a valid
/// catalog.
pub fn load_catalog(path: &Path) -> Result<Catalog, StateError> {
    let source = fs::read_to_string(path).map_err(|source| StateError::CatalogRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Catalog::from_yaml_str(&source)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use asn_store_core::MemoryStore;

    use super::*;

    #[test]
    fn test_load_catalog_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_catalog(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, StateError::CatalogRead { .. }));
    }

    #[test]
    fn test_load_catalog_from_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.yaml");
        fs::write(
            &path,
            "products:\n  - id: mug\n    title: Mug\n    price: 250\n    category: Kitchen\n",
        )
        .unwrap();

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.contains("mug"));
    }

    #[test]
    fn test_notices_round_trip_through_state() {
        let state = AppState::new(
            StorefrontConfig::default(),
            Catalog::sample(),
            MemoryStore::new(),
        );
        assert_eq!(state.current_notice().unwrap(), None);

        state.post_notice(Notice::success("Added to cart")).unwrap();
        let (notice, left) = state.current_notice().unwrap().unwrap();
        assert_eq!(notice, Notice::success("Added to cart"));
        assert!(left <= state.config().timing.notice_ttl);
    }

    #[test]
    fn test_session_lock() {
        let state = AppState::new(
            StorefrontConfig::default(),
            Catalog::sample(),
            MemoryStore::new(),
        );
        let mut session = state.session().unwrap();
        session.add_to_cart("p1", 2).unwrap();
        assert_eq!(session.total_item_count(), 2);
    }
}
