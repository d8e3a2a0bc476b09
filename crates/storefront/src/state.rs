//! Application state shared across handlers.

use std::sync::Arc;

use drape_core::ImageAssets;

use crate::catalog::{CatalogLoadError, CatalogStore};
use crate::config::StorefrontConfig;
use crate::mounts::MountRegistry;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog, the live configurator mounts and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogStore,
    assets: ImageAssets,
    mounts: MountRegistry,
}

impl AppState {
    /// Create application state, loading the catalog from `config.catalog_dir`.
    ///
    /// Catalog issues are logged, not rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog directory cannot be read.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogLoadError> {
        let catalog = CatalogStore::load_dir(&config.catalog_dir)?;
        tracing::info!(products = catalog.len(), "Catalog loaded");

        let state = Self::from_parts(config, catalog, crate::assets::BUNDLED, MountRegistry::default());
        state.catalog().log_issues(state.assets());
        Ok(state)
    }

    /// Assemble state from already-built parts.
    #[must_use]
    pub fn from_parts(
        config: StorefrontConfig,
        catalog: CatalogStore,
        assets: ImageAssets,
        mounts: MountRegistry,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                assets,
                mounts,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &CatalogStore {
        &self.inner.catalog
    }

    /// Get the bundled image table.
    #[must_use]
    pub fn assets(&self) -> &ImageAssets {
        &self.inner.assets
    }

    /// Get a reference to the live configurator mounts.
    #[must_use]
    pub fn mounts(&self) -> &MountRegistry {
        &self.inner.mounts
    }
}
