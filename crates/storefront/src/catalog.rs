//! Product catalog loaded from JSON files at startup.
//!
//! Every `*.json` file in the catalog directory holds one product record.
//! Products are immutable once loaded and shared with configurators via `Arc`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use drape_core::{CatalogError, ImageAssets, Product, ProductId};
use thiserror::Error;

/// Errors loading the catalog directory.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: CatalogError,
    },
}

/// Products keyed by handle.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    products: Arc<BTreeMap<ProductId, Arc<Product>>>,
}

impl CatalogStore {
    /// Build a store from already-parsed products.
    ///
    /// Later products with the same ID replace earlier ones.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let products = products
            .into_iter()
            .map(|product| (product.id.clone(), Arc::new(product)))
            .collect();
        Self {
            products: Arc::new(products),
        }
    }

    /// Load every product file in `dir`.
    ///
    /// A missing directory yields an empty catalog. Files that fail to parse
    /// are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns `CatalogLoadError::Io` if the directory exists but cannot be
    /// listed.
    pub fn load_dir(dir: &Path) -> Result<Self, CatalogLoadError> {
        if !dir.exists() {
            tracing::warn!("Catalog directory does not exist: {:?}", dir);
            return Ok(Self::default());
        }

        let entries = std::fs::read_dir(dir).map_err(|source| CatalogLoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut products = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                match Self::load_product(&path) {
                    Ok(product) => {
                        tracing::info!(product = %product.id, "Loaded product");
                        products.push(product);
                    }
                    Err(e) => {
                        tracing::error!("Failed to load product {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::from_products(products))
    }

    /// Load a single product file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogLoadError` if the file cannot be read or parsed.
    pub fn load_product(path: &Path) -> Result<Product, CatalogLoadError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Product::from_json(&json).map_err(|source| CatalogLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Log every data issue in the catalog. Returns the number of issues.
    pub fn log_issues(&self, assets: &ImageAssets) -> usize {
        let mut count = 0;
        for product in self.products.values() {
            let issues = product
                .check()
                .into_iter()
                .chain(product.check_images(assets));
            for issue in issues {
                tracing::warn!(product = %product.id, "Catalog issue: {issue}");
                count += 1;
            }
        }
        count
    }

    /// Look up a product by handle.
    #[must_use]
    pub fn get(&self, handle: &str) -> Option<Arc<Product>> {
        self.products.get(&ProductId::new(handle)).cloned()
    }

    /// All products, ordered by handle.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Product>> {
        self.products.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
