//! CLI command implementations.

pub mod catalog;
pub mod quote;

use std::path::Path;
use std::sync::Arc;

use drape_core::Product;
use drape_storefront::catalog::{CatalogLoadError, CatalogStore};
use thiserror::Error;

/// Product file used when no path is given.
pub const DEFAULT_PRODUCT_PATH: &str = "crates/storefront/content/products/curtain-001.json";

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The product file could not be read or parsed.
    #[error(transparent)]
    Load(#[from] CatalogLoadError),

    /// `catalog check` found data issues.
    #[error("{0} catalog issue(s) found")]
    IssuesFound(usize),

    /// The selection has no matching pricing or drop row.
    #[error("No price for width {width}cm with drop {drop}")]
    Unresolved { width: u32, drop: String },

    /// Output could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Load one product record.
fn load(path: &Path) -> Result<Arc<Product>, CommandError> {
    let product = CatalogStore::load_product(path)?;
    tracing::debug!(product = %product.id, path = %path.display(), "Loaded product");
    Ok(Arc::new(product))
}
