//! Bundled image lookup.
//!
//! Catalog rows name images by reference (`/src/assets/curtain-200cm.jpg`).
//! Those references are resolved through a constant table generated at build
//! time, keyed by the reference's file stem (`curtain-200cm`). The table maps
//! each key to the URL of the bundled, content-hashed file.

use std::path::Path;

/// A resolved bundled image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageAsset {
    /// Logical key, the file stem of the catalog reference.
    pub key: &'static str,
    /// Public URL of the bundled file.
    pub url: &'static str,
}

/// Constant key -> URL table for bundled images.
#[derive(Debug, Clone, Copy)]
pub struct ImageAssets {
    table: &'static [(&'static str, &'static str)],
}

impl ImageAssets {
    /// Wrap a `(key, url)` table.
    #[must_use]
    pub const fn new(table: &'static [(&'static str, &'static str)]) -> Self {
        Self { table }
    }

    /// A table that resolves nothing.
    #[must_use]
    pub const fn empty() -> Self {
        Self { table: &[] }
    }

    /// Look up an asset by logical key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<ImageAsset> {
        self.table
            .iter()
            .find(|(k, _)| *k == key)
            .map(|&(key, url)| ImageAsset { key, url })
    }

    /// Resolve a catalog image reference.
    ///
    /// Returns `None` for references whose key is not bundled.
    #[must_use]
    pub fn resolve(&self, reference: &str) -> Option<ImageAsset> {
        self.get(asset_key(reference)?)
    }

    /// Number of bundled images.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Logical key of an image reference: its file stem.
#[must_use]
pub fn asset_key(reference: &str) -> Option<&str> {
    Path::new(reference.trim())
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
}
