//! Product catalog records.
//!
//! A product carries two ordered lookup tables in its metafields: the
//! width-keyed pricing table and the label-keyed drop options. Keys are
//! assumed unique but nothing here enforces it; [`Product::check`] reports
//! suspicious data without rejecting it.
//!
//! Records are stored as JSON with camelCase keys:
//!
//! ```json
//! {
//!   "id": "curtain-001",
//!   "title": "Premium Curtain Collection",
//!   "description": "High-quality curtains.",
//!   "variants": [{ "id": "drop-var", "title": "Drop", "price": 0 }],
//!   "metafields": {
//!     "pricingTable": [
//!       { "width": 200, "fabricPanels": 4, "basePrice": 240, "image": "/src/assets/curtain-200cm.jpg" }
//!     ],
//!     "dropOptions": [{ "value": "183cm", "priceModifier": 20 }]
//!   }
//! }
//! ```

use std::collections::HashSet;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assets::ImageAssets;
use crate::types::{CurrencyCode, ProductId, VariantId};

/// Errors raised while reading catalog records.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid product JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A configurable product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    /// Currency of every amount in the metafields.
    #[serde(default)]
    pub currency_code: CurrencyCode,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    pub metafields: Metafields,
}

/// A purchasable variant record. Not consulted by price derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: VariantId,
    pub title: String,
    pub price: Decimal,
    /// Internal variants (e.g. the fabric-panel counter) are hidden from shoppers.
    #[serde(default)]
    pub hidden: bool,
}

/// The two option tables that drive configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metafields {
    #[serde(default)]
    pub pricing_table: Vec<PricingEntry>,
    #[serde(default)]
    pub drop_options: Vec<DropOption>,
}

/// One row of the pricing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingEntry {
    /// Width in centimetres.
    pub width: u32,
    pub fabric_panels: u32,
    pub base_price: Decimal,
    /// Image reference, resolved through [`ImageAssets`].
    #[serde(default)]
    pub image: Option<String>,
}

/// One drop (length) option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropOption {
    /// Label shown to the shopper, e.g. `183cm`.
    pub value: String,
    /// Signed delta added to the row's base price.
    pub price_modifier: Decimal,
}

impl Product {
    /// Parse a product record from JSON.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Json` if the document is malformed or misses
    /// required fields.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// First pricing-table row with the given width.
    #[must_use]
    pub fn pricing_entry(&self, width: u32) -> Option<&PricingEntry> {
        self.metafields
            .pricing_table
            .iter()
            .find(|entry| entry.width == width)
    }

    /// First drop option with the given label.
    #[must_use]
    pub fn drop_option(&self, value: &str) -> Option<&DropOption> {
        self.metafields
            .drop_options
            .iter()
            .find(|option| option.value == value)
    }

    /// Variants to show, skipping hidden ones unless asked to include them.
    pub fn visible_variants(&self, include_hidden: bool) -> impl Iterator<Item = &ProductVariant> {
        self.variants
            .iter()
            .filter(move |variant| include_hidden || !variant.hidden)
    }

    /// Report data problems in the option tables.
    ///
    /// Nothing is rejected: the configurator keeps working with first-match
    /// lookups, so callers decide whether an issue is fatal.
    #[must_use]
    pub fn check(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();
        let tables = &self.metafields;

        if tables.pricing_table.is_empty() {
            issues.push(CatalogIssue::EmptyPricingTable);
        }
        if tables.drop_options.is_empty() {
            issues.push(CatalogIssue::EmptyDropOptions);
        }

        let mut widths = HashSet::new();
        for entry in &tables.pricing_table {
            if entry.width == 0 {
                issues.push(CatalogIssue::ZeroWidth);
            }
            if !widths.insert(entry.width) {
                issues.push(CatalogIssue::DuplicateWidth(entry.width));
            }
            if entry.base_price.is_sign_negative() && !entry.base_price.is_zero() {
                issues.push(CatalogIssue::NegativeBasePrice {
                    width: entry.width,
                    base_price: entry.base_price,
                });
            }
        }

        let mut labels = HashSet::new();
        for option in &tables.drop_options {
            if !labels.insert(option.value.as_str()) {
                issues.push(CatalogIssue::DuplicateDrop(option.value.clone()));
            }
        }

        issues
    }

    /// Report pricing-table image references the asset table cannot resolve.
    #[must_use]
    pub fn check_images(&self, assets: &ImageAssets) -> Vec<CatalogIssue> {
        self.metafields
            .pricing_table
            .iter()
            .filter_map(|entry| {
                let reference = entry.image.as_deref()?;
                assets
                    .resolve(reference)
                    .is_none()
                    .then(|| CatalogIssue::UnknownImage {
                        width: entry.width,
                        reference: reference.to_string(),
                    })
            })
            .collect()
    }
}

/// A suspicious catalog record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    EmptyPricingTable,
    EmptyDropOptions,
    ZeroWidth,
    DuplicateWidth(u32),
    DuplicateDrop(String),
    NegativeBasePrice { width: u32, base_price: Decimal },
    UnknownImage { width: u32, reference: String },
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPricingTable => f.write_str("pricing table is empty"),
            Self::EmptyDropOptions => f.write_str("drop options are empty"),
            Self::ZeroWidth => f.write_str("pricing table has a zero width"),
            Self::DuplicateWidth(width) => {
                write!(f, "width {width}cm appears more than once (first row wins)")
            }
            Self::DuplicateDrop(value) => {
                write!(f, "drop '{value}' appears more than once (first option wins)")
            }
            Self::NegativeBasePrice { width, base_price } => {
                write!(f, "width {width}cm has a negative base price ({base_price})")
            }
            Self::UnknownImage { width, reference } => {
                write!(f, "width {width}cm references unknown image '{reference}'")
            }
        }
    }
}

#[cfg(test)]
pub(crate) const PREMIUM_CURTAINS_JSON: &str = r#"{
  "id": "curtain-001",
  "title": "Premium Curtain Collection",
  "description": "High-quality curtains with customizable width and drop options. Perfect for any room.",
  "variants": [
    { "id": "fabric-panel-var", "title": "Fabric Panels", "price": 0, "hidden": true },
    { "id": "drop-var", "title": "Drop", "price": 0, "hidden": false }
  ],
  "metafields": {
    "pricingTable": [
      { "width": 100, "fabricPanels": 2, "basePrice": 120, "image": "/src/assets/curtain-100cm.jpg" },
      { "width": 150, "fabricPanels": 3, "basePrice": 180, "image": "/src/assets/curtain-150cm.jpg" },
      { "width": 200, "fabricPanels": 4, "basePrice": 240, "image": "/src/assets/curtain-200cm.jpg" },
      { "width": 250, "fabricPanels": 5, "basePrice": 300, "image": "/src/assets/curtain-250cm.jpg" },
      { "width": 300, "fabricPanels": 6, "basePrice": 360, "image": "/src/assets/curtain-300cm.jpg" }
    ],
    "dropOptions": [
      { "value": "137cm", "priceModifier": 0 },
      { "value": "183cm", "priceModifier": 20 },
      { "value": "229cm", "priceModifier": 40 },
      { "value": "274cm", "priceModifier": 60 }
    ]
  }
}"#;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) fn premium_curtains() -> Product {
    Product::from_json(PREMIUM_CURTAINS_JSON).unwrap()
}
