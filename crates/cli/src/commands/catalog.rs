//! Catalog inspection commands.
//!
//! # Usage
//!
//! ```bash
//! drape-cli catalog check [PATH]
//! drape-cli catalog show [PATH] [--json]
//! ```

use std::fmt::Write;
use std::path::Path;

use drape_core::assets::asset_key;
use drape_core::{CatalogIssue, ImageAssets, Price, Product};
use drape_storefront::assets::BUNDLED;

use super::{CommandError, load};

/// Every data issue in `product`, including image references missing from
/// `assets`.
#[must_use]
pub fn issues(product: &Product, assets: &ImageAssets) -> Vec<CatalogIssue> {
    let mut issues = product.check();
    issues.extend(product.check_images(assets));
    issues
}

/// Print every issue in the product file.
///
/// # Errors
///
/// Returns `CommandError::IssuesFound` if the record has any issue, so the
/// process exits non-zero.
#[allow(clippy::print_stdout)]
pub fn check(path: &Path) -> Result<(), CommandError> {
    let product = load(path)?;
    let issues = issues(&product, &BUNDLED);

    if issues.is_empty() {
        println!("{}: no issues", product.id);
        return Ok(());
    }

    for issue in &issues {
        println!("{}: {issue}", product.id);
    }
    Err(CommandError::IssuesFound(issues.len()))
}

/// Print the width and drop tables.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or serialized.
#[allow(clippy::print_stdout)]
pub fn show(path: &Path, json: bool) -> Result<(), CommandError> {
    let product = load(path)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&product.metafields)?);
    } else {
        print!("{}", render_tables(&product));
    }
    Ok(())
}

/// Plain-text rendering of a product's two lookup tables, in table order.
#[must_use]
pub fn render_tables(product: &Product) -> String {
    let mut out = String::new();
    let currency = product.currency_code;

    let _ = writeln!(out, "{} ({})", product.title, product.id);
    let _ = writeln!(out);
    let _ = writeln!(out, "{:<8}{:<8}{:<12}Image", "Width", "Panels", "Base price");
    for entry in &product.metafields.pricing_table {
        let image = entry
            .image
            .as_deref()
            .and_then(asset_key)
            .unwrap_or("-");
        let width = format!("{}cm", entry.width);
        let base_price = Price::new(entry.base_price, currency).display();
        let _ = writeln!(
            out,
            "{width:<8}{:<8}{base_price:<12}{image}",
            entry.fabric_panels
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{:<8}Modifier", "Drop");
    for option in &product.metafields.drop_options {
        let modifier = Price::new(option.price_modifier, currency);
        let sign = if option.price_modifier.is_sign_negative() { "" } else { "+" };
        let _ = writeln!(out, "{:<8}{sign}{modifier}", option.value);
    }

    out
}
