//! Price quote command.
//!
//! Runs a configurator for a single width and drop selection, exactly as the
//! product page would, and prints the derived values.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use drape_core::{Configurator, ConfiguratorState, Price, Product};
use drape_storefront::assets::BUNDLED;

use super::{CommandError, load};

/// Derived values for one selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub price: Price,
    pub fabric_panels: u32,
    pub button_label: String,
    pub image: Option<&'static str>,
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Price:          {}", self.price)?;
        writeln!(f, "Fabric panels:  {}", self.fabric_panels)?;
        writeln!(f, "Button:         {}", self.button_label)?;
        writeln!(f, "Image:          {}", self.image.unwrap_or("-"))
    }
}

/// Quote a selection.
///
/// # Errors
///
/// Returns `CommandError::Unresolved` if either value has no table row.
pub fn quote(product: Arc<Product>, width: u32, drop: &str) -> Result<Quote, CommandError> {
    let mut configurator = Configurator::new(product, BUNDLED);
    configurator.select_width(width);
    configurator.select_drop(drop);
    configurator.settle_image();

    if configurator.state() != (ConfiguratorState::BothSelected { resolved: true }) {
        return Err(CommandError::Unresolved {
            width,
            drop: drop.to_string(),
        });
    }

    Ok(Quote {
        price: configurator.calculated_price(),
        fabric_panels: configurator.fabric_panels(),
        button_label: configurator.button_label(),
        image: configurator.image().shown().map(|asset| asset.url),
    })
}

/// Load the product file and print a quote.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or the selection is
/// unresolved.
#[allow(clippy::print_stdout)]
pub fn run(path: &Path, width: u32, drop: &str) -> Result<(), CommandError> {
    let product = load(path)?;
    let quote = quote(product, width, drop)?;
    print!("{quote}");
    Ok(())
}
