//! Curtain configurator: selection state and price derivation.
//!
//! A [`Configurator`] belongs to one mount of a product page. It holds the
//! shopper's width and drop selections and the values derived from them.
//! Every selection setter re-runs [`Configurator::recompute`] before
//! returning, so readers always see derived values that match the current
//! selection (or, when a selection matches no table row, the last values that
//! did).
//!
//! ```text
//! NoSelection -> WidthOnly | DropOnly -> BothSelected { resolved }
//! ```
//!
//! Either dimension may be re-selected at any time.

use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::assets::ImageAssets;
use crate::catalog::Product;
use crate::notice::{Notice, Notifier, Severity};
use crate::transition::{ImageTransition, TransitionTicket};
use crate::types::Price;

/// Placeholder shown instead of a price until one is derived.
pub const PRICE_PLACEHOLDER: &str = "Select options to see price";

/// Longest drop label accepted from request input, in bytes.
pub const MAX_DROP_LABEL_LEN: usize = 64;

/// Errors from selection input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Invalid width: {0:?}")]
    InvalidWidth(String),
    #[error("Drop label longer than {} bytes", MAX_DROP_LABEL_LEN)]
    DropTooLong,
}

/// Where the configurator is in its selection flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfiguratorState {
    NoSelection,
    WidthOnly,
    DropOnly,
    /// Both selected; `resolved` is false when either value has no table row.
    BothSelected { resolved: bool },
}

/// An option for a select control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// What the price area shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSummary {
    Placeholder,
    Amount(Price),
}

impl fmt::Display for PriceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placeholder => f.write_str(PRICE_PLACEHOLDER),
            Self::Amount(price) => write!(f, "{price}"),
        }
    }
}

/// Result of the add-to-cart action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddToCartOutcome {
    /// A selection was missing; a validation notice was shown.
    NeedsSelection,
    /// A confirmation notice was shown.
    Added,
}

/// Selection and derived state for one product page.
#[derive(Debug, Clone)]
pub struct Configurator {
    product: Arc<Product>,
    assets: ImageAssets,
    width: Option<u32>,
    drop: Option<String>,
    price: Decimal,
    fabric_panels: u32,
    image: ImageTransition,
    mounted: bool,
}

impl Configurator {
    /// Mount a configurator for `product`, with no selections.
    #[must_use]
    pub fn new(product: Arc<Product>, assets: ImageAssets) -> Self {
        Self {
            product,
            assets,
            width: None,
            drop: None,
            price: Decimal::ZERO,
            fabric_panels: 0,
            image: ImageTransition::new(None),
            mounted: true,
        }
    }

    #[must_use]
    pub fn product(&self) -> &Product {
        &self.product
    }

    #[must_use]
    pub const fn selected_width(&self) -> Option<u32> {
        self.width
    }

    #[must_use]
    pub fn selected_drop(&self) -> Option<&str> {
        self.drop.as_deref()
    }

    /// Width options in pricing-table order.
    #[must_use]
    pub fn width_options(&self) -> Vec<SelectOption> {
        self.product
            .metafields
            .pricing_table
            .iter()
            .map(|entry| SelectOption {
                value: entry.width.to_string(),
                label: format!("{}cm", entry.width),
            })
            .collect()
    }

    /// Drop options in table order.
    #[must_use]
    pub fn drop_options(&self) -> Vec<SelectOption> {
        self.product
            .metafields
            .drop_options
            .iter()
            .map(|option| SelectOption {
                value: option.value.clone(),
                label: option.value.clone(),
            })
            .collect()
    }

    /// Select a width from its option value (e.g. `"200"`).
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::InvalidWidth` if `raw` is not an unsigned
    /// integer; the selection is left untouched.
    pub fn select_width_str(&mut self, raw: &str) -> Result<Option<TransitionTicket>, SelectionError> {
        let width = raw
            .trim()
            .parse::<u32>()
            .map_err(|_| SelectionError::InvalidWidth(raw.to_string()))?;
        Ok(self.select_width(width))
    }

    /// Select a width and re-derive.
    ///
    /// Returns a ticket when the preview image starts a transition.
    pub fn select_width(&mut self, width: u32) -> Option<TransitionTicket> {
        self.width = Some(width);
        let ticket = self.swap_image(width);
        self.recompute();
        ticket
    }

    /// Select a drop label from request input.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::DropTooLong` if `raw` exceeds
    /// [`MAX_DROP_LABEL_LEN`]; the selection is left untouched.
    pub fn select_drop_str(&mut self, raw: &str) -> Result<(), SelectionError> {
        if raw.len() > MAX_DROP_LABEL_LEN {
            return Err(SelectionError::DropTooLong);
        }
        self.select_drop(raw);
        Ok(())
    }

    /// Select a drop label and re-derive.
    pub fn select_drop(&mut self, drop: impl Into<String>) {
        self.drop = Some(drop.into());
        self.recompute();
    }

    /// Re-derive price and fabric panels from the current selection.
    ///
    /// Does nothing until both dimensions are selected. If either value has
    /// no table row the previously derived values are kept.
    pub fn recompute(&mut self) {
        let (Some(width), Some(drop)) = (self.width, self.drop.as_deref()) else {
            return;
        };

        match (
            self.product.pricing_entry(width),
            self.product.drop_option(drop),
        ) {
            (Some(entry), Some(option)) => {
                self.price = entry.base_price + option.price_modifier;
                self.fabric_panels = entry.fabric_panels;
            }
            _ => {
                warn!(
                    product = %self.product.id,
                    width,
                    drop,
                    "Selection has no matching table row; keeping previous price"
                );
            }
        }
    }

    #[must_use]
    pub fn state(&self) -> ConfiguratorState {
        match (self.width, self.drop.as_deref()) {
            (None, None) => ConfiguratorState::NoSelection,
            (Some(_), None) => ConfiguratorState::WidthOnly,
            (None, Some(_)) => ConfiguratorState::DropOnly,
            (Some(width), Some(drop)) => ConfiguratorState::BothSelected {
                resolved: self.product.pricing_entry(width).is_some()
                    && self.product.drop_option(drop).is_some(),
            },
        }
    }

    /// Derived price; zero until a selection first resolves.
    #[must_use]
    pub fn calculated_price(&self) -> Price {
        Price::new(self.price, self.product.currency_code)
    }

    /// Derived fabric-panel count; zero until a selection first resolves.
    #[must_use]
    pub const fn fabric_panels(&self) -> u32 {
        self.fabric_panels
    }

    /// The add-to-cart control is enabled exactly when both are selected.
    #[must_use]
    pub const fn can_add_to_cart(&self) -> bool {
        self.width.is_some() && self.drop.is_some()
    }

    #[must_use]
    pub fn price_summary(&self) -> PriceSummary {
        let price = self.calculated_price();
        if price.is_positive() {
            PriceSummary::Amount(price)
        } else {
            PriceSummary::Placeholder
        }
    }

    #[must_use]
    pub fn button_label(&self) -> String {
        match self.price_summary() {
            PriceSummary::Amount(price) => format!("Add to Cart - {price}"),
            PriceSummary::Placeholder => "Add to Cart".to_string(),
        }
    }

    /// Notify the shopper of the add-to-cart result.
    ///
    /// Nothing is added anywhere; the action only produces a notice.
    pub fn add_to_cart(&self, notifier: &impl Notifier) -> AddToCartOutcome {
        let (Some(width), Some(drop)) = (self.width, self.drop.as_deref()) else {
            debug!(product = %self.product.id, "Add to cart without both selections");
            notifier.show(&Notice::new(
                "Please select options",
                "Select both width and drop before adding to cart.",
                Severity::Destructive,
            ));
            return AddToCartOutcome::NeedsSelection;
        };

        let summary = format!("{} - Width: {width}cm, Drop: {drop}", self.product.title);
        let price = self.calculated_price();
        let body = if price.is_positive() {
            format!("{summary} ({price})")
        } else {
            summary
        };

        info!(product = %self.product.id, width, drop, price = %price, "Added to cart");
        notifier.show(&Notice::new("Added to cart", body, Severity::Default));
        AddToCartOutcome::Added
    }

    /// Preview image state.
    #[must_use]
    pub const fn image(&self) -> &ImageTransition {
        &self.image
    }

    /// Mutable preview image state, for callers driving the fade delays.
    pub const fn image_mut(&mut self) -> &mut ImageTransition {
        &mut self.image
    }

    /// Complete any image transition immediately.
    pub fn settle_image(&mut self) {
        self.image.settle();
    }

    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Tear down: pending image swaps are cancelled.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.image.tear_down();
    }

    fn swap_image(&mut self, width: u32) -> Option<TransitionTicket> {
        let reference = self.product.pricing_entry(width)?.image.as_deref()?;
        let Some(asset) = self.assets.resolve(reference) else {
            debug!(reference, "Image reference is not bundled; keeping current image");
            return None;
        };
        self.image.begin(asset)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::{DropOption, premium_curtains};
    use crate::notice::NoticeLog;
    use crate::transition::Phase;

    const ASSETS: &[(&str, &str)] = &[
        ("curtain-100cm", "/static/100.svg"),
        ("curtain-200cm", "/static/200.svg"),
        ("curtain-300cm", "/static/300.svg"),
    ];

    fn configurator() -> Configurator {
        Configurator::new(Arc::new(premium_curtains()), ImageAssets::new(ASSETS))
    }

    #[test]
    fn test_initial_state() {
        let c = configurator();
        assert_eq!(c.state(), ConfiguratorState::NoSelection);
        assert_eq!(c.calculated_price().amount, Decimal::ZERO);
        assert_eq!(c.fabric_panels(), 0);
        assert!(!c.can_add_to_cart());
        assert_eq!(c.price_summary(), PriceSummary::Placeholder);
        assert_eq!(c.button_label(), "Add to Cart");
        assert!(c.image().shown().is_none());
    }

    #[test]
    fn test_options_follow_table_order() {
        let c = configurator();
        let widths: Vec<String> = c.width_options().into_iter().map(|o| o.label).collect();
        assert_eq!(widths, vec!["100cm", "150cm", "200cm", "250cm", "300cm"]);
        let first = c.width_options().into_iter().next().unwrap();
        assert_eq!(first.value, "100");

        let drops: Vec<String> = c.drop_options().into_iter().map(|o| o.value).collect();
        assert_eq!(drops, vec!["137cm", "183cm", "229cm", "274cm"]);
    }

    #[test]
    fn test_every_row_and_option_combination() {
        let product = premium_curtains();
        for entry in &product.metafields.pricing_table {
            for option in &product.metafields.drop_options {
                let mut c = configurator();
                c.select_width(entry.width);
                c.select_drop(option.value.clone());
                assert_eq!(
                    c.calculated_price().amount,
                    entry.base_price + option.price_modifier
                );
                assert_eq!(c.fabric_panels(), entry.fabric_panels);
                assert_eq!(c.state(), ConfiguratorState::BothSelected { resolved: true });
            }
        }
    }

    #[test]
    fn test_width_only_keeps_price_zero() {
        let mut c = configurator();
        c.select_width(200);
        assert_eq!(c.state(), ConfiguratorState::WidthOnly);
        assert_eq!(c.calculated_price().amount, Decimal::ZERO);
        assert_eq!(c.fabric_panels(), 0);
        assert!(!c.can_add_to_cart());
    }

    #[test]
    fn test_drop_only_keeps_price_zero() {
        let mut c = configurator();
        c.select_drop("183cm");
        assert_eq!(c.state(), ConfiguratorState::DropOnly);
        assert_eq!(c.calculated_price().amount, Decimal::ZERO);
        assert!(!c.can_add_to_cart());
    }

    #[test]
    fn test_unknown_width_keeps_previous_price() {
        let mut c = configurator();
        c.select_width(200);
        c.select_drop("183cm");
        assert_eq!(c.calculated_price().amount, Decimal::from(260));

        c.select_width(175);
        assert_eq!(c.calculated_price().amount, Decimal::from(260));
        assert_eq!(c.fabric_panels(), 4);
        assert_eq!(c.state(), ConfiguratorState::BothSelected { resolved: false });
        assert!(c.can_add_to_cart());
    }

    #[test]
    fn test_unknown_drop_before_any_resolution_stays_zero() {
        let mut c = configurator();
        c.select_width(100);
        c.select_drop("999cm");
        assert_eq!(c.calculated_price().amount, Decimal::ZERO);
        assert_eq!(c.price_summary(), PriceSummary::Placeholder);
        assert!(c.can_add_to_cart());
    }

    #[test]
    fn test_reselect_width_rederives_without_new_drop() {
        let mut c = configurator();
        c.select_drop("229cm");
        c.select_width(100);
        assert_eq!(c.calculated_price().amount, Decimal::from(160));

        c.select_width(300);
        assert_eq!(c.calculated_price().amount, Decimal::from(400));
        assert_eq!(c.fabric_panels(), 6);
    }

    #[test]
    fn test_select_width_str() {
        let mut c = configurator();
        assert!(c.select_width_str(" 250 ").is_ok());
        assert_eq!(c.selected_width(), Some(250));

        let err = c.select_width_str("wide").unwrap_err();
        assert_eq!(err, SelectionError::InvalidWidth("wide".to_string()));
        assert_eq!(c.selected_width(), Some(250));
        assert!(c.select_width_str("-5").is_err());
    }

    #[test]
    fn test_select_drop_str_bounds_label() {
        let mut c = configurator();
        assert!(c.select_drop_str("183cm").is_ok());

        let long = "x".repeat(MAX_DROP_LABEL_LEN + 1);
        assert_eq!(c.select_drop_str(&long), Err(SelectionError::DropTooLong));
        assert_eq!(c.selected_drop(), Some("183cm"));
        assert!(c.select_drop_str(&"x".repeat(MAX_DROP_LABEL_LEN)).is_ok());
    }

    #[test]
    fn test_non_positive_price_shows_placeholder() {
        let mut product = premium_curtains();
        product.metafields.drop_options.push(DropOption {
            value: "clearance".to_string(),
            price_modifier: Decimal::from(-500),
        });
        product.metafields.drop_options.push(DropOption {
            value: "sample".to_string(),
            price_modifier: Decimal::from(-120),
        });
        let mut c = Configurator::new(Arc::new(product), ImageAssets::new(ASSETS));

        c.select_width(100);
        c.select_drop("clearance");
        assert_eq!(c.calculated_price().amount, Decimal::from(-380));
        assert_eq!(c.price_summary(), PriceSummary::Placeholder);
        assert_eq!(c.button_label(), "Add to Cart");
        assert!(c.can_add_to_cart());

        c.select_drop("sample");
        assert_eq!(c.calculated_price().amount, Decimal::ZERO);
        assert_eq!(c.price_summary(), PriceSummary::Placeholder);
        assert_eq!(c.button_label(), "Add to Cart");
    }

    #[test]
    fn test_add_to_cart_without_selection() {
        let c = configurator();
        let log = NoticeLog::new();
        assert_eq!(c.add_to_cart(&log), AddToCartOutcome::NeedsSelection);

        let notices = log.drain();
        assert_eq!(notices.len(), 1);
        let notice = notices.first().unwrap();
        assert_eq!(notice.title, "Please select options");
        assert_eq!(notice.severity, Severity::Destructive);
    }

    #[test]
    fn test_add_to_cart_with_only_width() {
        let mut c = configurator();
        c.select_width(150);
        let log = NoticeLog::new();
        assert_eq!(c.add_to_cart(&log), AddToCartOutcome::NeedsSelection);
        assert!(log.drain().iter().all(|n| n.title != "Added to cart"));
    }

    #[test]
    fn test_add_to_cart_confirmation() {
        let mut c = configurator();
        c.select_width(200);
        c.select_drop("183cm");

        let log = NoticeLog::new();
        assert_eq!(c.add_to_cart(&log), AddToCartOutcome::Added);

        let notices = log.drain();
        let notice = notices.first().unwrap();
        assert_eq!(notice.title, "Added to cart");
        assert_eq!(
            notice.body,
            "Premium Curtain Collection - Width: 200cm, Drop: 183cm ($260.00)"
        );
        assert_eq!(notice.severity, Severity::Default);
        assert_eq!(c.button_label(), "Add to Cart - $260.00");
        assert_eq!(c.price_summary().to_string(), "$260.00");
    }

    #[test]
    fn test_width_selection_starts_image_transition() {
        let mut c = configurator();
        let ticket = c.select_width(200).unwrap();
        assert_eq!(c.image().phase(), Phase::FadingOut);
        assert_eq!(c.image().target().unwrap().key, "curtain-200cm");

        assert!(c.image_mut().fade_out_elapsed(ticket));
        assert_eq!(c.image().shown().unwrap().url, "/static/200.svg");
    }

    #[test]
    fn test_unmapped_image_keeps_current() {
        let mut c = configurator();
        c.select_width(100);
        c.settle_image();
        assert_eq!(c.image().shown().unwrap().key, "curtain-100cm");

        // 150cm and 250cm are not bundled in this table
        assert!(c.select_width(150).is_none());
        c.settle_image();
        assert_eq!(c.image().shown().unwrap().key, "curtain-100cm");

        // Unknown width has no row at all
        assert!(c.select_width(175).is_none());
        assert_eq!(c.image().shown().unwrap().key, "curtain-100cm");
    }

    #[test]
    fn test_drop_change_never_swaps_image() {
        let mut c = configurator();
        c.select_width(300);
        c.settle_image();
        c.select_drop("137cm");
        assert_eq!(c.image().phase(), Phase::Idle);
        assert_eq!(c.image().shown().unwrap().key, "curtain-300cm");
    }

    #[test]
    fn test_unmount_cancels_transition() {
        let mut c = configurator();
        let ticket = c.select_width(100).unwrap();
        c.unmount();
        assert!(!c.is_mounted());
        assert!(!c.image_mut().fade_out_elapsed(ticket));
        assert!(c.image().shown().is_none());
    }
}
