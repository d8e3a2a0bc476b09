//! Drape Core - Catalog types and configurator logic.
//!
//! This crate provides everything the curtain configurator needs that is not
//! tied to HTTP:
//! - `storefront` - Server-rendered product page driving a [`Configurator`]
//! - `cli` - Catalog checks and price quotes from the command line
//!
//! # Architecture
//!
//! The core crate contains only types and pure state machines - no I/O, no
//! HTTP, no timers. Delays and notifications are modelled as inputs and
//! traits so callers decide how they are driven.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs and prices
//! - [`catalog`] - Product records, pricing table, drop options
//! - [`configurator`] - Selection state and price derivation
//! - [`notice`] - Shopper-facing notices and the [`Notifier`] contract
//! - [`assets`] - Bundled image lookup
//! - [`transition`] - Two-stage image fade state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod assets;
pub mod catalog;
pub mod configurator;
pub mod notice;
pub mod transition;
pub mod types;

pub use assets::{ImageAsset, ImageAssets};
pub use catalog::{CatalogError, CatalogIssue, DropOption, Metafields, PricingEntry, Product};
pub use configurator::{Configurator, ConfiguratorState, SelectionError};
pub use notice::{Notice, NoticeLog, Notifier, Severity};
pub use transition::ImageTransition;
pub use types::*;
