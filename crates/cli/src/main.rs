//! Drape CLI - catalog checks and price quotes.
//!
//! # Usage
//!
//! ```bash
//! # Report data issues in a product file (exit status 1 if any)
//! drape-cli catalog check crates/storefront/content/products/curtain-001.json
//!
//! # Print the width and drop tables
//! drape-cli catalog show
//!
//! # Price one selection
//! drape-cli quote --width 200 --drop 183cm
//! ```
//!
//! # Commands
//!
//! - `catalog check` - Validate a product record
//! - `catalog show` - Print pricing and drop tables
//! - `quote` - Run the configurator for one selection

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::DEFAULT_PRODUCT_PATH;

#[derive(Parser)]
#[command(name = "drape-cli")]
#[command(author, version, about = "Drape CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect product records
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Price a width and drop selection
    Quote {
        /// Width in centimetres
        #[arg(short, long)]
        width: u32,

        /// Drop label, e.g. 183cm
        #[arg(short, long)]
        drop: String,

        /// Product JSON file
        #[arg(default_value = DEFAULT_PRODUCT_PATH)]
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Report every data issue in a product file
    Check {
        /// Product JSON file
        #[arg(default_value = DEFAULT_PRODUCT_PATH)]
        path: PathBuf,
    },
    /// Print the width and drop tables
    Show {
        /// Product JSON file
        #[arg(default_value = DEFAULT_PRODUCT_PATH)]
        path: PathBuf,

        /// Print the metafields as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Check { path } => commands::catalog::check(&path),
            CatalogAction::Show { path, json } => commands::catalog::show(&path, json),
        },
        Commands::Quote { width, drop, path } => commands::quote::run(&path, width, &drop),
    }
}
