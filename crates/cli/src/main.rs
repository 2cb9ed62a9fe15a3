//! ASN Store CLI - browse the catalog, manage the cart and check out from a
//! terminal.
//!
//! Shares the cart file with the storefront server, so a cart built here
//! shows up in the browser and the other way round.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! asn-cli products --search shoe
//! asn-cli products --category Clothing --sort price-asc
//! asn-cli categories
//!
//! # Cart
//! asn-cli add p1 --quantity 2
//! asn-cli inc p1
//! asn-cli dec p1
//! asn-cli remove p1
//! asn-cli cart
//! asn-cli clear
//!
//! # Checkout
//! asn-cli checkout --name "Asha Rao" --phone 9876543210 --address "12 MG Road"
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io;
use std::path::PathBuf;

use asn_store_core::{Catalog, CheckoutForm, FilterState, SortMode, StoreSession};
use asn_store_storefront::state::load_catalog;
use asn_store_storefront::storage::FileStore;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod surface;

use surface::TextSurface;

#[derive(Parser)]
#[command(name = "asn-cli")]
#[command(author, version, about = "ASN Store terminal front end")]
struct Cli {
    /// JSON file holding the cart
    #[arg(long, global = true, env = "ASN_STORE_PATH", default_value = "asn-store.json")]
    store: PathBuf,

    /// YAML catalog (built-in sample when unset)
    #[arg(long, global = true, env = "ASN_CATALOG_PATH")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products, optionally filtered and sorted
    Products {
        /// Case-insensitive text to look for in title, description and category
        #[arg(short, long, default_value = "")]
        search: String,

        /// Exact category name
        #[arg(short, long, default_value = "")]
        category: String,

        /// Sort order (`price-asc`, `price-desc`)
        #[arg(long, default_value = "")]
        sort: SortMode,
    },
    /// List categories
    Categories,
    /// Show the cart
    Cart,
    /// Add a product to the cart
    Add {
        /// Product id
        id: String,

        /// How many to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Increase a line's quantity by one
    Inc {
        /// Product id
        id: String,
    },
    /// Decrease a line's quantity by one, removing it at zero
    Dec {
        /// Product id
        id: String,
    },
    /// Remove a line from the cart
    Remove {
        /// Product id
        id: String,
    },
    /// Empty the cart
    Clear,
    /// Place a simulated order
    Checkout {
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, default_value = "")]
        phone: String,

        #[arg(long, default_value = "")]
        address: String,
    },
}

fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = match &cli.catalog {
        Some(path) => load_catalog(path)?,
        None => Catalog::sample(),
    };
    let mut session = StoreSession::open(catalog, FileStore::new(cli.store));
    let mut out = TextSurface::new(io::stdout().lock());

    match cli.command {
        Commands::Products {
            search,
            category,
            sort,
        } => commands::catalog::products(
            &mut session,
            FilterState::new(search, category, sort),
            &mut out,
        )?,
        Commands::Categories => commands::catalog::categories(&session, &mut out)?,
        Commands::Cart => commands::cart::show(&session, &mut out)?,
        Commands::Add { id, quantity } => {
            commands::cart::add(&mut session, &id, quantity, &mut out)?;
        }
        Commands::Inc { id } => commands::cart::change(&mut session, &id, 1, &mut out)?,
        Commands::Dec { id } => commands::cart::change(&mut session, &id, -1, &mut out)?,
        Commands::Remove { id } => commands::cart::remove(&mut session, &id, &mut out)?,
        Commands::Clear => commands::cart::clear(&mut session, &mut out)?,
        Commands::Checkout {
            name,
            phone,
            address,
        } => {
            let form = CheckoutForm::new(name, phone, address);
            commands::checkout::submit(&mut session, &form, Utc::now(), &mut out)?;
        }
    }
    Ok(())
}
