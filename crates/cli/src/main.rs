//! Pocketshop CLI - Catalog queries and cart management.
//!
//! # Usage
//!
//! ```bash
//! # List a page of products
//! pocketshop catalog page 1
//!
//! # Show one product
//! pocketshop catalog product 5
//!
//! # Show, add to or remove from the persisted cart
//! pocketshop cart show
//! pocketshop cart add 5
//! pocketshop cart remove 5
//! ```
//!
//! # Commands
//!
//! - `catalog page` - List one page of the catalog
//! - `catalog product` - Show one product
//! - `cart show|add|remove` - Work with the cart stored under `POCKETSHOP_STORAGE_DIR`

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use pocketshop_core::ProductId;
use pocketshop_storefront::catalog::CatalogClient;
use pocketshop_storefront::config::StorefrontConfig;
use pocketshop_storefront::storage::FileStore;

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "pocketshop")]
#[command(author, version, about = "Pocketshop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the catalog API
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List one page of products
    Page {
        /// Page number, starting at 1
        #[arg(default_value_t = 1)]
        page: u32,

        /// Products per page (defaults to `PRODUCTS_PER_PAGE`)
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Show one product
    Product {
        /// Product id
        id: ProductId,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart lines and totals
    Show,
    /// Fetch a product and add it to the cart
    Add {
        /// Product id
        id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product id
        id: ProductId,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pocketshop_cli=info,pocketshop_storefront=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            #[allow(clippy::print_stdout)]
            {
                println!("{output}");
            }
        }
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<String, CommandError> {
    let config = StorefrontConfig::from_env()?;

    match cli.command {
        Commands::Catalog { action } => {
            let catalog = CatalogClient::new(&config.catalog)?;
            match action {
                CatalogAction::Page { page, limit } => {
                    let limit = limit.unwrap_or(config.paging.page_size);
                    commands::catalog::page(&catalog, page, limit).await
                }
                CatalogAction::Product { id } => commands::catalog::product(&catalog, id).await,
            }
        }
        Commands::Cart { action } => {
            let store = FileStore::open(&config.storage_dir)?;
            match action {
                CartAction::Show => commands::cart::show(&store),
                CartAction::Add { id } => {
                    let catalog = CatalogClient::new(&config.catalog)?;
                    commands::cart::add(&catalog, store, id).await
                }
                CartAction::Remove { id } => commands::cart::remove(store, id),
            }
        }
    }
}
