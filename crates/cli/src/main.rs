//! Storefront Cart CLI - Inspect and edit a file-backed cart.
//!
//! # Usage
//!
//! ```bash
//! # Add two mugs at $10
//! cart-cli add Mug --price 10 --quantity 2
//!
//! # Set the quantity of an item (0 removes it)
//! cart-cli update Mug 3
//!
//! # Show the checkout summary
//! cart-cli show
//!
//! # Remove an item, or everything
//! cart-cli remove Mug
//! cart-cli clear
//! ```
//!
//! # Environment Variables
//!
//! - `CART_STORAGE_DIR` - Directory holding the cart file (default: .cart)
//! - `CART_STORAGE_KEY` - Cart slot name (default: cart)
//! - `CART_PERSIST` - `false` to run without touching disk
//! - `RUST_LOG` - Log filter (default: `cart_cli=info,storefront_cart=warn`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use storefront_cart::CartConfig;

mod commands;

#[derive(Parser)]
#[command(name = "cart-cli")]
#[command(author, version, about = "Storefront cart tools")]
struct Cli {
    /// Override the storage directory (`CART_STORAGE_DIR`)
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a product to the cart
    Add {
        /// Product name
        name: String,

        /// Unit price, e.g. 9.99
        #[arg(short, long)]
        price: String,

        /// Number of units
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Image reference
        #[arg(short, long)]
        image: Option<String>,
    },
    /// Remove a product from the cart
    Remove {
        /// Product name
        name: String,
    },
    /// Set a product's quantity (0 removes it)
    Update {
        /// Product name
        name: String,

        /// New number of units
        quantity: u32,
    },
    /// Remove every product
    Clear,
    /// Show the checkout summary
    Show,
    /// Show the cart total
    Total,
}

fn main() {
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cart_cli=info,storefront_cart=warn".into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CartConfig::from_env()?;
    if let Some(dir) = cli.storage_dir {
        config.storage_dir = dir;
    }

    let cart = commands::cart::open(&config);

    match cli.command {
        Commands::Add {
            name,
            price,
            quantity,
            image,
        } => commands::cart::add(&cart, &name, price, quantity, image)?,
        Commands::Remove { name } => commands::cart::remove(&cart, &name)?,
        Commands::Update { name, quantity } => commands::cart::update(&cart, &name, quantity)?,
        Commands::Clear => commands::cart::clear(&cart)?,
        Commands::Show => commands::cart::show(&cart),
        Commands::Total => commands::cart::total(&cart),
    }
    Ok(())
}
