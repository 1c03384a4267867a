//! GotoTech CLI - Database management and a terminal cart.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! gt-cli migrate
//!
//! # Load the sample catalog into the products table
//! gt-cli seed
//!
//! # Work with a cart kept in a JSON file
//! gt-cli cart add 1
//! gt-cli cart update 1 -1
//! gt-cli --file my-cart.json cart show
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the catalog
//! - `cart` - Show or change the terminal cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod storage;

/// Default cart file, relative to the working directory.
const DEFAULT_CART_FILE: &str = "gototech-cart.json";

#[derive(Parser)]
#[command(name = "gt-cli")]
#[command(author, version, about = "GotoTech CLI tools")]
struct Cli {
    /// Cart file used by the `cart` commands
    #[arg(long, global = true, default_value = DEFAULT_CART_FILE)]
    file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Seed the products table with the sample catalog
    Seed,
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart listing, count, and total
    Show,
    /// Add one unit of a sample product
    Add {
        /// Product id
        id: String,
    },
    /// Remove a line item
    Remove {
        /// Product id
        id: String,
    },
    /// Adjust a line's quantity
    Update {
        /// Product id
        id: String,
        /// Quantity change, e.g. 1 or -1
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Seed => commands::seed::catalog().await?,
        Commands::Cart { action } => {
            let file = cli.file;
            let output = match action {
                CartAction::Show => commands::cart::show(&file),
                CartAction::Add { id } => commands::cart::add(&file, &id)?,
                CartAction::Remove { id } => commands::cart::remove(&file, &id)?,
                CartAction::Update { id, delta } => commands::cart::update(&file, &id, delta)?,
                CartAction::Clear => commands::cart::clear(&file)?,
            };

            #[allow(clippy::print_stdout)]
            {
                print!("{output}");
            }
        }
    }
    Ok(())
}
