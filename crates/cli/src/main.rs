//! CapsuleHaus CLI - Seeding and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Seed the catalog fixture into the data dir
//! caps-cli seed products
//!
//! # Seed the default page content
//! caps-cli seed content
//!
//! # Seed everything, overwriting existing data
//! caps-cli seed all --force
//!
//! # Print order statistics
//! caps-cli orders stats
//! ```
//!
//! # Commands
//!
//! - `seed` - Write the 30-model catalog fixture and/or default page content
//! - `orders stats` - Print revenue (cancelled excluded) and order count

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "caps-cli")]
#[command(author, version, about = "CapsuleHaus CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the data directory with fixture data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Inspect the order ledger
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Seed the 30-model product catalog
    Products {
        /// Overwrite an existing catalog
        #[arg(long)]
        force: bool,
    },
    /// Seed the default page blocks and content
    Content {
        /// Overwrite existing page content
        #[arg(long)]
        force: bool,
    },
    /// Seed products and content
    All {
        /// Overwrite existing data
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// Print revenue and order count
    Stats,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Seed { target } => match target {
            SeedTarget::Products { force } => commands::seed::products(force)?,
            SeedTarget::Content { force } => commands::seed::content(force)?,
            SeedTarget::All { force } => {
                commands::seed::products(force)?;
                commands::seed::content(force)?;
            }
        },
        Commands::Orders { action } => match action {
            OrdersAction::Stats => commands::stats::orders()?,
        },
    }
    Ok(())
}
