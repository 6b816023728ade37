//! Clave Compás CLI - Catalog inspection and admin tools.
//!
//! # Usage
//!
//! ```bash
//! # List a page of products (one-based)
//! cc-cli products list --page 2
//!
//! # Show one product, with fallback features filled in
//! cc-cli products show 14
//!
//! # Dump the backend's category list
//! cc-cli categories
//!
//! # Create a product
//! cc-cli admin create --name "Viola 4/4" --description "Estudio" \
//!     --price 320.00 --stock 4 --category 1 --image https://img.example/viola.jpg
//!
//! # Move a product to another category
//! cc-cli admin set-category 14 3
//!
//! # Disable a product
//! cc-cli admin disable 14
//! ```
//!
//! All commands read `CLAVE_API_URL` (from the environment or `.env`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use clave_compas_core::{CategoryId, Price, ProductId};

mod commands;

#[derive(Parser)]
#[command(name = "cc-cli")]
#[command(author, version, about = "Clave & Compás CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read products from the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Print the catalog's category list
    Categories,
    /// Catalog admin mutations
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List one page of products
    List {
        /// One-based page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Show a single product
    Show {
        /// Product ID
        id: ProductId,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new product
    Create {
        #[arg(short, long)]
        name: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Price, e.g. 1299.90
        #[arg(short, long)]
        price: Price,

        #[arg(short, long, default_value_t = 0)]
        stock: u32,

        /// Category ID (1-5)
        #[arg(short, long)]
        category: CategoryId,

        /// Image URL; repeat for more images, primary first
        #[arg(short, long = "image")]
        images: Vec<String>,
    },
    /// Move a product to another category
    SetCategory {
        id: ProductId,
        category: CategoryId,
    },
    /// Disable a product
    Disable { id: ProductId },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let client = commands::client()?;

    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List { page } => commands::products::list(&client, page).await?,
            ProductsAction::Show { id } => commands::products::show(&client, id).await?,
        },
        Commands::Categories => commands::products::categories(&client).await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                name,
                description,
                price,
                stock,
                category,
                images,
            } => {
                let product = commands::admin::new_product(
                    name,
                    description,
                    price,
                    stock,
                    category,
                    images,
                )?;
                commands::admin::create(&client, &product).await?;
            }
            AdminAction::SetCategory { id, category } => {
                commands::admin::set_category(&client, id, category).await?;
            }
            AdminAction::Disable { id } => commands::admin::disable(&client, id).await?,
        },
    }
    Ok(())
}
