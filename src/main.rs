//! Marketplace Cart CLI

use std::{process::ExitCode, sync::Arc};

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::info;

use marketplace_cart::{
    Cart, CartProvider,
    config::CartConfig,
    domain::carts::{
        CartsServiceError,
        models::{CartSummary, NewCartItem, ProductId},
    },
    observability,
    storage::FileStorage,
};

#[derive(Debug, Parser)]
#[command(name = "marketplace-cart", about = "Marketplace shopping cart", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: CartConfig,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the cart lines as JSON
    List,

    /// Add a product with a quantity of one
    Add(AddArgs),

    /// Increase a product's quantity by one
    Increment(ProductArgs),

    /// Decrease a product's quantity by one
    Decrement(ProductArgs),

    /// Remove every line and the stored snapshot
    Clear,

    /// Print line count, quantity and subtotal
    Summary,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Product identifier
    #[arg(long)]
    id: String,

    /// Display name
    #[arg(long)]
    title: String,

    /// Image reference
    #[arg(long)]
    image_url: String,

    /// Unit price
    #[arg(long)]
    price: Decimal,
}

#[derive(Debug, Args)]
struct ProductArgs {
    /// Product identifier
    id: String,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Cart(#[from] CartsServiceError),

    #[error("failed to encode output")]
    Output(#[source] serde_json::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::load() {
        Ok(cli) => cli,
        Err(error) => {
            // Help and version requests also arrive here.
            _ = error.print();

            return if error.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(error) = observability::init(&cli.config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("{error}");
        }

        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            #[expect(clippy::print_stderr, reason = "user-facing error output")]
            {
                eprintln!("{error}");
            }

            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let storage = FileStorage::new(cli.config.storage.storage_dir);

    info!(dir = %storage.dir().display(), "opening cart");

    let provider = CartProvider::from_storage(Arc::new(storage));

    provider.mount().await?;

    let mut cart = provider.use_cart().await?;

    match cli.command {
        Commands::List => {}
        Commands::Add(args) => {
            cart.add_to_cart(NewCartItem {
                id: ProductId::from(args.id),
                title: args.title,
                image_url: args.image_url,
                price: args.price,
            })
            .await?;
        }
        Commands::Increment(args) => cart.increment(&ProductId::from(args.id)).await?,
        Commands::Decrement(args) => cart.decrement(&ProductId::from(args.id)).await?,
        Commands::Clear => cart.clear().await?,
        Commands::Summary => return print_summary(cart.summary()?),
    }

    print_products(&cart)
}

fn print_products(cart: &Cart) -> Result<(), CliError> {
    let output = serde_json::to_string_pretty(cart.products()).map_err(CliError::Output)?;

    #[expect(clippy::print_stdout, reason = "command output")]
    {
        println!("{output}");
    }

    Ok(())
}

fn print_summary(summary: CartSummary) -> Result<(), CliError> {
    #[expect(clippy::print_stdout, reason = "command output")]
    {
        println!("lines: {}", summary.lines);
        println!("quantity: {}", summary.quantity);
        println!("subtotal: {}", summary.subtotal);
    }

    Ok(())
}
