//! Kivio CLI - Operator tools for merchant storefronts.
//!
//! Resolves a merchant's storefront credentials from an integrations file,
//! then runs one storefront operation and prints the result as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Check that a point of sale resolves to a storefront
//! kivio-cli -i integrations.json -p pos-1 credentials
//!
//! # List the first page of sellable items
//! kivio-cli -i integrations.json -p pos-1 items list --page 1 --limit 20
//!
//! # Fetch one item by catalog id
//! kivio-cli -i integrations.json -p pos-1 items get 'kivio-ecommerce∼42'
//!
//! # Create an order from a JSON file
//! kivio-cli -i integrations.json -p pos-1 orders create --data-file order.json
//! ```
//!
//! # Environment Variables
//!
//! - `ECOMMERCE_REQUEST_TIMEOUT_SECS` - Request timeout in seconds (default: 30)
//! - `ECOMMERCE_INTEGRATION_TYPE` - Registry type tag of storefront integrations
//! - `RUST_LOG` - Log filter (default: `kivio_ecommerce_client=info,kivio_cli=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use kivio_ecommerce_core::{CustomerId, OrderId, OrderItemId};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "kivio-cli")]
#[command(author, version, about = "Kivio storefront operator tools")]
struct Cli {
    /// JSON file holding an array of integrations
    #[arg(short, long)]
    integrations: PathBuf,

    /// Point-of-sale id whose storefront to use
    #[arg(short, long)]
    pos_id: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve and show storefront credentials (token redacted)
    Credentials,
    /// Catalog items
    Items {
        #[command(subcommand)]
        action: ItemsAction,
    },
    /// Stock levels
    Stock {
        #[command(subcommand)]
        action: StockAction,
    },
    /// Customers
    Customers {
        #[command(subcommand)]
        action: CustomersAction,
    },
    /// Customer addresses
    Addresses {
        #[command(subcommand)]
        action: AddressesAction,
    },
    /// Shopping carts
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Stores
    Stores {
        #[command(subcommand)]
        action: StoresAction,
    },
}

#[derive(Subcommand)]
enum ItemsAction {
    /// List one page of items
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 20)]
        limit: u32,

        /// Filter by product name (returns storefront records unmapped)
        #[arg(long)]
        name: Option<String>,

        /// Print storefront records instead of mapped items
        #[arg(long)]
        raw: bool,
    },
    /// Sweep the whole catalog
    All {
        /// Print storefront records instead of mapped items
        #[arg(long)]
        raw: bool,
    },
    /// Get one item by catalog or raw id
    Get {
        id: String,

        /// Print the storefront record instead of the mapped item
        #[arg(long)]
        raw: bool,
    },
    /// Count published items
    Count {
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Subcommand)]
enum StockAction {
    /// Set the stock quantity of an item
    Set {
        /// Catalog or raw item id
        id: String,

        quantity: i64,
    },
}

#[derive(Subcommand)]
enum CustomersAction {
    /// List customers
    List {
        #[arg(long)]
        raw: bool,
    },
    /// Get a customer by id
    Get { id: String },
    /// Create a customer
    Create(Payload),
}

#[derive(Subcommand)]
enum AddressesAction {
    /// Create a billing address
    Billing {
        #[arg(long)]
        customer_id: CustomerId,

        #[command(flatten)]
        payload: Payload,
    },
    /// Create a shipping address
    Shipping {
        #[arg(long)]
        customer_id: CustomerId,

        #[command(flatten)]
        payload: Payload,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add an item to a cart
    Add(Payload),
    /// Empty a customer's cart
    Clear {
        #[arg(long)]
        customer_id: CustomerId,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List orders
    List,
    /// Create an order
    Create(Payload),
    /// Update an order
    Update {
        #[arg(long)]
        order_id: OrderId,

        #[command(flatten)]
        payload: Payload,
    },
    /// Update the price of one order line
    UpdateItem {
        #[arg(long)]
        order_id: OrderId,

        #[arg(long)]
        item_id: OrderItemId,

        #[command(flatten)]
        payload: Payload,
    },
}

#[derive(Subcommand)]
enum StoresAction {
    /// List stores
    List,
}

/// Request body, given inline or as a file.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct Payload {
    /// JSON body
    #[arg(long)]
    data: Option<String>,

    /// File holding the JSON body
    #[arg(long)]
    data_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries command output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kivio_ecommerce_client=info,kivio_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = commands::Context::connect(&cli.integrations, &cli.pos_id).await?;

    match cli.command {
        Commands::Credentials => commands::show_credentials(&ctx)?,
        Commands::Items { action } => match action {
            ItemsAction::List {
                page,
                limit,
                name,
                raw,
            } => commands::catalog::list(&ctx, page, limit, name, raw).await?,
            ItemsAction::All { raw } => commands::catalog::all(&ctx, raw).await?,
            ItemsAction::Get { id, raw } => commands::catalog::get(&ctx, &id, raw).await?,
            ItemsAction::Count { name } => commands::catalog::count(&ctx, name).await?,
        },
        Commands::Stock { action } => match action {
            StockAction::Set { id, quantity } => {
                commands::catalog::set_stock(&ctx, &id, quantity).await?;
            }
        },
        Commands::Customers { action } => match action {
            CustomersAction::List { raw } => commands::customers::list(&ctx, raw).await?,
            CustomersAction::Get { id } => commands::customers::get(&ctx, &id).await?,
            CustomersAction::Create(payload) => {
                let body = payload.read().await?;
                commands::customers::create(&ctx, &body).await?;
            }
        },
        Commands::Addresses { action } => match action {
            AddressesAction::Billing {
                customer_id,
                payload,
            } => {
                let body = payload.read().await?;
                commands::customers::create_billing_address(&ctx, customer_id, &body).await?;
            }
            AddressesAction::Shipping {
                customer_id,
                payload,
            } => {
                let body = payload.read().await?;
                commands::customers::create_shipping_address(&ctx, customer_id, &body).await?;
            }
        },
        Commands::Cart { action } => match action {
            CartAction::Add(payload) => {
                let body = payload.read().await?;
                commands::orders::add_cart_item(&ctx, &body).await?;
            }
            CartAction::Clear { customer_id } => {
                commands::customers::clear_cart(&ctx, customer_id).await?;
            }
        },
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list(&ctx).await?,
            OrdersAction::Create(payload) => {
                let body = payload.read().await?;
                commands::orders::create(&ctx, &body).await?;
            }
            OrdersAction::Update { order_id, payload } => {
                let body = payload.read().await?;
                commands::orders::update(&ctx, order_id, &body).await?;
            }
            OrdersAction::UpdateItem {
                order_id,
                item_id,
                payload,
            } => {
                let body = payload.read().await?;
                commands::orders::update_item_price(&ctx, order_id, item_id, &body).await?;
            }
        },
        Commands::Stores { action } => match action {
            StoresAction::List => commands::orders::list_stores(&ctx).await?,
        },
    }
    Ok(())
}

impl Payload {
    async fn read(self) -> Result<Vec<u8>, commands::CommandError> {
        match (self.data, self.data_file) {
            (Some(data), _) => Ok(data.into_bytes()),
            (None, Some(path)) => tokio::fs::read(&path)
                .await
                .map_err(|source| commands::CommandError::Payload { path, source }),
            (None, None) => Err(commands::CommandError::MissingPayload),
        }
    }
}
