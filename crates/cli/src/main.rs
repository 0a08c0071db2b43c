//! Doceria CLI - terminal front-end for the bakery ordering backend.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! doceria catalog produtos
//! doceria catalog kits
//!
//! # Build a cart (persisted across runs)
//! doceria cart add 3 --qty 2
//! doceria cart add 1 --kind kit
//! doceria cart list
//!
//! # Log in and order
//! doceria auth login -e maria@example.com -p 's3nha123'
//! doceria order checkout --payment pix
//! doceria account dashboard
//! ```
//!
//! Configuration comes from the environment (`DOCERIA_API_URL`,
//! `DOCERIA_STORAGE_PATH`, `DOCERIA_HTTP_TIMEOUT_SECS`), with a `.env` file
//! honored when present.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use doceria_client::state::AppState;
use doceria_core::{Email, FormaPagamento, ItemKind, PedidoStatus, TipoEntrega};

mod commands;

#[derive(Parser)]
#[command(name = "doceria")]
#[command(author, version, about = "Doceria ordering CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse categorias, produtos and kits
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the local shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Log in, log out and manage credentials
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Account dashboard, profile and payments
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Place and track pedidos
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Send an event inquiry to the bakery
    Contato(ContatoArgs),
    /// Management helpers (require a staff login)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List categorias
    Categorias,
    /// List produtos
    Produtos,
    /// List kits
    Kits,
    /// Show one produto
    Produto { id: i32 },
    /// Show one kit
    Kit { id: i32 },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a produto or kit to the cart
    Add {
        /// Catalog id of the item
        id: i32,
        /// Item kind (`produto` or `kit`)
        #[arg(long, default_value = "produto")]
        kind: ItemKind,
        /// Quantity to add
        #[arg(long, default_value_t = 1)]
        qty: u32,
    },
    /// Remove an item from the cart
    Remove {
        id: i32,
        #[arg(long, default_value = "produto")]
        kind: ItemKind,
    },
    /// Overwrite an item's quantity (0 removes it)
    SetQty {
        id: i32,
        #[arg(long, default_value = "produto")]
        kind: ItemKind,
        #[arg(long)]
        qty: u32,
    },
    /// Show the cart
    List,
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum AuthAction {
    /// Authenticate and persist the session
    Login {
        #[arg(short, long)]
        email: Email,
        #[arg(short, long, env = "DOCERIA_PASSWORD")]
        password: String,
    },
    /// Clear the persisted session
    Logout,
    /// Create an account
    Register {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: Email,
        #[arg(short, long, env = "DOCERIA_PASSWORD")]
        password: String,
    },
    /// Show the current login state
    Whoami,
    /// Change the account password
    ChangePassword {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Profile, order statistics and recent pedidos
    Dashboard,
    /// Update the customer profile
    Update(ProfileArgs),
    /// List payments
    Pagamentos,
    /// Show one payment
    Pagamento { id: i32 },
    /// Show a payment's status history
    Historico { id: i32 },
}

#[derive(Args, Default)]
struct ProfileArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    number: Option<String>,
    #[arg(long)]
    neighborhood: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    postal_code: Option<String>,
}

#[derive(Subcommand)]
enum OrderAction {
    /// Turn the cart into a pedido
    Checkout(CheckoutArgs),
    /// List your pedidos
    List,
    /// Show one pedido
    Show { id: i32 },
    /// Look a pedido up by its number
    Track { numero: String },
}

#[derive(Args, Default)]
struct CheckoutArgs {
    /// `entrega` or `retirada`
    #[arg(long, default_value = "entrega")]
    delivery: TipoEntrega,
    /// Desired delivery date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<String>,
    /// Desired delivery time (HH:MM)
    #[arg(long)]
    time: Option<String>,
    /// Payment method
    #[arg(long)]
    payment: Option<FormaPagamento>,
    /// Change for (cash payments)
    #[arg(long)]
    change_for: Option<Decimal>,
    /// Free-form note for the bakery
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Args)]
struct ContatoArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: Email,
    #[arg(long)]
    phone: Option<String>,
    /// Number of guests
    #[arg(long)]
    people: Option<u32>,
    /// Kind of event (aniversário, casamento, corporativo...)
    #[arg(long)]
    event: Option<String>,
    /// Event date
    #[arg(long)]
    date: Option<String>,
    /// Event venue
    #[arg(long)]
    venue: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a categoria
    AddCategoria { name: String },
    /// Create a produto
    AddProduto {
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: Decimal,
        #[arg(long)]
        categoria_id: i32,
        #[arg(long)]
        description: Option<String>,
    },
    /// List pedidos across clientes
    Pedidos {
        #[arg(long, default_value_t = 0)]
        skip: u32,
        #[arg(long, default_value_t = 100)]
        limit: u32,
        #[arg(long)]
        status: Option<PedidoStatus>,
        #[arg(long)]
        cliente_id: Option<i32>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing; RUST_LOG overrides the default level.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::from_env()?;

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Categorias => commands::catalog::categorias(&state).await?,
            CatalogAction::Produtos => commands::catalog::produtos(&state).await?,
            CatalogAction::Kits => commands::catalog::kits(&state).await?,
            CatalogAction::Produto { id } => commands::catalog::produto(&state, id).await?,
            CatalogAction::Kit { id } => commands::catalog::kit(&state, id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Add { id, kind, qty } => commands::cart::add(&state, id, kind, qty).await?,
            CartAction::Remove { id, kind } => commands::cart::remove(&state, id, kind)?,
            CartAction::SetQty { id, kind, qty } => {
                commands::cart::set_qty(&state, id, kind, qty)?;
            }
            CartAction::List => commands::cart::list(&state),
            CartAction::Clear => commands::cart::clear(&state)?,
        },
        Commands::Auth { action } => match action {
            AuthAction::Login { email, password } => {
                commands::auth::login(&state, email.as_str(), &password).await?;
            }
            AuthAction::Logout => commands::auth::logout(&state)?,
            AuthAction::Register {
                name,
                email,
                password,
            } => commands::auth::register(&state, &name, email.as_str(), &password).await?,
            AuthAction::Whoami => commands::auth::whoami(&state),
            AuthAction::ChangePassword { current, new } => {
                commands::auth::change_password(&state, &current, &new).await?;
            }
        },
        Commands::Account { action } => match action {
            AccountAction::Dashboard => commands::account::dashboard(&state).await?,
            AccountAction::Update(args) => commands::account::update(&state, args).await?,
            AccountAction::Pagamentos => commands::account::pagamentos(&state).await?,
            AccountAction::Pagamento { id } => commands::account::pagamento(&state, id).await?,
            AccountAction::Historico { id } => commands::account::historico(&state, id).await?,
        },
        Commands::Order { action } => match action {
            OrderAction::Checkout(args) => commands::order::checkout(&state, args).await?,
            OrderAction::List => commands::order::list(&state).await?,
            OrderAction::Show { id } => commands::order::show(&state, id).await?,
            OrderAction::Track { numero } => commands::order::track(&state, &numero).await?,
        },
        Commands::Contato(args) => commands::contato::send(&state, args).await?,
        Commands::Admin { action } => match action {
            AdminAction::AddCategoria { name } => {
                commands::admin::add_categoria(&state, &name).await?;
            }
            AdminAction::AddProduto {
                name,
                price,
                categoria_id,
                description,
            } => {
                commands::admin::add_produto(&state, &name, price, categoria_id, description)
                    .await?;
            }
            AdminAction::Pedidos {
                skip,
                limit,
                status,
                cliente_id,
            } => commands::admin::pedidos(&state, skip, limit, status, cliente_id).await?,
        },
    }
    Ok(())
}
