//! # KarU Terminal Library
//!
//! Core library for the KarU POS terminal front-end.
//!
//! ## Module Organization
//! ```text
//! karu_terminal/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── cli.rs          ◄─── Arguments
//! ├── console.rs      ◄─── Interactive sale session
//! ├── render.rs       ◄─── Text layouts
//! ├── state/
//! │   ├── backend.rs  ◄─── Local or remote PosStore
//! │   ├── catalog.rs  ◄─── Loaded products and customers
//! │   ├── cart.rs     ◄─── Sale session (cart, customer, payment)
//! │   └── config.rs   ◄─── Layered configuration
//! ├── commands/
//! │   ├── catalog.rs  ◄─── Sales screen loads
//! │   ├── cart.rs     ◄─── Cart manipulation
//! │   ├── sale.rs     ◄─── Checkout commit sequence
//! │   └── dashboard.rs◄─── Dashboard aggregation
//! └── error.rs        ◄─── ApiError and notices
//! ```

pub mod cli;
pub mod commands;
pub mod console;
pub mod error;
pub mod render;
pub mod state;

use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use directories::ProjectDirs;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use console::SaleContext;
use state::{Backend, BackendKind, CartState, CatalogState, ConfigState};

/// Runs one CLI invocation.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter                                │
/// │     • Default: info,karu=debug,sqlx=warn; override with RUST_LOG        │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → config.toml → KARU_* environment                       │
/// │                                                                         │
/// │  3. Connect Backend ──────────────────────────────────────────────────► │
/// │     • local: SQLite with WAL, pending migrations applied                │
/// │     • remote: PostgREST client                                          │
/// │                                                                         │
/// │  4. Run the Screen ───────────────────────────────────────────────────► │
/// │     • dashboard / products / customers print once                       │
/// │     • sale reads commands from stdin                                    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    init_tracing();
    info!(command = ?cli.command, "Starting KarU POS terminal");

    let config = ConfigState::load(cli.config.as_deref()).context("loading configuration")?;
    let db_path = local_database_path(cli.db, &config, default_database_path)?;

    let backend = Backend::connect(&config.backend, db_path)
        .await
        .context("connecting to the store backend")?;
    info!(kind = ?backend.kind(), "Backend ready");

    let result = run_screen(cli.command, &backend, &config).await;

    if let Backend::Local(db) = &backend {
        db.close().await;
    }
    result
}

async fn run_screen(command: Command, backend: &Backend, config: &ConfigState) -> anyhow::Result<()> {
    match command {
        Command::Dashboard => {
            let dashboard = commands::dashboard::load_dashboard(backend, config, Utc::now()).await?;
            print!("{}", render::dashboard(&dashboard, config));
        }
        Command::Products => {
            let products = commands::catalog::list_products(backend).await?;
            print!("{}", render::products(&products, config));
        }
        Command::Customers => {
            let customers = commands::catalog::list_customers(backend, config).await?;
            print!("{}", render::customers(&customers, config));
        }
        Command::Sale => {
            let catalog = CatalogState::new();
            let cart = CartState::new();
            commands::catalog::load_sales_screen(backend, &catalog, config).await?;

            let ctx = SaleContext {
                store: backend,
                catalog: &catalog,
                cart: &cart,
                config,
            };
            let stdin = BufReader::new(tokio::io::stdin());
            console::run_sale_session(&ctx, stdin, &mut std::io::stdout()).await?;
        }
    }
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so screen output stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,karu=debug,sqlx=warn"));

    // try_init: a second call (tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Database file for the local backend: `--db`, then the config file,
/// then `fallback`. The remote backend needs none, so `fallback` is not
/// consulted and no directory is created.
fn local_database_path(
    cli_db: Option<PathBuf>,
    config: &ConfigState,
    fallback: impl FnOnce() -> anyhow::Result<PathBuf>,
) -> anyhow::Result<Option<PathBuf>> {
    if config.backend.kind != BackendKind::Local {
        return Ok(None);
    }
    match cli_db.or_else(|| config.backend.database_path.clone()) {
        Some(path) => Ok(Some(path)),
        None => fallback().map(Some),
    }
}

/// Platform database location.
///
/// - **macOS**: `~/Library/Application Support/com.karu.pos/karu.db`
/// - **Windows**: `%APPDATA%\karu\pos\data\karu.db`
/// - **Linux**: `~/.local/share/pos/karu.db`
fn default_database_path() -> anyhow::Result<PathBuf> {
    let dirs = ProjectDirs::from("com", "karu", "pos")
        .context("could not determine app data directory")?;
    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("creating {}", data_dir.display()))?;

    Ok(data_dir.join("karu.db"))
}
