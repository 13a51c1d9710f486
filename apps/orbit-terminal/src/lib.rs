//! # Orbit Terminal Library
//!
//! Core library for the Orbit POS register terminal.
//! `main.rs` parses the command line and hands it to [`run`].
//!
//! ## Module Organization
//! ```text
//! orbit_terminal/
//! ├── lib.rs          ◄─── You are here (startup & dispatch)
//! ├── cli.rs          ◄─── clap definitions, text rendering
//! ├── backend.rs      ◄─── CatalogBackend / TransactionLog / CustomerRegistry
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── config.rs   ◄─── terminal.toml + ORBIT_* overrides
//! │   ├── session.rs  ◄─── Cart + customer of the sale in progress
//! │   └── catalog.rs  ◄─── In-memory catalog snapshot
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports, receipt assembly
//! │   ├── catalog.rs  ◄─── Item grid, combo list, combo editor
//! │   ├── cart.rs     ◄─── Cart manipulation
//! │   ├── checkout.rs ◄─── Customer registration, checkout
//! │   └── history.rs  ◄─── History, reprint, export
//! ├── export.rs       ◄─── CSV writer
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Load config ─── defaults → terminal.toml → ORBIT_* env → validate  │
//! │  2. Open database ─ SQLite (WAL), pending migrations applied            │
//! │  3. Build state ─── SessionState (user, role, branch), CatalogState     │
//! │  4. Load catalog ── products, combos, branches into the snapshot        │
//! │  5. Dispatch ────── one subcommand, then exit                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod backend;
pub mod cli;
pub mod commands;
pub mod error;
pub mod export;
pub mod state;

use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use backend::BackendError;
use cli::{Cli, Command, RECEIPT_WIDTH};
use commands::{cart, catalog, checkout, history};
use error::ApiError;
use orbit_core::{HistoryQuery, Receipt};
use orbit_db::{Database, DbConfig};
use state::{CatalogState, SessionState, TerminalConfig};

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,orbit=debug,sqlx=warn";

/// Initializes tracing. Logs go to stderr so command output stays clean.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

/// Everything a command needs, built once at startup.
struct Terminal {
    config: TerminalConfig,
    db: Database,
    session: SessionState,
    catalog: CatalogState,
    json: bool,
}

/// Runs one terminal command.
pub async fn run(cli: Cli) -> Result<(), ApiError> {
    let config = TerminalConfig::load(cli.config)?;
    let db_path = config.database_path()?;
    info!(
        store = %config.store.name,
        user = %config.session.user_id,
        role = ?config.session.role,
        branch = ?config.session.branch_id,
        database = %db_path.display(),
        "Orbit terminal starting"
    );

    let db = Database::new(DbConfig::new(db_path))
        .await
        .map_err(BackendError::from)?;

    let session = SessionState::new(config.session_context());
    let catalog = CatalogState::new();
    catalog.refresh(&db).await?;

    let terminal = Terminal {
        config,
        db,
        session,
        catalog,
        json: cli.json,
    };

    let result = dispatch(&terminal, cli.command).await;
    terminal.db.close().await;
    result
}

async fn dispatch(t: &Terminal, command: Command) -> Result<(), ApiError> {
    let symbol = t.config.store.currency_symbol.as_str();

    match command {
        Command::Items { search } => {
            let items = catalog::list_items(&t.session, &t.catalog, &search).await?;
            emit(t.json, &items, |items| cli::render_items(items, symbol))
        }

        Command::Combos { search } => {
            let combos = catalog::list_combos(&t.session, &t.catalog, &search).await?;
            emit(t.json, &combos, |combos| cli::render_combos(combos, symbol))
        }

        Command::Sell {
            items,
            customer_name,
            customer_phone,
            customer_email,
            payment,
        } => {
            for key in &items {
                cart::add_to_cart(&t.session, &t.catalog, key).await?;
            }

            if let (Some(name), Some(phone)) = (customer_name, customer_phone) {
                checkout::register_customer(
                    &t.session,
                    &t.db,
                    &name,
                    &phone,
                    customer_email.as_deref(),
                )
                .await?;
            }

            let done = checkout::checkout(
                &t.session,
                &t.catalog,
                &t.db,
                &t.config.store,
                &t.config.checkout,
                payment,
            )
            .await?;
            emit(t.json, &done, |done| done.receipt.render_text(RECEIPT_WIDTH))
        }

        Command::History {
            scope,
            search,
            branch,
        } => {
            let query = HistoryQuery {
                branch_id: branch,
                scope,
                search,
            };
            let response = history::transaction_history(&t.session, &t.db, query).await?;
            emit(t.json, &response, |r| cli::render_history(r, symbol))
        }

        Command::Reprint { id, share } => {
            let receipt =
                history::reprint_transaction(&t.session, &t.catalog, &t.db, &t.config.store, &id)
                    .await?;
            emit(t.json, &receipt, |r| render_receipt(r, share))
        }

        Command::Export {
            output,
            scope,
            search,
            branch,
        } => {
            let dir = std::env::current_dir()
                .map_err(|e| ApiError::internal(format!("No working directory: {}", e)))?;
            let query = HistoryQuery {
                branch_id: branch,
                scope,
                search,
            };
            let (path, rows) = history::export_history(
                &t.session,
                &t.db,
                &t.config.store,
                query,
                output,
                &dir,
            )
            .await?;
            println!("Exported {} transactions to {}", rows, path.display());
            Ok(())
        }
    }
}

fn render_receipt(receipt: &Receipt, share: bool) -> String {
    let mut text = receipt.render_text(RECEIPT_WIDTH);
    if share {
        text.push('\n');
        text.push_str(&receipt.share_text());
        text.push('\n');
    }
    text
}

/// Prints `value` as JSON or through its text rendering.
fn emit<T, F>(json: bool, value: &T, text: F) -> Result<(), ApiError>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    if json {
        let out = serde_json::to_string_pretty(value)
            .map_err(|e| ApiError::internal(format!("JSON encoding failed: {}", e)))?;
        println!("{}", out);
    } else {
        print!("{}", text(value));
    }
    Ok(())
}
