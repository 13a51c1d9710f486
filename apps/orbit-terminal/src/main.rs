//! # Orbit Terminal Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Orbit POS Terminal                               │
//! │                                                                         │
//! │  main.rs ────► parse args, init tracing, exit code                      │
//! │  lib.rs ─────► config, database, state, dispatch                        │
//! │  commands/ ──► list_items, add_to_cart, checkout, transaction_history   │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                         SQLite Database                          │  │
//! │  │  orbit.db (local file, WAL mode)                                 │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use clap::Parser;

use orbit_terminal::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    orbit_terminal::init_tracing();

    match orbit_terminal::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
