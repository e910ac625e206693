//! Kanban backend (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌────────────────────────────────────────────────┐
//!                          │                KANBAN BACKEND                   │
//!                          │                                                 │
//!   Client Request         │  ┌──────────┐   ┌──────────┐   ┌────────────┐  │
//!   ───────────────────────┼─▶│  cors +  │──▶│ request  │──▶│ completion │  │
//!                          │  │  trace   │   │   id     │   │  tracking  │  │
//!                          │  └──────────┘   └──────────┘   └─────┬──────┘  │
//!                          │                                      ▼         │
//!                          │  ┌──────────┐   ┌──────────┐   ┌────────────┐  │
//!   Client Response        │  │  routes  │◀──│ timeout  │◀──│  request   │  │
//!   ◀──────────────────────┼──│ fallback │   │(optional)│   │    log     │  │
//!                          │  └──────────┘   └──────────┘   └────────────┘  │
//!                          │                                                 │
//!                          │   LogRecord JSON lines ─▶ stdout                │
//!                          │   tracing diagnostics  ─▶ stderr                │
//!                          └────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use kanban_backend::config::{load_config, load_default};
use kanban_backend::lifecycle::startup;
use kanban_backend::observability::logging::init_tracing;

#[derive(Parser)]
#[command(name = "kanban-backend")]
#[command(about = "Kanban board API with structured request logging", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(short, long, env = "KANBAN_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path),
        None => load_default(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            init_tracing("info");
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    init_tracing(&config.observability.log_level);
    tracing::info!("kanban-backend v{} starting", env!("CARGO_PKG_VERSION"));

    startup::start(config).await
}
