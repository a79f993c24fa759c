//! # relgraph - Member Relationship Graph Server
//!
//! The main binary for the relgraph engine.
//!
//! This application provides:
//! - HTTP REST API server (axum-based) holding the shared filter state
//! - CLI interface for one-shot graph builds, views and lookups
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 apps/relgraph (THE BINARY)               │
//! │                                                          │
//! │   ┌─────────────┐   ┌─────────────┐   ┌──────────────┐   │
//! │   │    CLI      │   │  HTTP API   │   │   Snapshot   │   │
//! │   │   (clap)    │   │   (axum)    │   │   sources    │   │
//! │   └──────┬──────┘   └──────┬──────┘   └──────┬───────┘   │
//! │          └─────────────────┼─────────────────┘           │
//! │                            ▼                             │
//! │                   ┌────────────────┐                     │
//! │                   │ relgraph-core  │                     │
//! │                   │  (THE ENGINE)  │                     │
//! │                   └────────────────┘                     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! relgraph serve --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! relgraph --members members.json --relations relations.json status
//! relgraph view --status active --ego alice@example.org
//! relgraph detail alice@example.org
//! ```

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // RELGRAPH_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("RELGRAPH_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "relgraph=info,relgraph_core=info,tower_http=debug".into());

    // Logs go to stderr so command output on stdout stays parseable.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
