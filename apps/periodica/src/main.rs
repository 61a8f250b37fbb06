//! # Periodica - Relational CSV Exporter
//!
//! The main binary for the Periodica deterministic export engine.
//!
//! This application provides:
//! - Export command (supplier graph snapshot -> relational CSV tables)
//! - Validate command (parse a snapshot, report entity counts)
//! - Optional TOML export profiles
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │               apps/periodica (THE BINARY)            │
//! │                                                      │
//! │  ┌─────────────┐   ┌──────────────┐                  │
//! │  │   CLI       │   │   Profiles   │                  │
//! │  │  (clap)     │   │   (toml)     │                  │
//! │  └──────┬──────┘   └──────┬───────┘                  │
//! │         │                 │                          │
//! │         └────────┬────────┘                          │
//! │                  ▼                                   │
//! │         ┌─────────────────┐                          │
//! │         │ periodica-core  │                          │
//! │         │  (THE LOGIC)    │                          │
//! │         └─────────────────┘                          │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Export a snapshot to a clean destination directory
//! periodica export -s snapshot.json -d out/ --clean
//!
//! # Validate a snapshot without writing
//! periodica validate -s snapshot.json
//! ```

use clap::Parser;
use periodica::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Parse CLI arguments first; --verbose feeds the default filter.
    let cli = cli::Cli::parse();

    // Initialize tracing — PERIODICA_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("PERIODICA_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "periodica=debug"
    } else {
        "periodica=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Periodica startup banner.
fn print_banner() {
    println!(
        r#"
  ┌─┐┌─┐┬─┐┬┌─┐┌┬┐┬┌─┐┌─┐
  ├─┘├┤ ├┬┘││ │ ││││  ├─┤
  ┴  └─┘┴└─┴└─┘─┴┘┴└─┘┴ ┴

  Relational CSV Exporter v{}

  Deterministic • Content-keyed • Byte-diffable
"#,
        env!("CARGO_PKG_VERSION")
    );
}
