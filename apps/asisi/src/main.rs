//! # ASISI - Enrollment Service Stress Index
//!
//! The command-line binary for the ASISI stress calculator.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                 apps/asisi (THE BINARY)               │
//! │                                                       │
//! │  ┌──────────┐   ┌───────────┐   ┌────────────────┐   │
//! │  │   CLI    │   │  Config   │   │  Input/Report  │   │
//! │  │  (clap)  │   │  (toml)   │   │  (serde_json)  │   │
//! │  └────┬─────┘   └─────┬─────┘   └───────┬────────┘   │
//! │       └───────────────┼─────────────────┘            │
//! │                       ▼                              │
//! │               ┌───────────────┐                      │
//! │               │  asisi-core   │                      │
//! │               │  (THE LOGIC)  │                      │
//! │               └───────────────┘                      │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! asisi score -f districts.json --seed 42 --top 10
//! asisi validate -f districts.json
//! asisi weights
//! asisi init
//! ```

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse();

    // ASISI_LOG_FORMAT=json enables machine-parseable logs.
    let log_format = std::env::var("ASISI_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose { "asisi=debug" } else { "asisi=info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // Logs go to stderr so reports on stdout stay clean.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
  ASISI v{}
  Enrollment Service Stress Index
"#,
        env!("CARGO_PKG_VERSION")
    );
}
