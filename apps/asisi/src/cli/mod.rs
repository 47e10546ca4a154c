//! # ASISI CLI Module
//!
//! This module implements the CLI interface for ASISI.
//!
//! ## Available Commands
//!
//! - `score` - Score a batch of districts and print the report
//! - `validate` - Check every record without scoring
//! - `weights` - Show the active weight set and thresholds
//! - `init` - Write a default configuration file

mod commands;

use asisi_core::AsisiError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// ASISI - Enrollment Service Stress Index
///
/// Ranks districts by how close their enrollment infrastructure is to
/// breaking point.
#[derive(Parser, Debug)]
#[command(name = "asisi")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the TOML configuration (defaults to ./asisi.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a batch of districts
    Score {
        /// Path to the batch file (JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Seed for the rejection noise (overrides the config)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Show only the N most stressed districts
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Check every record of a batch without scoring
    Validate {
        /// Path to the batch file (JSON)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Show the active weight set and status thresholds
    Weights,

    /// Write a default configuration file
    Init {
        /// Output file path
        #[arg(short, long, default_value = "asisi.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), AsisiError> {
    let config = cli.config.as_deref();
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Score { file, seed, top }) => cmd_score(config, json_mode, &file, seed, top),
        Some(Commands::Validate { file }) => cmd_validate(config, json_mode, &file),
        Some(Commands::Weights) => cmd_weights(config, json_mode),
        Some(Commands::Init { output, force }) => cmd_init(&output, force),
        None => {
            // No subcommand - show weights by default
            cmd_weights(config, json_mode)
        }
    }
}
