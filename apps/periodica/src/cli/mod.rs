//! # Periodica CLI Module
//!
//! This module implements the CLI interface for Periodica.
//!
//! ## Available Commands
//!
//! - `export` - Flatten a supplier graph snapshot into relational CSV tables
//! - `validate` - Parse a snapshot and report entity counts without writing

mod commands;

use crate::config::ExportProfile;
use clap::{Parser, Subcommand};
use periodica_core::ExportError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Periodica - Relational CSV Exporter
///
/// Flattens a supplier -> periodical -> anchor/edition graph into
/// foreign-key-consistent CSV tables with content-derived identifiers.
/// Re-running an export over unchanged input yields byte-identical files.
#[derive(Parser, Debug)]
#[command(name = "periodica")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML export profile
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export a supplier graph snapshot to relational CSV tables
    Export {
        /// Path to the supplier graph snapshot (JSON)
        #[arg(short, long)]
        source: PathBuf,

        /// Destination directory for the CSV tables
        #[arg(short, long)]
        dest: Option<PathBuf>,

        /// Recreate the destination directory (clean run)
        #[arg(long)]
        clean: bool,

        /// Root key-derivation namespace (UUID), re-keys every table
        #[arg(short, long)]
        namespace: Option<String>,

        /// Persist edition subject lines as an extra column
        #[arg(long)]
        include_subject: bool,
    },

    /// Parse a snapshot and report entity counts without writing
    Validate {
        /// Path to the supplier graph snapshot (JSON)
        #[arg(short, long)]
        source: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), ExportError> {
    let profile = ExportProfile::load(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Commands::Export {
            source,
            dest,
            clean,
            namespace,
            include_subject,
        } => cmd_export(
            &source,
            dest,
            clean,
            namespace,
            include_subject,
            &profile,
            json_mode,
        ),
        Commands::Validate { source } => cmd_validate(&source, json_mode),
    }
}
