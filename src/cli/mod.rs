//! CLI module for the Nexus mentorship API
//!
//! - `serve`: run the HTTP server
//! - `migrate`: apply or revert PostgreSQL schema migrations

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// Nexus - mentorship marketplace API
#[derive(Parser)]
#[command(name = "nexus")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Apply pending database migrations
    Migrate {
        /// Revert the most recent migration instead
        #[arg(long)]
        revert: bool,
    },
}
