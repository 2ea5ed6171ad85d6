//! CLI interface for LegisTrack

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "legistrack")]
#[command(version = "0.9.2")]
#[command(about = "Municipal ordinance and resolution portal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new legistrack.toml configuration file
    Init,

    /// Create or verify the database schema
    Migrate,

    /// Start the portal server
    Serve {
        /// Host to bind to (defaults to server.host from the config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to server.port from the config)
        #[arg(short, long)]
        port: Option<u16>,
    },
}
