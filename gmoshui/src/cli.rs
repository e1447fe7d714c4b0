//! Root CLI structure for gmoshui

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gmoshui")]
#[command(about = "Command-line tools for Garry's Mod addons", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// GMA addon archive operations
    Gma {
        #[command(subcommand)]
        command: crate::commands::gma::GmaCommands,
    },

    /// Client Lua cache operations
    Cache {
        #[command(subcommand)]
        command: crate::commands::cache::CacheCommands,
    },

    /// Steam Workshop operations
    Workshop {
        #[command(subcommand)]
        command: crate::commands::workshop::WorkshopCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
