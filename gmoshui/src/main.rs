//! Main entry point for the gmoshui CLI

mod cli;
mod commands;
mod utils;

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap::Parser;
use clap_complete::{Generator, generate};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logger; RUST_LOG overrides the flags
    let level = match (cli.verbose, cli.quiet) {
        (0, true) => log::LevelFilter::Error,
        (0, false) => log::LevelFilter::Warn,
        (1, _) => log::LevelFilter::Info,
        (2, _) => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .init();

    // Stop long extractions and downloads between files on Ctrl+C
    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_clone = cancel.clone();
    ctrlc::set_handler(move || {
        log::warn!("Interrupted, stopping after the current file");
        cancel_clone.store(true, Ordering::SeqCst);
    })
    .context("Failed to set signal handler")?;

    // Execute command
    match cli.command {
        Commands::Gma { command } => commands::gma::execute(command, cancel),
        Commands::Cache { command } => commands::cache::execute(command),
        Commands::Workshop { command } => commands::workshop::execute(command, cancel),
        Commands::Completions { shell } => {
            print_completions(shell, &mut Cli::command());
            Ok(())
        }
    }
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}
