//! Lua cache command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::utils::{
    BarSink, Column, Listing, create_progress_bar, format_bytes, resolve_gmod_dir,
};

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Decode a single cache file
    Decode {
        /// Path to the cache file
        file: PathBuf,

        /// Write the source here instead of standard output
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List entries in the game's Lua cache
    List {
        /// Path to the garrysmod folder (searched for when omitted)
        #[arg(long, env = "GMOSHUI_GMOD_DIR")]
        gmod_dir: Option<PathBuf>,
    },

    /// Decode the game's Lua cache into a directory
    Extract {
        /// Path to the garrysmod folder (searched for when omitted)
        #[arg(long, env = "GMOSHUI_GMOD_DIR")]
        gmod_dir: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "lua_cache")]
        output: PathBuf,

        /// Cache file names to decode (decodes everything if not specified)
        files: Vec<String>,
    },
}

pub fn execute(command: CacheCommands) -> Result<()> {
    match command {
        CacheCommands::Decode { file, output } => decode_file(&file, output.as_deref()),
        CacheCommands::List { gmod_dir } => list_cache(gmod_dir.as_deref()),
        CacheCommands::Extract {
            gmod_dir,
            output,
            files,
        } => extract_cache(gmod_dir.as_deref(), &output, &files),
    }
}

fn locate_cache(gmod_dir: Option<&Path>) -> Result<PathBuf> {
    let gmod_dir = resolve_gmod_dir(gmod_dir).context(
        "Could not find the garrysmod folder; pass --gmod-dir or set GMOSHUI_GMOD_DIR",
    )?;
    let cache = gmod_lua_cache::cache_dir(&gmod_dir);
    if !cache.is_dir() {
        anyhow::bail!("No Lua cache at {}", cache.display());
    }
    Ok(cache)
}

fn decode_file(path: &Path, output: Option<&Path>) -> Result<()> {
    let source = gmod_lua_cache::decode_file(path)
        .with_context(|| format!("Failed to decode {}", path.display()))?;

    match output {
        Some(output) => {
            fs::write(output, &source)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            log::info!("Wrote {} bytes to {}", source.len(), output.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&source)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn list_cache(gmod_dir: Option<&Path>) -> Result<()> {
    let cache = locate_cache(gmod_dir)?;
    let names = gmod_lua_cache::list_entries(&cache)
        .with_context(|| format!("Failed to read {}", cache.display()))?;

    if names.is_empty() {
        println!("Lua cache is empty");
        return Ok(());
    }

    let mut table = Listing::new(&[Column::text("File"), Column::number("Size")]);
    for name in &names {
        let size = fs::metadata(cache.join(name)).map(|m| m.len()).unwrap_or(0);
        table.row([name.clone(), format_bytes(size)]);
    }
    table.print();
    println!("{} cache files in {}", names.len(), cache.display());

    Ok(())
}

fn extract_cache(gmod_dir: Option<&Path>, output: &Path, files: &[String]) -> Result<()> {
    let cache = locate_cache(gmod_dir)?;
    let total = if files.is_empty() {
        gmod_lua_cache::list_entries(&cache)?.len()
    } else {
        files.len()
    };

    let mut sink = BarSink::new(create_progress_bar(total as u64, "Decoding cache"));
    let summary = gmod_lua_cache::extract_directory(&cache, output, files, &mut sink)
        .with_context(|| format!("Failed to decode cache into {}", output.display()))?;

    println!(
        "Decoded {} files into {} ({} skipped)",
        summary.decoded,
        output.display(),
        summary.skipped.len()
    );
    for (name, error) in &summary.skipped {
        println!("  {name}: {error}");
    }

    Ok(())
}
