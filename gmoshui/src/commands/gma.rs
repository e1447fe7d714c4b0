//! GMA archive command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use gmod_gma::{Archive, ExtractOptions, OpenOptions, hierarchy};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::utils::{
    BarSink, Column, Listing, TreeOptions, create_progress_bar, create_spinner,
    format_bytes, format_list, format_steam_id, format_timestamp, matches_pattern,
    render_hierarchy, truncate_path,
};

#[derive(Subcommand)]
pub enum GmaCommands {
    /// Show addon metadata
    Info {
        /// Path to the GMA archive
        archive: PathBuf,

        /// Reject unknown format versions instead of guessing
        #[arg(long)]
        strict: bool,
    },

    /// List files in an archive
    List {
        /// Path to the GMA archive
        archive: PathBuf,

        /// Show size, CRC and offset of each file
        #[arg(short, long)]
        long: bool,

        /// Filter files by pattern (supports wildcards)
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Show the folder hierarchy with aggregated sizes
    Tree {
        /// Path to the GMA archive
        archive: PathBuf,

        /// Maximum depth to display
        #[arg(short, long)]
        depth: Option<usize>,

        /// Hide folder and file sizes
        #[arg(long)]
        no_sizes: bool,

        /// Disable colours
        #[arg(long)]
        no_color: bool,
    },

    /// Extract files from an archive
    Extract {
        /// Path to the GMA archive
        archive: PathBuf,

        /// Output directory (defaults to the addon name)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Files or folders to extract (extracts everything if not specified)
        files: Vec<String>,

        /// Fail instead of overwriting existing files
        #[arg(long)]
        no_overwrite: bool,
    },

    /// Check stored CRC-32 checksums
    Verify {
        /// Path to the GMA archive
        archive: PathBuf,
    },
}

pub fn execute(command: GmaCommands, cancel: Arc<AtomicBool>) -> Result<()> {
    match command {
        GmaCommands::Info { archive, strict } => show_info(&archive, strict),
        GmaCommands::List {
            archive,
            long,
            filter,
        } => list_archive(&archive, long, filter),
        GmaCommands::Tree {
            archive,
            depth,
            no_sizes,
            no_color,
        } => show_tree(
            &archive,
            &TreeOptions {
                max_depth: depth,
                no_color,
                show_sizes: !no_sizes,
            },
        ),
        GmaCommands::Extract {
            archive,
            output,
            files,
            no_overwrite,
        } => extract_files(&archive, output, &files, no_overwrite, cancel),
        GmaCommands::Verify { archive } => verify_archive(&archive),
    }
}

fn open_archive(path: &Path, options: &OpenOptions) -> Result<Archive> {
    let spinner = create_spinner("Opening archive...");
    let archive = options
        .open(path)
        .with_context(|| format!("Failed to open archive {}", path.display()));
    spinner.finish_and_clear();
    archive
}

fn show_info(path: &Path, strict: bool) -> Result<()> {
    let archive = open_archive(path, &OpenOptions::new().strict_version(strict))?;
    let meta = archive.metadata();
    let info = meta.description_info();

    println!("GMA Archive Information");
    println!("=======================");
    println!("Path: {}", path.display());
    println!("Name: {}", meta.name);
    println!("Format version: {}", meta.version);
    println!("Author: {}", format_steam_id(meta.author_id));
    if !meta.author_name.is_empty() {
        println!("Author name: {}", meta.author_name);
    }
    println!("Created: {}", format_timestamp(meta.timestamp));
    println!("Addon version: {}", meta.addon_version);
    if let Some(addon_type) = &info.addon_type {
        println!("Type: {addon_type}");
    }
    if !info.tags.is_empty() {
        println!("Tags: {}", format_list(&info.tags));
    }
    if let Some(required) = &meta.required_content {
        println!("Required content: {}", format_list(required));
    }
    println!("Files: {}", archive.len());
    println!("Content size: {}", format_bytes(archive.total_size()));

    let description = meta.display_description();
    if !description.is_empty() {
        println!();
        println!("{description}");
    }

    Ok(())
}

fn list_archive(path: &Path, long: bool, filter: Option<String>) -> Result<()> {
    let archive = open_archive(path, &OpenOptions::new())?;
    let pattern = filter.as_deref().unwrap_or("*");

    let entries: Vec<_> = archive
        .entries()
        .iter()
        .filter(|e| matches_pattern(&e.path, pattern))
        .collect();

    if entries.is_empty() {
        println!("No files found matching pattern: {pattern}");
        return Ok(());
    }

    if long {
        let mut table = Listing::new(&[
            Column::number("#"),
            Column::text("File"),
            Column::number("Size"),
            Column::text("CRC"),
            Column::number("Offset"),
        ]);
        for entry in entries {
            table.row([
                entry.index.to_string(),
                truncate_path(&entry.path, 60),
                format_bytes(entry.size),
                format!("{:08x}", entry.crc),
                entry.offset.to_string(),
            ]);
        }
        table.print();
    } else {
        for entry in entries {
            println!("{}", entry.path);
        }
    }

    Ok(())
}

fn show_tree(path: &Path, options: &TreeOptions) -> Result<()> {
    let archive = open_archive(path, &OpenOptions::new())?;
    let tree = hierarchy::build(archive.entries());
    print!("{}", render_hierarchy(&tree, options));
    Ok(())
}

fn extract_files(
    path: &Path,
    output: Option<PathBuf>,
    files: &[String],
    no_overwrite: bool,
    cancel: Arc<AtomicBool>,
) -> Result<()> {
    let mut source = BufReader::new(
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
    );
    let archive = Archive::parse(&mut source)
        .with_context(|| format!("Failed to read archive {}", path.display()))?;

    let destination = output.unwrap_or_else(|| {
        PathBuf::from(
            gmod_gma::path::directory_name(&archive.metadata().name)
                .unwrap_or_else(|| "addon".to_string()),
        )
    });

    // Folders expand to every file beneath them
    let tree = hierarchy::build(archive.entries());
    let mut selected = Vec::new();
    for requested in files {
        match tree.find(requested.trim_end_matches('/')) {
            Some(node) if !node.is_root() => selected.extend(node.file_paths()),
            _ => log::warn!("{requested} is not in the archive"),
        }
    }
    if !files.is_empty() && selected.is_empty() {
        anyhow::bail!("None of the requested files are in the archive");
    }

    let total = if selected.is_empty() {
        archive.len()
    } else {
        selected.len()
    };
    let options = ExtractOptions::new()
        .select(selected)
        .overwrite(!no_overwrite)
        .cancel_flag(cancel);

    let mut sink = BarSink::new(create_progress_bar(total as u64, "Extracting files"));
    let written = gmod_gma::extract(&archive, &mut source, &destination, &options, &mut sink)
        .with_context(|| format!("Failed to extract into {}", destination.display()))?;

    println!("Extracted {written} files to {}", destination.display());
    Ok(())
}

fn verify_archive(path: &Path) -> Result<()> {
    let mut source = BufReader::new(
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
    );
    let archive = Archive::parse(&mut source)
        .with_context(|| format!("Failed to read archive {}", path.display()))?;

    let spinner = create_spinner("Verifying checksums...");
    let report = archive.verify(&mut source);
    spinner.finish_and_clear();
    let report = report.context("Failed to read archive contents")?;

    if report.is_ok() {
        println!(
            "✓ Archive verification passed ({} checked, {} without CRC)",
            report.checked, report.skipped
        );
        return Ok(());
    }

    let mut table = Listing::new(&[
        Column::text("File"),
        Column::text("Expected"),
        Column::text("Actual"),
    ]);
    for mismatch in &report.mismatches {
        table.row([
            truncate_path(&mismatch.path, 60),
            format!("{:08x}", mismatch.expected),
            format!("{:08x}", mismatch.actual),
        ]);
    }
    table.print();

    anyhow::bail!(
        "Archive verification failed: {} of {} files corrupt",
        report.mismatches.len(),
        report.checked
    )
}
