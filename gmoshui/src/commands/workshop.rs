//! Steam Workshop command implementations

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use gmod_workshop::{
    DownloadOutcome, DownloadPipeline, HttpTransport, ItemLookup, MetadataClient, WorkshopConfig,
    WorkshopItem,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use crate::utils::{
    BarSink, Column, Listing, create_spinner, format_bytes, format_list,
    format_steam_id, format_timestamp,
};

/// Connection settings shared by Workshop commands
#[derive(Args, Debug, Clone)]
pub struct ApiArgs {
    /// Details endpoint to query
    #[arg(long, env = "GMOSHUI_API_URL", default_value = gmod_workshop::DEFAULT_API_URL)]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout: u64,
}

impl ApiArgs {
    fn config(&self) -> WorkshopConfig {
        WorkshopConfig::new()
            .api_url(self.api_url.clone())
            .timeout(Duration::from_secs(self.timeout))
    }

    fn client(&self) -> Result<MetadataClient<HttpTransport>> {
        let config = self.config();
        let transport = HttpTransport::new(&config).context("Failed to create HTTP client")?;
        Ok(MetadataClient::new(transport, config.api_url))
    }
}

#[derive(Subcommand)]
pub enum WorkshopCommands {
    /// Show details of Workshop items
    Info {
        /// Workshop item IDs
        #[arg(required = true)]
        ids: Vec<u64>,

        #[command(flatten)]
        api: ApiArgs,
    },

    /// Download Workshop items as GMA archives
    Download {
        /// Workshop item IDs
        #[arg(required = true)]
        ids: Vec<u64>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Also extract each archive into a folder named after the item
        #[arg(short, long)]
        extract: bool,

        #[command(flatten)]
        api: ApiArgs,
    },
}

pub fn execute(command: WorkshopCommands, cancel: Arc<AtomicBool>) -> Result<()> {
    match command {
        WorkshopCommands::Info { ids, api } => show_info(&ids, &api),
        WorkshopCommands::Download {
            ids,
            output,
            extract,
            api,
        } => download(&ids, &output, extract, &api, cancel),
    }
}

fn show_info(ids: &[u64], api: &ApiArgs) -> Result<()> {
    let client = api.client()?;

    let spinner = create_spinner("Requesting item details...");
    let lookups = client.fetch(ids);
    spinner.finish_and_clear();
    let lookups = lookups.context("Failed to fetch Workshop details")?;

    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            println!();
        }
        match lookups.get(id) {
            Some(ItemLookup::Found(item)) => print_item(item),
            Some(ItemLookup::Missing) | None => println!("{id}: addon does not exist"),
        }
    }

    Ok(())
}

fn print_item(item: &WorkshopItem) {
    println!("{}", item.title);
    println!("{}", "=".repeat(item.title.chars().count().max(3)));
    println!("ID: {}", item.id);
    println!("Author: {}", format_steam_id(item.creator));
    println!("Created: {}", format_timestamp(item.time_created));
    println!("Updated: {}", format_timestamp(item.time_updated));
    println!("Size: {}", format_bytes(item.file_size));
    println!("Tags: {}", format_list(&item.tag_names()));
    println!(
        "Views: {}, subscriptions: {}, favourites: {}",
        item.views, item.subscriptions, item.favorited
    );
    if item.banned {
        println!("Banned: {}", item.ban_reason);
    }
    if !item.description.is_empty() {
        println!();
        println!("{}", item.description);
    }
}

fn download(
    ids: &[u64],
    output: &Path,
    extract: bool,
    api: &ApiArgs,
    cancel: Arc<AtomicBool>,
) -> Result<()> {
    let pipeline = DownloadPipeline::new(api.client()?).cancel_flag(cancel);

    let mut sink = BarSink::new(create_spinner("Contacting the Workshop...")).echo(true);
    let outcomes = pipeline
        .run(ids, output, extract, &mut sink)
        .context("Failed to fetch Workshop details")?;

    let mut table = Listing::new(&[
        Column::number("ID"),
        Column::text("Result"),
        Column::text("Details"),
    ]);
    let mut failures = 0;
    for outcome in &outcomes {
        let (result, details) = match outcome {
            DownloadOutcome::Downloaded {
                item,
                package,
                file_count,
                extracted,
            } => {
                let mut details = format!("{} ({file_count} files)", package.display());
                if let Some((dir, written)) = extracted {
                    details.push_str(&format!(", {written} extracted to {}", dir.display()));
                }
                (format!("✓ {}", item.title), details)
            }
            DownloadOutcome::Missing { .. } => ("Missing".to_string(), String::new()),
            DownloadOutcome::Failed { error, .. } => {
                failures += 1;
                ("✗ Failed".to_string(), error.to_string())
            }
            DownloadOutcome::Cancelled { .. } => ("Cancelled".to_string(), String::new()),
        };
        table.row([outcome.id().to_string(), result, details]);
    }
    table.print();

    if failures > 0 {
        anyhow::bail!("{failures} of {} downloads failed", outcomes.len());
    }
    Ok(())
}
