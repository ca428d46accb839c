// cli.rs
use crate::cleaning::FieldMap;
use crate::config::{
    default_clean_path, default_raw_path, ScrapeConfig, DEFAULT_DELAY_MS, DEFAULT_TIMEOUT_SECS,
};
use crate::errors::PipelineError;
use crate::pipeline::{self, RunOptions};
use crate::scraper::{ListingScraper, SessionState};
use crate::storage::{load_raw, FileStore};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "listing_harvest", version, about = "Scrape and flatten real-estate listings")]
pub struct Cli {
    #[command(flatten)]
    pub endpoints: EndpointArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Args)]
pub struct EndpointArgs {
    /// Search web service endpoint
    #[arg(long, env = "LISTINGS_SEARCH_URL", global = true)]
    pub search_url: Option<String>,

    /// Listing detail web service endpoint
    #[arg(long, env = "LISTINGS_DETAIL_URL", global = true)]
    pub detail_url: Option<String>,

    /// Pause between upstream calls, in milliseconds
    #[arg(
        long,
        env = "LISTINGS_DELAY_MS",
        default_value_t = DEFAULT_DELAY_MS,
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    pub delay_ms: u64,

    #[arg(long, env = "LISTINGS_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout_secs: u64,
}

impl EndpointArgs {
    fn config(&self) -> Result<ScrapeConfig, PipelineError> {
        Ok(ScrapeConfig::new(
            self.search_url.as_deref(),
            self.detail_url.as_deref(),
            self.delay_ms,
            self.timeout_secs,
        )?)
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Discover, fetch details, save raw, flatten, save clean
    Run {
        #[arg(long)]
        locality: String,
        /// Raw snapshot path (default: "<locality>_raw.json")
        #[arg(long)]
        raw: Option<String>,
        /// Clean table path (default: "<locality>_clean.json")
        #[arg(long)]
        clean: Option<String>,
        /// Only fetch details for the first N listings (0 means all)
        #[arg(long)]
        limit: Option<usize>,
        /// Also export the clean table as XLSX
        #[arg(long)]
        xlsx: Option<String>,
    },
    /// Discover listings and save the session without fetching details
    Discover {
        #[arg(long)]
        locality: String,
        #[arg(long)]
        raw: Option<String>,
    },
    /// Fetch details for a saved session and write it back
    Details {
        #[arg(long)]
        raw: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Flatten a raw snapshot into the clean table
    Clean {
        #[arg(long)]
        raw: String,
        #[arg(long)]
        clean: Option<String>,
        #[arg(long)]
        xlsx: Option<String>,
    },
}

impl Cli {
    pub fn execute(&self) -> Result<(), PipelineError> {
        let store = FileStore::default();

        match &self.command {
            Commands::Run {
                locality,
                raw,
                clean,
                limit,
                xlsx,
            } => {
                let config = self.endpoints.config()?;
                let raw = raw.clone().unwrap_or_else(|| default_raw_path(locality));
                let clean = clean.clone().unwrap_or_else(|| default_clean_path(locality));

                let mut scraper = ListingScraper::from_config(&config, SessionState::new(locality.as_str()))?;
                pipeline::run_with(
                    &mut scraper,
                    &store,
                    &FieldMap::default(),
                    RunOptions {
                        locality,
                        raw_destination: &raw,
                        clean_destination: &clean,
                        limit: *limit,
                        xlsx_destination: xlsx.as_deref(),
                    },
                )?;
            }
            Commands::Discover { locality, raw } => {
                let config = self.endpoints.config()?;
                let raw = raw.clone().unwrap_or_else(|| default_raw_path(locality));

                let mut scraper = ListingScraper::from_config(&config, SessionState::new(locality.as_str()))?;
                pipeline::discover_to_store(&mut scraper, &store, locality, &raw)?;
            }
            Commands::Details { raw, limit } => {
                let config = self.endpoints.config()?;
                let state = load_raw(&store, raw)?;

                let mut scraper = ListingScraper::from_config(&config, state)?;
                pipeline::fetch_details_to_store(&mut scraper, &store, *limit, raw)?;
            }
            Commands::Clean { raw, clean, xlsx } => {
                let clean = match clean {
                    Some(c) => c.clone(),
                    None => default_clean_path(&load_raw(&store, raw)?.locality),
                };

                pipeline::clean_from_store(&store, &FieldMap::default(), raw, &clean, xlsx.as_deref())?;
            }
        }

        Ok(())
    }
}
