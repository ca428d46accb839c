use crate::cli::Cli;
use crate::errors::PipelineError;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod cleaning;
mod cli;
mod config;
mod errors;
mod pipeline;
mod scraper;
mod spreadsheets;
mod storage;

#[cfg(test)]
mod tests;

fn init_tracing() {
    // LOG_FORMAT=json for machine-readable output
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("listing_harvest=info"));

    if json_format {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn main() {
    // 1️⃣ Pick up endpoints from .env if there is one
    let _ = dotenvy::dotenv();

    // 2️⃣ Logging
    init_tracing();

    // 3️⃣ Parse args and run
    let cli = Cli::parse();

    if let Err(e) = cli.execute() {
        match &e {
            PipelineError::Scraper(s) => error!(
                stage = ?s.stage(),
                status = ?s.status().map(|code| code.as_u16()),
                "❌ Scrape failed: {e}"
            ),
            PipelineError::Storage(_) => error!("❌ Storage failed: {e}"),
        }
        std::process::exit(1);
    }
}
