// pipeline.rs
use crate::cleaning::{flatten_details, FieldMap, FlatTable};
use crate::errors::PipelineError;
use crate::scraper::{ListingScraper, ScraperError};
use crate::spreadsheets::write_flat_table_xlsx;
use crate::storage::{load_raw, persist_flat, persist_raw, ObjectStore};
use serde_json::Value;
use tracing::{info, warn};

/// Fetches detail documents for the discovered listings, in discovery order.
///
/// `limit` caps how many listings are fetched; `None` or `Some(0)` means all
/// of them. The
/// pacing delay follows every call, the last one included. Any failure aborts
/// the batch and nothing fetched so far is returned.
pub fn fetch_all_details(
    scraper: &mut ListingScraper,
    limit: Option<usize>,
) -> Result<Vec<Value>, ScraperError> {
    let listings = scraper.state().listings.clone();
    let count = match limit {
        Some(n) if n > 0 => n.min(listings.len()),
        _ => listings.len(),
    };

    info!(count, discovered = listings.len(), "📥 Fetching listing details");

    let mut details = Vec::with_capacity(count);
    for (i, listing) in listings.iter().take(count).enumerate() {
        let id = listing.listing_id().ok_or_else(|| {
            ScraperError::UnexpectedShape(format!("listing #{i} has no Listing.ID"))
        })?;

        details.push(scraper.fetch_detail(&id)?);
        scraper.pause();
    }

    info!(fetched = details.len(), "✅ Details complete");
    Ok(details)
}

/// Discovery only; persists the session so details can be fetched later.
pub fn discover_to_store(
    scraper: &mut ListingScraper,
    store: &impl ObjectStore,
    locality: &str,
    raw_destination: &str,
) -> Result<u64, PipelineError> {
    let (count, _) = scraper.discover(locality)?;
    persist_raw(store, scraper.state(), raw_destination)?;
    Ok(count)
}

/// Fetches details for a session (typically one loaded from disk) and writes
/// the snapshot back with the documents attached.
pub fn fetch_details_to_store(
    scraper: &mut ListingScraper,
    store: &impl ObjectStore,
    limit: Option<usize>,
    raw_destination: &str,
) -> Result<usize, PipelineError> {
    let details = fetch_all_details(scraper, limit)?;
    let fetched = details.len();
    scraper.state_mut().details = details;
    persist_raw(store, scraper.state(), raw_destination)?;
    Ok(fetched)
}

/// Loads a raw snapshot, flattens its documents and stores the table.
/// Also writes an XLSX copy when `xlsx_destination` is given.
pub fn clean_from_store(
    store: &impl ObjectStore,
    map: &FieldMap,
    raw_source: &str,
    clean_destination: &str,
    xlsx_destination: Option<&str>,
) -> Result<FlatTable, PipelineError> {
    let state = load_raw(store, raw_source)?;
    let table = flatten_details(&state.details, map);
    if table.is_empty() {
        warn!(raw_source, "No detail documents in snapshot; clean table is empty");
    }
    info!(
        rows = table.len(),
        columns = table.columns.len(),
        "🧹 Flattened listing details"
    );

    persist_flat(store, &table, clean_destination)?;

    if let Some(xlsx) = xlsx_destination {
        let bytes = write_flat_table_xlsx(&table)?;
        store.put(xlsx, &bytes)?;
        info!(destination = xlsx, "📊 Spreadsheet exported");
    }

    Ok(table)
}

/// discover -> fetch details -> persist raw -> load raw -> flatten -> persist flat.
pub fn run(
    scraper: &mut ListingScraper,
    store: &impl ObjectStore,
    locality: &str,
    raw_destination: &str,
    clean_destination: &str,
) -> Result<FlatTable, PipelineError> {
    run_with(
        scraper,
        store,
        &FieldMap::default(),
        RunOptions {
            locality,
            raw_destination,
            clean_destination,
            limit: None,
            xlsx_destination: None,
        },
    )
}

pub struct RunOptions<'a> {
    pub locality: &'a str,
    pub raw_destination: &'a str,
    pub clean_destination: &'a str,
    pub limit: Option<usize>,
    pub xlsx_destination: Option<&'a str>,
}

pub fn run_with(
    scraper: &mut ListingScraper,
    store: &impl ObjectStore,
    map: &FieldMap,
    options: RunOptions<'_>,
) -> Result<FlatTable, PipelineError> {
    info!(locality = options.locality, "🚀 Starting listing scrape");

    scraper.discover(options.locality)?;
    fetch_details_to_store(scraper, store, options.limit, options.raw_destination)?;

    clean_from_store(
        store,
        map,
        options.raw_destination,
        options.clean_destination,
        options.xlsx_destination,
    )
}
