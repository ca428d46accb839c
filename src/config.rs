// config.rs
use crate::scraper::ScraperError;
use std::time::Duration;
use url::Url;

pub const DEFAULT_DELAY_MS: u64 = 1000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

/// Resolved settings for one scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub search_url: Url,
    pub detail_url: Url,
    /// Pause inserted between consecutive upstream calls.
    pub pacing_delay: Duration,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ScrapeConfig {
    /// Validates raw endpoint strings (from flags or environment).
    pub fn new(
        search_url: Option<&str>,
        detail_url: Option<&str>,
        delay_ms: u64,
        timeout_secs: u64,
    ) -> Result<Self, ScraperError> {
        Ok(Self {
            search_url: parse_endpoint("LISTINGS_SEARCH_URL", search_url)?,
            detail_url: parse_endpoint("LISTINGS_DETAIL_URL", detail_url)?,
            pacing_delay: Duration::from_millis(delay_ms),
            timeout: Duration::from_secs(timeout_secs),
            user_agent: USER_AGENT.to_string(),
        })
    }
}

fn parse_endpoint(name: &str, raw: Option<&str>) -> Result<Url, ScraperError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ScraperError::Config(format!("{name} is not set")))?;

    let url = Url::parse(raw).map_err(|e| ScraperError::Config(format!("{name}: {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ScraperError::Config(format!(
            "{name}: unsupported scheme '{other}'"
        ))),
    }
}

/// "Portland, OR" -> "Portland, OR_raw.json"
pub fn default_raw_path(locality: &str) -> String {
    format!("{}_raw.json", file_stem(locality))
}

pub fn default_clean_path(locality: &str) -> String {
    format!("{}_clean.json", file_stem(locality))
}

fn file_stem(locality: &str) -> String {
    locality
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect()
}
