// scraper.rs
use crate::config::ScrapeConfig;
use crate::scraper::api::{ApiRequest, ListingsApi, COUNT_QUERY_SIZE};
use crate::scraper::models::{Envelope, ListingId, ListingSummary, SearchResult, SessionState};
use crate::scraper::transport::{
    HttpResponse, HttpTransport, Pacer, ReqwestTransport, ThreadPacer,
};
use crate::scraper::{ScraperError, Stage};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// One scrape session against the listing search and detail services.
pub struct ListingScraper {
    api: ListingsApi,
    transport: Box<dyn HttpTransport>,
    pacer: Box<dyn Pacer>,
    delay: Duration,
    state: SessionState,
}

impl ListingScraper {
    pub fn new(
        api: ListingsApi,
        transport: Box<dyn HttpTransport>,
        pacer: Box<dyn Pacer>,
        delay: Duration,
        state: SessionState,
    ) -> Self {
        Self {
            api,
            transport,
            pacer,
            delay,
            state,
        }
    }

    /// Real network, real sleeps.
    pub fn from_config(config: &ScrapeConfig, state: SessionState) -> Result<Self, ScraperError> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::new(
            ListingsApi::from_config(config),
            Box::new(transport),
            Box::new(ThreadPacer),
            config.pacing_delay,
            state,
        ))
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn pause(&self) {
        self.pacer.pause(self.delay);
    }

    /// Handshake, count query, then a query sized to fetch every listing.
    pub fn discover(&mut self, locality: &str) -> Result<(u64, &[ListingSummary]), ScraperError> {
        self.state.locality = locality.to_string();

        info!(locality, "🤝 Opening search session");
        let handshake = self.call(Stage::Handshake, &self.api.handshake(), None)?;
        let cookies = handshake.cookie;

        self.pause();
        let request = self.api.search(locality, COUNT_QUERY_SIZE);
        let resp = self.call(Stage::CountQuery, &request, cookies.as_deref())?;
        let counted: SearchResult = parse_envelope(Stage::CountQuery, &resp)?;
        let total = counted.count;
        info!(locality, total, "🔢 Active listing count");

        self.pause();
        let request = self.api.search(locality, total);
        let resp = self.call(Stage::FullQuery, &request, cookies.as_deref())?;
        let full: SearchResult = parse_envelope(Stage::FullQuery, &resp)?;

        if full.listings.len() as u64 != total {
            warn!(
                expected = total,
                received = full.listings.len(),
                "Search returned a different number of listings than counted"
            );
        }

        self.state.total_listings = total;
        self.state.listings = full.listings;
        self.state.discovered_at = Some(chrono::Utc::now());

        info!(locality, listings = self.state.listings.len(), "✅ Discovery complete");
        Ok((self.state.total_listings, &self.state.listings))
    }

    /// Fetches one listing's detail document (the envelope's `d` member).
    pub fn fetch_detail(&mut self, listing_id: &ListingId) -> Result<Value, ScraperError> {
        let request = self.api.detail(listing_id);
        let resp = self.call(Stage::Detail, &request, self.state.detail_cookie.as_deref())?;

        let cookie = resp.cookie.clone();
        let document: Value = parse_envelope(Stage::Detail, &resp)?;

        if self.state.capture_detail_cookie(cookie) {
            debug!(%listing_id, "🍪 Captured detail session cookie");
        }

        debug!(%listing_id, "📄 Fetched listing detail");
        Ok(document)
    }

    fn call(
        &self,
        stage: Stage,
        request: &ApiRequest,
        cookie: Option<&str>,
    ) -> Result<HttpResponse, ScraperError> {
        let resp = self.transport.send(stage, request, cookie)?;

        if !resp.status.is_success() {
            warn!(%stage, status = resp.status.as_u16(), "Upstream call failed");
            return Err(ScraperError::Upstream {
                stage,
                status: resp.status,
            });
        }

        Ok(resp)
    }
}

fn parse_envelope<T: DeserializeOwned>(
    stage: Stage,
    resp: &HttpResponse,
) -> Result<T, ScraperError> {
    let envelope: Envelope<T> =
        serde_json::from_str(&resp.body).map_err(|e| ScraperError::JsonParse {
            stage,
            message: e.to_string(),
        })?;
    Ok(envelope.d)
}
