use crate::config::ScrapeConfig;
use crate::scraper::models::ListingId;
use serde_json::{json, Value};

/// Result-count cap for the query that only needs `Count`.
pub const COUNT_QUERY_SIZE: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A fully built request. The fetcher never looks inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Request builders for the search and detail web services.
#[derive(Debug, Clone)]
pub struct ListingsApi {
    search_url: String,
    detail_url: String,
    user_agent: String,
}

impl ListingsApi {
    pub fn new(
        search_url: impl Into<String>,
        detail_url: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            search_url: search_url.into(),
            detail_url: detail_url.into(),
            user_agent: user_agent.into(),
        }
    }

    pub fn from_config(config: &ScrapeConfig) -> Self {
        Self::new(
            config.search_url.as_str(),
            config.detail_url.as_str(),
            config.user_agent.as_str(),
        )
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("User-Agent".into(), self.user_agent.clone()),
            ("Accept".into(), "application/json, text/javascript, */*; q=0.01".into()),
            ("Content-Type".into(), "application/json; charset=UTF-8".into()),
            ("X-Requested-With".into(), "XMLHttpRequest".into()),
        ]
    }

    /// Plain GET against the search page; only its cookies matter.
    pub fn handshake(&self) -> ApiRequest {
        ApiRequest {
            method: HttpMethod::Get,
            url: self.search_url.clone(),
            headers: self.headers(),
            body: None,
        }
    }

    pub fn search(&self, locality: &str, maximum_listings: u64) -> ApiRequest {
        let body = json!({
            "criteria": {
                "Location": locality,
                "Status": "Active",
                "MaximumListings": maximum_listings,
                "SortBy": "ListDate",
                "SortDescending": true
            }
        });

        ApiRequest {
            method: HttpMethod::Post,
            url: self.search_url.clone(),
            headers: self.headers(),
            body: Some(body),
        }
    }

    pub fn detail(&self, listing_id: &ListingId) -> ApiRequest {
        ApiRequest {
            method: HttpMethod::Post,
            url: self.detail_url.clone(),
            headers: self.headers(),
            body: Some(json!({ "listingId": listing_id.0 })),
        }
    }
}
