use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// Both listing APIs wrap their payload the same way:
//
// { "d": <payload> }
//
// search payload
//  ├── Count
//  └── Listings[]
//       └── Listing
//            └── ID
//
// detail payload
//  ├── ListingID, Zip, Beds, ...     (scalars)
//  ├── DefaultParentArea, Building   (objects)
//  └── Details[]
//       ├── Name
//       └── Fields[]
//            ├── Name
//            └── Value

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub d: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchResult {
    pub count: u64,
    #[serde(default)]
    pub listings: Vec<ListingSummary>,
}

/// One search hit, kept verbatim so nothing the search API says is lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingSummary(pub Value);

impl ListingSummary {
    pub fn listing_id(&self) -> Option<ListingId> {
        match self.0.get("Listing")?.get("ID")? {
            Value::String(s) if !s.is_empty() => Some(ListingId(s.clone())),
            Value::Number(n) => Some(ListingId(n.to_string())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListingId(pub String);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything a scrape run has learned so far. This is the snapshot written
/// to disk between the discovery and detail phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub locality: String,
    pub total_listings: u64,
    pub listings: Vec<ListingSummary>,
    /// Captured from the first successful detail response, then frozen.
    pub detail_cookie: Option<String>,
    #[serde(default)]
    pub details: Vec<Value>,
    pub discovered_at: Option<DateTime<Utc>>,
}

impl SessionState {
    pub fn new(locality: impl Into<String>) -> Self {
        Self {
            locality: locality.into(),
            total_listings: 0,
            listings: Vec::new(),
            detail_cookie: None,
            details: Vec::new(),
            discovered_at: None,
        }
    }

    /// Guarded assignment: the first cookie wins for the rest of the session.
    pub fn capture_detail_cookie(&mut self, cookie: Option<String>) -> bool {
        if self.detail_cookie.is_some() {
            return false;
        }
        match cookie {
            Some(c) if !c.is_empty() => {
                self.detail_cookie = Some(c);
                true
            }
            _ => false,
        }
    }
}
