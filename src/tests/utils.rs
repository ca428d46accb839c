use crate::scraper::api::{ApiRequest, ListingsApi};
use crate::scraper::transport::{HttpResponse, HttpTransport, Pacer};
use crate::scraper::{ListingScraper, ScraperError, SessionState, Stage};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

pub const SEARCH_URL: &str = "https://listings.test/Search.asmx/SearchListings";
pub const DETAIL_URL: &str = "https://listings.test/Listing.asmx/GetListingDetails";
pub const DELAY: Duration = Duration::from_millis(1000);

/// Everything the scraper did, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Call {
        stage: Stage,
        url: String,
        cookie: Option<String>,
        body: Option<Value>,
    },
    Pause(Duration),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

/// Replays canned responses in order and records each request.
pub struct FakeTransport {
    log: EventLog,
    responses: RefCell<VecDeque<HttpResponse>>,
}

impl HttpTransport for FakeTransport {
    fn send(
        &self,
        stage: Stage,
        request: &ApiRequest,
        cookie: Option<&str>,
    ) -> Result<HttpResponse, ScraperError> {
        self.log.borrow_mut().push(Event::Call {
            stage,
            url: request.url.clone(),
            cookie: cookie.map(str::to_string),
            body: request.body.clone(),
        });

        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| ScraperError::Network {
                stage,
                message: "no scripted response left".into(),
            })
    }
}

pub struct RecordingPacer {
    log: EventLog,
}

impl Pacer for RecordingPacer {
    fn pause(&self, delay: Duration) {
        self.log.borrow_mut().push(Event::Pause(delay));
    }
}

pub fn scripted_scraper(
    responses: Vec<HttpResponse>,
    state: SessionState,
) -> (ListingScraper, EventLog) {
    let log: EventLog = Rc::new(RefCell::new(Vec::new()));
    let transport = FakeTransport {
        log: log.clone(),
        responses: RefCell::new(responses.into()),
    };
    let pacer = RecordingPacer { log: log.clone() };

    let scraper = ListingScraper::new(
        ListingsApi::new(SEARCH_URL, DETAIL_URL, "listing-harvest-tests"),
        Box::new(transport),
        Box::new(pacer),
        DELAY,
        state,
    );
    (scraper, log)
}

pub fn ok_json(body: Value, cookie: Option<&str>) -> HttpResponse {
    HttpResponse {
        status: StatusCode::OK,
        cookie: cookie.map(str::to_string),
        body: body.to_string(),
    }
}

pub fn with_status(code: u16) -> HttpResponse {
    HttpResponse {
        status: StatusCode::from_u16(code).unwrap(),
        cookie: None,
        body: "<html>Service Unavailable</html>".into(),
    }
}

pub fn handshake_ok() -> HttpResponse {
    HttpResponse {
        status: StatusCode::OK,
        cookie: Some("ASP.NET_SessionId=search123".into()),
        body: "<html></html>".into(),
    }
}

pub fn search_response(count: u64, ids: &[u64]) -> HttpResponse {
    let listings: Vec<Value> = ids
        .iter()
        .map(|id| json!({ "Listing": { "ID": id, "Address": format!("{id} Main St") } }))
        .collect();
    ok_json(json!({ "d": { "Count": count, "Listings": listings } }), None)
}

pub fn detail_response(doc: Value, cookie: Option<&str>) -> HttpResponse {
    ok_json(json!({ "d": doc }), cookie)
}

/// State as it looks right after discovery of `ids`.
pub fn discovered_state(ids: &[u64]) -> SessionState {
    let mut state = SessionState::new("Portland, OR");
    state.total_listings = ids.len() as u64;
    state.listings = ids
        .iter()
        .map(|id| crate::scraper::ListingSummary(json!({ "Listing": { "ID": id } })))
        .collect();
    state
}

pub fn calls(log: &EventLog) -> Vec<Event> {
    log.borrow()
        .iter()
        .filter(|e| matches!(e, Event::Call { .. }))
        .cloned()
        .collect()
}

pub fn stages(log: &EventLog) -> Vec<Stage> {
    log.borrow()
        .iter()
        .filter_map(|e| match e {
            Event::Call { stage, .. } => Some(*stage),
            Event::Pause(_) => None,
        })
        .collect()
}

pub fn sent_cookies(log: &EventLog) -> Vec<Option<String>> {
    log.borrow()
        .iter()
        .filter_map(|e| match e {
            Event::Call { cookie, .. } => Some(cookie.clone()),
            Event::Pause(_) => None,
        })
        .collect()
}

/// A detail document shaped like the upstream's.
pub fn sample_detail(id: u64) -> Value {
    json!({
        "ListingID": id,
        "DefaultParentArea": { "Name": "Buckman", "ID": 77 },
        "Zip": "97214",
        "Url": format!("/listing/{id}"),
        "Building": { "Name": "The Yard", "UnitCount": 284, "Floors": 21 },
        "BathsFull": 2,
        "BathsHalf": 1,
        "Beds": 3,
        "CurrentPrice": 525000,
        "Days": 12,
        "FullStreetAddress": "1234 SE Ankeny St",
        "Latitude": 45.5,
        "Longitude": -122.5,
        "ListDate": "2026-09-01",
        "LotSize": null,
        "OriginalPrice": 549000,
        "Ownership": "Fee Simple",
        "PropertyStyle": "Craftsman",
        "PropertyType": "Residential",
        "Remarks": "Charming home close to everything.",
        "SqFt": 1850,
        "TownhouseType": "",
        "UnitCount": null,
        "WalkScore": 94,
        "WalkScoreDescription": "Walker's Paradise",
        "YearBuilt": 1912,
        "Amenities": { "Pool": false, "Gym": true },
        "BuildingAmenities": [],
        "AgentName": "Not mapped",
        "Details": [
            {
                "Name": "Interior Features",
                "Fields": [
                    { "Name": "Elevator", "Value": "No" },
                    { "Name": "Living Room", "Value": "Main" },
                    { "Name": "Fireplace", "Value": "Wood" }
                ]
            },
            {
                "Name": "Utilities",
                "Fields": [
                    { "Name": "Sewer", "Value": "Public Sewer" },
                    { "Name": "Hot Water", "Value": "Gas" }
                ]
            },
            {
                "Name": "Exterior Features",
                "Fields": [
                    { "Name": "Roof", "Value": "Composition" }
                ]
            }
        ]
    })
}
