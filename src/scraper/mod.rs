pub mod api;
pub mod models;
mod scraper;
mod scraper_error;
pub mod transport;

pub use models::{ListingId, ListingSummary, SessionState};
pub use scraper::ListingScraper;
pub use scraper_error::{ScraperError, Stage};
