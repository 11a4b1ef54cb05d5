use crate::browser::BrowserError;
use crate::fetch_error::FetchError;
use crate::station_resolver::ResolveError;

/// Failure of a whole scrape run
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("Station resolution failed for '{municipality}': {source}")]
    Resolution {
        municipality: String,
        #[source]
        source: ResolveError,
    },

    #[error("Fetching {year}-{month:02} failed: {source}")]
    Fetch {
        year: i32,
        month: u32,
        #[source]
        source: FetchError,
    },

    #[error("Browser session error: {0}")]
    Session(#[from] BrowserError),
}
