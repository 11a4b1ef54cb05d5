use crate::browser::BrowserError;
use crate::table_parser::ParseError;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Browser(#[from] BrowserError),
    #[error("Month {0} is outside 1-12")]
    InvalidMonth(u32),
    #[error("Failed to parse monthly table: {0}")]
    Parse(#[from] ParseError),
}
