use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("WebDriver command failed: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error("Timed out after {timeout:?} waiting for {condition}")]
    Timeout { condition: String, timeout: Duration },

    #[error("No element matches {0}")]
    ElementNotFound(String),
}
