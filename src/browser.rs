// Browser automation seam
//
// The resolver and fetcher only talk to the `BrowserSession` trait. The
// production implementation drives chromedriver through thirtyfour; tests
// plug in a scripted in-memory site.

pub mod error;
pub mod webdriver;

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, instrument, warn};

pub use error::BrowserError;
pub use webdriver::{ChromeSession, WebDriverLauncher};

/// How an element is located on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locator {
    Css(&'static str),
    XPath(&'static str),
}

impl Locator {
    pub fn selector(&self) -> &'static str {
        match self {
            Locator::Css(s) | Locator::XPath(s) => s,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css `{s}`"),
            Locator::XPath(s) => write!(f, "xpath `{s}`"),
        }
    }
}

/// Timeout and poll interval applied to every wait condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(250),
        }
    }
}

/// One browser window with its own navigation and frame state
#[allow(async_fn_in_trait)]
pub trait BrowserSession {
    async fn goto(&self, url: &str) -> Result<(), BrowserError>;

    async fn maximize_window(&self) -> Result<(), BrowserError>;

    async fn current_url(&self) -> Result<String, BrowserError>;

    /// Poll until an element matching `locator` is present in the active frame
    async fn wait_for_element(&self, locator: Locator, wait: WaitPolicy)
        -> Result<(), BrowserError>;

    /// Switch the active context into the iframe matched by `locator`
    async fn enter_frame(&self, locator: Locator) -> Result<(), BrowserError>;

    async fn enter_default_frame(&self) -> Result<(), BrowserError>;

    async fn click(&self, locator: Locator) -> Result<(), BrowserError>;

    async fn text(&self, locator: Locator) -> Result<String, BrowserError>;

    /// Release the session. Consumes it so it cannot be used afterwards.
    async fn close(self) -> Result<(), BrowserError>
    where
        Self: Sized;
}

/// Opens fresh, isolated browser sessions
#[allow(async_fn_in_trait)]
pub trait SessionFactory {
    type Session: BrowserSession;

    async fn open(&self) -> Result<Self::Session, BrowserError>;
}

/// Poll the session's current URL until it equals `expected`
#[instrument(skip(session, wait), fields(timeout = ?wait.timeout))]
pub async fn wait_for_url<S: BrowserSession>(
    session: &S,
    expected: &str,
    wait: WaitPolicy,
) -> Result<(), BrowserError> {
    let deadline = Instant::now() + wait.timeout;

    loop {
        let current = session.current_url().await?;
        if current == expected {
            debug!("URL matched");
            return Ok(());
        }

        if Instant::now() >= deadline {
            return Err(BrowserError::Timeout {
                condition: format!("URL to be {expected} (last seen {current})"),
                timeout: wait.timeout,
            });
        }

        tokio::time::sleep(wait.poll_interval).await;
    }
}

/// Close a session, logging instead of failing if the close itself errors
pub async fn release<S: BrowserSession>(session: S) {
    if let Err(e) = session.close().await {
        warn!(error = %e, "Failed to close browser session");
    }
}
