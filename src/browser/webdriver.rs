use thirtyfour::prelude::*;
use thirtyfour::ChromiumLikeCapabilities;
use tracing::{debug, instrument};

use super::{BrowserError, BrowserSession, Locator, SessionFactory, WaitPolicy};

/// Launches Chrome sessions through a chromedriver-compatible WebDriver server
#[derive(Debug, Clone)]
pub struct WebDriverLauncher {
    server_url: String,
    headless: bool,
}

impl WebDriverLauncher {
    pub fn new(server_url: String, headless: bool) -> Self {
        Self {
            server_url,
            headless,
        }
    }
}

impl SessionFactory for WebDriverLauncher {
    type Session = ChromeSession;

    #[instrument(skip(self), fields(server = %self.server_url, headless = self.headless))]
    async fn open(&self) -> Result<ChromeSession, BrowserError> {
        let mut caps = DesiredCapabilities::chrome();
        if self.headless {
            caps.set_headless()?;
        }

        let driver = WebDriver::new(self.server_url.as_str(), caps).await?;
        debug!("WebDriver session opened");
        Ok(ChromeSession { driver })
    }
}

/// A single Chrome window
pub struct ChromeSession {
    driver: WebDriver,
}

fn to_by(locator: Locator) -> By {
    match locator {
        Locator::Css(selector) => By::Css(selector),
        Locator::XPath(selector) => By::XPath(selector),
    }
}

impl BrowserSession for ChromeSession {
    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        debug!(url, "Navigating");
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn maximize_window(&self) -> Result<(), BrowserError> {
        self.driver.maximize_window().await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, BrowserError> {
        Ok(self.driver.current_url().await?.to_string())
    }

    async fn wait_for_element(
        &self,
        locator: Locator,
        wait: WaitPolicy,
    ) -> Result<(), BrowserError> {
        match self
            .driver
            .query(to_by(locator))
            .wait(wait.timeout, wait.poll_interval)
            .first()
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                debug!(error = %e, %locator, "Element wait failed");
                Err(BrowserError::Timeout {
                    condition: locator.to_string(),
                    timeout: wait.timeout,
                })
            }
        }
    }

    async fn enter_frame(&self, locator: Locator) -> Result<(), BrowserError> {
        let frame = self.driver.find(to_by(locator)).await?;
        frame.enter_frame().await?;
        Ok(())
    }

    async fn enter_default_frame(&self) -> Result<(), BrowserError> {
        self.driver.enter_default_frame().await?;
        Ok(())
    }

    async fn click(&self, locator: Locator) -> Result<(), BrowserError> {
        self.driver.find(to_by(locator)).await?.click().await?;
        Ok(())
    }

    async fn text(&self, locator: Locator) -> Result<String, BrowserError> {
        Ok(self.driver.find(to_by(locator)).await?.text().await?)
    }

    async fn close(self) -> Result<(), BrowserError> {
        self.driver.quit().await?;
        debug!("WebDriver session closed");
        Ok(())
    }
}
