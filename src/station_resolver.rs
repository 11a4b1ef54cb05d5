use tracing::{debug, info, instrument};

use crate::browser::{BrowserError, BrowserSession, WaitPolicy};
use crate::site::{self, SiteUrls};
use crate::utils;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("Could not read station code from heading {heading:?}")]
    MissingDelimiter { heading: String },
}

/// Find the station code behind a municipality's weather page.
///
/// Navigates to the municipality page, rejects the cookie-consent dialog,
/// follows the station link and reads the code from the dashboard heading.
/// The session is left on the station dashboard.
#[instrument(skip(session, urls, wait))]
pub async fn resolve_station<S: BrowserSession>(
    session: &S,
    urls: &SiteUrls,
    municipality: &str,
    wait: WaitPolicy,
) -> Result<String, ResolveError> {
    let url = urls.municipality_url(municipality);
    session.goto(&url).await?;
    session.maximize_window().await?;

    debug!("Waiting for cookie-consent dialog");
    session.wait_for_element(site::CONSENT_IFRAME, wait).await?;
    session.enter_frame(site::CONSENT_IFRAME).await?;
    session
        .wait_for_element(site::CONSENT_REJECT_BUTTON, wait)
        .await?;
    session.click(site::CONSENT_REJECT_BUTTON).await?;
    session.enter_default_frame().await?;
    debug!("Cookie consent rejected");

    session.wait_for_element(site::STATION_LINK, wait).await?;
    session.click(site::STATION_LINK).await?;

    session.wait_for_element(site::DASHBOARD_HEADING, wait).await?;
    let heading = session.text(site::DASHBOARD_HEADING).await?;
    debug!(%heading, "Read dashboard heading");

    let code = utils::extract_station_code(&heading)
        .map_err(|_| ResolveError::MissingDelimiter { heading })?;

    info!(station_code = %code, "Resolved station");
    Ok(code)
}
