/// URL scheme and element locators for the Weather Underground pages
///
/// Everything here mirrors the site's current HTML structure. A layout change
/// on the site means updating these constants.
use chrono::{Datelike, NaiveDate};

use crate::browser::Locator;

/// Cookie-consent iframe injected over the municipality page
pub const CONSENT_IFRAME: Locator = Locator::XPath(r#"//*[@id="sp_message_iframe_1165301"]"#);

/// "Reject" button inside the consent iframe
pub const CONSENT_REJECT_BUTTON: Locator = Locator::Css(
    "#notice > div.message-component.message-row.cta-buttons-container > \
     div.message-component.message-column.cta-button-column.reject-column > button",
);

/// Link from the city header to the station's dashboard
pub const STATION_LINK: Locator = Locator::Css(
    "#inner-content > div.region-content-top > lib-city-header > \
     div:nth-child(1) > div > div > a.station-name",
);

/// Dashboard heading, text looks like "Station Name - ICODE123"
pub const DASHBOARD_HEADING: Locator = Locator::Css(
    "#inner-content > div.region-content-top > app-dashboard-header > \
     div.dashboard__header.small-12.ng-star-inserted > div > div.heading > h1",
);

/// Monthly history table on the dashboard table page
pub const HISTORY_TABLE: Locator = Locator::Css(
    "#main-page-content > div > div > div > lib-history > div.history-tabs > \
     lib-history-table > div > div",
);

#[derive(Debug, Clone)]
pub struct SiteUrls {
    base_url: String,
}

impl SiteUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Municipality landing page, name inserted verbatim
    pub fn municipality_url(&self, municipality: &str) -> String {
        format!("{}/weather/es/{municipality}", self.base_url)
    }

    /// Dashboard table page covering the whole `month` of `year`.
    /// Returns `None` for a month outside 1-12.
    pub fn monthly_table_url(&self, station_code: &str, year: i32, month: u32) -> Option<String> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let day = format!("{}-{}-{}", start.year(), start.month(), start.day());
        Some(format!(
            "{}/dashboard/pws/{station_code}/table/{day}/{day}/monthly",
            self.base_url
        ))
    }
}

impl Default for SiteUrls {
    fn default() -> Self {
        Self::new("https://www.wunderground.com")
    }
}
