#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use pws_history::browser::{BrowserError, BrowserSession, Locator, SessionFactory, WaitPolicy};
use pws_history::site;

pub const BASE_URL: &str = "https://www.wunderground.com";

/// One scripted page of the fake site
#[derive(Clone, Default)]
pub struct FakePage {
    /// Elements present in the main document
    pub elements: HashSet<Locator>,
    /// Elements present inside the consent iframe
    pub frame_elements: HashSet<Locator>,
    pub texts: HashMap<Locator, String>,
    /// Clicking one of these navigates to the mapped URL
    pub links: HashMap<Locator, String>,
    /// Elements that cannot be clicked while the consent dialog is up
    pub requires_consent: HashSet<Locator>,
    /// Navigating here actually lands on this URL
    pub redirect: Option<String>,
}

#[derive(Default)]
pub struct SiteState {
    pub visited: Vec<String>,
    pub events: Vec<String>,
    pub opened: usize,
    pub closed: usize,
    pub open_now: usize,
    pub max_open: usize,
}

/// In-memory stand-in for the weather site plus the browser driving it
#[derive(Default)]
pub struct FakeSite {
    pub pages: HashMap<String, FakePage>,
    pub state: Mutex<SiteState>,
    pub refuse_sessions: bool,
}

impl FakeSite {
    pub fn visited(&self) -> Vec<String> {
        self.state.lock().unwrap().visited.clone()
    }

    pub fn events(&self) -> Vec<String> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn opened(&self) -> usize {
        self.state.lock().unwrap().opened
    }

    pub fn closed(&self) -> usize {
        self.state.lock().unwrap().closed
    }

    pub fn max_open(&self) -> usize {
        self.state.lock().unwrap().max_open
    }

    fn record(&self, event: String) {
        self.state.lock().unwrap().events.push(event);
    }
}

#[derive(Clone)]
pub struct FakeFactory {
    pub site: Arc<FakeSite>,
}

impl FakeFactory {
    pub fn new(site: FakeSite) -> Self {
        Self {
            site: Arc::new(site),
        }
    }
}

impl SessionFactory for FakeFactory {
    type Session = FakeSession;

    async fn open(&self) -> Result<FakeSession, BrowserError> {
        if self.site.refuse_sessions {
            return Err(BrowserError::ElementNotFound("session refused".to_string()));
        }
        {
            let mut state = self.site.state.lock().unwrap();
            state.opened += 1;
            state.open_now += 1;
            state.max_open = state.max_open.max(state.open_now);
        }
        Ok(FakeSession {
            site: self.site.clone(),
            current: Mutex::new("about:blank".to_string()),
            in_frame: Mutex::new(false),
            consent_rejected: Mutex::new(false),
        })
    }
}

pub struct FakeSession {
    site: Arc<FakeSite>,
    current: Mutex<String>,
    in_frame: Mutex<bool>,
    consent_rejected: Mutex<bool>,
}

impl FakeSession {
    fn page(&self) -> FakePage {
        let current = self.current.lock().unwrap().clone();
        self.site.pages.get(&current).cloned().unwrap_or_default()
    }

    fn present(&self, locator: Locator) -> bool {
        let page = self.page();
        if *self.in_frame.lock().unwrap() {
            page.frame_elements.contains(&locator)
        } else {
            page.elements.contains(&locator)
        }
    }
}

impl BrowserSession for FakeSession {
    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        // Let other month tasks run so sessions overlap
        tokio::task::yield_now().await;

        let landed = self
            .site
            .pages
            .get(url)
            .and_then(|p| p.redirect.clone())
            .unwrap_or_else(|| url.to_string());
        *self.current.lock().unwrap() = landed;
        *self.in_frame.lock().unwrap() = false;

        let mut state = self.site.state.lock().unwrap();
        state.visited.push(url.to_string());
        state.events.push(format!("goto {url}"));
        Ok(())
    }

    async fn maximize_window(&self) -> Result<(), BrowserError> {
        self.site.record("maximize".to_string());
        Ok(())
    }

    async fn current_url(&self) -> Result<String, BrowserError> {
        Ok(self.current.lock().unwrap().clone())
    }

    async fn wait_for_element(
        &self,
        locator: Locator,
        wait: WaitPolicy,
    ) -> Result<(), BrowserError> {
        if self.present(locator) {
            Ok(())
        } else {
            Err(BrowserError::Timeout {
                condition: locator.to_string(),
                timeout: wait.timeout,
            })
        }
    }

    async fn enter_frame(&self, locator: Locator) -> Result<(), BrowserError> {
        if !self.present(locator) {
            return Err(BrowserError::ElementNotFound(locator.to_string()));
        }
        *self.in_frame.lock().unwrap() = true;
        self.site.record("enter_frame".to_string());
        Ok(())
    }

    async fn enter_default_frame(&self) -> Result<(), BrowserError> {
        *self.in_frame.lock().unwrap() = false;
        self.site.record("default_frame".to_string());
        Ok(())
    }

    async fn click(&self, locator: Locator) -> Result<(), BrowserError> {
        if !self.present(locator) {
            return Err(BrowserError::ElementNotFound(locator.to_string()));
        }
        let page = self.page();
        if page.requires_consent.contains(&locator) && !*self.consent_rejected.lock().unwrap() {
            return Err(BrowserError::ElementNotFound(format!(
                "{locator} is covered by the consent dialog"
            )));
        }
        if locator == site::CONSENT_REJECT_BUTTON {
            *self.consent_rejected.lock().unwrap() = true;
        }
        self.site.record(format!("click {}", locator.selector()));

        if let Some(target) = page.links.get(&locator) {
            *self.current.lock().unwrap() = target.clone();
            *self.in_frame.lock().unwrap() = false;
        }
        Ok(())
    }

    async fn text(&self, locator: Locator) -> Result<String, BrowserError> {
        if !self.present(locator) {
            return Err(BrowserError::ElementNotFound(locator.to_string()));
        }
        self.page()
            .texts
            .get(&locator)
            .cloned()
            .ok_or_else(|| BrowserError::ElementNotFound(locator.to_string()))
    }

    async fn close(self) -> Result<(), BrowserError> {
        let mut state = self.site.state.lock().unwrap();
        state.closed += 1;
        state.open_now -= 1;
        Ok(())
    }
}

/// Text of a monthly table as the site renders it: two header lines, then
/// one unit-suffixed row per day
pub fn month_text(year: i32, month: u32, days: u32) -> String {
    let mut lines = vec![
        "Date Temperature Dew Point Humidity Speed Pressure Precip. Accum.".to_string(),
        "High Avg Low High Avg Low High Avg Low High Avg Low High Low Sum".to_string(),
    ];
    for day in 1..=days {
        let t = 50 + (day % 10);
        lines.push(format!(
            "{month}/{day}/{year} {} °F {} °F {} °F {} °F {} °F {} °F {} % {} % {} % {} mph {} mph {} mph 30.{:02} in 29.{:02} in 0.{:02} in",
            t + 10,
            t,
            t - 10,
            t - 5,
            t - 8,
            t - 12,
            90,
            70 + month,
            40,
            15,
            5,
            0,
            day,
            day,
            month,
        ));
    }
    lines.join("\n")
}

pub fn municipality_url(municipality: &str) -> String {
    format!("{BASE_URL}/weather/es/{municipality}")
}

pub fn dashboard_url(code: &str) -> String {
    format!("{BASE_URL}/dashboard/pws/{code}")
}

pub fn month_url(code: &str, year: i32, month: u32) -> String {
    format!("{BASE_URL}/dashboard/pws/{code}/table/{year}-{month}-1/{year}-{month}-1/monthly")
}

/// Municipality page with its consent dialog and station link
pub fn municipality_page(code: &str) -> FakePage {
    FakePage {
        elements: [site::CONSENT_IFRAME, site::STATION_LINK].into_iter().collect(),
        frame_elements: [site::CONSENT_REJECT_BUTTON].into_iter().collect(),
        links: [(site::STATION_LINK, dashboard_url(code))].into_iter().collect(),
        requires_consent: [site::STATION_LINK].into_iter().collect(),
        ..FakePage::default()
    }
}

pub fn dashboard_page(heading: &str) -> FakePage {
    FakePage {
        elements: [site::DASHBOARD_HEADING].into_iter().collect(),
        texts: [(site::DASHBOARD_HEADING, heading.to_string())]
            .into_iter()
            .collect(),
        ..FakePage::default()
    }
}

pub fn table_page(text: String) -> FakePage {
    FakePage {
        elements: [site::HISTORY_TABLE].into_iter().collect(),
        texts: [(site::HISTORY_TABLE, text)].into_iter().collect(),
        ..FakePage::default()
    }
}

/// Complete site for one municipality: resolution pages plus months 1-9 of
/// `year`, month `m` having `m + 20` days
pub fn full_site(municipality: &str, code: &str, year: i32) -> FakeSite {
    let mut site = FakeSite::default();
    site.pages
        .insert(municipality_url(municipality), municipality_page(code));
    site.pages.insert(
        dashboard_url(code),
        dashboard_page(&format!("Centro - {code}")),
    );
    for month in 1..=9 {
        site.pages.insert(
            month_url(code, year, month),
            table_page(month_text(year, month, month + 20)),
        );
    }
    site
}
