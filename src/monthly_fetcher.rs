use std::ops::RangeInclusive;

use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use tracing::{debug, error, info, instrument};

use crate::browser::{self, BrowserSession, SessionFactory, WaitPolicy};
use crate::error::ScrapeError;
use crate::fetch_error::FetchError;
use crate::site::{self, SiteUrls};
use crate::table::{MonthlyTable, WeatherTable};
use crate::table_parser::parse_table;

/// Loads a station's monthly history tables, one browser session per month
pub struct MonthlyFetcher<'a, F: SessionFactory> {
    factory: &'a F,
    urls: SiteUrls,
    year: i32,
    months: RangeInclusive<u32>,
    max_concurrency: usize,
    wait: WaitPolicy,
    progress: ProgressBar,
}

impl<'a, F: SessionFactory> MonthlyFetcher<'a, F> {
    /// January through September of `year`, three sessions at a time
    pub fn new(factory: &'a F, urls: SiteUrls, year: i32) -> Self {
        Self {
            factory,
            urls,
            year,
            months: 1..=9,
            max_concurrency: 3,
            wait: WaitPolicy::default(),
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_months(mut self, months: RangeInclusive<u32>) -> Self {
        self.months = months;
        self
    }

    pub fn with_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn with_wait(mut self, wait: WaitPolicy) -> Self {
        self.wait = wait;
        self
    }

    /// Bar advanced once per finished month
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Fetch every configured month.
    ///
    /// Tables come back in completion order. If any month fails, the months
    /// still running are allowed to finish and close their sessions, then the
    /// first failure is returned and no partial result is kept.
    #[instrument(skip(self), fields(year = self.year))]
    pub async fn fetch(&self, station_code: &str) -> Result<Vec<MonthlyTable>, ScrapeError> {
        let months: Vec<u32> = self.months.clone().collect();
        self.progress.set_length(months.len() as u64);
        info!(
            "Fetching {} months with up to {} concurrent sessions",
            months.len(),
            self.max_concurrency
        );

        let results: Vec<(u32, Result<WeatherTable, FetchError>)> = stream::iter(months)
            .map(|month| async move {
                let result = self.fetch_in_own_session(station_code, month).await;
                self.progress.inc(1);
                (month, result)
            })
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;

        let mut tables = Vec::with_capacity(results.len());
        for (month, result) in results {
            match result {
                Ok(table) => {
                    debug!(month, rows = table.len(), "Month fetched");
                    tables.push(MonthlyTable {
                        year: self.year,
                        month,
                        table,
                    });
                }
                Err(source) => {
                    error!(month, error = %source, "Month fetch failed");
                    return Err(ScrapeError::Fetch {
                        year: self.year,
                        month,
                        source,
                    });
                }
            }
        }

        info!("Fetched {} monthly tables", tables.len());
        Ok(tables)
    }

    async fn fetch_in_own_session(
        &self,
        station_code: &str,
        month: u32,
    ) -> Result<WeatherTable, FetchError> {
        let session = self.factory.open().await?;
        let result = fetch_month(
            &session,
            &self.urls,
            station_code,
            self.year,
            month,
            self.wait,
        )
        .await;
        browser::release(session).await;
        result
    }
}

/// Load one month's dashboard table page and parse it
#[instrument(skip(session, urls, wait))]
pub async fn fetch_month<S: BrowserSession>(
    session: &S,
    urls: &SiteUrls,
    station_code: &str,
    year: i32,
    month: u32,
    wait: WaitPolicy,
) -> Result<WeatherTable, FetchError> {
    let url = urls
        .monthly_table_url(station_code, year, month)
        .ok_or(FetchError::InvalidMonth(month))?;

    session.goto(&url).await?;
    browser::wait_for_url(session, &url, wait).await?;
    session.wait_for_element(site::HISTORY_TABLE, wait).await?;

    let raw = session.text(site::HISTORY_TABLE).await?;
    debug!("Retrieved table text, size: {} bytes", raw.len());

    Ok(parse_table(&raw)?)
}
