use indicatif::ProgressBar;
use tracing::{info, instrument};

use crate::browser::{self, SessionFactory};
use crate::config::Config;
use crate::error::ScrapeError;
use crate::monthly_fetcher::MonthlyFetcher;
use crate::site::SiteUrls;
use crate::station_resolver::resolve_station;
use crate::table::{StationHistory, WeatherTable};

/// Runs the resolve -> fetch -> concatenate workflow for a municipality
pub struct HistoryScraper<F: SessionFactory> {
    factory: F,
    config: Config,
    urls: SiteUrls,
    progress: ProgressBar,
}

impl<F: SessionFactory> HistoryScraper<F> {
    pub fn new(factory: F, config: Config) -> Self {
        let urls = SiteUrls::new(config.site_base_url.clone());
        Self {
            factory,
            config,
            urls,
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve the station code in a dedicated session, closed afterwards
    #[instrument(skip(self))]
    pub async fn resolve(&self, municipality: &str) -> Result<String, ScrapeError> {
        let session = self.factory.open().await?;
        let result = resolve_station(
            &session,
            &self.urls,
            municipality,
            self.config.wait_policy(),
        )
        .await;
        browser::release(session).await;

        result.map_err(|source| ScrapeError::Resolution {
            municipality: municipality.to_string(),
            source,
        })
    }

    /// Full run: resolve the station, fetch every month, concatenate
    #[instrument(skip(self))]
    pub async fn scrape(&self, municipality: &str) -> Result<StationHistory, ScrapeError> {
        let station_code = self.resolve(municipality).await?;

        let monthly = MonthlyFetcher::new(&self.factory, self.urls.clone(), self.config.year)
            .with_months(self.config.months())
            .with_concurrency(self.config.max_concurrency)
            .with_wait(self.config.wait_policy())
            .with_progress(self.progress.clone())
            .fetch(&station_code)
            .await?;

        let table = WeatherTable::concat(monthly.into_iter().map(|m| m.table));
        info!(
            station_code = %station_code,
            rows = table.len(),
            "Consolidated station history"
        );

        Ok(StationHistory {
            municipality: municipality.to_string(),
            station_code,
            year: self.config.year,
            table,
        })
    }
}

/// Scrape one municipality with the given session factory and config
pub async fn scrape_municipality<F: SessionFactory>(
    factory: F,
    config: Config,
    municipality: &str,
) -> Result<StationHistory, ScrapeError> {
    HistoryScraper::new(factory, config)
        .scrape(municipality)
        .await
}
