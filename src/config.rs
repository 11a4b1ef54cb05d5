use std::env;
use std::ops::RangeInclusive;
use std::time::Duration;

use crate::browser::WaitPolicy;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
    #[error("Invalid month range {first}..={last} (months must be 1-12, first <= last)")]
    MonthRange { first: u32, last: u32 },
    #[error("Concurrency must be at least 1")]
    ZeroConcurrency,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub webdriver_url: String,
    pub site_base_url: String,
    pub year: i32,
    pub first_month: u32,
    pub last_month: u32,
    pub max_concurrency: usize,
    pub wait_timeout_secs: u64,
    pub wait_poll_millis: u64,
    pub headless: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            webdriver_url: "http://localhost:9515".to_string(),
            site_base_url: "https://www.wunderground.com".to_string(),
            year: 2024,
            first_month: 1,
            last_month: 9,
            max_concurrency: 3,
            wait_timeout_secs: 10,
            wait_poll_millis: 250,
            headless: true,
        }
    }
}

fn var_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();
        let config = Config {
            webdriver_url: env::var("WEBDRIVER_URL").unwrap_or(defaults.webdriver_url),
            site_base_url: env::var("SITE_BASE_URL").unwrap_or(defaults.site_base_url),
            year: var_or("SCRAPE_YEAR", defaults.year)?,
            first_month: var_or("SCRAPE_FIRST_MONTH", defaults.first_month)?,
            last_month: var_or("SCRAPE_LAST_MONTH", defaults.last_month)?,
            max_concurrency: var_or("SCRAPE_CONCURRENCY", defaults.max_concurrency)?,
            wait_timeout_secs: var_or("WAIT_TIMEOUT_SECS", defaults.wait_timeout_secs)?,
            wait_poll_millis: var_or("WAIT_POLL_MILLIS", defaults.wait_poll_millis)?,
            headless: var_or("BROWSER_HEADLESS", defaults.headless)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.first_month < 1 || self.last_month > 12 || self.first_month > self.last_month {
            return Err(ConfigError::MonthRange {
                first: self.first_month,
                last: self.last_month,
            });
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(())
    }

    pub fn months(&self) -> RangeInclusive<u32> {
        self.first_month..=self.last_month
    }

    pub fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy {
            timeout: Duration::from_secs(self.wait_timeout_secs),
            poll_interval: Duration::from_millis(self.wait_poll_millis),
        }
    }
}
