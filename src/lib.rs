pub mod browser;
pub mod config;
pub mod driver_status;
pub mod error;
pub mod fetch_error;
pub mod history_scraper;
pub mod monthly_fetcher;
pub mod site;
pub mod station_resolver;
pub mod table;
pub mod table_parser;
pub mod utils;
