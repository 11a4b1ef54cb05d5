use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pws_history::browser::WebDriverLauncher;
use pws_history::config::Config;
use pws_history::driver_status::DriverStatusClient;
use pws_history::history_scraper::HistoryScraper;
use pws_history::table::WeatherTable;
use pws_history::table_parser::parse_table;

#[derive(Parser)]
#[command(name = "pws-history")]
#[command(about = "Scrape a year of daily weather-station history for a municipality", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the station and fetch every configured month
    Scrape {
        /// Municipality name as it appears in the site's URL (e.g. "madrid")
        municipality: String,

        #[command(flatten)]
        overrides: Overrides,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the station code behind a municipality
    Resolve {
        municipality: String,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Parse a saved monthly table text file without a browser
    Parse {
        file: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Check that the WebDriver server accepts sessions
    Status {
        /// WebDriver server URL
        #[arg(long)]
        webdriver_url: Option<String>,
    },
}

/// Command-line values that take precedence over the environment
#[derive(Args)]
struct Overrides {
    /// WebDriver server URL
    #[arg(long)]
    webdriver_url: Option<String>,

    /// Base URL of the weather site
    #[arg(long)]
    base_url: Option<String>,

    /// Year to fetch
    #[arg(long)]
    year: Option<i32>,

    /// First month to fetch (1-12)
    #[arg(long)]
    first_month: Option<u32>,

    /// Last month to fetch (1-12)
    #[arg(long)]
    last_month: Option<u32>,

    /// Maximum concurrent browser sessions
    #[arg(long)]
    concurrency: Option<usize>,

    /// Seconds to wait for each page condition
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,
}

impl Overrides {
    fn apply(self, mut config: Config) -> Result<Config, Box<dyn std::error::Error>> {
        if let Some(v) = self.webdriver_url {
            config.webdriver_url = v;
        }
        if let Some(v) = self.base_url {
            config.site_base_url = v;
        }
        if let Some(v) = self.year {
            config.year = v;
        }
        if let Some(v) = self.first_month {
            config.first_month = v;
        }
        if let Some(v) = self.last_month {
            config.last_month = v;
        }
        if let Some(v) = self.concurrency {
            config.max_concurrency = v;
        }
        if let Some(v) = self.timeout_secs {
            config.wait_timeout_secs = v;
        }
        if self.headed {
            config.headless = false;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Args)]
struct OutputArgs {
    /// Write to this file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// One pretty-printed JSON document
    Json,
    /// One JSON object per daily row
    Jsonl,
}

fn render<T: Serialize>(
    document: &T,
    table: &WeatherTable,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(document),
        OutputFormat::Jsonl => {
            let mut out = String::new();
            for row in table.rows() {
                out.push_str(&serde_json::to_string(row)?);
                out.push('\n');
            }
            Ok(out)
        }
    }
}

fn emit(rendered: &str, output: Option<&Path>) -> std::io::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            info!("Wrote output to {}", path.display());
            Ok(())
        }
        None => {
            println!("{}", rendered.trim_end());
            Ok(())
        }
    }
}

fn launcher(config: &Config) -> WebDriverLauncher {
    WebDriverLauncher::new(config.webdriver_url.clone(), config.headless)
}

#[instrument(skip(config, output))]
async fn run_scrape(
    municipality: &str,
    config: Config,
    output: OutputArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    DriverStatusClient::new(config.webdriver_url.clone())
        .check_ready()
        .await?;

    let pb = ProgressBar::new(config.months().count() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} months")?
            .progress_chars("##-"),
    );

    let scraper = HistoryScraper::new(launcher(&config), config).with_progress(pb.clone());
    let history = scraper.scrape(municipality).await;
    pb.finish_and_clear();
    let history = history?;

    info!(
        "Scraped {} days for station {}",
        history.table.len(),
        history.station_code
    );

    let rendered = render(&history, &history.table, output.format)?;
    emit(&rendered, output.output.as_deref())?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout carries only data
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,pws_history=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Scrape {
            municipality,
            overrides,
            output,
        } => {
            let config = overrides.apply(Config::from_env()?)?;
            info!("Starting scrape with config: {:?}", config);
            run_scrape(&municipality, config, output).await?;
        }
        Command::Resolve {
            municipality,
            overrides,
        } => {
            let config = overrides.apply(Config::from_env()?)?;
            DriverStatusClient::new(config.webdriver_url.clone())
                .check_ready()
                .await?;
            let scraper = HistoryScraper::new(launcher(&config), config);
            let code = scraper.resolve(&municipality).await?;
            println!("{code}");
        }
        Command::Parse { file, output } => {
            let raw = std::fs::read_to_string(&file)?;
            let table = parse_table(&raw)?;
            info!("Parsed {} rows from {}", table.len(), file.display());
            let rendered = render(&table, &table, output.format)?;
            emit(&rendered, output.output.as_deref())?;
        }
        Command::Status { webdriver_url } => {
            let url = match webdriver_url {
                Some(url) => url,
                None => Config::from_env()?.webdriver_url,
            };
            let status = DriverStatusClient::new(url).status().await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
            if !status.ready {
                return Err(format!("WebDriver server not ready: {}", status.message).into());
            }
        }
    }

    Ok(())
}
