use std::io::{self, BufWriter};
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use climate_scraper::config::{
    parse_run_date, Config, ConfigError, DEFAULT_BASE_URL, DEFAULT_CONCURRENCY,
    DEFAULT_TIMEOUT_SECS,
};
use climate_scraper::crawler::{crawl, CrawlOptions};
use climate_scraper::fetcher::ClimateDataFetcher;
use climate_scraper::parser::MalformedRowPolicy;
use climate_scraper::planner::RequestPlanner;
use climate_scraper::sink::{JsonLinesSink, RecordSink};
use climate_scraper::stations::{Station, StationTable};

#[derive(Parser, Debug)]
#[command(name = "climate-scraper")]
#[command(about = "Scrape daily weather observations from the Environment Canada climate site", long_about = None)]
struct Cli {
    /// First month to scrape (YYYY-MM or YYYY-MM-DD)
    #[arg(long, env = "RUN_FROM", value_parser = parse_run_date)]
    run_from: Option<NaiveDate>,

    /// Last month to scrape, inclusive (default: current month)
    #[arg(long, env = "RUN_TO", value_parser = parse_run_date)]
    run_to: Option<NaiveDate>,

    /// Daily data report URL
    #[arg(long, env = "CLIMATE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Number of pages fetched in parallel
    #[arg(long, env = "FETCH_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// HTTP request timeout in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Write JSON lines to this file instead of stdout
    #[arg(long, env = "OUTPUT_PATH")]
    output: Option<PathBuf>,

    /// Station to scrape as ID=NAME; repeat for several (default: London, ON stations)
    #[arg(
        long = "station",
        value_name = "ID=NAME",
        env = "CLIMATE_STATIONS",
        value_delimiter = ';'
    )]
    stations: Vec<Station>,

    /// Drop day rows with fewer than 2 cells instead of emitting an empty record
    #[arg(
        long,
        env = "SKIP_MALFORMED_ROWS",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    skip_malformed_rows: bool,
}

impl Cli {
    fn into_config(self) -> Result<Config, ConfigError> {
        let mut config = Config::new(self.run_from, self.run_to)?;

        config.base_url = self.base_url;
        config.concurrency = self.concurrency;
        config.timeout_secs = self.timeout_secs;
        config.output_path = self.output;
        if !self.stations.is_empty() {
            config.stations = StationTable::new(self.stations)?;
        }
        if self.skip_malformed_rows {
            config.malformed_rows = MalformedRowPolicy::Skip;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Records go to stdout, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,climate_scraper=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    dotenvy::dotenv().ok();

    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };
    info!("Starting climate scraper with config: {:?}", config);

    let planner = RequestPlanner::from_config(&config);
    let targets = planner.plan(Some(config.run_from), config.run_to)?;
    if targets.is_empty() {
        info!("Nothing to fetch");
        return Ok(());
    }

    let fetcher = ClimateDataFetcher::new(config.timeout_secs)?;

    let mut sink: Box<dyn RecordSink> = match &config.output_path {
        Some(path) => Box::new(JsonLinesSink::create(path)?),
        None => Box::new(JsonLinesSink::new(BufWriter::new(io::stdout()))),
    };

    let pb = ProgressBar::new(targets.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} pages ({msg})")?
            .progress_chars("##-"),
    );

    let options = CrawlOptions {
        concurrency: config.concurrency,
        malformed_rows: config.malformed_rows,
    };

    let summary = crawl(targets, &fetcher, options, sink.as_mut(), |progress| {
        pb.set_position(progress.completed() as u64);
        pb.set_message(format!(
            "{} records, {} skipped, {} failed",
            progress.records, progress.pages_skipped, progress.fetch_failures
        ));
    })
    .await?;

    pb.finish_with_message(format!(
        "Complete: {} records from {} pages",
        summary.records, summary.pages_parsed
    ));

    Ok(())
}
