/// Inspect a saved Daily Data Report page without hitting the network
use std::path::PathBuf;

use clap::Parser;
use climate_scraper::parser::{DailyDataPage, MalformedRowPolicy};

#[derive(Parser)]
#[command(name = "examine-page")]
#[command(about = "Parse a saved daily data report page and print what the scraper sees", long_about = None)]
struct Cli {
    /// Path to the saved HTML page
    file: PathBuf,

    /// Year the page was requested for
    #[arg(long)]
    year: i32,

    /// Month (1-12) the page was requested for
    #[arg(long)]
    month: u32,

    /// Station name to put on the records
    #[arg(long, default_value = "unknown")]
    station: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    println!("Opening page: {}", cli.file.display());
    let html = std::fs::read_to_string(&cli.file)?;
    let page = DailyDataPage::parse(&html);

    match page.reported_month() {
        Some(month) => println!("Reported month: {month}"),
        None => println!("Reported month: [heading not found]"),
    }
    match page.verify_month(cli.month) {
        Ok(()) => println!("Month check: OK"),
        Err(e) => println!("Month check: FAILED ({e})"),
    }

    println!("Table rows: {}", page.table_rows().len());
    println!("Data rows: {}", page.data_rows().len());
    println!("{}", "=".repeat(100));

    let records = page.records(&cli.station, cli.year, cli.month, MalformedRowPolicy::EmitEmpty);
    for (idx, record) in records.enumerate() {
        if record.date.is_empty() {
            println!("Row {:3}: [malformed]", idx + 1);
            continue;
        }
        println!(
            "Row {:3}: {} max={} min={} mean={} rain={} snow={} precip={} gust={}@{}",
            idx + 1,
            record.date,
            record.max_temp,
            record.min_temp,
            record.mean_temp,
            record.total_rain_mm,
            record.total_snow_cm,
            record.total_precip_mm,
            record.spd_of_max_gust_kmh,
            record.dir_of_max_gust_10s_deg,
        );
    }

    Ok(())
}
