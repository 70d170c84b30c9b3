use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use school_calendar_scraper::utils::data::{
    save_athletic_events_to_csv, save_school_calendars_to_csv,
};
use school_calendar_scraper::{
    scrape_athletics_calendar, scrape_athletics_teams, scrape_school_calendars, HttpFetcher,
    ScraperConfig,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cli", about = "Scrape the school's calendars into JSON")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Reuse the last scrape from the cache directory if there is one
    #[arg(long, global = true)]
    use_cache: bool,

    /// Also write the events as CSV
    #[arg(long, global = true, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Print JSON on a single line
    #[arg(long, global = true)]
    compact: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Lower, Middle and Upper School calendars
    School,
    /// Athletics calendar with event details
    Athletics,
    /// Athletics teams by season
    Teams,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = ScraperConfig::from_env()?;
    let fetcher = HttpFetcher::new(&config.user_agent, config.request_timeout)
        .context("Failed to build HTTP client")?;

    // USE_CACHE=1 works like --use-cache
    let use_cache = cli.use_cache || std::env::var("USE_CACHE").unwrap_or_default() == "1";

    match cli.command {
        Command::School => {
            let calendars = scrape_school_calendars(&config, &fetcher, use_cache).await?;
            if let Some(path) = &cli.csv {
                save_school_calendars_to_csv(&calendars, path)?;
                eprintln!("Saved school calendars to {}", path.display());
            }
            print_json(&calendars, cli.compact)?;
        }
        Command::Athletics => {
            let days = scrape_athletics_calendar(&config, &fetcher, use_cache).await?;
            if let Some(path) = &cli.csv {
                save_athletic_events_to_csv(&days, path)?;
                eprintln!("Saved athletic events to {}", path.display());
            }
            print_json(&days, cli.compact)?;
        }
        Command::Teams => {
            let teams = scrape_athletics_teams(&config, &fetcher, use_cache).await?;
            if cli.csv.is_some() {
                eprintln!("CSV export is only available for calendars");
            }
            print_json(&teams, cli.compact)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", json);
    Ok(())
}
