pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod scrapers;
pub mod utils;

pub use api::{fetch_all, HtmlFetcher, HttpFetcher};
pub use config::{CalendarOptions, ScraperConfig};
pub use error::{FetchError, ScrapeError, ScrapeResult};
pub use models::*;

use anyhow::{Context, Result};
use scrapers::athletics_calendar::parse_athletics_calendar;
use scrapers::athletics_teams::parse_athletics_teams;
use scrapers::school_calendar::parse_school_calendar;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};
use utils::data::{load_from_cache, save_to_cache, CacheEnvelope};

/// Calendar name -> that calendar's days
pub type SchoolCalendars = BTreeMap<String, Vec<DayRecord<GeneralEvent>>>;

/// Fetch every named calendar page at once and parse each with `parse`.
///
/// Any page that can't be fetched or parsed fails the whole call.
pub async fn scrape_calendars<F, P, T>(
    calendars: &BTreeMap<String, String>,
    fetcher: &F,
    parse: P,
) -> Result<BTreeMap<String, T>>
where
    F: HtmlFetcher + ?Sized,
    P: Fn(&str) -> ScrapeResult<T>,
{
    let (names, urls): (Vec<&String>, Vec<String>) = calendars
        .iter()
        .map(|(name, url)| (name, url.clone()))
        .unzip();

    let pages = fetch_all(fetcher, &urls).await;

    names
        .into_iter()
        .zip(pages)
        .map(|(name, page)| {
            let html = page.with_context(|| format!("Failed to fetch {} calendar", name))?;
            let parsed = parse(&html).with_context(|| format!("Failed to parse {} calendar", name))?;
            Ok((name.clone(), parsed))
        })
        .collect()
}

/// All configured school calendars, from the site or the cache
pub async fn scrape_school_calendars<F>(
    config: &ScraperConfig,
    fetcher: &F,
    use_cache: bool,
) -> Result<SchoolCalendars>
where
    F: HtmlFetcher + ?Sized,
{
    let cache_file = config.cache_dir.join("school_calendars.json");
    if let Some(cached) = cached(use_cache, &cache_file)? {
        return Ok(cached);
    }

    let calendars = scrape_calendars(&config.school_calendars, fetcher, parse_school_calendar)
        .await
        .context("Failed to scrape school calendars")?;

    info!(calendars = calendars.len(), "scraped school calendars");
    save_to_cache(&calendars, &cache_file)?;
    Ok(calendars)
}

/// Every team on the athletics teams page
pub async fn scrape_athletics_teams<F>(
    config: &ScraperConfig,
    fetcher: &F,
    use_cache: bool,
) -> Result<Vec<Team>>
where
    F: HtmlFetcher + ?Sized,
{
    let cache_file = config.cache_dir.join("athletics_teams.json");
    if let Some(cached) = cached(use_cache, &cache_file)? {
        return Ok(cached);
    }

    let html = fetcher
        .fetch_html(&config.athletics_teams_url)
        .await
        .context("Failed to fetch athletics teams page")?;
    let options = config.calendar_options()?;
    let teams =
        parse_athletics_teams(&html, &options).context("Failed to parse athletics teams page")?;

    info!(teams = teams.len(), "scraped athletics teams");
    save_to_cache(&teams, &cache_file)?;
    Ok(teams)
}

/// The athletics calendar, restricted to the teams currently listed
pub async fn scrape_athletics_calendar<F>(
    config: &ScraperConfig,
    fetcher: &F,
    use_cache: bool,
) -> Result<Vec<DayRecord<AthleticEvent>>>
where
    F: HtmlFetcher + ?Sized,
{
    let cache_file = config.cache_dir.join("athletics_calendar.json");
    if let Some(cached) = cached(use_cache, &cache_file)? {
        return Ok(cached);
    }

    let (teams, page) = tokio::join!(
        scrape_athletics_teams(config, fetcher, use_cache),
        fetcher.fetch_html(&config.athletics_calendar_url),
    );
    let registry = TeamRegistry::from_teams(teams?, config.always_away_team_ids.iter().copied());
    if registry.is_empty() {
        warn!("no athletics teams listed; every event will be dropped");
    }
    let html = page.context("Failed to fetch athletics calendar page")?;
    let options = config.calendar_options()?;

    let days = parse_athletics_calendar(&html, fetcher, &registry, &options)
        .await
        .context("Failed to parse athletics calendar page")?;

    info!(
        days = days.len(),
        teams = registry.len(),
        "scraped athletics calendar"
    );
    save_to_cache(&days, &cache_file)?;
    Ok(days)
}

fn cached<T: serde::de::DeserializeOwned>(use_cache: bool, cache_file: &Path) -> Result<Option<T>> {
    if !use_cache || !cache_file.exists() {
        return Ok(None);
    }

    let envelope: CacheEnvelope<T> = load_from_cache(cache_file)?;
    info!(
        file = %cache_file.display(),
        scraped_at = %envelope.scraped_at,
        "loaded from cache"
    );
    Ok(Some(envelope.data))
}
