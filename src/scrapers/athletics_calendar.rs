use crate::api::fetcher::HtmlFetcher;
use crate::api::orchestrator::fetch_all;
use crate::config::CalendarOptions;
use crate::error::{FetchError, ScrapeError, ScrapeResult};
use crate::models::{AthleticEvent, DayHeader, DayInfo, DayRecord, TeamRegistry};
use crate::scrapers::day_header::{parse_day_header, DayHeaderSelectors};
use crate::scrapers::detail_page::parse_detail_page;
use crate::scrapers::title::{parse_title, GrammarOptions};
use crate::utils::html::{has_class, is_cancelled, query_id, resolve_url, selector};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

/// An admitted event entry from the calendar listing, before its detail page is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEvent {
    pub event_id: u32,
    pub team_id: u32,
    pub team_name: String,
    pub is_home: bool,
    pub detail_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListedDay {
    pub header: DayHeader,
    pub events: Vec<ListedEvent>,
}

struct ListingSelectors {
    day: Selector,
    header: Selector,
    entry: Selector,
    link: Selector,
    header_fields: DayHeaderSelectors,
}

impl ListingSelectors {
    fn new() -> ScrapeResult<Self> {
        Ok(Self {
            day: selector(".calendar-day")?,
            header: selector("dt")?,
            entry: selector("dd")?,
            link: selector("a")?,
            header_fields: DayHeaderSelectors::new()?,
        })
    }
}

/// Parse the athletics calendar page, fetching every event's detail page.
///
/// All detail pages across all days are requested at once. Days and events
/// come back in page order; events that are cancelled, belong to a team
/// outside `registry`, or whose detail page can't be used are left out.
pub async fn parse_athletics_calendar<F>(
    html: &str,
    fetcher: &F,
    registry: &TeamRegistry,
    options: &CalendarOptions,
) -> ScrapeResult<Vec<DayRecord<AthleticEvent>>>
where
    F: HtmlFetcher + ?Sized,
{
    let days = parse_athletics_listing(html, registry, options)?;

    let urls: Vec<String> = days
        .iter()
        .flat_map(|day| day.events.iter().map(|e| e.detail_url.clone()))
        .collect();

    info!(
        days = days.len(),
        events = urls.len(),
        "fetching athletic event detail pages"
    );

    let mut pages = fetch_all(fetcher, &urls).await.into_iter();

    let records = days
        .into_iter()
        .map(|day| {
            let fallback = day.header.to_day_info();
            let mut record = DayRecord::from_header(day.header);

            for listed in day.events {
                let Some(page) = pages.next() else { break };
                let event_id = listed.event_id;

                match build_athletic_event(listed, page, fallback.as_ref(), &options.grammar) {
                    Ok(event) => record.events.push(event),
                    Err(e) => warn!(event_id, error = %e, "dropping athletic event"),
                }
            }

            if let Some(info) = record.events.first().map(|e| e.day_info.clone()) {
                record.fill_missing(&info);
            }

            record
        })
        .collect();

    Ok(records)
}

/// First pass over the listing: read headers and admit event entries.
///
/// Synchronous, so the parsed document never lives across an await.
pub fn parse_athletics_listing(
    html: &str,
    registry: &TeamRegistry,
    options: &CalendarOptions,
) -> ScrapeResult<Vec<ListedDay>> {
    let document = Html::parse_document(html);
    let selectors = ListingSelectors::new()?;

    let days = document
        .select(&selectors.day)
        .map(|day| ListedDay {
            header: day
                .select(&selectors.header)
                .next()
                .map(|dt| parse_day_header(dt, &selectors.header_fields))
                .unwrap_or_default(),
            events: day
                .select(&selectors.entry)
                .filter(|dd| !is_cancelled(*dd))
                .filter_map(|dd| match list_event(dd, &selectors, registry, options) {
                    Ok(event) => Some(event),
                    Err(e) => {
                        debug!(error = %e, "skipping athletic event entry");
                        None
                    }
                })
                .collect(),
        })
        .collect();

    Ok(days)
}

fn list_event(
    entry: ElementRef,
    selectors: &ListingSelectors,
    registry: &TeamRegistry,
    options: &CalendarOptions,
) -> ScrapeResult<ListedEvent> {
    let href = entry
        .select(&selectors.link)
        .next()
        .and_then(|a| a.value().attr("href"))
        .ok_or_else(|| ScrapeError::MalformedFragment("event has no detail link".to_string()))?;

    let url = resolve_url(&options.base_url, href)
        .ok_or_else(|| ScrapeError::MalformedFragment(format!("bad detail link {:?}", href)))?;

    let team_id = query_id(&url, "TeamID")
        .ok_or_else(|| ScrapeError::MalformedFragment(format!("no TeamID in {}", url)))?;
    let event_id = query_id(&url, "LinkID")
        .ok_or_else(|| ScrapeError::MalformedFragment(format!("no LinkID in {}", url)))?;

    let team_name = registry
        .team_name(team_id)
        .ok_or(ScrapeError::UnknownTeam(team_id))?
        .to_string();

    Ok(ListedEvent {
        event_id,
        team_id,
        team_name,
        is_home: has_class(entry, "home") && !registry.is_always_away(team_id),
        detail_url: url.to_string(),
    })
}

/// Combine a listed event with its fetched detail page.
///
/// The detail page's own date wins; the day header is the fallback. With
/// neither, the event can't be dated and is rejected.
pub fn build_athletic_event(
    listed: ListedEvent,
    page: Result<String, FetchError>,
    fallback_date: Option<&DayInfo>,
    grammar: &GrammarOptions,
) -> ScrapeResult<AthleticEvent> {
    let html = page?;
    let detail = parse_detail_page(&html)?;

    let day_info = detail
        .date
        .or_else(|| fallback_date.cloned())
        .ok_or_else(|| {
            ScrapeError::MalformedFragment(format!("event {} has no usable date", listed.event_id))
        })?;

    let title = parse_title(&detail.title, grammar);

    Ok(AthleticEvent {
        event_id: listed.event_id,
        team_id: listed.team_id,
        team_name: listed.team_name,
        event_name: title.event_name,
        opponent: title.opponent,
        start_time: detail.start_time,
        end_time: detail.end_time,
        dismissal_time: detail.dismissal_time,
        return_time: detail.return_time,
        is_home: listed.is_home,
        event_location: title.location,
        event_address: detail.address,
        day_info,
    })
}
