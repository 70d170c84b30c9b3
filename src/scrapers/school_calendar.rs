use crate::error::ScrapeResult;
use crate::models::{DayHeader, DayRecord, GeneralEvent};
use crate::scrapers::day_header::{parse_day_header, DayHeaderSelectors};
use crate::scrapers::time::parse_time;
use crate::utils::html::{element_text, is_cancelled, select_text, selector};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

const DETAIL_DELIMITER: &str = " - ";

pub struct SchoolCalendarSelectors {
    day: Selector,
    entry: Selector,
    detail: Selector,
    link: Selector,
    title: Selector,
    header: DayHeaderSelectors,
}

impl SchoolCalendarSelectors {
    pub fn new() -> ScrapeResult<Self> {
        Ok(Self {
            day: selector(".calendar-day")?,
            entry: selector("li")?,
            detail: selector("h6")?,
            link: selector("a")?,
            title: selector("h3")?,
            header: DayHeaderSelectors::new()?,
        })
    }
}

/// Time and place parsed from an event's detail line, e.g. "3:30pm - 4:30pm - Old Gym"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDetails {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
}

/// Parse a general school calendar page into one record per `.calendar-day`.
pub fn parse_school_calendar(html: &str) -> ScrapeResult<Vec<DayRecord<GeneralEvent>>> {
    let document = Html::parse_document(html);
    let selectors = SchoolCalendarSelectors::new()?;

    let days: Vec<_> = document
        .select(&selectors.day)
        .map(|day| parse_school_day(day, &selectors))
        .collect();

    debug!(days = days.len(), "parsed school calendar");
    Ok(days)
}

/// The first `li` of a day is its date header; every later one is an event.
pub fn parse_school_day(
    day: ElementRef,
    selectors: &SchoolCalendarSelectors,
) -> DayRecord<GeneralEvent> {
    let mut entries = day.select(&selectors.entry);

    let header = entries
        .next()
        .map(|li| parse_day_header(li, &selectors.header))
        .unwrap_or_else(DayHeader::default);

    let mut record = DayRecord::from_header(header);
    record.events = entries
        .filter(|li| !is_cancelled(*li))
        .map(|li| parse_school_event(li, selectors))
        .collect();

    record
}

pub fn parse_school_event(entry: ElementRef, selectors: &SchoolCalendarSelectors) -> GeneralEvent {
    let detail = entry.select(&selectors.detail).next().map(element_text);
    let details = detail
        .as_deref()
        .map(parse_event_details)
        .unwrap_or_default();

    GeneralEvent {
        event_name: event_name(entry, detail.as_deref(), selectors),
        start_time: details.start_time,
        end_time: details.end_time,
        event_location: details.location,
    }
}

/// Linked events wrap both the title and the detail line in the `a`, so the
/// name is the link text with the detail text cut off.
fn event_name(entry: ElementRef, detail: Option<&str>, selectors: &SchoolCalendarSelectors) -> String {
    let Some(link) = entry.select(&selectors.link).next() else {
        return select_text(entry, &selectors.title);
    };

    let text = element_text(link);
    match detail.filter(|d| !d.is_empty()) {
        Some(detail) => text.split(detail).next().unwrap_or_default().trim().to_string(),
        None => text.trim().to_string(),
    }
}

/// Split a detail line on `" - "`.
///
/// The same separator carries three shapes: "start - end - place",
/// "start - end" or "start - place", and "start - Thru 2/5/2016". Only
/// keyword sniffing on the second token tells them apart.
pub fn parse_event_details(detail: &str) -> EventDetails {
    let mut details = EventDetails::default();
    if detail.trim().is_empty() {
        return details;
    }

    let tokens: Vec<&str> = detail.split(DETAIL_DELIMITER).map(str::trim).collect();

    if let Some(first) = tokens.first().filter(|t| !t.is_empty()) {
        details.start_time = parse_time(first);
    }

    match tokens.as_slice() {
        [_, second] if !second.is_empty() => {
            let lower = second.to_lowercase();
            if lower.contains("thru") {
                details.end_time = thru_date(second);
            } else if !lower.contains("am") && !lower.contains("pm") {
                details.location = Some(second.to_string());
            } else {
                // "Main Campus" has an "am" but is still a place
                match parse_time(second) {
                    Some(end) => details.end_time = Some(end),
                    None => details.location = Some(second.to_string()),
                }
            }
        }
        [_, second, rest @ ..] => {
            details.end_time = if second.to_lowercase().contains("thru") {
                thru_date(second)
            } else {
                parse_time(second)
            };

            let location = rest.join(DETAIL_DELIMITER);
            if !location.trim().is_empty() {
                details.location = Some(location.trim().to_string());
            }
        }
        _ => {}
    }

    details
}

/// The word after "thru", kept verbatim: "Thru 2/5/2016" -> "2/5/2016".
fn thru_date(token: &str) -> Option<String> {
    let mut words = token.split_whitespace();
    words.find(|w| w.to_lowercase().starts_with("thru"))?;
    words.next().map(str::to_string)
}
