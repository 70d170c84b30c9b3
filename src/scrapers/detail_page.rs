use crate::error::{ScrapeError, ScrapeResult};
use crate::models::DayInfo;
use crate::scrapers::time::{is_time_token, normalize_time, parse_time};
use crate::utils::html::{own_text, parse_number, select_text, selector};
use scraper::Html;

const RANGE_DELIMITER: &str = " - ";

/// Fields read off an athletic event's detail page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailPage {
    /// `None` when the date line is missing or malformed
    pub date: Option<DayInfo>,
    pub title: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub dismissal_time: Option<String>,
    pub return_time: Option<String>,
    pub address: Option<String>,
}

pub fn parse_detail_page(html: &str) -> ScrapeResult<DetailPage> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let date_text = select_text(root, &selector(".calendar-detail .date")?);
    let time_text = select_text(root, &selector(".calendar-detail .time")?);
    let dismissal_text = select_text(root, &selector(".calendar-detail .dismissal")?);
    let return_text = select_text(root, &selector(".calendar-detail .return")?);
    let address = select_text(root, &selector(".calendar-detail address")?);

    // Nested spans in the heading hold badges, not title text
    let title = root
        .select(&selector(".calendar-detail h1")?)
        .next()
        .map(|h1| own_text(h1).trim().to_string())
        .unwrap_or_default();

    let (start_time, end_time) = parse_time_range(&labeled_value(&time_text, "Time:"));

    Ok(DetailPage {
        date: parse_detail_date(&date_text).ok(),
        title,
        start_time,
        end_time,
        dismissal_time: parse_labeled_time(&dismissal_text, "Dismissal:"),
        return_time: parse_labeled_time(&return_text, "Return:"),
        address: (!address.is_empty()).then_some(address),
    })
}

/// Parse "Thursday, September 10, 2015".
pub fn parse_detail_date(text: &str) -> ScrapeResult<DayInfo> {
    let malformed = || ScrapeError::MalformedFragment(format!("detail date {:?}", text.trim()));

    let tokens: Vec<&str> = text.split_whitespace().collect();
    let [weekday, month, date, year] = tokens.as_slice() else {
        return Err(malformed());
    };

    Ok(DayInfo {
        month: month.trim_end_matches(',').to_string(),
        day_of_week: weekday.trim_end_matches(',').to_string(),
        date_number: parse_number(date).ok_or_else(malformed)?,
        year: parse_number(year).ok_or_else(malformed)?,
    })
}

/// Text after `label`, or the whole text when the label is missing.
fn labeled_value(text: &str, label: &str) -> String {
    text.split_once(label)
        .map_or(text, |(_, value)| value)
        .trim()
        .to_string()
}

/// "4:00PM - 6:00PM" -> (Some("4:00 PM"), Some("6:00 PM")); a lone time has no end.
fn parse_time_range(value: &str) -> (Option<String>, Option<String>) {
    if value.is_empty() {
        return (None, None);
    }

    match value.split_once(RANGE_DELIMITER) {
        Some((start, end)) => (parse_time(start), parse_time(end)),
        None => (parse_time(value), None),
    }
}

/// Dismissal/return lines are sometimes prose ("After 6th period"); those are kept as written.
fn parse_labeled_time(text: &str, label: &str) -> Option<String> {
    let value = labeled_value(text, label);
    if value.is_empty() {
        None
    } else if is_time_token(&value) {
        Some(normalize_time(&value))
    } else {
        Some(value)
    }
}
