use crate::error::ScrapeResult;
use crate::models::DayHeader;
use crate::utils::html::{element_text, parse_number, select_text, selector};
use scraper::{ElementRef, Selector};

/// Selectors for the month/date/year spans inside a day header
pub struct DayHeaderSelectors {
    month: Selector,
    date: Selector,
    year: Selector,
}

impl DayHeaderSelectors {
    pub fn new() -> ScrapeResult<Self> {
        Ok(Self {
            month: selector(".month")?,
            date: selector(".date")?,
            year: selector(".year")?,
        })
    }
}

/// Parse a day header such as
/// `<li><span class="month">September</span> <span class="date">9</span>,
/// <span class="year">2015</span> - Wednesday</li>`.
///
/// Never fails: missing or non-numeric pieces come back as `None`.
pub fn parse_day_header(header: ElementRef, selectors: &DayHeaderSelectors) -> DayHeader {
    DayHeader {
        month: select_text(header, &selectors.month),
        day_of_week: day_of_week(&element_text(header)),
        date_number: parse_number(&select_text(header, &selectors.date)),
        year: parse_number(&select_text(header, &selectors.year)),
    }
}

/// Weekday is the segment after the first dash of the day label.
pub fn day_of_week(label: &str) -> Option<String> {
    let weekday = label.split('-').nth(1)?.trim();
    (!weekday.is_empty()).then(|| weekday.to_string())
}
