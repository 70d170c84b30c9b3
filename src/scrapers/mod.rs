pub mod athletics_calendar;
pub mod athletics_teams;
pub mod day_header;
pub mod detail_page;
pub mod school_calendar;
pub mod time;
pub mod title;
