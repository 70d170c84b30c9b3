use reqwest::StatusCode;

/// Failure to turn a URL into page text.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("http error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {status} for {url}")]
    Status { url: String, status: StatusCode },
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Everything that can go wrong while scraping a calendar.
///
/// Only `Fetch` on a top-level page and `Selector` ever reach a caller; the
/// rest are contained at the event or day they occur in and logged.
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("malformed fragment: {0}")]
    MalformedFragment(String),
    #[error("team {0} is not in the registry")]
    UnknownTeam(u32),
    #[error("unparseable time: {0:?}")]
    UnparseableTime(String),
    #[error("invalid selector: {0}")]
    Selector(String),
}

pub type ScrapeResult<T> = std::result::Result<T, ScrapeError>;
