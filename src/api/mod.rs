pub mod fetcher;
pub mod orchestrator;

pub use fetcher::{HtmlFetcher, HttpFetcher};
pub use orchestrator::fetch_all;
