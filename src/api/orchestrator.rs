use crate::api::fetcher::HtmlFetcher;
use crate::error::FetchError;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, warn};

/// Fetch every URL concurrently.
///
/// Results come back in the order of `urls`, whatever order the requests
/// finish in: each in-flight request carries the slot it was issued for.
/// A failed request only fills its own slot with the error.
pub async fn fetch_all<F>(fetcher: &F, urls: &[String]) -> Vec<Result<String, FetchError>>
where
    F: HtmlFetcher + ?Sized,
{
    let mut slots: Vec<Option<Result<String, FetchError>>> = urls.iter().map(|_| None).collect();

    let mut in_flight: FuturesUnordered<_> = urls
        .iter()
        .enumerate()
        .map(|(slot, url)| async move { (slot, fetcher.fetch_html(url).await) })
        .collect();

    debug!(requests = urls.len(), "fetching pages");

    while let Some((slot, result)) = in_flight.next().await {
        if let Err(e) = &result {
            warn!(url = %urls[slot], error = %e, "fetch failed");
        }
        slots[slot] = Some(result);
    }

    // FuturesUnordered yields every future exactly once, so no slot is empty
    slots.into_iter().flatten().collect()
}
