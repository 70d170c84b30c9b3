use crate::error::FetchError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Anything that can turn a URL into page HTML.
#[async_trait]
pub trait HtmlFetcher: Send + Sync {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError>;
}

#[async_trait]
impl<T: HtmlFetcher + ?Sized> HtmlFetcher for Arc<T> {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch_html(url).await
    }
}

/// reqwest-backed fetcher used against the live site
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HtmlFetcher for HttpFetcher {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        debug!(url, "fetching page");

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(DEFAULT_USER_AGENT, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_html_ok() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/calendar")
            .with_status(200)
            .with_body("<html><body>ok</body></html>")
            .create_async()
            .await;

        let html = fetcher()
            .fetch_html(&format!("{}/calendar", server.url()))
            .await
            .unwrap();

        assert!(html.contains("ok"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_html_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let url = format!("{}/missing", server.url());
        match fetcher().fetch_html(&url).await {
            Err(FetchError::Status { url: failed, status }) => {
                assert_eq!(failed, url);
                assert_eq!(status.as_u16(), 404);
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_through_arc() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .with_body("hello")
            .create_async()
            .await;

        let shared: Arc<dyn HtmlFetcher> = Arc::new(fetcher());
        let body = shared.fetch_html(&server.url()).await.unwrap();
        assert_eq!(body, "hello");
    }
}
