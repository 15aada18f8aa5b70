use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use crate::error::FetchError;
use crate::query::season_page_request;
use crate::types::{GraphQlResponse, Page, PageData, PageRequest, SeasonQuery};

pub const ANILIST_ENDPOINT: &str = "https://graphql.anilist.co";

/// Largest page AniList will serve.
pub const MAX_PER_PAGE: u32 = 50;

/// How many characters of a bad response body are kept in error messages.
const SNIPPET_LEN: usize = 200;

/// Connection settings for [`AniListClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub endpoint: String,
    pub timeout: Duration,
    /// Minimum spacing between two requests. AniList allows roughly 90 per minute.
    pub min_request_interval: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoint: ANILIST_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
            min_request_interval: Duration::from_millis(700),
        }
    }
}

/// HTTP client for the AniList GraphQL API with request spacing.
pub struct AniListClient {
    http: reqwest::Client,
    endpoint: String,
    min_interval: Duration,
    last_request: Mutex<Instant>,
}

impl AniListClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;

        let now = Instant::now();
        Ok(Self {
            http,
            endpoint: settings.endpoint.clone(),
            min_interval: settings.min_request_interval,
            last_request: Mutex::new(now.checked_sub(settings.min_request_interval).unwrap_or(now)),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch one page of a season.
    pub async fn fetch_season_page(
        &self,
        query: &SeasonQuery,
        request: PageRequest,
    ) -> Result<Page, FetchError> {
        let body = season_page_request(query, request);
        let payload = serde_json::to_vec(&body).map_err(FetchError::Encode)?;
        log::debug!(
            "AniList request body: {}",
            String::from_utf8_lossy(&payload)
        );

        self.rate_limit().await;

        let resp = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(payload)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        log::trace!("AniList response (HTTP {}): {}", status.as_u16(), text);

        if !status.is_success() {
            return Err(FetchError::ServerError {
                status: status.as_u16(),
                message: snippet(&text),
            });
        }

        parse_page_response(&text)
    }

    /// Wait until at least `min_interval` has passed since the last request.
    async fn rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < self.min_interval {
            tokio::time::sleep(self.min_interval - elapsed).await;
        }
        *last = Instant::now();
    }
}

/// Parse a season page response body.
///
/// A response carrying both data and errors is accepted; the errors are logged.
pub fn parse_page_response(text: &str) -> Result<Page, FetchError> {
    let response: GraphQlResponse<PageData> =
        serde_json::from_str(text).map_err(|source| FetchError::Decode {
            source,
            snippet: snippet(text),
        })?;

    let messages = response
        .errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");

    match response.data {
        Some(data) => {
            if !messages.is_empty() {
                log::warn!("AniList returned partial data with errors: {}", messages);
            }
            Ok(data.page)
        }
        None if !messages.is_empty() => Err(FetchError::GraphQl(messages)),
        None => Err(FetchError::MissingData),
    }
}

fn snippet(text: &str) -> String {
    text.chars().take(SNIPPET_LEN).collect()
}
