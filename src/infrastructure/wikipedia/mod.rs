//! Wikipedia lookup client
//!
//! Thin client over the MediaWiki action API and the REST summary endpoint.
//! Failed lookups are data, not errors: transport failures, missing pages and
//! unknown sections all come back as [`LookupOutcome::Failure`] so callers can
//! hand the reason to the conversation as-is.

use std::time::Duration;

use serde::Deserialize;

use crate::domain::lookup::{LookupOutcome, PageSummary, SectionContent, SectionList};
use crate::domain::DomainError;

const DEFAULT_API_URL: &str = "https://en.wikipedia.org/w/api.php";
const DEFAULT_REST_URL: &str = "https://en.wikipedia.org/api/rest_v1";
const DEFAULT_USER_AGENT: &str = concat!("wiki-search-agent/", env!("CARGO_PKG_VERSION"));

/// Configuration for the Wikipedia client
#[derive(Debug, Clone)]
pub struct WikipediaClientConfig {
    /// MediaWiki action API endpoint
    pub api_url: String,
    /// REST API base (page summaries)
    pub rest_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for WikipediaClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            rest_url: DEFAULT_REST_URL.to_string(),
            timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl WikipediaClientConfig {
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_rest_url(mut self, url: impl Into<String>) -> Self {
        self.rest_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    title: String,
    extract: String,
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: DesktopUrls,
}

#[derive(Debug, Deserialize)]
struct DesktopUrls {
    page: String,
}

#[derive(Debug, Deserialize)]
struct ParseResponse {
    parse: Option<ParsePayload>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ParsePayload {
    #[serde(default)]
    sections: Vec<ParseSection>,
    wikitext: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ParseSection {
    line: String,
    index: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    info: String,
}

/// Client for the three Wikipedia lookups
#[derive(Debug, Clone)]
pub struct WikipediaClient {
    client: reqwest::Client,
    config: WikipediaClientConfig,
}

impl WikipediaClient {
    pub fn new(config: WikipediaClientConfig) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    /// Searches for a topic and returns title, summary and URL of the best
    /// match.
    pub async fn search(&self, query: &str) -> LookupOutcome<PageSummary> {
        tracing::info!(%query, "Searching Wikipedia");

        let response: SearchResponse = match self
            .get_json(
                &self.config.api_url,
                &[
                    ("action", "query"),
                    ("list", "search"),
                    ("srsearch", query),
                    ("srlimit", "1"),
                    ("format", "json"),
                    ("formatversion", "2"),
                ],
            )
            .await
        {
            Ok(response) => response,
            Err(reason) => return LookupOutcome::failure(reason),
        };

        let Some(best_match) = response
            .query
            .map(|q| q.search)
            .unwrap_or_default()
            .into_iter()
            .next()
        else {
            return LookupOutcome::failure("No results found for your query.");
        };

        let summary_url = format!(
            "{}/page/summary/{}",
            self.config.rest_url,
            urlencode(&best_match.title)
        );

        match self.get_json::<SummaryResponse>(&summary_url, &[]).await {
            Ok(summary) => LookupOutcome::success(PageSummary {
                url: summary
                    .content_urls
                    .map(|urls| urls.desktop.page)
                    .unwrap_or_else(|| {
                        format!(
                            "https://en.wikipedia.org/wiki/{}",
                            urlencode(&summary.title)
                        )
                    }),
                title: summary.title,
                summary: summary.extract,
            }),
            Err(_) => {
                LookupOutcome::failure("No Wikipedia page could be loaded for this query.")
            }
        }
    }

    /// Lists the section titles of a topic's article.
    pub async fn sections(&self, topic: &str) -> LookupOutcome<SectionList> {
        match self.fetch_sections(topic).await {
            Ok(sections) => LookupOutcome::success(SectionList {
                sections: sections.into_iter().map(|s| s.line).collect(),
            }),
            Err(reason) => LookupOutcome::failure(reason),
        }
    }

    /// Returns the wikitext of one named section of a topic's article.
    pub async fn section_content(
        &self,
        topic: &str,
        section_title: &str,
    ) -> LookupOutcome<SectionContent> {
        let sections = match self.fetch_sections(topic).await {
            Ok(sections) => sections,
            Err(reason) => return LookupOutcome::failure(reason),
        };

        let Some(section) = sections
            .iter()
            .find(|s| s.line.eq_ignore_ascii_case(section_title))
        else {
            return LookupOutcome::failure(format!(
                "Section '{}' not found in article '{}'.",
                section_title, topic
            ));
        };

        let response: Result<ParseResponse, String> = self
            .get_json(
                &self.config.api_url,
                &[
                    ("action", "parse"),
                    ("page", topic),
                    ("section", &section.index),
                    ("prop", "wikitext"),
                    ("format", "json"),
                    ("formatversion", "2"),
                ],
            )
            .await;

        match response {
            Ok(ParseResponse {
                parse: Some(ParsePayload {
                    wikitext: Some(content),
                    ..
                }),
                ..
            }) if !content.trim().is_empty() => {
                LookupOutcome::success(SectionContent { content })
            }
            Ok(ParseResponse {
                error: Some(error), ..
            }) => LookupOutcome::failure(error.info),
            Ok(_) => LookupOutcome::failure(format!(
                "Section '{}' not found in article '{}'.",
                section_title, topic
            )),
            Err(reason) => LookupOutcome::failure(reason),
        }
    }

    async fn fetch_sections(&self, topic: &str) -> Result<Vec<ParseSection>, String> {
        let response: ParseResponse = self
            .get_json(
                &self.config.api_url,
                &[
                    ("action", "parse"),
                    ("page", topic),
                    ("prop", "sections"),
                    ("format", "json"),
                    ("formatversion", "2"),
                ],
            )
            .await?;

        if let Some(error) = response.error {
            return Err(error.info);
        }

        response
            .parse
            .map(|p| p.sections)
            .ok_or_else(|| format!("No Wikipedia page could be loaded for '{}'.", topic))
    }

    /// GET with query params, decoded into `T`. Errors come back as the
    /// human-readable reason that will land in a `Failure` outcome.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T, String> {
        let mut request = self.client.get(url);

        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request
            .send()
            .await
            .map_err(|e| format!("Wikipedia request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!(
                "Wikipedia returned HTTP {} for this query.",
                response.status().as_u16()
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| format!("Failed to decode Wikipedia response: {}", e))
    }
}

fn urlencode(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            ' ' => "_".to_string(),
            c if c.is_ascii_alphanumeric() || "-_.~()".contains(c) => c.to_string(),
            c => {
                let mut buf = [0u8; 4];
                c.encode_utf8(&mut buf)
                    .as_bytes()
                    .iter()
                    .map(|b| format!("%{:02X}", b))
                    .collect()
            }
        })
        .collect()
}
