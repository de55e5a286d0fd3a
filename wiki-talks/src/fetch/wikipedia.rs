//! Wikipedia via the MediaWiki Action API

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;

use super::{ArticlePage, ArticleSource, Section};
use crate::error::FetchError;

pub const DEFAULT_USER_AGENT: &str = concat!(
    "wiki-talks/",
    env!("CARGO_PKG_VERSION"),
    " (Wikipedia-to-audio CLI; set user_agent in wiki-talks.toml)"
);

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(={2,6})\s*(.+?)\s*={2,6}\s*$").unwrap());

pub struct WikipediaSource {
    api_url: String,
    client: Client,
}

impl WikipediaSource {
    /// Source for `https://{language}.wikipedia.org`
    pub fn new(language: &str, user_agent: &str, timeout_secs: u64) -> Result<Self, FetchError> {
        Self::with_api_url(
            &format!("https://{language}.wikipedia.org/w/api.php"),
            user_agent,
            timeout_secs,
        )
    }

    pub fn with_api_url(
        api_url: &str,
        user_agent: &str,
        timeout_secs: u64,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| FetchError::SourceUnavailable {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            api_url: api_url.to_string(),
            client,
        })
    }

    async fn request<T: for<'de> Deserialize<'de>>(
        &self,
        params: &[(&str, &str)],
    ) -> Result<ApiResponse<T>, FetchError> {
        let unavailable = |e: reqwest::Error| FetchError::SourceUnavailable {
            message: e.to_string(),
        };

        let response = self
            .client
            .get(&self.api_url)
            .query(&[("action", "query"), ("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()
            .await
            .map_err(unavailable)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::SourceUnavailable {
                message: format!("HTTP {}: {}", status.as_u16(), body.trim()),
            });
        }

        let body: ApiResponse<T> = response.json().await.map_err(unavailable)?;
        if let Some(error) = body.error {
            return Err(FetchError::SourceUnavailable {
                message: format!("{}: {}", error.code, error.info),
            });
        }
        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    query: Option<T>,
    error: Option<ApiError>,
    #[serde(rename = "continue")]
    continuation: Option<Continuation>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Deserialize)]
struct Continuation {
    plcontinue: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PagesQuery {
    #[serde(default)]
    pages: Vec<PageEntry>,
}

#[derive(Debug, Deserialize)]
struct PageEntry {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    pageprops: Option<PageProps>,
    #[serde(default)]
    links: Vec<LinkEntry>,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    disambiguation: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct LinkEntry {
    title: String,
}

/// Split a plain-text extract into lead text and `== Heading ==` sections
fn split_sections(extract: &str) -> (String, Vec<Section>) {
    let mut summary = Vec::new();
    let mut sections: Vec<(String, Vec<&str>)> = Vec::new();

    for line in extract.lines() {
        if let Some(captures) = HEADING.captures(line.trim()) {
            sections.push((captures[2].to_string(), Vec::new()));
            continue;
        }
        match sections.last_mut() {
            Some((_, body)) => body.push(line),
            None => summary.push(line),
        }
    }

    let sections = sections
        .into_iter()
        .map(|(title, body)| Section {
            title,
            text: body.join("\n").trim().to_string(),
        })
        .collect();

    (summary.join("\n").trim().to_string(), sections)
}

#[async_trait]
impl ArticleSource for WikipediaSource {
    async fn page(&self, title: &str) -> Result<Option<ArticlePage>, FetchError> {
        let response: ApiResponse<PagesQuery> = self
            .request(&[
                ("prop", "extracts|pageprops|info"),
                ("explaintext", "1"),
                ("exsectionformat", "wiki"),
                ("redirects", "1"),
                ("titles", title),
            ])
            .await?;

        let pages = response.query.map(|q| q.pages).unwrap_or_default();
        let Some(entry) = pages.into_iter().next() else {
            return Ok(None);
        };
        if entry.missing || entry.invalid {
            log::debug!("No page for '{}'", title);
            return Ok(None);
        }

        let (summary, sections) = split_sections(entry.extract.as_deref().unwrap_or_default());
        let disambiguation = entry
            .pageprops
            .as_ref()
            .is_some_and(|props| props.disambiguation.is_some());

        log::debug!(
            "Resolved '{}' -> '{}' ({} sections)",
            title,
            entry.title,
            sections.len()
        );

        Ok(Some(ArticlePage {
            title: entry.title,
            summary,
            sections,
            disambiguation: Some(disambiguation),
        }))
    }

    async fn links(&self, title: &str) -> Result<Vec<String>, FetchError> {
        let mut links = Vec::new();
        let mut plcontinue: Option<String> = None;

        loop {
            let mut params = vec![
                ("prop", "links"),
                ("plnamespace", "0"),
                ("pllimit", "max"),
                ("redirects", "1"),
                ("titles", title),
            ];
            if let Some(token) = plcontinue.as_deref() {
                params.push(("plcontinue", token));
            }

            let response: ApiResponse<PagesQuery> = self.request(&params).await?;
            for page in response.query.map(|q| q.pages).unwrap_or_default() {
                links.extend(page.links.into_iter().map(|l| l.title));
            }

            match response.continuation.and_then(|c| c.plcontinue) {
                Some(token) => plcontinue = Some(token),
                None => break,
            }
        }

        log::debug!("'{}' has {} links", title, links.len());
        Ok(links)
    }

    fn name(&self) -> &'static str {
        "Wikipedia"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use serde_json::json;

    fn source(server: &MockServer) -> WikipediaSource {
        WikipediaSource::with_api_url(&server.url("/w/api.php"), DEFAULT_USER_AGENT, 5).unwrap()
    }

    const EXTRACT: &str = "Mumbai Indians are a franchise cricket team.\nThey play at Wankhede.\n\n== History ==\nFounded in 2008.\n\n=== Early years ===\nTough start.\n\n== Honours ==\nFive titles.";

    #[test]
    fn test_split_sections() {
        let (summary, sections) = split_sections(EXTRACT);
        assert_eq!(
            summary,
            "Mumbai Indians are a franchise cricket team.\nThey play at Wankhede."
        );
        let titles: Vec<_> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["History", "Early years", "Honours"]);
        assert_eq!(sections[0].text, "Founded in 2008.");
        assert_eq!(sections[2].text, "Five titles.");
    }

    #[test]
    fn test_split_sections_without_headings() {
        let (summary, sections) = split_sections("Just a lead.");
        assert_eq!(summary, "Just a lead.");
        assert!(sections.is_empty());
    }

    #[tokio::test]
    async fn test_page_found() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/w/api.php")
                .query_param("titles", "Mumbai Indians")
                .query_param("prop", "extracts|pageprops|info")
                .query_param("explaintext", "1");
            then.status(200).json_body(json!({
                "batchcomplete": true,
                "query": {"pages": [{
                    "pageid": 1, "ns": 0, "title": "Mumbai Indians",
                    "extract": EXTRACT
                }]}
            }));
        });

        let page = source(&server).page("Mumbai Indians").await.unwrap().unwrap();
        mock.assert();
        assert_eq!(page.title, "Mumbai Indians");
        assert_eq!(page.sections.len(), 3);
        assert_eq!(page.disambiguation, Some(false));
        assert!(!page.is_disambiguation());
    }

    #[tokio::test]
    async fn test_page_missing() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/w/api.php");
            then.status(200).json_body(json!({
                "query": {"pages": [{"ns": 0, "title": "NonExistentPage", "missing": true}]}
            }));
        });

        assert_eq!(source(&server).page("NonExistentPage").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_page_disambiguation_flag() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/w/api.php");
            then.status(200).json_body(json!({
                "query": {"pages": [{
                    "pageid": 2, "ns": 0, "title": "Mercury",
                    "extract": "Mercury may refer to:",
                    "pageprops": {"disambiguation": "", "wikibase_item": "Q1"}
                }]}
            }));
        });

        let page = source(&server).page("Mercury").await.unwrap().unwrap();
        assert!(page.is_disambiguation());
    }

    #[tokio::test]
    async fn test_links_follow_continuation() {
        let server = MockServer::start();
        // Registered first so continuation requests match it before the general mock
        let second = server.mock(|when, then| {
            when.method(GET)
                .path("/w/api.php")
                .query_param("prop", "links")
                .query_param("plcontinue", "2|0|Mercury_(planet)");
            then.status(200).json_body(json!({
                "query": {"pages": [{"title": "Mercury", "links": [
                    {"ns": 0, "title": "Mercury (planet)"}
                ]}]}
            }));
        });
        let first = server.mock(|when, then| {
            when.method(GET)
                .path("/w/api.php")
                .query_param("prop", "links");
            then.status(200).json_body(json!({
                "continue": {"plcontinue": "2|0|Mercury_(planet)", "continue": "||"},
                "query": {"pages": [{"title": "Mercury", "links": [
                    {"ns": 0, "title": "Mercury (element)"},
                    {"ns": 0, "title": "Mercury (mythology)"}
                ]}]}
            }));
        });

        let links = source(&server).links("Mercury").await.unwrap();
        first.assert();
        second.assert();
        assert_eq!(
            links,
            ["Mercury (element)", "Mercury (mythology)", "Mercury (planet)"]
        );
    }

    #[tokio::test]
    async fn test_http_error_is_source_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/w/api.php");
            then.status(503).body("maintenance");
        });

        let err = source(&server).page("Anything").await.unwrap_err();
        assert!(matches!(err, FetchError::SourceUnavailable { .. }));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_api_error_is_source_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/w/api.php");
            then.status(200).json_body(json!({
                "error": {"code": "badvalue", "info": "Unrecognized value"}
            }));
        });

        let err = source(&server).page("Anything").await.unwrap_err();
        assert!(err.to_string().contains("badvalue"));
    }
}
