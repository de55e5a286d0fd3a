//! Article fetching: URL -> bounded plain text

pub mod wikipedia;

use async_trait::async_trait;
use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::error::FetchError;

pub use wikipedia::WikipediaSource;

/// Fetched text shorter than this (after trimming) is rejected
pub const MIN_CONTENT_CHARS: usize = 50;

/// Default word cap for extended extraction
pub const DEFAULT_MAX_WORDS: usize = 4000;

static WIKI_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"wikipedia\.org/wiki/([^?#]+)").unwrap());

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    /// Lead section only
    #[default]
    #[value(alias = "fast")]
    #[serde(alias = "fast")]
    Summary,
    /// Lead plus sections, capped by word count
    #[value(alias = "pro")]
    #[serde(alias = "pro")]
    Extended,
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Depth::Summary => f.write_str("summary"),
            Depth::Extended => f.write_str("extended"),
        }
    }
}

/// Plain text of one article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub text: String,
}

impl SourceDocument {
    pub fn char_length(&self) -> usize {
        self.text.chars().count()
    }

    /// First `max_chars` characters, for display
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.text.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.text[..idx],
            None => &self.text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub text: String,
}

/// A resolved article as returned by an [`ArticleSource`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticlePage {
    pub title: String,
    pub summary: String,
    /// Sections in document order, nested headings flattened
    pub sections: Vec<Section>,
    /// Structural disambiguation flag, `None` if the source can't tell
    pub disambiguation: Option<bool>,
}

impl ArticlePage {
    pub fn is_disambiguation(&self) -> bool {
        self.disambiguation
            .unwrap_or_else(|| self.title.to_lowercase().contains("disambiguation"))
    }
}

/// Where article text comes from
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Look up a page by title, `Ok(None)` if it doesn't exist
    async fn page(&self, title: &str) -> Result<Option<ArticlePage>, FetchError>;

    /// Outgoing article links, in the order the source lists them
    async fn links(&self, title: &str) -> Result<Vec<String>, FetchError>;

    fn name(&self) -> &'static str;
}

/// Pull the article title out of a Wikipedia URL.
///
/// Query strings and fragments are dropped, percent escapes decoded and
/// underscores turned back into spaces.
pub fn extract_title(reference: &str) -> Option<String> {
    let captures = WIKI_URL.captures(reference)?;
    let raw = captures.get(1)?.as_str();
    let decoded = urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    let title = decoded.replace('_', " ").trim().to_string();

    if title.is_empty() { None } else { Some(title) }
}

fn first_words(text: &str, count: usize) -> String {
    text.split_whitespace()
        .take(count)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Summary followed by `## Heading` sections, never more than `max_words`
/// words in total (heading markers included).
///
/// The section that would cross the cap is cut to fill the remaining
/// budget and nothing after it is added.
pub fn extract_extended(page: &ArticlePage, max_words: usize) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut used = 0usize;

    let summary = page.summary.trim();
    if !summary.is_empty() {
        let words = summary.split_whitespace().count();
        if words <= max_words {
            parts.push(summary.to_string());
            used = words;
        } else {
            parts.push(first_words(summary, max_words));
            used = max_words;
        }
    }

    for section in &page.sections {
        let body = section.text.trim();
        if body.is_empty() {
            continue;
        }

        let heading = format!("## {}", section.title.trim());
        let heading_words = heading.split_whitespace().count();
        let body_words = body.split_whitespace().count();

        if used + heading_words + body_words <= max_words {
            parts.push(format!("{heading}\n\n{body}"));
            used += heading_words + body_words;
            continue;
        }

        let remaining = max_words.saturating_sub(used + heading_words);
        if remaining > 0 {
            parts.push(format!("{heading}\n\n{}", first_words(body, remaining)));
        }
        break;
    }

    parts.join("\n\n")
}

/// Resolves article references to [`SourceDocument`]s
pub struct SourceFetcher {
    source: Box<dyn ArticleSource>,
    max_words: usize,
}

impl SourceFetcher {
    pub fn new(source: Box<dyn ArticleSource>) -> Self {
        Self {
            source,
            max_words: DEFAULT_MAX_WORDS,
        }
    }

    pub fn with_max_words(mut self, max_words: usize) -> Self {
        self.max_words = max_words;
        self
    }

    pub async fn fetch(&self, reference: &str, depth: Depth) -> Result<SourceDocument, FetchError> {
        let title = extract_title(reference).ok_or_else(|| FetchError::InvalidReference {
            reference: reference.to_string(),
        })?;

        log::info!("Fetching '{}' from {}", title, self.source.name());

        let mut page = self
            .source
            .page(&title)
            .await?
            .ok_or_else(|| FetchError::NotFound {
                title: title.clone(),
            })?;

        if page.is_disambiguation() {
            // Single hop: the chosen target is used even if it is itself a disambiguation page
            let links = self.source.links(&page.title).await?;
            let Some(target) = links.into_iter().next() else {
                return Err(FetchError::DisambiguationUnresolvable {
                    title: page.title,
                    target: None,
                });
            };

            log::info!("'{}' is a disambiguation page, using '{}'", page.title, target);

            page = match self.source.page(&target).await? {
                Some(resolved) => resolved,
                None => {
                    return Err(FetchError::DisambiguationUnresolvable {
                        title: page.title,
                        target: Some(target),
                    });
                }
            };
        }

        let text = match depth {
            Depth::Summary => page.summary,
            Depth::Extended => extract_extended(&page, self.max_words),
        };

        let length = text.trim().chars().count();
        if length < MIN_CONTENT_CHARS {
            return Err(FetchError::ContentTooShort {
                length,
                minimum: MIN_CONTENT_CHARS,
            });
        }

        Ok(SourceDocument { text })
    }
}
