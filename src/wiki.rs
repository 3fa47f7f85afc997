//! Fan-wiki knowledge lookup
//!
//! MediaWiki client used to pull factual context into the prompt: a search
//! for the best-matching page, then that page's plain-text intro.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.0.0: Initial creation

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::Html;
use serde::Deserialize;

/// Upper bound on returned knowledge text, keeping the prompt small.
const MAX_KNOWLEDGE_CHARS: usize = 1200;

/// External knowledge collaborator the augmenter depends on.
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    /// Best-effort factual context for a search query. `None` means the wiki
    /// had nothing useful.
    async fn get_search_result_knowledge(&self, query: &str) -> Result<Option<String>>;
}

/// MediaWiki-backed [`KnowledgeSource`].
pub struct WikiApi {
    client: reqwest::Client,
    api_url: String,
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
    snippet: String,
}

impl WikiApi {
    pub fn new(api_url: impl Into<String>) -> Self {
        WikiApi {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
        }
    }

    async fn search(&self, query: &str) -> Result<Option<SearchHit>> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", "1"),
                ("format", "json"),
            ])
            .send()
            .await
            .context("wiki search request failed")?;

        let body: SearchResponse = response
            .json()
            .await
            .context("wiki search response was not valid JSON")?;
        Ok(body.query.and_then(|q| q.search.into_iter().next()))
    }

    async fn extract(&self, title: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("explaintext", "1"),
                ("exintro", "1"),
                ("titles", title),
                ("format", "json"),
            ])
            .send()
            .await
            .context("wiki extract request failed")?;

        let body: serde_json::Value = response
            .json()
            .await
            .context("wiki extract response was not valid JSON")?;
        Ok(parse_extract(&body))
    }
}

#[async_trait]
impl KnowledgeSource for WikiApi {
    async fn get_search_result_knowledge(&self, query: &str) -> Result<Option<String>> {
        let Some(hit) = self.search(query).await? else {
            return Ok(None);
        };

        // Prefer the page intro; fall back to the search snippet.
        let knowledge = match self.extract(&hit.title).await? {
            Some(extract) => format!("{}: {}", hit.title, extract),
            None => {
                let snippet = strip_html(&hit.snippet);
                if snippet.trim().is_empty() {
                    return Ok(None);
                }
                format!("{}: {}", hit.title, snippet)
            }
        };

        Ok(Some(clamp(&knowledge, MAX_KNOWLEDGE_CHARS)))
    }
}

/// Pull the first page's extract out of a `prop=extracts` response.
fn parse_extract(body: &serde_json::Value) -> Option<String> {
    body.get("query")?
        .get("pages")?
        .as_object()?
        .values()
        .next()?
        .get("extract")?
        .as_str()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Strip the `<span class="searchmatch">` highlight markup search snippets carry.
fn strip_html(fragment: &str) -> String {
    Html::parse_fragment(fragment)
        .root_element()
        .text()
        .collect::<String>()
}

/// Truncate to `limit` bytes on a char boundary, with an ellipsis.
fn clamp(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }
    let mut end = limit;
    while !text.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    format!("{}...", text[..end].trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_parses() {
        let json = r#"{
            "query": {
                "search": [
                    {"title": "Harbor Lights (album)", "snippet": "The <span class=\"searchmatch\">Harbor Lights</span> sessions..."}
                ]
            }
        }"#;
        let body: SearchResponse = serde_json::from_str(json).unwrap();
        let hit = body.query.unwrap().search.into_iter().next().unwrap();
        assert_eq!(hit.title, "Harbor Lights (album)");
        assert!(hit.snippet.contains("searchmatch"));
    }

    #[test]
    fn test_search_response_empty_results() {
        let json = r#"{"query": {"search": []}}"#;
        let body: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(body.query.unwrap().search.is_empty());
    }

    #[test]
    fn test_parse_extract() {
        let body = serde_json::json!({
            "query": {
                "pages": {
                    "1234": {
                        "pageid": 1234,
                        "title": "Harbor Lights (album)",
                        "extract": "Harbor Lights is the third studio album by Neon Harbor."
                    }
                }
            }
        });
        let extract = parse_extract(&body).unwrap();
        assert!(extract.starts_with("Harbor Lights is the third"));
    }

    #[test]
    fn test_parse_extract_missing_or_empty() {
        assert!(parse_extract(&serde_json::json!({})).is_none());
        let empty = serde_json::json!({
            "query": {"pages": {"1": {"extract": "  "}}}
        });
        assert!(parse_extract(&empty).is_none());
    }

    #[test]
    fn test_strip_html() {
        let snippet = "The <span class=\"searchmatch\">Harbor Lights</span> sessions began in 2019.";
        assert_eq!(
            strip_html(snippet),
            "The Harbor Lights sessions began in 2019."
        );
    }

    #[test]
    fn test_clamp_short_text_unchanged() {
        assert_eq!(clamp("short", 100), "short");
    }

    #[test]
    fn test_clamp_respects_char_boundaries() {
        let text = "日本語のテキスト".repeat(100);
        let clamped = clamp(&text, 50);
        assert!(clamped.len() <= 53);
        assert!(clamped.ends_with("..."));
    }
}
