//! # Feature: Knowledge Augmenter
//!
//! Decides, via a preliminary model call, whether the incoming message needs
//! a wiki lookup, and if so injects the lookup result as an extra system
//! turn. Everything here is best-effort: any failure degrades to "no
//! augmentation".
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.0.0: Initial release

use log::{debug, warn};
use std::sync::Arc;
use uuid::Uuid;

use super::session::Turn;
use crate::llm::{ChatRequest, CompletionClient, CompletionError};
use crate::wiki::KnowledgeSource;

pub const DECISION_TEMPERATURE: f32 = 0.7;
pub const DECISION_MAX_TOKENS: u64 = 100;

const DECISION_MARKER: &str = "API NEEDED";

pub struct KnowledgeAugmenter {
    llm: Arc<dyn CompletionClient>,
    source: Arc<dyn KnowledgeSource>,
    model: String,
    wiki_name: String,
}

impl KnowledgeAugmenter {
    pub fn new(
        llm: Arc<dyn CompletionClient>,
        source: Arc<dyn KnowledgeSource>,
        model: impl Into<String>,
        wiki_name: impl Into<String>,
    ) -> Self {
        KnowledgeAugmenter {
            llm,
            source,
            model: model.into(),
            wiki_name: wiki_name.into(),
        }
    }

    /// Produce the system turn carrying wiki context for this message, or
    /// `None` when no lookup is warranted or anything along the way fails.
    pub async fn context_turn(
        &self,
        incoming: &str,
        history: &[Turn],
        request_id: Uuid,
    ) -> Option<Turn> {
        let context = decision_context(incoming, history);

        let decision = match self.fetch_decision(&context).await {
            Ok(text) => text,
            Err(e) => {
                warn!("[{request_id}] ⚠️ Lookup decision call failed: {e}");
                return None;
            }
        };
        debug!("[{request_id}] 🔎 API decision: {decision}");

        let query = parse_decision(&decision)?;

        match self.source.get_search_result_knowledge(&query).await {
            Ok(Some(content)) if !content.trim().is_empty() => {
                Some(Turn::system(format!("API result for '{query}': {content}")))
            }
            Ok(_) => {
                debug!("[{request_id}] 🔎 Wiki had no content for '{query}'");
                None
            }
            Err(e) => {
                warn!("[{request_id}] ⚠️ Wiki lookup failed for '{query}': {e}");
                None
            }
        }
    }

    async fn fetch_decision(&self, context: &str) -> Result<String, CompletionError> {
        let wiki = &self.wiki_name;
        let instruction = format!(
            "The user has asked: '{context}'. \
             If the question is asking for specific or detailed information that is not in your internal knowledge, \
             especially related to {wiki}, you **must** query the {wiki} API to provide accurate information. \
             Always prefer querying the API for detailed questions about the band. \
             If a query is needed, respond with 'API NEEDED:<query term>'. Otherwise, respond 'NO API NEEDED'."
        );

        self.llm
            .complete(ChatRequest {
                model: self.model.clone(),
                temperature: DECISION_TEMPERATURE,
                max_tokens: DECISION_MAX_TOKENS,
                turns: vec![Turn::system(instruction)],
            })
            .await
    }
}

/// Up to the last two prior turns plus the incoming text, newline-joined,
/// newest last.
fn decision_context(incoming: &str, history: &[Turn]) -> String {
    let mut parts: Vec<&str> = history
        .iter()
        .rev()
        .take(2)
        .map(|turn| turn.content.as_text())
        .collect();
    parts.reverse();
    parts.push(incoming);
    parts.join("\n")
}

/// Extract the lookup query from a decision response.
///
/// `API NEEDED:<term>` yields the trimmed term; a marker without a colon,
/// an empty term, or anything else yields `None`.
fn parse_decision(decision: &str) -> Option<String> {
    let rest = decision.trim().strip_prefix(DECISION_MARKER)?;
    let (_, term) = rest.split_once(':')?;
    let term = term.trim();
    if term.is_empty() {
        None
    } else {
        Some(term.to_string())
    }
}
