//! # Feature: Persona Responder
//!
//! The per-message pipeline: compose the system prompt, read the channel
//! session, optionally inject wiki context, call the completion provider,
//! and store the exchange. A completion failure degrades to an
//! error-description reply; `respond` itself never fails.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Wiki augmentation made optional via with_augmenter()
//! - 1.1.0: Image attachments forwarded as an extra outgoing entry
//! - 1.0.0: Initial release

use log::{debug, error, info};
use std::sync::Arc;
use uuid::Uuid;

use super::knowledge::KnowledgeAugmenter;
use super::message::IncomingMessage;
use super::session::{
    strip_system_turns, truncate_to_last_n, SessionStore, Turn, HISTORY_CAP,
};
use crate::features::persona::{PersonaProfile, SystemPromptBuilder};
use crate::llm::{ChatRequest, CompletionClient};

pub const RESPONSE_TEMPERATURE: f32 = 1.0;
pub const RESPONSE_MAX_TOKENS: u64 = 500;

pub struct Responder {
    profile: PersonaProfile,
    sessions: SessionStore,
    llm: Arc<dyn CompletionClient>,
    augmenter: Option<KnowledgeAugmenter>,
    model: String,
}

impl Responder {
    pub fn new(
        profile: PersonaProfile,
        sessions: SessionStore,
        llm: Arc<dyn CompletionClient>,
        model: impl Into<String>,
    ) -> Self {
        Responder {
            profile,
            sessions,
            llm,
            augmenter: None,
            model: model.into(),
        }
    }

    pub fn with_augmenter(mut self, augmenter: KnowledgeAugmenter) -> Self {
        self.augmenter = Some(augmenter);
        self
    }

    pub fn profile(&self) -> &PersonaProfile {
        &self.profile
    }

    /// Run the full pipeline for one incoming message and return the reply.
    pub async fn respond(&self, msg: &IncomingMessage) -> String {
        let request_id = Uuid::new_v4();
        info!(
            "[{}] 📥 Composing reply | Channel: {} | From: {} | Content: '{}'",
            request_id,
            msg.channel,
            msg.author_nick,
            msg.text.chars().take(100).collect::<String>()
        );

        // Scoped so the thread-local rng is gone before the first await.
        let system = {
            let mut rng = rand::rng();
            SystemPromptBuilder::new(&self.profile)
                .with_preamble(&msg.preamble)
                .replying_to(&msg.author_nick)
                .build(&mut rng)
        };
        debug!(
            "[{}] 📝 System prompt ready | Length: {} chars",
            request_id,
            system.len()
        );

        let mut history = self.sessions.history(msg.channel);
        strip_system_turns(&mut history);
        truncate_to_last_n(&mut history, HISTORY_CAP);
        debug!(
            "[{}] 📚 Session history: {} turns",
            request_id,
            history.len()
        );

        let mut outgoing = Vec::with_capacity(history.len() + 4);
        outgoing.push(Turn::system(system));
        outgoing.extend(history.iter().cloned());

        if let Some(augmenter) = &self.augmenter {
            if let Some(turn) = augmenter.context_turn(&msg.text, &history, request_id).await {
                info!("[{request_id}] 📖 Wiki context injected");
                outgoing.push(turn);
            }
        }

        outgoing.push(Turn::user(format!("{}: {}", msg.author_nick, msg.text)));
        if let Some(url) = msg.attachment_urls.first() {
            debug!("[{request_id}] 🖼️ Forwarding image attachment reference");
            outgoing.push(Turn::image(url.clone()));
        }

        let request = ChatRequest {
            model: self.model.clone(),
            temperature: RESPONSE_TEMPERATURE,
            max_tokens: RESPONSE_MAX_TOKENS,
            turns: outgoing.clone(),
        };

        let reply = match self.llm.complete(request).await {
            Ok(text) => {
                let text = text.trim().to_string();
                info!(
                    "[{}] ✅ Completion received | Response length: {}",
                    request_id,
                    text.len()
                );
                outgoing.push(Turn::assistant(text.clone()));
                text
            }
            Err(e) => {
                error!("[{request_id}] ❌ Completion failed: {e}");
                format!("An error occurred: {e}")
            }
        };

        self.sessions.replace(msg.channel, outgoing);
        reply
    }
}
