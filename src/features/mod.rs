//! Features layer - persona definition and the chat pipeline

pub mod chat;
pub mod persona;

pub use chat::{
    IncomingMessage, KnowledgeAugmenter, Responder, Role, SessionStore, Turn, TurnContent,
    HISTORY_CAP,
};
pub use persona::{Cue, CueDeck, PersonaProfile, SystemPromptBuilder};
