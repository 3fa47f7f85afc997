//! # Chat Feature
//!
//! The persona-driven response pipeline: session buffering, knowledge
//! augmentation, and completion dispatch.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Knowledge augmentation
//! - 1.1.0: Session store with LRU eviction
//! - 1.0.0: Initial release

pub mod knowledge;
pub mod message;
pub mod responder;
pub mod session;

pub use knowledge::KnowledgeAugmenter;
pub use message::IncomingMessage;
pub use responder::{Responder, RESPONSE_MAX_TOKENS, RESPONSE_TEMPERATURE};
pub use session::{
    strip_system_turns, truncate_to_last_n, Role, SessionStore, Turn, TurnContent, HISTORY_CAP,
};
