// Core layer - configuration and response utilities
pub mod core;

// Features layer - persona and chat pipeline
pub mod features;

// Infrastructure - completion provider and wiki clients
pub mod llm;
pub mod wiki;

// Re-export core config for convenience
pub use self::core::Config;

// Re-export the pieces hosts wire together
pub use features::{
    IncomingMessage, KnowledgeAugmenter, PersonaProfile, Responder, SessionStore,
};
pub use llm::{ChatRequest, CompletionClient, CompletionError, OpenAiCompletion};
pub use wiki::{KnowledgeSource, WikiApi};
