//! # Personas Feature
//!
//! The persona layer: profile, weighted conversation cues, and system prompt
//! assembly.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Ambient instruction fragments on PersonaProfile
//! - 1.0.0: Initial release

pub mod cues;
pub mod profile;
pub mod prompt_builder;

pub use cues::{Cue, CueDeck, BASE_ONLY_ODDS};
pub use profile::PersonaProfile;
pub use prompt_builder::SystemPromptBuilder;
