//! # Feature: Persona Profile
//!
//! The frontman persona: Joss Vega of Neon Harbor. The base prompt is embedded
//! at compile time from prompt/frontman.md; conversation cues come from a
//! weighted deck so consecutive replies don't all read the same.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Ambient instruction fragments exposed for host preambles
//! - 1.0.0: Initial release

use rand::Rng;

use super::cues::CueDeck;

const ONGOING_CONVERSATION: &str = " - You are in the middle of an ongoing conversation and do not need to provide introductory information.";
const WELL_KNOWN_MEMBER: &str = " - You are a well known member of this Discord server.";
const NOT_AN_ASSISTANT: &str = " - You are NOT an assistant. You are just another member of the server.";
const KIND: &str = " - You are kind.";
const KEEP_IT_GOING: &str = " - but try to keep the conversation going. Ask questions, make suggestions, and provide information. Be engaging and stimulating.";

/// A chat persona: display names, base prompt, and its cue deck.
#[derive(Debug, Clone)]
pub struct PersonaProfile {
    pub long_name: String,
    pub short_name: String,
    pub base_prompt: String,
    cues: CueDeck,
}

impl PersonaProfile {
    /// The default persona, with the prompt embedded at compile time.
    pub fn frontman(long_name: &str, short_name: &str) -> Self {
        PersonaProfile {
            long_name: long_name.to_string(),
            short_name: short_name.to_string(),
            base_prompt: include_str!("../../../prompt/frontman.md").to_string(),
            cues: CueDeck::frontman(),
        }
    }

    /// Replace the cue deck (used by tests and alternate personas).
    pub fn with_cues(mut self, cues: CueDeck) -> Self {
        self.cues = cues;
        self
    }

    /// Base persona text, with a specific cue appended roughly one response
    /// in three.
    pub fn conversation_cue<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        match self.cues.select(rng) {
            Some(cue) => format!(
                "{}\n\nFor this response, also: {}",
                self.base_prompt.trim_end(),
                cue
            ),
            None => self.base_prompt.trim_end().to_string(),
        }
    }

    pub fn terse_reminder(&self) -> String {
        format!(
            " - Keep the responses SHORT. After all, {} is naturally terse.",
            self.short_name
        )
    }

    /// Default opening of the system prompt; host adapters pass this as the
    /// caller-supplied preamble.
    pub fn preamble(&self) -> String {
        let mut preamble = format!("You are {}.", self.long_name);
        preamble.push_str(ONGOING_CONVERSATION);
        preamble.push_str(WELL_KNOWN_MEMBER);
        preamble.push_str(NOT_AN_ASSISTANT);
        preamble.push_str(KIND);
        preamble.push_str(&self.terse_reminder());
        preamble.push_str(KEEP_IT_GOING);
        preamble
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn profile() -> PersonaProfile {
        PersonaProfile::frontman("Joss Vega", "Joss")
    }

    #[test]
    fn test_base_prompt_loaded() {
        let profile = profile();
        assert!(profile.base_prompt.contains("Joss Vega"));
        assert!(profile.base_prompt.contains("Neon Harbor"));
        assert!(
            profile.base_prompt.len() > 100,
            "prompt should be substantial"
        );
    }

    #[test]
    fn test_conversation_cue_always_contains_base() {
        let profile = profile();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let cue = profile.conversation_cue(&mut rng);
            assert!(cue.starts_with(profile.base_prompt.trim_end()));
        }
    }

    #[test]
    fn test_conversation_cue_appends_marker() {
        let profile = profile();
        let mut rng = StdRng::seed_from_u64(11);

        let with_cue = (0..200)
            .map(|_| profile.conversation_cue(&mut rng))
            .filter(|c| c.contains("For this response, also:"))
            .count();
        assert!(with_cue > 0, "some responses should carry a specific cue");
        assert!(with_cue < 200, "not every response should carry a cue");
    }

    #[test]
    fn test_preamble_fragments() {
        let preamble = profile().preamble();
        assert!(preamble.starts_with("You are Joss Vega."));
        assert!(preamble.contains("ongoing conversation"));
        assert!(preamble.contains("NOT an assistant"));
        assert!(preamble.contains("Joss is naturally terse"));
        assert!(preamble.contains("keep the conversation going"));
    }
}
