//! Unified system prompt construction
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Consolidated prompt assembly into fluent builder API

use rand::Rng;

use super::profile::PersonaProfile;

const MATCH_TONE: &str = " - Match the style and tone of the message you are replying to.";

/// Builder for the per-message system prompt.
///
/// Concatenates, in fixed order: the caller-supplied preamble, the persona
/// base text with its randomly selected cue, the reply-target attribution,
/// the tone-matching instruction, and the plain-opening format instruction.
///
/// # Example
///
/// ```ignore
/// let prompt = SystemPromptBuilder::new(&profile)
///     .with_preamble(&profile.preamble())
///     .replying_to("kelsey")
///     .build(&mut rand::rng());
/// ```
pub struct SystemPromptBuilder<'a> {
    profile: &'a PersonaProfile,
    preamble: String,
    reply_to: Option<String>,
    match_tone: bool,
    plain_opening: bool,
}

impl<'a> SystemPromptBuilder<'a> {
    pub fn new(profile: &'a PersonaProfile) -> Self {
        SystemPromptBuilder {
            profile,
            preamble: String::new(),
            reply_to: None,
            match_tone: true,
            plain_opening: true,
        }
    }

    /// Set the caller-supplied opening of the prompt.
    pub fn with_preamble(mut self, preamble: &str) -> Self {
        self.preamble = preamble.to_string();
        self
    }

    /// Name the user whose message is being replied to.
    pub fn replying_to(mut self, nick: &str) -> Self {
        self.reply_to = Some(nick.to_string());
        self
    }

    pub fn with_tone_matching(mut self, on: bool) -> Self {
        self.match_tone = on;
        self
    }

    pub fn with_plain_opening(mut self, on: bool) -> Self {
        self.plain_opening = on;
        self
    }

    /// Build the final system prompt.
    pub fn build<R: Rng + ?Sized>(self, rng: &mut R) -> String {
        let mut prompt = self.preamble;
        prompt.push_str(&self.profile.conversation_cue(rng));

        if let Some(nick) = &self.reply_to {
            prompt.push_str(&format!(
                " - The message you are replying to is from a user named {nick}."
            ));
        }
        if self.match_tone {
            prompt.push_str(MATCH_TONE);
        }
        if self.plain_opening {
            prompt.push_str(&format!(
                " - Do not start your response with the indicator of who you are, such as '{}: '. Just start with your response.",
                self.profile.long_name
            ));
        }
        prompt
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
    fn test_builder_basic() {
        let profile = profile();
        let mut rng = StdRng::seed_from_u64(5);
        let prompt = SystemPromptBuilder::new(&profile).build(&mut rng);
        assert!(!prompt.is_empty());
        assert!(prompt.contains("Neon Harbor"));
    }

    #[test]
    fn test_builder_fragment_order() {
        let profile = profile();
        let mut rng = StdRng::seed_from_u64(5);
        let prompt = SystemPromptBuilder::new(&profile)
            .with_preamble("PREAMBLE.")
            .replying_to("kelsey")
            .build(&mut rng);

        let preamble = prompt.find("PREAMBLE.").unwrap();
        let base = prompt.find("Neon Harbor").unwrap();
        let reply = prompt.find("from a user named kelsey").unwrap();
        let tone = prompt.find("Match the style and tone").unwrap();
        let opening = prompt.find("Do not start your response").unwrap();

        assert!(preamble < base);
        assert!(base < reply);
        assert!(reply < tone);
        assert!(tone < opening);
    }

    #[test]
    fn test_builder_plain_opening_names_persona() {
        let profile = profile();
        let mut rng = StdRng::seed_from_u64(5);
        let prompt = SystemPromptBuilder::new(&profile).build(&mut rng);
        assert!(prompt.contains("'Joss Vega: '"));
    }

    #[test]
    fn test_builder_flags_off() {
        let profile = profile();
        let mut rng = StdRng::seed_from_u64(5);
        let prompt = SystemPromptBuilder::new(&profile)
            .with_tone_matching(false)
            .with_plain_opening(false)
            .build(&mut rng);
        assert!(!prompt.contains("Match the style and tone"));
        assert!(!prompt.contains("Do not start your response"));
    }

    #[test]
    fn test_builder_no_reply_target() {
        let profile = profile();
        let mut rng = StdRng::seed_from_u64(5);
        let prompt = SystemPromptBuilder::new(&profile).build(&mut rng);
        assert!(!prompt.contains("from a user named"));
    }
}
