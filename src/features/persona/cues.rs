//! Weighted conversation cues
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial release with the frontman cue deck

use rand::seq::IndexedRandom;
use rand::Rng;

/// Probability that a response uses the base persona text with no extra cue.
pub const BASE_ONLY_ODDS: f64 = 2.0 / 3.0;

/// One flavor-text cue with its selection weight.
#[derive(Debug, Clone)]
pub struct Cue {
    pub text: &'static str,
    pub weight: u32,
}

/// Immutable weighted table of persona flavor cues.
#[derive(Debug, Clone)]
pub struct CueDeck {
    cues: Vec<Cue>,
}

impl CueDeck {
    pub fn new(cues: Vec<Cue>) -> Self {
        CueDeck { cues }
    }

    /// The default deck for the frontman persona. All cues carry equal weight.
    pub fn frontman() -> Self {
        let cues = [
            "Reference a specific band, song, or music theory concept.",
            "Mention a book, philosophical idea, or language you're learning.",
            "Bring up one of your more unusual interests.",
            "Make a self-deprecating joke.",
            "Share a brief anecdote from the music business.",
            "Make a dry, witty comment about the current topic.",
            "Share a deep or slightly anxious thought.",
            "Reference a fan interaction or tour memory.",
            "Mention a movie, TV show, or current event that interests you.",
        ];
        CueDeck::new(
            cues.into_iter()
                .map(|text| Cue { text, weight: 10 })
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Pick a cue for this response, or `None` to use the base text alone.
    ///
    /// Roughly two responses in three get no specific cue; the rest draw one
    /// cue from the deck, weighted.
    pub fn select<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&'static str> {
        if self.cues.is_empty() || rng.random::<f64>() < BASE_ONLY_ODDS {
            return None;
        }
        self.cues
            .choose_weighted(rng, |cue| cue.weight)
            .ok()
            .map(|cue| cue.text)
    }
}
