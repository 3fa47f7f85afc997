//! # Feature: Session Buffer
//!
//! Per-channel rolling conversation history. Each channel keeps at most
//! [`HISTORY_CAP`] historical turns (the system turn is stripped and rebuilt
//! on every message); the store itself is bounded by evicting the
//! least-recently-touched channel once `max_channels` is reached.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: LRU-by-channel eviction
//! - 1.0.0: Initial release with per-channel capped history

use dashmap::DashMap;
use std::fmt;
use std::time::Instant;

/// Historical turns kept per channel, excluding the system turn.
pub const HISTORY_CAP: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Turn payload: plain text, or an image reference carried by URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnContent {
    Text(String),
    ImageUrl(String),
}

impl TurnContent {
    pub fn as_text(&self) -> &str {
        match self {
            TurnContent::Text(text) => text,
            TurnContent::ImageUrl(url) => url,
        }
    }
}

impl fmt::Display for TurnContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text())
    }
}

/// One role-tagged message unit in a conversation history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: TurnContent,
}

impl Turn {
    pub fn system(text: impl Into<String>) -> Self {
        Turn {
            role: Role::System,
            content: TurnContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Turn {
            role: Role::User,
            content: TurnContent::Text(text.into()),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Turn {
            role: Role::Assistant,
            content: TurnContent::Text(text.into()),
        }
    }

    /// Image-reference entry; rides with user role.
    pub fn image(url: impl Into<String>) -> Self {
        Turn {
            role: Role::User,
            content: TurnContent::ImageUrl(url.into()),
        }
    }
}

/// Remove all system turns (cardinality 0 or 1 in practice).
pub fn strip_system_turns(turns: &mut Vec<Turn>) {
    turns.retain(|turn| turn.role != Role::System);
}

/// Keep only the last `n` turns.
pub fn truncate_to_last_n(turns: &mut Vec<Turn>, n: usize) {
    if turns.len() > n {
        let drop = turns.len() - n;
        turns.drain(..drop);
    }
}

struct Session {
    turns: Vec<Turn>,
    touched: Instant,
}

/// Channel-keyed session storage, bounded by LRU eviction.
pub struct SessionStore {
    sessions: DashMap<u64, Session>,
    max_channels: usize,
}

impl SessionStore {
    pub fn new(max_channels: usize) -> Self {
        SessionStore {
            sessions: DashMap::new(),
            max_channels: max_channels.max(1),
        }
    }

    /// Stored turns for a channel, creating an empty session on first use.
    pub fn history(&self, channel: u64) -> Vec<Turn> {
        if let Some(mut session) = self.sessions.get_mut(&channel) {
            session.touched = Instant::now();
            return session.turns.clone();
        }

        self.evict_to_fit();
        self.sessions.insert(
            channel,
            Session {
                turns: Vec::new(),
                touched: Instant::now(),
            },
        );
        Vec::new()
    }

    /// Store the post-call session for a channel.
    pub fn replace(&self, channel: u64, turns: Vec<Turn>) {
        if !self.sessions.contains_key(&channel) {
            self.evict_to_fit();
        }
        self.sessions.insert(
            channel,
            Session {
                turns,
                touched: Instant::now(),
            },
        );
    }

    pub fn channel_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn contains(&self, channel: u64) -> bool {
        self.sessions.contains_key(&channel)
    }

    fn evict_to_fit(&self) {
        while self.sessions.len() >= self.max_channels {
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|entry| entry.value().touched)
                .map(|entry| *entry.key());
            match oldest {
                Some(channel) => {
                    self.sessions.remove(&channel);
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_strip_system_turns() {
        let mut turns = vec![
            Turn::system("sys"),
            Turn::user("hi"),
            Turn::assistant("hey"),
        ];
        strip_system_turns(&mut turns);
        assert_eq!(
            turns,
            vec![Turn::user("hi"), Turn::assistant("hey")]
        );
    }

    #[test]
    fn test_strip_no_system_is_noop() {
        let mut turns = vec![Turn::user("hi")];
        strip_system_turns(&mut turns);
        assert_eq!(turns.len(), 1);
    }

    #[test]
    fn test_truncate_keeps_most_recent() {
        let mut turns: Vec<Turn> = (0..20).map(|i| Turn::user(format!("m{i}"))).collect();
        truncate_to_last_n(&mut turns, HISTORY_CAP);
        assert_eq!(turns.len(), HISTORY_CAP);
        assert_eq!(turns[0], Turn::user("m8"));
        assert_eq!(turns[11], Turn::user("m19"));
    }

    #[test]
    fn test_truncate_under_cap_is_noop() {
        let mut turns = vec![Turn::user("a"), Turn::user("b")];
        truncate_to_last_n(&mut turns, HISTORY_CAP);
        assert_eq!(turns.len(), 2);
    }

    #[test]
    fn test_history_creates_lazily() {
        let store = SessionStore::new(8);
        assert_eq!(store.channel_count(), 0);
        assert!(store.history(1).is_empty());
        assert_eq!(store.channel_count(), 1);
    }

    #[test]
    fn test_replace_round_trip() {
        let store = SessionStore::new(8);
        store.replace(1, vec![Turn::user("hi"), Turn::assistant("hey")]);
        let turns = store.history(1);
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1], Turn::assistant("hey"));
    }

    #[test]
    fn test_sessions_isolated_per_channel() {
        let store = SessionStore::new(8);
        store.replace(1, vec![Turn::user("one")]);
        store.replace(2, vec![Turn::user("two")]);
        assert_eq!(store.history(1), vec![Turn::user("one")]);
        assert_eq!(store.history(2), vec![Turn::user("two")]);
    }

    #[test]
    fn test_lru_eviction_drops_oldest_channel() {
        let store = SessionStore::new(2);
        store.replace(1, vec![Turn::user("one")]);
        sleep(Duration::from_millis(5));
        store.replace(2, vec![Turn::user("two")]);
        sleep(Duration::from_millis(5));

        // Touch channel 1 so channel 2 becomes the eviction candidate.
        store.history(1);
        sleep(Duration::from_millis(5));

        store.replace(3, vec![Turn::user("three")]);
        assert_eq!(store.channel_count(), 2);
        assert!(store.contains(1));
        assert!(!store.contains(2));
        assert!(store.contains(3));
    }

    #[test]
    fn test_existing_channel_replace_never_evicts() {
        let store = SessionStore::new(2);
        store.replace(1, vec![Turn::user("one")]);
        store.replace(2, vec![Turn::user("two")]);
        store.replace(1, vec![Turn::user("one again")]);
        assert_eq!(store.channel_count(), 2);
        assert!(store.contains(2));
    }
}
