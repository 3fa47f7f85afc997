//! Narrow incoming-message type
//!
//! The pipeline depends on this slice of a chat-platform message rather than
//! on the platform SDK's types; host adapters construct it at the edge.

/// One incoming chat message, reduced to what the responder needs.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Channel identifier the session is keyed by.
    pub channel: u64,
    /// Display nickname of the author, used for attribution.
    pub author_nick: String,
    /// Message text, already stripped of platform markup.
    pub text: String,
    /// URLs of any attachments; only the first is forwarded.
    pub attachment_urls: Vec<String>,
    /// Caller-supplied opening of the system prompt.
    pub preamble: String,
}

impl IncomingMessage {
    pub fn new(channel: u64, author_nick: impl Into<String>, text: impl Into<String>) -> Self {
        IncomingMessage {
            channel,
            author_nick: author_nick.into(),
            text: text.into(),
            attachment_urls: Vec::new(),
            preamble: String::new(),
        }
    }

    pub fn with_attachments(mut self, urls: Vec<String>) -> Self {
        self.attachment_urls = urls;
        self
    }

    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }
}
