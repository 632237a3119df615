//! Request/response shapes of the two completion endpoints.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A completion wire protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallShape {
    /// `POST {base}/chat/completions` with a `messages` array.
    ChatCompletions,
    /// `POST {base}/completions` with a `prompt` string.
    LegacyCompletions,
}

impl CallShape {
    /// Default attempt order: modern first, legacy as fallback.
    pub const DEFAULT_ORDER: [CallShape; 2] =
        [CallShape::ChatCompletions, CallShape::LegacyCompletions];

    pub fn path(self) -> &'static str {
        match self {
            CallShape::ChatCompletions => "chat/completions",
            CallShape::LegacyCompletions => "completions",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CallShape::ChatCompletions => "chat-completions",
            CallShape::LegacyCompletions => "legacy-completions",
        }
    }
}

impl fmt::Display for CallShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Chat completions
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoiceMessage {
    pub content: Option<String>,
}

// ---------------------------------------------------------------------------
// Legacy completions
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct LegacyRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LegacyResponse {
    #[serde(default)]
    pub choices: Vec<LegacyChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LegacyChoice {
    pub text: Option<String>,
}
