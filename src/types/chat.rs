//! Common Completion Request Shapes
//!
//! Provider-neutral chat completion types. Every adapter translates these
//! into its provider's wire shape; provider-specific overrides travel in
//! `CompletionRequest::extra` without polluting the common fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Role of a chat message. Closed set: providers share these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One chat message. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

/// One decoded frame of a streaming response.
///
/// Providers define the frame layout themselves, so chunks stay opaque JSON.
pub type CompletionChunk = Value;

/// Provider-neutral completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model name. `None` selects the first entry of the provider's catalog.
    #[serde(default)]
    pub model: Option<String>,
    /// Ordered conversation history.
    pub messages: Vec<ChatMessage>,
    /// Stored as `f64` so values like `0.7` serialize exactly as written
    /// instead of picking up float-widening noise on the wire.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub stream: bool,
    /// Provider-specific overrides, merged into the wire body last so they
    /// win over every computed field.
    #[serde(default)]
    pub extra: Map<String, Value>,
}

fn default_temperature() -> f64 {
    0.7
}

fn default_top_p() -> f64 {
    0.8
}

impl CompletionRequest {
    /// Build a request with defaults matching the providers' documented ones.
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            model: None,
            messages,
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: None,
            stream: false,
            extra: Map::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn streaming(mut self) -> Self {
        self.stream = true;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}
