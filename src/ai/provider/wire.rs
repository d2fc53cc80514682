//! Provider Wire Strategies
//!
//! The differences between provider protocols are data, not code: each
//! registry entry picks an authentication scheme and a request shape, and
//! the single adapter engine applies them. Adding a provider with a novel
//! protocol means adding one variant here, never branching in the caller.

use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};

use crate::types::{CompletionRequest, Result};

/// How a provider authenticates requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>`.
    Bearer,
    /// `Authorization: token <key>` (Baidu ERNIE workshop scheme).
    Token,
    /// Bearer token plus an `X-Source: openapi` header (MiniMax).
    BearerWithSource,
}

impl AuthScheme {
    /// Attach credentials to an outgoing request.
    pub fn apply(&self, request: RequestBuilder, api_key: &SecretString) -> RequestBuilder {
        match self {
            Self::Bearer => request.header(
                "Authorization",
                format!("Bearer {}", api_key.expose_secret()),
            ),
            Self::Token => {
                request.header("Authorization", format!("token {}", api_key.expose_secret()))
            }
            Self::BearerWithSource => request
                .header(
                    "Authorization",
                    format!("Bearer {}", api_key.expose_secret()),
                )
                .header("X-Source", "openapi"),
        }
    }
}

/// How a provider shapes the completion request body and endpoint path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireShape {
    /// OpenAI-compatible `POST /chat/completions` with a `model` field.
    OpenAi,
    /// Baidu ERNIE workshop: `POST /chat/eb-instant`, no `model` field,
    /// `max_output_tokens` instead of `max_tokens`.
    ErnieBot,
}

impl WireShape {
    /// Endpoint path appended to the provider base URL.
    pub fn endpoint_path(&self) -> &'static str {
        match self {
            Self::OpenAi => "/chat/completions",
            Self::ErnieBot => "/chat/eb-instant",
        }
    }

    /// Translate the common request into this wire's JSON body.
    ///
    /// `fixed_extras` are provider-mandated parameters applied
    /// unconditionally; `request.extra` is merged last so caller overrides
    /// win over every computed field.
    pub fn build_body(
        &self,
        model: &str,
        request: &CompletionRequest,
        fixed_extras: &[(&'static str, u64)],
    ) -> Result<Value> {
        let mut body = Map::new();

        if matches!(self, Self::OpenAi) {
            body.insert("model".to_string(), Value::String(model.to_string()));
        }
        body.insert(
            "messages".to_string(),
            serde_json::to_value(&request.messages)?,
        );
        body.insert("temperature".to_string(), Value::from(request.temperature));
        body.insert("top_p".to_string(), Value::from(request.top_p));
        body.insert("stream".to_string(), Value::Bool(request.stream));

        if let Some(max_tokens) = request.max_tokens {
            let key = match self {
                Self::OpenAi => "max_tokens",
                Self::ErnieBot => "max_output_tokens",
            };
            body.insert(key.to_string(), Value::from(max_tokens));
        }

        for (key, value) in fixed_extras {
            body.insert((*key).to_string(), Value::from(*value));
        }
        for (key, value) in &request.extra {
            body.insert(key.clone(), value.clone());
        }

        Ok(Value::Object(body))
    }
}
