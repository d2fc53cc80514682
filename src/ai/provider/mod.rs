//! LLM Provider Gateway
//!
//! Normalizes incompatible vendor wire protocols behind one asynchronous
//! interface. Callers resolve an adapter once through the
//! [`ProviderRegistry`] and issue [`CompletionRequest`]s; the response is
//! either the upstream JSON body verbatim or a decoded stream of chunks.
//!
//! ## Modules
//!
//! - `registry`: the read-only provider table and adapter factory
//! - `adapter`: the single request engine shared by all providers
//! - `wire`: per-provider auth and body-shape strategies

mod adapter;
mod registry;
pub(crate) mod wire;

pub use adapter::{AdapterConfig, ChatAdapter};
pub use registry::{ProviderRegistry, ProviderSpec};
pub use wire::{AuthScheme, WireShape};

use async_trait::async_trait;
use serde_json::Value;

use crate::ai::stream::ChunkStream;
use crate::types::{CompletionRequest, Result};

/// Result of a completion call: the full upstream body, or a lazy chunk
/// stream wired directly to the open connection.
pub enum CompletionResponse {
    /// Non-streaming: the provider's JSON body, unchanged.
    Full(Value),
    /// Streaming: decoded frames, pull-paced by the consumer. Dropping the
    /// stream releases the connection.
    Stream(ChunkStream),
}

impl CompletionResponse {
    pub fn into_full(self) -> Option<Value> {
        match self {
            Self::Full(value) => Some(value),
            Self::Stream(_) => None,
        }
    }

    pub fn into_stream(self) -> Option<ChunkStream> {
        match self {
            Self::Full(_) => None,
            Self::Stream(stream) => Some(stream),
        }
    }
}

impl std::fmt::Debug for CompletionResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Full(value) => f.debug_tuple("Full").field(value).finish(),
            Self::Stream(_) => f.debug_tuple("Stream").field(&"..").finish(),
        }
    }
}

/// Uniform completion interface over every supported provider.
///
/// Implementations are stateless beyond immutable construction-time data
/// and safe for concurrent reuse across in-flight requests.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Issue one chat completion. Transport failures and upstream non-2xx
    /// responses propagate uncaught; there is no retry.
    async fn chat_completion(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Provider id for logging.
    fn id(&self) -> &str;

    /// Model used when a request omits one.
    fn default_model(&self) -> &str;
}
