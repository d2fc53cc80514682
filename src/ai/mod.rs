//! AI Gateway
//!
//! Provider-agnostic completion gateway and its supporting pieces.
//!
//! ## Modules
//!
//! - [`provider`]: registry, adapters, and wire strategies
//! - [`stream`]: SSE stream decoding
//! - [`embedder`]: deterministic mock embedding adapter
//! - [`bridge`]: sync-into-async call bridging

pub mod bridge;
pub mod embedder;
pub mod provider;
pub mod stream;

pub use bridge::run_blocking;
pub use embedder::MockEmbedder;
pub use provider::{
    AdapterConfig, ChatAdapter, CompletionResponse, ProviderAdapter, ProviderRegistry,
    ProviderSpec,
};
pub use stream::{ChunkStream, decode_lines, decode_sse};
