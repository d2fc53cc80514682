//! RepoWiki - LLM Gateway and Wiki Cache for AI-Generated Documentation
//!
//! Backend building blocks for serving AI-generated documentation ("wiki")
//! of source repositories: a provider-agnostic completion gateway over
//! several incompatible LLM vendor protocols, and a keyed file cache for
//! generated wiki artifacts.
//!
//! ## Quick Start
//!
//! ```ignore
//! use repowiki::{AdapterConfig, ProviderAdapter, ProviderRegistry};
//! use repowiki::types::{ChatMessage, CompletionRequest};
//!
//! let registry = ProviderRegistry::builtin();
//! let adapter = registry.adapter("deepseek", AdapterConfig::default())?;
//! let request = CompletionRequest::new(vec![ChatMessage::user("Summarize this repo")]);
//! let response = adapter.chat_completion(request).await?;
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: provider registry, adapters, stream decoding, mock embedder
//! - [`cache`]: wiki artifact cache store
//! - [`config`]: settings and the delete authorization policy
//! - [`types`]: chat shapes, wiki artifacts, error taxonomy

pub mod ai;
pub mod cache;
pub mod config;
pub mod constants;
pub mod logging;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{AuthPolicy, Settings};

// Error Types
pub use types::error::{RepoWikiError, Result};

// Cache
pub use cache::WikiCacheStore;

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{
    // Gateway
    AdapterConfig,
    ChatAdapter,
    // Stream decoding
    ChunkStream,
    CompletionResponse,
    // Embedding
    MockEmbedder,
    ProviderAdapter,
    ProviderRegistry,
    ProviderSpec,
    // Bridging
    run_blocking,
};
