//! Core Types
//!
//! Shared data model for the completion gateway and the wiki cache:
//! chat shapes, wiki artifacts, and the unified error type.

pub mod chat;
pub mod error;
pub mod wiki;

pub use chat::{ChatMessage, ChatRole, CompletionChunk, CompletionRequest};
pub use error::{RepoWikiError, Result};
pub use wiki::{
    CacheEntry, CacheKey, RepoInfo, WikiCacheRecord, WikiPage, WikiSection, WikiStructure,
};
