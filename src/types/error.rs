//! Unified Error Type System
//!
//! Centralized error types for the gateway and cache subsystems.
//!
//! ## Error Taxonomy
//!
//! - **Config**: unknown provider id, missing credential, bad base URL;
//!   raised at construction time, never deferred to the first call
//! - **Transport**: connect/read timeout or connection failure, propagated
//!   to the caller uncaught with no automatic retry
//! - **Provider**: upstream non-2xx response, carrying status and raw body
//! - **Unauthorized**: cache deletion attempted without a valid code
//! - **CacheNotFound**: cache deletion of a key that has no file
//!
//! Cache *read* failures are deliberately not represented here: `read`
//! swallows them and reports "absent". Cache *write* failures surface as a
//! `bool` result that callers must check.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoWikiError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Gateway Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),

    /// Upstream returned a non-2xx status. The raw body is preserved so the
    /// caller can inspect the provider's own error payload.
    #[error("{provider} API error ({status}): {body}")]
    Provider {
        provider: String,
        status: u16,
        body: String,
    },

    // -------------------------------------------------------------------------
    // Cache Errors
    // -------------------------------------------------------------------------
    #[error("Authorization code is invalid")]
    Unauthorized,

    #[error("Wiki cache not found: {0}")]
    CacheNotFound(String),
}

impl RepoWikiError {
    /// Classify a reqwest failure into the gateway taxonomy.
    ///
    /// Timeouts and connection failures are transport errors; everything
    /// else (TLS setup, redirect loops, body decoding) is reported the same
    /// way since the caller cannot act on the distinction.
    pub fn from_transport(provider: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("{} request timed out: {}", provider, err))
        } else if err.is_connect() {
            Self::Transport(format!("{} connection failed: {}", provider, err))
        } else {
            Self::Transport(format!("{} request failed: {}", provider, err))
        }
    }
}

pub type Result<T> = std::result::Result<T, RepoWikiError>;
