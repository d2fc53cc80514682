//! Global Constants
//!
//! Centralized constants for configuration and tuning.

/// Completion gateway constants
pub mod gateway {
    /// Connect+read timeout for one provider call (seconds). Expiry fails
    /// the call with a transport error; there is no retry.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
}

/// Wiki cache constants
pub mod cache {
    /// Prefix of every cache filename. The full grammar is
    /// `{PREFIX}_{repo_type}_{owner}_{repo}_{language}.json`.
    pub const FILE_PREFIX: &str = "repowiki_cache";

    /// Extension of every cache file.
    pub const FILE_EXT: &str = "json";
}

/// Mock embedder constants
pub mod embedder {
    /// Dimensionality of mock embedding vectors.
    pub const DIMENSIONS: usize = 256;
}
