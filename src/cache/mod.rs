//! Wiki Artifact Cache
//!
//! File-backed persistence keyed by repository identity and language, so
//! expensive wiki generation is not repeated.

mod store;

pub use store::WikiCacheStore;
