//! Wiki Cache Store
//!
//! Flat directory of JSON files, one per cache key. The filename grammar is
//! `repowiki_cache_{repo_type}_{owner}_{repo}_{language}.json`; `repo` may
//! itself contain the separator, so parsing takes the first component as
//! repo_type, the second as owner, the last as language, and joins the rest
//! back into repo. The other key fields are assumed not to contain `_`.
//!
//! Error discipline follows the caller contract:
//! - `read` swallows every failure and reports "absent"
//! - `write` returns a success boolean that callers must check
//! - `delete` checks authorization before touching the filesystem
//!
//! There is no locking: concurrent writers to the same key race and the
//! last write wins.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::config::{AuthPolicy, Settings};
use crate::constants::cache::{FILE_EXT, FILE_PREFIX};
use crate::types::{CacheEntry, CacheKey, RepoWikiError, Result, WikiCacheRecord};

/// File-backed persistence for generated wiki artifacts.
#[derive(Debug, Clone)]
pub struct WikiCacheStore {
    cache_dir: PathBuf,
    auth: AuthPolicy,
}

impl WikiCacheStore {
    pub fn new(cache_dir: impl Into<PathBuf>, auth: AuthPolicy) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            auth,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.cache_dir.clone(), settings.auth_policy())
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Deterministic file path for a key. Pure: equal keys always map to
    /// the same path, distinct keys to distinct paths.
    pub fn key_to_path(&self, key: &CacheKey) -> PathBuf {
        let filename = format!(
            "{}_{}_{}_{}_{}.{}",
            FILE_PREFIX, key.repo_type, key.owner, key.repo, key.language, FILE_EXT
        );
        self.cache_dir.join(filename)
    }

    /// Read the cached record for a key.
    ///
    /// Any failure (missing file, unreadable file, corrupt JSON) logs and
    /// returns `None`; callers cannot distinguish "never written" from
    /// "corrupt", by design.
    pub async fn read(&self, key: &CacheKey) -> Option<WikiCacheRecord> {
        let path = self.key_to_path(key);

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Wiki cache not found for {}", key);
                return None;
            }
            Err(e) => {
                error!("Error reading wiki cache from {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(record) => {
                debug!("Loaded wiki cache for {}", key);
                Some(record)
            }
            Err(e) => {
                error!("Error parsing wiki cache from {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Write (or overwrite) the record at the key's path.
    ///
    /// Returns `true` on success; on any failure logs and returns `false`
    /// rather than raising, so callers must check the result.
    pub async fn write(&self, record: &WikiCacheRecord, key: &CacheKey) -> bool {
        let path = self.key_to_path(key);
        info!("Attempting to save wiki cache. Path: {}", path.display());

        if let Err(e) = tokio::fs::create_dir_all(&self.cache_dir).await {
            error!(
                "Failed to create cache directory {}: {}",
                self.cache_dir.display(),
                e
            );
            return false;
        }

        let payload = match serde_json::to_string_pretty(record) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Failed to serialize wiki cache for {}: {}", key, e);
                return false;
            }
        };
        info!("Payload prepared for caching. Size: {} bytes", payload.len());

        match tokio::fs::write(&path, payload).await {
            Ok(()) => {
                info!("Wiki cache successfully saved to {}", path.display());
                true
            }
            Err(e) => {
                error!("Error saving wiki cache to {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Delete the cached record for a key.
    ///
    /// When auth mode is enabled the supplied code is checked against the
    /// configured secret before any filesystem access. Deleting an absent
    /// key fails with `CacheNotFound`.
    pub async fn delete(&self, key: &CacheKey, auth_code: Option<&str>) -> Result<()> {
        if !self.auth.validate(auth_code) {
            return Err(RepoWikiError::Unauthorized);
        }

        let path = self.key_to_path(key);
        info!("Attempting to delete wiki cache for {}", key);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Successfully deleted wiki cache: {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Wiki cache not found, cannot delete: {}", path.display());
                Err(RepoWikiError::CacheNotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// List every processed project found in the cache directory, most
    /// recently modified first.
    ///
    /// Filenames outside the naming grammar are skipped with a warning; a
    /// missing cache directory yields an empty list.
    pub async fn list_all(&self) -> Result<Vec<CacheEntry>> {
        let mut entries = Vec::new();

        let mut dir = match tokio::fs::read_dir(&self.cache_dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "Cache directory {} not found. Returning empty list.",
                    self.cache_dir.display()
                );
                return Ok(entries);
            }
            Err(e) => return Err(e.into()),
        };

        debug!(
            "Scanning for project cache files in: {}",
            self.cache_dir.display()
        );

        while let Some(dir_entry) = dir.next_entry().await? {
            let filename = dir_entry.file_name();
            let Some(filename) = filename.to_str() else {
                continue;
            };

            let Some(key) = parse_filename(filename) else {
                if filename.starts_with(FILE_PREFIX) {
                    warn!("Could not parse project details from filename: {}", filename);
                }
                continue;
            };

            let modified = match dir_entry.metadata().await.and_then(|m| m.modified()) {
                Ok(modified) => modified,
                Err(e) => {
                    warn!("Error processing file {}: {}", filename, e);
                    continue;
                }
            };

            entries.push(CacheEntry {
                id: filename.to_string(),
                name: format!("{}/{}", key.owner, key.repo),
                owner: key.owner,
                repo: key.repo,
                repo_type: key.repo_type,
                language: key.language,
                submitted_at: DateTime::<Utc>::from(modified),
            });
        }

        entries.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        debug!("Found {} processed project entries", entries.len());
        Ok(entries)
    }
}

/// Parse a cache filename back into its key.
///
/// Returns `None` for filenames outside the grammar or with fewer than
/// four components.
fn parse_filename(filename: &str) -> Option<CacheKey> {
    let stem = filename
        .strip_prefix(FILE_PREFIX)?
        .strip_prefix('_')?
        .strip_suffix(&format!(".{}", FILE_EXT))?;

    let parts: Vec<&str> = stem.split('_').collect();
    if parts.len() < 4 {
        return None;
    }

    Some(CacheKey {
        repo_type: parts[0].to_string(),
        owner: parts[1].to_string(),
        // repo may contain the separator; language is always the last part.
        repo: parts[2..parts.len() - 1].join("_"),
        language: parts[parts.len() - 1].to_string(),
    })
}
