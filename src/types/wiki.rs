//! Wiki Artifact Model
//!
//! Types for the persisted wiki cache. Serde names match the JSON written
//! to disk (camelCase page fields, snake_case top level), so records written
//! by older deployments keep parsing: the trailing `repo`/`provider`/`model`
//! fields stayed optional for exactly that reason.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One generated wiki page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikiPage {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "filePaths")]
    pub file_paths: Vec<String>,
    /// "high", "medium", or "low"; kept as a string on the wire.
    pub importance: String,
    #[serde(rename = "relatedPages")]
    pub related_pages: Vec<String>,
}

/// A grouping of pages within the wiki table of contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikiSection {
    pub id: String,
    pub title: String,
    pub pages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subsections: Option<Vec<String>>,
}

/// The generated documentation's table-of-contents object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikiStructure {
    pub id: String,
    pub title: String,
    pub description: String,
    pub pages: Vec<WikiPage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<WikiSection>>,
    #[serde(
        rename = "rootSections",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub root_sections: Option<Vec<String>>,
}

/// Identity of the source repository a wiki was generated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoInfo {
    pub owner: String,
    pub repo: String,
    #[serde(rename = "type")]
    pub repo_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(
        rename = "localPath",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub local_path: Option<String>,
    #[serde(rename = "repoUrl", default, skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
}

/// The persisted wiki artifact: structure, generated pages, provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikiCacheRecord {
    pub wiki_structure: WikiStructure,
    pub generated_pages: BTreeMap<String, WikiPage>,
    /// Legacy field from records written before `repo` carried the URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<RepoInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// The four-tuple identifying one wiki artifact.
///
/// All fields are opaque strings; the cache derives exactly one file path
/// from them (see `WikiCacheStore::key_to_path`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub owner: String,
    pub repo: String,
    pub repo_type: String,
    pub language: String,
}

impl CacheKey {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        repo_type: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            repo_type: repo_type.into(),
            language: language.into(),
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} ({}) lang: {}",
            self.owner, self.repo, self.repo_type, self.language
        )
    }
}

/// One processed project discovered by scanning the cache directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The cache filename.
    pub id: String,
    pub owner: String,
    pub repo: String,
    /// "owner/repo" for display.
    pub name: String,
    pub repo_type: String,
    pub language: String,
    /// File modification time of the cache file.
    #[serde(rename = "submittedAt")]
    pub submitted_at: DateTime<Utc>,
}
