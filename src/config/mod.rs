//! Configuration Management
//!
//! Figment-based settings with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Config file (~/.repowiki/config.toml)
//! 3. Environment variables (REPOWIKI_*)
//!
//! `REPOWIKI_AUTH_MODE` / `REPOWIKI_AUTH_CODE` gate cache deletion; when
//! auth mode is on, delete calls must present the configured code.

use std::path::PathBuf;

use directories::BaseDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::constants::gateway::DEFAULT_TIMEOUT_SECS;
use crate::types::{RepoWikiError, Result};

/// Process-wide settings, loaded once at startup and passed explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding wiki cache files.
    pub cache_dir: PathBuf,
    /// Whether cache deletion requires an authorization code.
    pub auth_mode: bool,
    /// The shared-secret code checked when `auth_mode` is on.
    /// Never serialized to output.
    #[serde(default, skip_serializing)]
    pub auth_code: Option<String>,
    /// Connect+read timeout for provider calls, in seconds.
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            auth_mode: false,
            auth_code: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Default cache root: ~/.repowiki/wikicache, falling back to a relative
/// directory when no home directory is resolvable (e.g. bare containers).
fn default_cache_dir() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".repowiki").join("wikicache"))
        .unwrap_or_else(|| PathBuf::from(".repowiki/wikicache"))
}

impl Settings {
    /// Load settings with the full resolution chain:
    /// defaults → config file → env vars.
    pub fn load() -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Settings::default()));

        if let Some(dirs) = BaseDirs::new() {
            let config_path = dirs.home_dir().join(".repowiki").join("config.toml");
            if config_path.exists() {
                figment = figment.merge(Toml::file(&config_path));
            }
        }

        figment
            .merge(Env::prefixed("REPOWIKI_"))
            .extract()
            .map_err(|e| RepoWikiError::Config(format!("Configuration error: {}", e)))
    }

    /// Authorization policy derived from these settings.
    pub fn auth_policy(&self) -> AuthPolicy {
        AuthPolicy {
            required: self.auth_mode,
            code: self.auth_code.clone(),
        }
    }
}

/// Shared-secret check for destructive cache operations.
#[derive(Debug, Clone, Default)]
pub struct AuthPolicy {
    pub required: bool,
    pub code: Option<String>,
}

impl AuthPolicy {
    /// Policy that never requires a code.
    pub fn open() -> Self {
        Self::default()
    }

    /// Policy requiring the given code.
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            required: true,
            code: Some(code.into()),
        }
    }

    /// Check a supplied code against the configured secret.
    pub fn validate(&self, supplied: Option<&str>) -> bool {
        if !self.required {
            return true;
        }
        match (&self.code, supplied) {
            (Some(expected), Some(given)) => expected == given,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(!settings.auth_mode);
        assert!(settings.auth_code.is_none());
        assert_eq!(settings.timeout_secs, 60);
        assert!(settings.cache_dir.ends_with("wikicache"));
    }

    #[test]
    fn test_open_policy_accepts_anything() {
        let policy = AuthPolicy::open();
        assert!(policy.validate(None));
        assert!(policy.validate(Some("whatever")));
    }

    #[test]
    fn test_required_policy_checks_code() {
        let policy = AuthPolicy::with_code("s3cret");
        assert!(policy.validate(Some("s3cret")));
        assert!(!policy.validate(Some("wrong")));
        assert!(!policy.validate(None));
    }

    #[test]
    fn test_required_policy_without_code_rejects() {
        let policy = AuthPolicy {
            required: true,
            code: None,
        };
        assert!(!policy.validate(Some("anything")));
    }

    #[test]
    fn test_auth_code_not_serialized() {
        let settings = Settings {
            auth_code: Some("s3cret".to_string()),
            ..Settings::default()
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert!(json.get("auth_code").is_none());
    }
}
