//! Configuration for the mnemos project-memory assistant.
//!
//! Settings are plain values with defaults, overridable through
//! environment variables. Nothing here touches the filesystem; resolving
//! the data directory is left to the caller.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable prefix shared by all settings.
const ENV_PREFIX: &str = "MNEMOS_";

/// Errors produced while reading settings from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    Invalid { var: String, value: String },
}

/// Runtime settings for a memory bank and its context engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base directory for per-project memory banks.
    pub data_dir: PathBuf,
    /// Directory name created inside a project for its memory bank.
    pub memory_dir_name: String,
    /// TTL for cached context bundles.
    pub context_cache_ttl: Duration,
    /// TTL for cached per-term fulltext lookups.
    pub term_cache_ttl: Duration,
    /// Maximum results returned by a fulltext query.
    pub fulltext_limit: usize,
    /// Whether markdown bank files are written alongside the index.
    pub bank_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            memory_dir_name: "memory_bank".to_string(),
            context_cache_ttl: Duration::from_secs(300),
            term_cache_ttl: Duration::from_secs(1800),
            fulltext_limit: 10,
            bank_enabled: true,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mnemos")
}

impl Settings {
    /// Build settings from the environment, falling back to defaults.
    ///
    /// Recognized variables: `MNEMOS_DATA_DIR`, `MNEMOS_MEMORY_DIR_NAME`,
    /// `MNEMOS_CONTEXT_CACHE_TTL_SECS`, `MNEMOS_TERM_CACHE_TTL_SECS`,
    /// `MNEMOS_FULLTEXT_LIMIT`, `MNEMOS_BANK_ENABLED`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Self::default();

        if let Ok(dir) = env::var(format!("{ENV_PREFIX}DATA_DIR")) {
            settings.data_dir = PathBuf::from(dir);
        }
        if let Ok(name) = env::var(format!("{ENV_PREFIX}MEMORY_DIR_NAME")) {
            settings.memory_dir_name = name;
        }
        if let Some(secs) = read_u64(&format!("{ENV_PREFIX}CONTEXT_CACHE_TTL_SECS"))? {
            settings.context_cache_ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = read_u64(&format!("{ENV_PREFIX}TERM_CACHE_TTL_SECS"))? {
            settings.term_cache_ttl = Duration::from_secs(secs);
        }
        if let Some(limit) = read_u64(&format!("{ENV_PREFIX}FULLTEXT_LIMIT"))? {
            settings.fulltext_limit = limit as usize;
        }
        if let Ok(flag) = env::var(format!("{ENV_PREFIX}BANK_ENABLED")) {
            settings.bank_enabled = matches!(flag.to_lowercase().as_str(), "1" | "true" | "yes");
        }

        Ok(settings)
    }

    /// Settings suited to tests: caching disabled, bank writes off.
    pub fn for_tests() -> Self {
        Self {
            context_cache_ttl: Duration::ZERO,
            term_cache_ttl: Duration::ZERO,
            bank_enabled: false,
            ..Self::default()
        }
    }
}

fn read_u64(var: &str) -> Result<Option<u64>, ConfigError> {
    match env::var(var) {
        Ok(value) => value.parse().map(Some).map_err(|_| ConfigError::Invalid {
            var: var.to_string(),
            value,
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn defaults_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.context_cache_ttl, Duration::from_secs(300));
        assert_eq!(s.term_cache_ttl, Duration::from_secs(1800));
        assert_eq!(s.fulltext_limit, 10);
        assert!(s.bank_enabled);
        assert_eq!(s.memory_dir_name, "memory_bank");
    }

    #[test]
    fn test_settings_disable_caching() {
        let s = Settings::for_tests();
        assert_eq!(s.context_cache_ttl, Duration::ZERO);
        assert!(!s.bank_enabled);
    }

    #[test]
    #[serial]
    fn env_overrides_apply() {
        // Env mutation is process-global; keep the whole round trip here.
        unsafe {
            env::set_var("MNEMOS_CONTEXT_CACHE_TTL_SECS", "60");
            env::set_var("MNEMOS_BANK_ENABLED", "false");
        }
        let s = Settings::from_env().unwrap();
        assert_eq!(s.context_cache_ttl, Duration::from_secs(60));
        assert!(!s.bank_enabled);
        unsafe {
            env::remove_var("MNEMOS_CONTEXT_CACHE_TTL_SECS");
            env::remove_var("MNEMOS_BANK_ENABLED");
        }
    }

    #[test]
    #[serial]
    fn malformed_number_is_an_error() {
        unsafe {
            env::set_var("MNEMOS_FULLTEXT_LIMIT", "lots");
        }
        let err = Settings::from_env();
        unsafe {
            env::remove_var("MNEMOS_FULLTEXT_LIMIT");
        }
        assert!(err.is_err());
    }
}
