//! Module: config
//! Responsibility: compiler limits and their TOML loading.
//! Does not own: how limits are enforced (renderer and composer do that).
//!
//! ```toml
//! [compiler]
//! max_filter_depth = 64
//! max_order_keys = 8
//! max_top = 1000
//! ```

use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

/// Default bound on filter nesting, counted in AST nodes from the root.
pub const DEFAULT_MAX_FILTER_DEPTH: usize = 128;

/// Default bound on the number of ordering keys.
pub const DEFAULT_MAX_ORDER_KEYS: usize = 32;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

///
/// CompilerConfig
///
/// Limits applied while composing a query. Every field is optional in the
/// TOML source and falls back to its default.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    pub max_filter_depth: usize,
    pub max_order_keys: usize,
    /// Largest `$top` accepted; unbounded when absent.
    pub max_top: Option<u64>,
}

impl CompilerConfig {
    /// Parse a `[compiler]` table out of a TOML document.
    ///
    /// A document without the table yields the defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(source)?;
        file.compiler.validate()?;

        Ok(file.compiler)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_filter_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_filter_depth must be at least 1".to_string(),
            ));
        }
        if self.max_order_keys == 0 {
            return Err(ConfigError::Invalid(
                "max_order_keys must be at least 1".to_string(),
            ));
        }
        if self.max_top == Some(0) {
            return Err(ConfigError::Invalid(
                "max_top must be at least 1 when set".to_string(),
            ));
        }

        Ok(())
    }

    #[must_use]
    pub const fn with_max_filter_depth(mut self, max: usize) -> Self {
        self.max_filter_depth = max;
        self
    }

    #[must_use]
    pub const fn with_max_order_keys(mut self, max: usize) -> Self {
        self.max_order_keys = max;
        self
    }

    #[must_use]
    pub const fn with_max_top(mut self, max: u64) -> Self {
        self.max_top = Some(max);
        self
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_filter_depth: DEFAULT_MAX_FILTER_DEPTH,
            max_order_keys: DEFAULT_MAX_ORDER_KEYS,
            max_top: None,
        }
    }
}

///
/// ConfigFile
///

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    compiler: CompilerConfig,
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = CompilerConfig::from_toml_str("").unwrap();
        assert_eq!(config, CompilerConfig::default());
        assert_eq!(config.max_filter_depth, DEFAULT_MAX_FILTER_DEPTH);
        assert_eq!(config.max_order_keys, DEFAULT_MAX_ORDER_KEYS);
        assert_eq!(config.max_top, None);
    }

    #[test]
    fn partial_table_keeps_remaining_defaults() {
        let config = CompilerConfig::from_toml_str("[compiler]\nmax_top = 500\n").unwrap();
        assert_eq!(config.max_top, Some(500));
        assert_eq!(config.max_filter_depth, DEFAULT_MAX_FILTER_DEPTH);
    }

    #[test]
    fn full_table_parses() {
        let config = CompilerConfig::from_toml_str(
            "[compiler]\nmax_filter_depth = 16\nmax_order_keys = 2\nmax_top = 100\n",
        )
        .unwrap();
        assert_eq!(
            config,
            CompilerConfig::default()
                .with_max_filter_depth(16)
                .with_max_order_keys(2)
                .with_max_top(100)
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = CompilerConfig::from_toml_str("[compiler]\nmax_depth = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = CompilerConfig::from_toml_str("[server]\nport = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_limits_are_invalid() {
        for source in [
            "[compiler]\nmax_filter_depth = 0\n",
            "[compiler]\nmax_order_keys = 0\n",
            "[compiler]\nmax_top = 0\n",
        ] {
            let err = CompilerConfig::from_toml_str(source).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{source}");
        }
    }

    #[test]
    fn from_path_reads_file_and_reports_missing() {
        let path = std::env::temp_dir().join(format!(
            "syncql-config-test-{}.toml",
            std::process::id()
        ));
        fs::write(&path, "[compiler]\nmax_order_keys = 4\n").unwrap();
        let config = CompilerConfig::from_path(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.max_order_keys, 4);

        let err = CompilerConfig::from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
