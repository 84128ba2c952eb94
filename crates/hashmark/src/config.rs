//! Process configuration, loaded once at startup from TOML.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Configuration shared by the ingest pipeline, the verification service and
/// the HTTP server. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HashmarkConfig {
    /// SQLite database file holding the ledger.
    pub database_path: PathBuf,
    /// Ledger table inside the database.
    pub table_name: String,
    /// Directory used as the staging area.
    pub staging_dir: PathBuf,
    /// Address the HTTP server listens on.
    pub bind_addr: SocketAddr,
    /// Upper bound on any single ledger call.
    pub store_timeout_ms: u64,
    /// Largest accepted request body.
    pub max_upload_bytes: usize,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for HashmarkConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("hashmark.db"),
            table_name: "fingerprints".to_string(),
            staging_dir: PathBuf::from("uploads"),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            store_timeout_ms: 10_000,
            max_upload_bytes: 64 * 1024 * 1024,
            log_level: "info".to_string(),
        }
    }
}

impl HashmarkConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        hashmark_store::validate_table_name(&self.table_name).map_err(|e| {
            ConfigError::Invalid {
                field: "table_name",
                reason: e.to_string(),
            }
        })?;
        if self.store_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "store_timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "max_upload_bytes",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "database_path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.staging_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "staging_dir",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = HashmarkConfig::default();
        config.validate().unwrap();
        assert_eq!(config.table_name, "fingerprints");
        assert_eq!(config.store_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = HashmarkConfig::from_toml_str(
            r#"
database_path = "/var/lib/hashmark/ledger.db"
store_timeout_ms = 2500
"#,
        )
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/var/lib/hashmark/ledger.db"));
        assert_eq!(config.store_timeout_ms, 2500);
        assert_eq!(config.staging_dir, PathBuf::from("uploads"));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let err = HashmarkConfig::from_toml_str("tabel_name = \"x\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_bad_table_name() {
        let err = HashmarkConfig::from_toml_str("table_name = \"drop table\"").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "table_name",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let err = HashmarkConfig::from_toml_str("store_timeout_ms = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "store_timeout_ms",
                ..
            }
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hashmark.toml");
        std::fs::write(&path, "bind_addr = \"0.0.0.0:9000\"\n").unwrap();

        let config = HashmarkConfig::from_file(&path).unwrap();
        assert_eq!(config.bind_addr.port(), 9000);

        let missing = HashmarkConfig::from_file(dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }
}
