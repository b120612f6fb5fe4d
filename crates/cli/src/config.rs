//! CLI configuration and logging setup.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

/// Default storage directory.
pub const DEFAULT_STORAGE_PATH: &str = ".qms";

/// Default log filter.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Settings assembled from flags and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Root directory for JSON storage
    pub storage_path: PathBuf,

    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl CliConfig {
    /// Filter from `RUST_LOG` if set and valid, else from `log_level`.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.log_level))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
    }

    /// Install the global subscriber. Logs go to stderr so stdout stays parseable.
    pub fn init_logging(&self) {
        tracing_subscriber::fmt()
            .with_env_filter(self.env_filter())
            .with_writer(std::io::stderr)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::default();
        assert_eq!(config.storage_path, PathBuf::from(".qms"));
        assert_eq!(config.log_level, "warn");
    }
}
