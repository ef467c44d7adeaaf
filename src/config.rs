//! Application constants and environment-driven settings.
//!
//! Environment lookups happen here, once, at startup. Everything downstream
//! receives explicit values (`AnalysisSettings`, `PipelineConfig`).

use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Finsight";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const ENV_OLLAMA_URL: &str = "FINSIGHT_OLLAMA_URL";
pub const ENV_MODEL: &str = "FINSIGHT_MODEL";
pub const ENV_TIMEOUT_SECS: &str = "FINSIGHT_TIMEOUT_SECS";
pub const ENV_DUMP_DIR: &str = "FINSIGHT_DUMP_DIR";

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    if is_dev() {
        "finsight=debug,finsight_lib=debug"
    } else {
        "finsight=info,finsight_lib=info"
    }
}

/// Debug builds log more and are allowed to be chattier.
pub fn is_dev() -> bool {
    cfg!(debug_assertions)
}

/// Connection settings for the analysis backend.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub dump_dir: Option<PathBuf>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            dump_dir: None,
        }
    }
}

impl AnalysisSettings {
    /// Read settings from the process environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let timeout_secs = match get(ENV_TIMEOUT_SECS) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    tracing::warn!(
                        value = %raw,
                        default = defaults.timeout_secs,
                        "Invalid {ENV_TIMEOUT_SECS}, using default"
                    );
                    defaults.timeout_secs
                }
            },
            None => defaults.timeout_secs,
        };

        Self {
            base_url: get(ENV_OLLAMA_URL).unwrap_or(defaults.base_url),
            model: get(ENV_MODEL).unwrap_or(defaults.model),
            timeout_secs,
            dump_dir: get(ENV_DUMP_DIR).map(PathBuf::from),
        }
    }
}
