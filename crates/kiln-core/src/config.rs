use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use kiln_util::errors::KilnError;

/// Global user configuration loaded from `~/.kiln/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// Registry settings from `[registry]` in global config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Fallback index when neither the CLI nor the manifest names one.
    #[serde(default)]
    pub index: Option<String>,
    #[serde(default = "default_timeout_secs", rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            index: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Resolver tuning from `[resolver]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(
        default = "default_exactly_one_threshold",
        rename = "exactly-one-threshold"
    )]
    pub exactly_one_threshold: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            exactly_one_threshold: default_exactly_one_threshold(),
        }
    }
}

fn default_exactly_one_threshold() -> usize {
    10
}

impl GlobalConfig {
    /// Load the global configuration from `~/.kiln/config.toml`, or return
    /// defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> miette::Result<Self> {
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no global config, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| KilnError::Config {
            message: format!("Failed to read global config: {e}"),
        })?;
        toml::from_str(&content).map_err(|e| {
            KilnError::Config {
                message: format!("Failed to parse {}: {e}", path.display()),
            }
            .into()
        })
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }
}

/// Returns the Kiln data directory: `$KILN_HOME` if set, else `~/.kiln/`.
pub fn dirs_path() -> PathBuf {
    if let Some(home) = std::env::var_os("KILN_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home);
    }
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".kiln")
}
