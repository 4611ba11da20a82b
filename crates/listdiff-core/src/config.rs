use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Tunables for argument synthesis and multi-seed runs.
///
/// Read from TOML; every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Upper bound (inclusive) on the length of freshly seeded content.
    #[serde(default = "default_max_initial_len")]
    pub max_initial_len: usize,
    /// Upper bound (exclusive) on synthesized destination-array length.
    #[serde(default = "default_max_array_len")]
    pub max_array_len: usize,
    /// Number of seeds a campaign runs.
    #[serde(default = "default_runs")]
    pub runs: u64,
    /// Stop a campaign at the first failing seed.
    #[serde(default = "default_true")]
    pub stop_on_failure: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            max_initial_len: default_max_initial_len(),
            max_array_len: default_max_array_len(),
            runs: default_runs(),
            stop_on_failure: default_true(),
        }
    }
}

impl HarnessConfig {
    /// Validate configuration before running.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if self.max_initial_len == 0 {
            bail!("max_initial_len must be > 0");
        }
        if self.runs == 0 {
            bail!("runs must be > 0");
        }
        Ok(())
    }
}

const fn default_max_initial_len() -> usize {
    10_000
}

const fn default_max_array_len() -> usize {
    10_000
}

const fn default_runs() -> u64 {
    1
}

const fn default_true() -> bool {
    true
}

/// Per-user config location: `<config_dir>/listdiff/config.toml`.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("listdiff/config.toml"))
}

/// Parse and validate a config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or fails validation.
pub fn load_config_file(path: &Path) -> Result<HarnessConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = toml::from_str::<HarnessConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config in {}", path.display()))?;
    Ok(config)
}

/// Resolve the effective config.
///
/// Precedence: explicit `path`, then the per-user file if present, then
/// defaults.
///
/// # Errors
///
/// Returns an error if an explicit path is missing or any chosen file is
/// invalid.
pub fn load_config(path: Option<&Path>) -> Result<HarnessConfig> {
    if let Some(path) = path {
        return load_config_file(path);
    }

    match user_config_path() {
        Some(user) if user.exists() => load_config_file(&user),
        _ => Ok(HarnessConfig::default()),
    }
}
