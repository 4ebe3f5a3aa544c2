//! Configuration system for sig.
//!
//! Supports layered configuration from multiple sources:
//! 1. Environment variables (highest priority)
//! 2. Project config (.sig.toml in repo root)
//! 3. User config (~/.config/sig/config.toml)
//! 4. Compiled defaults (lowest priority)
//!
//! Missing or malformed files are skipped; configuration never blocks
//! analysis.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::logging::{LogFormat, LoggingConfig};

/// Environment variable prefix for all config options.
const ENV_PREFIX: &str = "SIG";

/// Default config file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Project-level config file name.
const PROJECT_CONFIG_NAME: &str = ".sig.toml";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,

    /// Verdict logging settings.
    pub logging: LoggingConfig,
}

/// General configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Color output mode: "auto", "always", "never".
    pub color: String,

    /// Whether to show verbose output.
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            color: "auto".to_string(),
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from all sources, merging them in priority order.
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(user_config) = Self::load_user_config() {
            config.merge(user_config);
        }

        if let Some(project_config) = Self::load_project_config() {
            config.merge(project_config);
        }

        config.apply_env_overrides();

        config
    }

    /// Load configuration from a specific file.
    #[must_use]
    pub fn load_from_file(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        toml::from_str(&content).ok()
    }

    /// Load user configuration.
    fn load_user_config() -> Option<Self> {
        let config_dir = dirs::config_dir()?;
        let path = config_dir.join("sig").join(CONFIG_FILE_NAME);
        Self::load_from_file(&path)
    }

    /// Load project-level configuration, walking up to the repo root.
    fn load_project_config() -> Option<Self> {
        let mut current = env::current_dir().ok()?;

        loop {
            let config_path = current.join(PROJECT_CONFIG_NAME);
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }

            // .git marks the repo root; stop searching above it.
            if current.join(".git").exists() {
                return None;
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Merge another config into this one (other takes priority).
    fn merge(&mut self, other: Self) {
        if other.general.color != "auto" {
            self.general.color = other.general.color;
        }
        if other.general.verbose {
            self.general.verbose = true;
        }

        if other.logging.enabled {
            self.logging.enabled = true;
        }
        if other.logging.file.is_some() {
            self.logging.file = other.logging.file;
        }
        if other.logging.format != LogFormat::default() {
            self.logging.format = other.logging.format;
        }
        if other.logging.max_input_len != LoggingConfig::default().max_input_len {
            self.logging.max_input_len = other.logging.max_input_len;
        }
        let default_events = crate::logging::LogEventFilter::default();
        if other.logging.events.suspicious != default_events.suspicious
            || other.logging.events.clean != default_events.clean
        {
            self.logging.events = other.logging.events;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // SIG_COLOR=never
        if let Ok(color) = env::var(format!("{ENV_PREFIX}_COLOR")) {
            self.general.color = color;
        }

        // SIG_VERBOSE=1
        if env::var(format!("{ENV_PREFIX}_VERBOSE")).is_ok() {
            self.general.verbose = true;
        }

        // SIG_LOG_FILE=/path/to/decisions.log (also enables logging)
        if let Ok(file) = env::var(format!("{ENV_PREFIX}_LOG_FILE")) {
            self.logging.enabled = true;
            self.logging.file = Some(file);
        }

        // SIG_LOG_FORMAT=json
        if let Ok(format) = env::var(format!("{ENV_PREFIX}_LOG_FORMAT")) {
            match format.to_lowercase().as_str() {
                "json" => self.logging.format = LogFormat::Json,
                "text" => self.logging.format = LogFormat::Text,
                _ => {}
            }
        }
    }

    /// Render a commented sample configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the default configuration fails to serialize.
    pub fn to_sample_toml() -> Result<String, String> {
        let body = toml::to_string_pretty(&Self::default())
            .map_err(|e| format!("failed to serialize config: {e}"))?;
        Ok(format!(
            "# sig configuration\n\
             # Place at ~/.config/sig/config.toml or .sig.toml in a repo root.\n\
             # Environment overrides: SIG_COLOR, SIG_VERBOSE, SIG_LOG_FILE, SIG_LOG_FORMAT.\n\n{body}"
        ))
    }

    /// Render the effective configuration as TOML.
    #[must_use]
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|_| String::new())
    }
}
