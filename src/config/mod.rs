//! Configuration module for relic-preview
//!
//! Tunables for highlighting, CSV previews and the preview cache. Settings
//! are read from `config.toml` in the user's config directory and can be
//! overridden with `RELIC_PREVIEW__<SECTION>__<KEY>` environment variables.

use std::fs;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "relic-preview";
const ENV_PREFIX: &str = "RELIC_PREVIEW";

/// Highlighting and language sniffing limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightSettings {
    /// Theme used when generating the stylesheet
    pub theme: String,
    /// Larger inputs are escaped instead of highlighted
    pub max_highlight_bytes: usize,
    /// Characters examined when sniffing a language from content
    pub sniff_prefix_chars: usize,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            max_highlight_bytes: 2 * 1024 * 1024,
            sniff_prefix_chars: 1000,
        }
    }
}

/// CSV preview limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvSettings {
    /// Data rows included in a CSV preview
    pub preview_rows: usize,
}

impl Default for CsvSettings {
    fn default() -> Self {
        Self { preview_rows: 10 }
    }
}

/// Preview cache sizing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub ttl_secs: u64,
    pub max_capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            max_capacity: 1000,
        }
    }
}

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    pub highlight: HighlightSettings,
    pub csv: CsvSettings,
    pub cache: CacheSettings,
}

impl PreviewSettings {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;
        Ok(config_dir.join(APP_DIR).join("config.toml"))
    }

    /// Load settings from the default location plus environment overrides
    ///
    /// A missing file yields the defaults; nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or an override cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load settings from `path` plus environment overrides
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or an override cannot be parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::build(path, environment())
    }

    fn build(path: &Path, env: Environment) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(env)
            .build()?;

        let loaded: Self = settings.try_deserialize()?;
        tracing::debug!(path = %path.display(), "settings loaded");
        Ok(loaded)
    }

    /// Save settings to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the
    /// settings cannot be serialized to TOML, or the file cannot be written.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save settings to `path`
    ///
    /// # Errors
    ///
    /// See [`PreviewSettings::save`].
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Render the settings as TOML
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
