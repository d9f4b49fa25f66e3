use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Rendering settings injected into the serializer.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub assets: AssetsConfig,
    pub button: ButtonConfig,
    pub quote: QuoteConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct AssetsConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ButtonConfig {
    pub background: String,
    pub color: String,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            background: "#2563eb".to_string(),
            color: "#ffffff".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    pub accent: String,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            accent: "#e5e5e5".to_string(),
        }
    }
}

impl Config {
    /// The configuration bundled with the crate.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file, reporting read and syntax errors.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load config from a TOML file, or return defaults if it is missing or invalid.
    pub fn load(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "falling back to default config");
                Self::compiled_default()
            }
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.assets.base_url = base_url.into();
        self
    }

    /// Source of a social icon: `{base_url}/icons/social/{style}/{platform}.png`.
    pub(crate) fn icon_url(&self, style: &str, platform: &str) -> String {
        let base = self.assets.base_url.trim_end_matches('/');
        format!("{base}/icons/social/{style}/{platform}.png")
    }
}
