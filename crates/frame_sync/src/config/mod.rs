//! Configuration system

use std::path::Path;

pub use serde::{Deserialize, Serialize};

/// Configuration trait
///
/// The file format is picked from the extension: `.toml` or `.ron`.
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match Format::of(path)? {
            Format::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Format::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match Format::of(path)? {
            Format::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

enum Format {
    Toml,
    Ron,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Semantically invalid configuration
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
