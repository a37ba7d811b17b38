use crate::error::{Result, TrellisError};
use serde::{Deserialize, Serialize};

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrellisConfig {
    /// Background key given to newly created boards
    pub default_background: String,
    /// Upper bound, in characters, for names and card text
    pub max_text_len: usize,
}

impl TrellisConfig {
    pub const DEFAULT_BACKGROUND: &'static str = "blue";
    pub const DEFAULT_MAX_TEXT_LEN: usize = 1024;

    /// Parses configuration from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_background.trim().is_empty() {
            return Err(TrellisError::ConfigError(
                "default_background must not be empty".to_string(),
            ));
        }
        if self.max_text_len == 0 {
            return Err(TrellisError::ConfigError(
                "max_text_len must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TrellisConfig {
    fn default() -> Self {
        Self {
            default_background: Self::DEFAULT_BACKGROUND.to_string(),
            max_text_len: Self::DEFAULT_MAX_TEXT_LEN,
        }
    }
}
