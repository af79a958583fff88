//! Pipeline configuration
//!
//! Defines the configuration structure for a denoise run.

use std::path::PathBuf;

use crate::tools::ToolOverrides;

/// Configuration for one denoise run
#[derive(Debug, Clone, Default)]
pub struct DenoiseConfig {
    /// Path to the input image
    pub input: PathBuf,

    /// Explicit tool locations (CLI flags / environment)
    pub tool_overrides: ToolOverrides,
}

impl DenoiseConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input.as_os_str().is_empty() {
            return Err(ConfigError::EmptyInputPath);
        }

        if !self.input.exists() {
            return Err(ConfigError::InputNotFound(self.input.clone()));
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Input image not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Input image path is empty")]
    EmptyInputPath,
}
