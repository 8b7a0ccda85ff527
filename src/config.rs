use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Main configuration for the Video-Splicer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Output placement settings
    pub output: OutputConfig,

    /// External tool settings
    pub tools: ToolsConfig,

    /// Splicing behavior settings
    pub splice: SpliceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputConfig::default(),
            tools: ToolsConfig::default(),
            splice: SpliceConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|_| ConfigError::ParseFailed {
            path: path.display().to_string(),
        })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "config".to_string(),
            value: e.to_string(),
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.output.validate()?;
        self.tools.validate()?;
        Ok(())
    }
}

/// Output placement configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory that receives frame and clip files
    pub directory: PathBuf,

    /// Overwrite existing outputs with the same name
    pub overwrite: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output_clips"),
            overwrite: true,
        }
    }
}

impl OutputConfig {
    fn validate(&self) -> Result<()> {
        if self.directory.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "output.directory".to_string(),
                value: String::new(),
            }
            .into());
        }

        Ok(())
    }
}

/// External tool configuration
///
/// Program names are resolved through `PATH`; absolute paths work too.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Encoder/extractor invoked for frames and stream copies
    pub ffmpeg: String,

    /// Prober used to read the video duration
    pub ffprobe: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }
}

impl ToolsConfig {
    fn validate(&self) -> Result<()> {
        if self.ffmpeg.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "tools.ffmpeg".to_string(),
                value: String::new(),
            }
            .into());
        }

        if self.ffprobe.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "tools.ffprobe".to_string(),
                value: String::new(),
            }
            .into());
        }

        Ok(())
    }
}

/// Splicing behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpliceConfig {
    /// Stop processing the remaining instructions after an extraction
    /// failure instead of continuing with the next token
    pub halt_on_failure: bool,
}

impl Default for SpliceConfig {
    fn default() -> Self {
        Self {
            halt_on_failure: false,
        }
    }
}
