use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Main configuration for vidmatte
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Segmentation model settings
    pub segmentation: SegmentationConfig,

    /// Output encoding settings
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            segmentation: SegmentationConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.segmentation.validate()?;
        self.output.validate()?;
        Ok(())
    }
}

/// Segmentation model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// Directory containing ONNX model weights
    pub model_dir: PathBuf,

    /// Number of intra-op threads for the inference session
    pub intra_threads: usize,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        let model_dir = std::env::var_os("VIDMATTE_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("models"));

        Self {
            model_dir,
            intra_threads: num_cpus::get(),
        }
    }
}

impl SegmentationConfig {
    fn validate(&self) -> Result<()> {
        if self.intra_threads == 0 {
            return Err(ConfigError::InvalidValue {
                key: "segmentation.intra_threads".to_string(),
                value: self.intra_threads.to_string()
            }.into());
        }

        Ok(())
    }
}

/// Output encoding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Quality setting (0-100, higher is better); mapped to the encoder's CRF scale
    pub quality: u8,

    /// Keep the alpha channel in the output (VP9/WebM) instead of
    /// compositing it over a black background (H.264/MP4)
    pub keep_alpha: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            quality: 85,
            keep_alpha: false,
        }
    }
}

impl OutputConfig {
    fn validate(&self) -> Result<()> {
        if self.quality > 100 {
            return Err(ConfigError::InvalidValue {
                key: "output.quality".to_string(),
                value: self.quality.to_string()
            }.into());
        }

        Ok(())
    }
}
