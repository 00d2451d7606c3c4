use thiserror::Error;

/// Main error type for the vidmatte library
#[derive(Error, Debug)]
pub enum VidmatteError {
    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while reading a video's stream metadata
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Failed to launch ffprobe: {reason}")]
    LaunchFailed { reason: String },

    #[error("ffprobe could not read '{path}'")]
    Unreadable { path: String },

    #[error("Invalid probe output: {reason}")]
    InvalidMetadata { reason: String },

    #[error("No video stream found in '{path}'")]
    NoVideoStream { path: String },

    #[error("Invalid frame rate '{value}'")]
    InvalidFrameRate { value: String },
}

/// Errors raised while decoding a video into individual frames
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Failed to launch ffmpeg: {reason}")]
    LaunchFailed { reason: String },

    #[error("Frame decoding failed for '{path}': {stderr}")]
    DecodeFailed { path: String, stderr: String },
}

/// Errors raised while constructing a segmentation model session
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Unknown model '{name}' (available: {available})")]
    UnknownModel { name: String, available: String },

    #[error("Model weights not found for '{name}' (expected at '{path}')")]
    WeightsMissing { name: String, path: String },

    #[error("Failed to load model '{name}': {reason}")]
    LoadFailed { name: String, reason: String },
}

/// Errors raised while segmenting a single frame
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Invalid frame image: {reason}")]
    InvalidImage { reason: String },

    #[error("Model execution failed: {reason}")]
    ExecutionFailed { reason: String },

    #[error("Unexpected model output: {reason}")]
    UnexpectedOutput { reason: String },
}

/// Errors raised while re-encoding frames into a video
#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("No frames found in '{path}'")]
    NoFrames { path: String },

    #[error("Failed to launch ffmpeg: {reason}")]
    LaunchFailed { reason: String },

    #[error("Video encoding failed: {stderr}")]
    EncodeFailed { stderr: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using VidmatteError
pub type Result<T> = std::result::Result<T, VidmatteError>;

impl VidmatteError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Probe(ProbeError::Unreadable { path }) => {
                format!("Could not read video file '{}'. Please check the file exists and is a supported format.", path)
            }
            Self::Probe(ProbeError::NoVideoStream { path }) => {
                format!("'{}' does not contain a decodable video stream.", path)
            }
            Self::Model(ModelError::UnknownModel { name, available }) => {
                format!("Model '{}' is not recognized. Available models: {}", name, available)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
