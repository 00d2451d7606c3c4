//! Catalog of supported segmentation models.
//!
//! Each entry ties a model identifier to its ONNX weights file, input
//! resolution, and normalization constants. The set is fixed; selecting a
//! name outside it fails before any frame work begins.

use crate::error::ModelError;

/// Model identifier used when the caller does not choose one
pub const DEFAULT_MODEL: &str = "u2net";

/// Static description of one supported model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelSpec {
    /// Identifier used for selection
    pub name: &'static str,

    /// Weights file name, resolved under the configured model directory
    pub weights_file: &'static str,

    /// Input resolution the graph expects (width, height)
    pub input_size: (u32, u32),

    /// Per-channel normalization mean (applied after scaling to [0, 1])
    pub mean: [f32; 3],

    /// Per-channel normalization divisor
    pub std: [f32; 3],
}

/// All supported models, from fastest to highest quality:
/// - `u2netp` is the light variant, trading quality for speed and memory.
/// - `u2net` is the general-purpose default.
/// - `isnet-general-use` improves segmentation around complex edges.
/// - `birefnet-general` is the high-quality, slower option.
const MODELS: &[ModelSpec] = &[
    ModelSpec {
        name: "u2netp",
        weights_file: "u2netp.onnx",
        input_size: (320, 320),
        mean: [0.485, 0.456, 0.406],
        std: [1.0, 1.0, 1.0],
    },
    ModelSpec {
        name: "u2net",
        weights_file: "u2net.onnx",
        input_size: (320, 320),
        mean: [0.485, 0.456, 0.406],
        std: [1.0, 1.0, 1.0],
    },
    ModelSpec {
        name: "isnet-general-use",
        weights_file: "isnet-general-use.onnx",
        input_size: (1024, 1024),
        mean: [0.5, 0.5, 0.5],
        std: [1.0, 1.0, 1.0],
    },
    ModelSpec {
        name: "birefnet-general",
        weights_file: "birefnet-general.onnx",
        input_size: (1024, 1024),
        mean: [0.485, 0.456, 0.406],
        std: [0.229, 0.224, 0.225],
    },
];

impl ModelSpec {
    /// Look up a model by identifier
    ///
    /// Unknown names fail immediately, before any model or frame I/O.
    pub fn lookup(name: &str) -> Result<&'static ModelSpec, ModelError> {
        MODELS
            .iter()
            .find(|spec| spec.name == name)
            .ok_or_else(|| ModelError::UnknownModel {
                name: name.to_string(),
                available: available_models().join(", "),
            })
    }
}

/// Names of all supported models, in catalog order
pub fn available_models() -> Vec<&'static str> {
    MODELS.iter().map(|spec| spec.name).collect()
}
