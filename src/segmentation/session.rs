//! ONNX model session: load once, infer per frame.

use std::io::Cursor;
use std::path::PathBuf;

use image::ImageOutputFormat;
use ort::{GraphOptimizationLevel, Session};
use tracing::{debug, info};

use crate::config::SegmentationConfig;
use crate::error::{InferenceError, ModelError};
use crate::segmentation::catalog::ModelSpec;
use crate::segmentation::preprocess;

/// Anything that can turn an encoded frame into the same frame with a
/// predicted alpha channel
///
/// Inference takes `&mut self`: a session may mutate internal compute state,
/// so two calls on one session can never run concurrently.
pub trait Segmenter {
    fn remove_background(&mut self, image_bytes: &[u8]) -> Result<Vec<u8>, InferenceError>;
}

/// A loaded segmentation model
///
/// Construction loads the weights from disk and is expensive; inference
/// reuses the session and is cheap by comparison. Load once per batch and
/// pass the session into every call.
pub struct ModelSession {
    spec: &'static ModelSpec,
    session: Session,
}

impl ModelSession {
    /// Load the named model's weights from the configured model directory
    ///
    /// Unrecognized names fail before any file I/O. Recognized names whose
    /// weights are absent or unloadable fail with the expected path or the
    /// runtime's reason.
    pub fn load(model_name: &str, config: &SegmentationConfig) -> Result<Self, ModelError> {
        let spec = ModelSpec::lookup(model_name)?;
        let weights: PathBuf = config.model_dir.join(spec.weights_file);

        if !weights.is_file() {
            return Err(ModelError::WeightsMissing {
                name: spec.name.to_string(),
                path: weights.display().to_string(),
            });
        }

        info!("Loading segmentation model '{}' from {:?}", spec.name, weights);

        let session = Session::builder()
            .and_then(|builder| builder.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|builder| builder.with_intra_threads(config.intra_threads))
            .and_then(|builder| builder.commit_from_file(&weights))
            .map_err(|e| ModelError::LoadFailed {
                name: spec.name.to_string(),
                reason: e.to_string(),
            })?;

        info!("Model '{}' loaded", spec.name);

        Ok(Self { spec, session })
    }

    /// Identifier of the loaded model
    pub fn model_name(&self) -> &'static str {
        self.spec.name
    }
}

impl Segmenter for ModelSession {
    /// Segment one encoded frame and re-encode it with the predicted alpha
    ///
    /// Deterministic for a fixed model and fixed input bytes. Does not retry
    /// internally.
    fn remove_background(&mut self, image_bytes: &[u8]) -> Result<Vec<u8>, InferenceError> {
        let image = image::load_from_memory(image_bytes)
            .map_err(|e| InferenceError::InvalidImage { reason: e.to_string() })?
            .to_rgb8();
        let (width, height) = image.dimensions();

        let tensor = preprocess::image_to_tensor(&image, self.spec);

        let inputs = ort::inputs![tensor.view()]
            .map_err(|e| InferenceError::ExecutionFailed { reason: e.to_string() })?;
        let outputs = self
            .session
            .run(inputs)
            .map_err(|e| InferenceError::ExecutionFailed { reason: e.to_string() })?;

        // The fused saliency map is the first output; trailing side outputs
        // (present on some models) are ignored.
        let prediction = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::UnexpectedOutput { reason: e.to_string() })?;

        let shape = prediction.shape().to_vec();
        if shape.len() < 2 {
            return Err(InferenceError::UnexpectedOutput {
                reason: format!("expected a [1, 1, H, W] map, got shape {:?}", shape),
            });
        }
        let matte_height = shape[shape.len() - 2] as u32;
        let matte_width = shape[shape.len() - 1] as u32;
        if shape.iter().product::<usize>() != (matte_height * matte_width) as usize {
            return Err(InferenceError::UnexpectedOutput {
                reason: format!("expected a single-channel map, got shape {:?}", shape),
            });
        }

        let raw: Vec<f32> = prediction.iter().copied().collect();
        let matte = preprocess::normalize_matte(&raw);
        let matte = preprocess::resize_matte(&matte, (matte_width, matte_height), (width, height));

        debug!(
            "Segmented {}x{} frame with '{}' ({}x{} matte)",
            width, height, self.spec.name, matte_width, matte_height
        );

        let rgba = preprocess::attach_alpha(&image, &matte);

        let mut buffer = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(rgba)
            .write_to(&mut buffer, ImageOutputFormat::Png)
            .map_err(|e| InferenceError::ExecutionFailed { reason: e.to_string() })?;

        Ok(buffer.into_inner())
    }
}
