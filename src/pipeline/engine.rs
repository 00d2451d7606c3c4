use std::path::Path;

use tracing::{debug, info};

use crate::{
    config::Config,
    error::Result,
    pipeline::{batch, progress::ProgressFn},
    segmentation::ModelSpec,
    video::{assembler, extractor, AlphaMode, AssemblyOptions},
};

/// End-to-end background removal pipeline
///
/// Each run works in three stages inside a private temporary workspace:
/// 1. Frame Extraction - decode the source video into an ordered PNG sequence
/// 2. Background Removal - segment every frame with one reused model session
/// 3. Reassembly - encode the processed frames at the source framerate
///
/// The workspace is removed on every exit path — success, error, and panic
/// alike — so a failed run leaves nothing behind but the error.
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the full pipeline: extract, remove backgrounds, reassemble
    ///
    /// # Arguments
    ///
    /// * `input_path` - Source video (mp4/avi/mov/mkv/webm-class container)
    /// * `output_path` - Destination video; parent directories are created
    /// * `model_name` - Segmentation model identifier (see [`crate::segmentation::available_models`])
    /// * `on_progress` - Optional callback invoked after each processed frame
    ///
    /// The call is strictly sequential and blocks until the output video is
    /// written or a stage fails; run it on a worker task and use the
    /// progress callback to stay responsive. There is no built-in
    /// cancellation - a caller that abandons the run still gets workspace
    /// cleanup when the future is dropped mid-stage or the call unwinds.
    pub async fn run(
        &self,
        input_path: &Path,
        output_path: &Path,
        model_name: &str,
        on_progress: Option<ProgressFn>,
    ) -> Result<()> {
        // Reject bad model names before any frame work begins
        ModelSpec::lookup(model_name)?;

        info!("🎬 Starting background removal");
        info!("   Input: {:?}", input_path);
        info!("   Output: {:?}", output_path);
        info!("   Model: {}", model_name);

        let workspace = tempfile::Builder::new().prefix("vidmatte_").tempdir()?;
        let frames_dir = workspace.path().join("frames");
        let processed_dir = workspace.path().join("output_frames");
        debug!("Workspace: {:?}", workspace.path());

        // Stage 1: decode the source into an ordered frame sequence
        let framerate = extractor::extract(input_path, &frames_dir).await?;

        // Stage 2: segment every frame, reusing one model session
        batch::process(
            &frames_dir,
            &processed_dir,
            model_name,
            &self.config.segmentation,
            on_progress,
        )
        .await?;

        // Stage 3: re-encode at the captured framerate
        let options = AssemblyOptions {
            alpha: if self.config.output.keep_alpha {
                AlphaMode::Preserve
            } else {
                AlphaMode::Matte
            },
            quality: self.config.output.quality,
        };
        assembler::rebuild(&processed_dir, output_path, framerate, &options).await?;

        info!("🎉 Background removal complete: {:?}", output_path);
        Ok(())

        // `workspace` drops here (and on every `?` above), deleting the
        // frame directories with it
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ModelError, VidmatteError};
    use tempfile::tempdir;

    fn ffmpeg_available() -> bool {
        std::process::Command::new("ffmpeg")
            .arg("-version")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    #[tokio::test]
    async fn test_unknown_model_rejected_before_any_work() {
        let pipeline = Pipeline::new(Config::default());
        let dir = tempdir().unwrap();

        // The input does not even exist; the model check must come first
        let result = pipeline
            .run(
                &dir.path().join("missing.mp4"),
                &dir.path().join("out.mp4"),
                "not-a-real-model",
                None,
            )
            .await;

        assert!(matches!(
            result,
            Err(VidmatteError::Model(ModelError::UnknownModel { .. }))
        ));
    }

    #[tokio::test]
    async fn test_unreadable_input_fails_at_probe() {
        if !ffmpeg_available() {
            return;
        }

        let pipeline = Pipeline::new(Config::default());
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.mp4");

        let result = pipeline
            .run(&dir.path().join("missing.mp4"), &output, "u2net", None)
            .await;

        assert!(matches!(result, Err(VidmatteError::Probe(_))));
        assert!(!output.exists());
    }
}
