//! Frame reassembly: encode a processed PNG sequence back into a video.

use std::path::Path;

use tracing::{info, warn};

use crate::error::{EncodingError, Result};
use crate::video::sequence;

/// How to handle the alpha channel of the processed frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaMode {
    /// Composite transparency onto an opaque black background and encode
    /// with H.264/yuv420p. Plays everywhere; alpha is intentionally lost.
    Matte,

    /// Preserve the alpha channel by encoding with VP9/yuva420p. The output
    /// should use a WebM-class container.
    Preserve,
}

/// Reassembly parameters
#[derive(Debug, Clone)]
pub struct AssemblyOptions {
    pub alpha: AlphaMode,

    /// Quality setting (0-100, higher is better)
    pub quality: u8,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            alpha: AlphaMode::Matte,
            quality: 85,
        }
    }
}

/// Encode the frame sequence in `source` into a video at `output_path`
///
/// `framerate` must match the value returned by the extractor or the result
/// plays at the wrong speed; that correspondence is the caller's
/// responsibility. The parent of `output_path` is created if absent.
pub async fn rebuild(
    source: &Path,
    output_path: &Path,
    framerate: f64,
    options: &AssemblyOptions,
) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let frames = sequence::list_frames(source)?;
    if frames.is_empty() {
        return Err(EncodingError::NoFrames {
            path: source.display().to_string(),
        }
        .into());
    }

    if options.alpha == AlphaMode::Preserve && !has_webm_extension(output_path) {
        warn!(
            "Alpha-preserving output usually belongs in a .webm container, got {:?}",
            output_path
        );
    }

    info!(
        "Encoding {} frames at {:.3} fps into {:?}",
        frames.len(),
        framerate,
        output_path
    );

    let mut cmd = tokio::process::Command::new("ffmpeg");
    cmd.arg("-framerate")
        .arg(format!("{}", framerate))
        .arg("-i")
        .arg(source.join(sequence::FRAME_PATTERN));

    match options.alpha {
        AlphaMode::Matte => {
            // Premultiplying RGB by alpha composites the transparency over
            // black before yuv420p drops the alpha plane.
            cmd.args(["-vf", "premultiply=inplace=1"])
                .args(["-c:v", "libx264"])
                .args(["-pix_fmt", "yuv420p"]);
        }
        AlphaMode::Preserve => {
            cmd.args(["-c:v", "libvpx-vp9"])
                .args(["-pix_fmt", "yuva420p"])
                .args(["-b:v", "0"]);
        }
    }

    let output = cmd
        .args(["-crf", &quality_to_crf(options.quality).to_string()])
        .arg("-y")
        .arg(output_path)
        .output()
        .await
        .map_err(|e| EncodingError::LaunchFailed { reason: e.to_string() })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(EncodingError::EncodeFailed {
            stderr: stderr.trim().to_string(),
        }
        .into());
    }

    Ok(())
}

fn has_webm_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("webm") || ext.eq_ignore_ascii_case("mkv"))
        .unwrap_or(false)
}

fn quality_to_crf(quality: u8) -> u8 {
    (51 - ((quality as f32 / 100.0) * 51.0) as u8).clamp(0, 51)
}
