//! Frame extraction: decode a video into an ordered PNG sequence.

use std::path::Path;

use tracing::{debug, info};

use crate::error::{ExtractionError, Result};
use crate::video::{probe, sequence};

/// Decode every frame of `asset` into PNG files in `destination`
///
/// Frames are written as `frame_00001.png`, `frame_00002.png`, ... in
/// display order at full resolution. PNG keeps the extraction lossless, so
/// no recompression or chroma subsampling artifacts enter the pipeline.
/// `destination` is created if absent.
///
/// Returns the source framerate (needed when reassembling the video).
pub async fn extract(asset: &Path, destination: &Path) -> Result<f64> {
    std::fs::create_dir_all(destination)?;

    let framerate = probe::probe_framerate(asset).await?;

    info!("Extracting frames from {:?} at {:.3} fps", asset, framerate);

    let output = tokio::process::Command::new("ffmpeg")
        .arg("-i")
        .arg(asset)
        .arg("-y")
        .arg(destination.join(sequence::FRAME_PATTERN))
        .output()
        .await
        .map_err(|e| ExtractionError::LaunchFailed { reason: e.to_string() })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ExtractionError::DecodeFailed {
            path: asset.display().to_string(),
            stderr: stderr.trim().to_string(),
        }
        .into());
    }

    let frame_count = sequence::list_frames(destination)?.len();
    debug!("Extracted {} frames into {:?}", frame_count, destination);

    Ok(framerate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use crate::error::VidmatteError;
    use crate::video::{assembler, AssemblyOptions};
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

    fn encoder_available(name: &str) -> bool {
        std::process::Command::new("ffmpeg")
            .args(["-hide_banner", "-encoders"])
            .output()
            .map(|output| {
                output.status.success()
                    && String::from_utf8_lossy(&output.stdout).contains(name)
            })
            .unwrap_or(false)
    }

    /// Render a solid-color test clip with ffmpeg's lavfi source
    fn make_test_video(path: &Path, seconds: u32, fps: u32) -> bool {
        std::process::Command::new("ffmpeg")
            .args(["-f", "lavfi", "-i"])
            .arg(format!("color=c=red:s=64x64:r={}", fps))
            .args(["-t", &seconds.to_string(), "-pix_fmt", "yuv420p", "-y"])
            .arg(path)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    #[tokio::test]
    async fn test_extract_produces_complete_sequence() {
        if !ffmpeg_available() {
            return;
        }

        let dir = tempdir().unwrap();
        let video = dir.path().join("clip.mp4");
        if !make_test_video(&video, 2, 10) {
            return;
        }

        let frames_dir = dir.path().join("frames");
        let framerate = extract(&video, &frames_dir).await.unwrap();

        assert!((framerate - 10.0).abs() < 0.01);

        let frames = sequence::list_frames(&frames_dir).unwrap();
        assert_eq!(frames.len(), 20);

        // Indexed 1..=N with no gaps
        for (index, frame) in frames.iter().enumerate() {
            assert_eq!(
                frame.file_name().unwrap().to_str().unwrap(),
                sequence::frame_file_name(index + 1)
            );
        }
    }

    #[tokio::test]
    async fn test_round_trip_preserves_frame_count() {
        if !ffmpeg_available() || !encoder_available("libx264") {
            return;
        }

        let dir = tempdir().unwrap();
        let video = dir.path().join("clip.mp4");
        if !make_test_video(&video, 2, 10) {
            return;
        }

        let frames_dir = dir.path().join("frames");
        let framerate = extract(&video, &frames_dir).await.unwrap();

        let rebuilt = dir.path().join("rebuilt.mp4");
        assembler::rebuild(&frames_dir, &rebuilt, framerate, &AssemblyOptions::default())
            .await
            .unwrap();

        let recheck_dir = dir.path().join("recheck");
        extract(&rebuilt, &recheck_dir).await.unwrap();

        let original = sequence::list_frames(&frames_dir).unwrap().len() as i64;
        let recovered = sequence::list_frames(&recheck_dir).unwrap().len() as i64;
        assert!(
            (original - recovered).abs() <= 1,
            "frame count drifted: {} -> {}",
            original,
            recovered
        );
    }

    #[tokio::test]
    async fn test_extract_missing_file_fails_at_probe() {
        if !ffmpeg_available() {
            return;
        }

        let dir = tempdir().unwrap();
        let result = extract(&dir.path().join("missing.mp4"), &dir.path().join("frames")).await;
        assert!(matches!(result, Err(VidmatteError::Probe(_))));
    }
}
