//! Stream metadata probing via ffprobe.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{ProbeError, Result};

/// Return the framerate of the video stream in `path`
///
/// Runs `ffprobe` against the container and reduces the video stream's
/// `r_frame_rate` rational to a float. Stream metadata only; no frame data
/// is decoded.
pub async fn probe_framerate(path: &Path) -> Result<f64> {
    let output = tokio::process::Command::new("ffprobe")
        .args(["-v", "quiet", "-print_format", "json", "-show_streams"])
        .arg(path)
        .output()
        .await
        .map_err(|e| ProbeError::LaunchFailed { reason: e.to_string() })?;

    if !output.status.success() {
        return Err(ProbeError::Unreadable {
            path: path.display().to_string(),
        }
        .into());
    }

    let metadata: Value = serde_json::from_slice(&output.stdout)
        .map_err(|e| ProbeError::InvalidMetadata { reason: e.to_string() })?;

    let framerate = video_stream_framerate(&metadata, path)?;
    debug!("Probed {:?}: {:.3} fps", path, framerate);

    Ok(framerate)
}

/// Locate the video stream in ffprobe output and reduce its frame rate
fn video_stream_framerate(metadata: &Value, path: &Path) -> std::result::Result<f64, ProbeError> {
    let streams = metadata["streams"]
        .as_array()
        .ok_or_else(|| ProbeError::InvalidMetadata {
            reason: "missing streams array".to_string(),
        })?;

    let video_stream = streams
        .iter()
        .find(|s| s["codec_type"] == "video")
        .ok_or_else(|| ProbeError::NoVideoStream {
            path: path.display().to_string(),
        })?;

    let rate = video_stream["r_frame_rate"]
        .as_str()
        .ok_or_else(|| ProbeError::InvalidMetadata {
            reason: "video stream has no r_frame_rate".to_string(),
        })?;

    parse_rational(rate)
}

/// Parse an ffprobe rational like `"30000/1001"` (or a plain `"25"`) to f64
fn parse_rational(value: &str) -> std::result::Result<f64, ProbeError> {
    let invalid = || ProbeError::InvalidFrameRate {
        value: value.to_string(),
    };

    let reduced = match value.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().map_err(|_| invalid())?;
            let den: f64 = den.trim().parse().map_err(|_| invalid())?;
            if den == 0.0 {
                return Err(invalid());
            }
            num / den
        }
        None => value.trim().parse().map_err(|_| invalid())?,
    };

    if !reduced.is_finite() || reduced <= 0.0 {
        return Err(invalid());
    }

    Ok(reduced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_rational_ntsc() {
        let rate = parse_rational("30000/1001").unwrap();
        assert!((rate - 29.97).abs() < 0.01);
    }

    #[test]
    fn test_parse_rational_whole() {
        assert_eq!(parse_rational("25/1").unwrap(), 25.0);
        assert_eq!(parse_rational("24").unwrap(), 24.0);
    }

    #[test]
    fn test_parse_rational_zero_denominator() {
        assert!(parse_rational("0/0").is_err());
        assert!(parse_rational("30/0").is_err());
    }

    #[test]
    fn test_parse_rational_garbage() {
        assert!(parse_rational("abc").is_err());
        assert!(parse_rational("").is_err());
    }

    #[test]
    fn test_video_stream_found() {
        let metadata = json!({
            "streams": [
                { "codec_type": "audio", "r_frame_rate": "0/0" },
                { "codec_type": "video", "r_frame_rate": "10/1" },
            ]
        });

        let rate = video_stream_framerate(&metadata, Path::new("clip.mp4")).unwrap();
        assert_eq!(rate, 10.0);
    }

    #[test]
    fn test_no_video_stream() {
        let metadata = json!({
            "streams": [
                { "codec_type": "audio", "r_frame_rate": "0/0" },
            ]
        });

        let result = video_stream_framerate(&metadata, Path::new("audio.mp4"));
        assert!(matches!(result, Err(ProbeError::NoVideoStream { .. })));
    }

    #[test]
    fn test_missing_streams_array() {
        let metadata = json!({ "format": {} });
        let result = video_stream_framerate(&metadata, Path::new("clip.mp4"));
        assert!(matches!(result, Err(ProbeError::InvalidMetadata { .. })));
    }
}
