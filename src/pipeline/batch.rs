//! Batch background removal across an extracted frame sequence.

use std::path::Path;

use tracing::{debug, info};

use crate::config::SegmentationConfig;
use crate::error::Result;
use crate::pipeline::progress::ProgressFn;
use crate::segmentation::{ModelSession, Segmenter};
use crate::video::sequence;

/// Remove the background from every frame in `source`, writing results to
/// `destination` under the same file names
///
/// The model is loaded exactly once and reused for the whole batch — the
/// load dominates per-frame cost, so reloading per frame is disallowed.
/// Frames are processed one at a time in name order; `on_progress`, when
/// present, is invoked with `(current, total)` after each frame. The first
/// inference failure fails the whole batch; there is no partial-success
/// mode, and the caller is expected to discard the destination via its
/// workspace cleanup.
pub async fn process(
    source: &Path,
    destination: &Path,
    model_name: &str,
    config: &SegmentationConfig,
    on_progress: Option<ProgressFn>,
) -> Result<()> {
    // Fails fast on a bad model name, before any frame is touched
    let mut session = ModelSession::load(model_name, config)?;

    process_with(source, destination, &mut session, on_progress)
}

/// Frame loop behind [`process`], generic over the segmentation backend
pub(crate) fn process_with(
    source: &Path,
    destination: &Path,
    segmenter: &mut dyn Segmenter,
    mut on_progress: Option<ProgressFn>,
) -> Result<()> {
    std::fs::create_dir_all(destination)?;

    let frames = sequence::list_frames(source)?;
    let total = frames.len();

    info!("Removing backgrounds from {} frames", total);

    for (index, frame_path) in frames.iter().enumerate() {
        let file_name = frame_path.file_name().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "frame path has no file name")
        })?;

        let input = std::fs::read(frame_path)?;
        let output = segmenter.remove_background(&input)?;
        std::fs::write(destination.join(file_name), output)?;

        let current = index + 1;
        if let Some(callback) = on_progress.as_mut() {
            callback(current, total);
        }

        debug!("Processed frame {}/{}", current, total);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::error::{InferenceError, VidmatteError};
    use tempfile::tempdir;

    /// Appends a marker byte so outputs are distinguishable from inputs
    struct StubSegmenter {
        calls: usize,
    }

    impl Segmenter for StubSegmenter {
        fn remove_background(
            &mut self,
            image_bytes: &[u8],
        ) -> std::result::Result<Vec<u8>, InferenceError> {
            self.calls += 1;
            let mut out = image_bytes.to_vec();
            out.push(0xAB);
            Ok(out)
        }
    }

    /// Fails once `fail_at` frames have been requested
    struct FailingSegmenter {
        fail_at: usize,
        calls: usize,
    }

    impl Segmenter for FailingSegmenter {
        fn remove_background(
            &mut self,
            image_bytes: &[u8],
        ) -> std::result::Result<Vec<u8>, InferenceError> {
            self.calls += 1;
            if self.calls == self.fail_at {
                return Err(InferenceError::ExecutionFailed {
                    reason: "synthetic failure".to_string(),
                });
            }
            Ok(image_bytes.to_vec())
        }
    }

    fn write_frames(dir: &Path, count: usize) {
        for index in 1..=count {
            let name = sequence::frame_file_name(index);
            std::fs::write(dir.join(name), format!("frame-{}", index)).unwrap();
        }
    }

    #[test]
    fn test_output_names_match_input_names() {
        let source = tempdir().unwrap();
        let destination = tempdir().unwrap();
        write_frames(source.path(), 3);

        let mut segmenter = StubSegmenter { calls: 0 };
        process_with(source.path(), destination.path(), &mut segmenter, None).unwrap();

        assert_eq!(segmenter.calls, 3);
        for index in 1..=3 {
            let name = sequence::frame_file_name(index);
            let processed = destination.path().join(&name);
            assert!(processed.exists(), "missing {}", name);
            let bytes = std::fs::read(processed).unwrap();
            assert_eq!(bytes.last(), Some(&0xAB));
        }
    }

    #[test]
    fn test_progress_is_monotonic_and_complete() {
        let source = tempdir().unwrap();
        let destination = tempdir().unwrap();
        write_frames(source.path(), 5);

        let events: Arc<Mutex<Vec<(usize, usize)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let callback: ProgressFn = Box::new(move |current, total| {
            sink.lock().unwrap().push((current, total));
        });

        let mut segmenter = StubSegmenter { calls: 0 };
        process_with(source.path(), destination.path(), &mut segmenter, Some(callback)).unwrap();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 5);
        for (index, (current, total)) in events.iter().enumerate() {
            assert_eq!(*current, index + 1);
            assert_eq!(*total, 5);
        }
    }

    #[test]
    fn test_failure_mid_batch_fails_whole_batch() {
        let source = tempdir().unwrap();
        let destination = tempdir().unwrap();
        write_frames(source.path(), 6);

        let mut segmenter = FailingSegmenter { fail_at: 3, calls: 0 };
        let result = process_with(source.path(), destination.path(), &mut segmenter, None);

        assert!(matches!(result, Err(VidmatteError::Inference(_))));

        // Frames before the failure were written; nothing after it was
        let written = sequence::list_frames(destination.path()).unwrap();
        assert_eq!(written.len(), 2);
    }

    #[test]
    fn test_empty_source_is_a_silent_no_op() {
        let source = tempdir().unwrap();
        let destination = tempdir().unwrap();

        let events: Arc<Mutex<Vec<(usize, usize)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let callback: ProgressFn = Box::new(move |current, total| {
            sink.lock().unwrap().push((current, total));
        });

        let mut segmenter = StubSegmenter { calls: 0 };
        process_with(source.path(), destination.path(), &mut segmenter, Some(callback)).unwrap();

        assert_eq!(segmenter.calls, 0);
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_destination_created_if_absent() {
        let source = tempdir().unwrap();
        let destination_root = tempdir().unwrap();
        let destination = destination_root.path().join("nested").join("output_frames");
        write_frames(source.path(), 1);

        let mut segmenter = StubSegmenter { calls: 0 };
        process_with(source.path(), &destination, &mut segmenter, None).unwrap();

        assert!(destination.join(sequence::frame_file_name(1)).exists());
    }
}
