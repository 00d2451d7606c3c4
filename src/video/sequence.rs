//! Frame sequence naming and listing conventions.
//!
//! Extracted and processed frames are stored as `frame_00001.png`,
//! `frame_00002.png`, ... so that lexical order equals display order. Every
//! consumer of a frame directory goes through [`list_frames`] so processing
//! order never depends on filesystem enumeration order.

use std::io;
use std::path::{Path, PathBuf};

/// File name prefix shared by all sequence frames
pub const FRAME_PREFIX: &str = "frame_";

/// File extension shared by all sequence frames
pub const FRAME_EXTENSION: &str = "png";

/// ffmpeg image2 pattern matching [`frame_file_name`] (1-based, 5-digit index)
pub const FRAME_PATTERN: &str = "frame_%05d.png";

/// Build the file name for the frame at the given 1-based index
pub fn frame_file_name(index: usize) -> String {
    format!("{}{:05}.{}", FRAME_PREFIX, index, FRAME_EXTENSION)
}

/// List the sequence frames in a directory, sorted by file name
///
/// Non-frame files (anything not matching `frame_*.png`) are ignored, and
/// the result is sorted so that it is stable regardless of the order the
/// filesystem happens to return entries in.
pub fn list_frames(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut frames = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_frame_file(&path) {
            frames.push(path);
        }
    }

    frames.sort_by_key(|path| path.file_name().map(|name| name.to_os_string()));
    Ok(frames)
}

fn is_frame_file(path: &Path) -> bool {
    let name = match path.file_name().and_then(|name| name.to_str()) {
        Some(name) => name,
        None => return false,
    };

    name.starts_with(FRAME_PREFIX)
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(FRAME_EXTENSION))
            .unwrap_or(false)
}
