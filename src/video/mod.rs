//! # Video Handling Module
//!
//! Probing, frame extraction, and frame reassembly, all driven through
//! ffmpeg/ffprobe subprocesses.

pub mod assembler;
pub mod extractor;
pub mod probe;
pub mod sequence;

pub use assembler::{rebuild, AlphaMode, AssemblyOptions};
pub use extractor::extract;
pub use probe::probe_framerate;
