//! # vidmatte
//!
//! Remove the background from every frame of a video using pretrained
//! neural segmentation models.
//!
//! Each decoded frame is passed through a salient-object model (U2Net by
//! default) that predicts a per-pixel alpha matte; the matte is applied to
//! the frame as an alpha channel and the matted frames are re-encoded into
//! the output video. Frames are processed independently — there is no
//! temporal smoothing, so some flicker at subject boundaries is expected.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vidmatte::{config::Config, pipeline::Pipeline};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let pipeline = Pipeline::new(Config::default());
//! pipeline.run(
//!     "input.mp4".as_ref(),
//!     "output.mp4".as_ref(),
//!     "u2net",
//!     None,
//! ).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`video`] - Probing, frame extraction, and reassembly via ffmpeg
//! - [`segmentation`] - Model catalog and the ONNX inference session
//! - [`pipeline`] - The batch processor and the end-to-end orchestrator
//! - [`config`] - Configuration management
//!
//! The pipeline stages are independently usable: [`video::extract`],
//! [`pipeline::process`], and [`video::rebuild`] compose into
//! [`pipeline::Pipeline::run`], which also owns the temporary frame
//! workspace and guarantees its removal on every exit path.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod segmentation;
pub mod video;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{Result, VidmatteError},
    pipeline::{Pipeline, ProgressEvent, ProgressFn},
    segmentation::{available_models, ModelSession, DEFAULT_MODEL},
    video::{AlphaMode, AssemblyOptions},
};
