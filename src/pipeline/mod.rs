//! # Pipeline Module
//!
//! The batch processor and the end-to-end orchestrator.

pub mod batch;
pub mod engine;
pub mod progress;

pub use batch::process;
pub use engine::Pipeline;
pub use progress::{ProgressEvent, ProgressFn};
