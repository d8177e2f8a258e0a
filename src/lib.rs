//! Research toolkit for dermatological image classification under simulated
//! color vision deficiency
//!
//! Two one-shot pipelines share this crate: a converter that renders CVD
//! variants of image directories, and a few-shot classifier that prompts a
//! multimodal chat model with labeled reference images and records the
//! structured verdicts.

#![forbid(unsafe_code)]

/// Few-shot lesion classification pipeline
pub mod classify;
/// Input/output operations and error handling
pub mod io;
/// Color vision deficiency simulation
pub mod simulate;

pub use io::error::{PipelineError, Result};
