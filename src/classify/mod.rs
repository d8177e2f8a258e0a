//! Few-shot lesion classification pipeline
//!
//! Dependency order through this module: example sampling, prompt assembly,
//! the blocking chat completion call, then result parsing and persistence.

/// Blocking chat completion clients
pub mod client;
/// Experiment directory conventions
pub mod layout;
/// Prompt templates and multimodal message assembly
pub mod prompt;
/// Verdict parsing and per-query JSON persistence
pub mod result;
/// The sequential classification runner and CSV batching
pub mod runner;
/// Random reference example selection
pub mod sampler;

pub use result::Classification;
