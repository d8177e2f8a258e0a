//! Color vision deficiency simulation
//!
//! This module contains the simulation pipeline:
//! - Color space models and matrix utilities
//! - The pluggable dichromacy simulators
//! - The directory conversion runner

/// Color models and matrix utilities for deficiency simulation
pub mod model;
/// Batch conversion of image directories into simulated variants
pub mod runner;
/// Pluggable deficiency simulators
pub mod simulator;

pub use simulator::{Deficiency, SimulatorKind};
