//! Input/output operations, configuration, and error handling

/// Command-line interface and pipeline dispatch
pub mod cli;
/// Pipeline constants and runtime defaults
pub mod configuration;
/// Error types and result alias
pub mod error;
/// RGB image loading, saving, and directory listing
pub mod image;
/// Progress display for sequential runs
pub mod progress;
