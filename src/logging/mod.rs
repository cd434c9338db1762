//! Logging for the dataset splitter
//!
//! This module provides:
//! - Bracketed log lines tagged with the pipeline stage
//! - Console output, plus an optional timestamped log file

mod formatter;
mod setup;

pub use setup::setup_logging;
