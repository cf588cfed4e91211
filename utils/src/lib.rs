//! Shared utilities for Trail.

pub mod logging;

pub use logging::{init_logging, LogFormat};
