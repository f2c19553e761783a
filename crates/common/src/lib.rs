//! Facepilot Common Utilities
//!
//! Shared infrastructure for all Facepilot crates:
//! - Error types and result aliases
//! - Frame clock for debounce/throttle timing
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
