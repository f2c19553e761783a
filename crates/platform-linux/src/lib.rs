//! Linux platform backend for Facepilot.
//!
//! - **uinput:** a virtual input device through which mouse buttons,
//!   absolute cursor moves, and keyboard events are injected.
//! - **display:** monitor geometry detection (xrandr on X11, with a
//!   single-monitor fallback elsewhere).
//! - **permissions:** capability checks and fix guidance for the
//!   `facepilot check` command.

pub mod display;
pub mod permissions;

#[cfg(target_os = "linux")]
pub mod uinput;

pub use display::{detect_display_server, detect_monitors, DisplayServer};

#[cfg(target_os = "linux")]
pub use uinput::UinputPlatform;
