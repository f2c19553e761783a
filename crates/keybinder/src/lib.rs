//! Facepilot Keybinder
//!
//! The per-frame dispatcher that turns continuous gesture intensities
//! into discrete OS input events. Each inference frame, the driving
//! loop hands [`Keybinder::dispatch`] the current intensity array; the
//! keybinder snapshots the live binding profile, heals any
//! configuration drift, and routes every binding through its
//! threshold state machine:
//!
//! - mouse buttons: continuous hold, or click-then-promote-to-hold
//! - keyboard keys: continuous hold, or throttled single presses
//! - special cursor actions: pause toggle, reset-to-center, cycle
//!   monitors
//!
//! The keybinder is single-threaded and not reentrant; it owns its
//! state and a boxed [`InputPlatform`](facepilot_platform_core::InputPlatform)
//! backend, and is driven synchronously once per frame.

pub mod dispatch;
pub mod monitors;
pub mod registry;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use dispatch::Keybinder;
pub use monitors::MonitorLocator;
pub use registry::BindingStates;

/// Externally-owned master toggle for mouse/keyboard control.
///
/// While inactive, the dispatcher processes only the `pause` binding
/// (which is what flips this flag back on). Shared by handle so a
/// settings UI or tray icon can flip it from another thread.
#[derive(Debug, Clone)]
pub struct ActivityFlag(Arc<AtomicBool>);

impl ActivityFlag {
    pub fn new(active: bool) -> Self {
        Self(Arc::new(AtomicBool::new(active)))
    }

    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set_active(&self, active: bool) {
        self.0.store(active, Ordering::SeqCst);
    }

    /// Flip the flag and return the new value.
    pub fn toggle(&self) -> bool {
        !self.0.fetch_xor(true, Ordering::SeqCst)
    }
}

impl Default for ActivityFlag {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_returns_new_value() {
        let flag = ActivityFlag::new(true);
        assert!(!flag.toggle());
        assert!(!flag.is_active());
        assert!(flag.toggle());
        assert!(flag.is_active());
    }

    #[test]
    fn clones_share_state() {
        let flag = ActivityFlag::new(true);
        let other = flag.clone();
        other.set_active(false);
        assert!(!flag.is_active());
    }
}
