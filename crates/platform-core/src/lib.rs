//! Facepilot platform core contracts.
//!
//! This crate contains the OS-facing seam the keybinder dispatches
//! through: the [`InputPlatform`] trait for cursor movement, mouse
//! button and keyboard injection, plus cross-platform monitor data
//! structures. Concrete backends (uinput on Linux, the recording
//! [`VirtualPlatform`] for tests and replays) implement the trait
//! without the core ever coupling to an OS API.

pub mod virtual_platform;

use std::str::FromStr;

use facepilot_common::error::{FacepilotError, FacepilotResult};
use serde::{Deserialize, Serialize};

pub use virtual_platform::VirtualPlatform;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Stable lowercase name, used in binding state keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Right => "right",
            MouseButton::Middle => "middle",
        }
    }
}

impl FromStr for MouseButton {
    type Err = FacepilotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(MouseButton::Left),
            "right" => Ok(MouseButton::Right),
            "middle" => Ok(MouseButton::Middle),
            other => Err(FacepilotError::config(format!(
                "unknown mouse button: {other:?}"
            ))),
        }
    }
}

/// Information about a connected monitor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonitorInfo {
    /// Monitor name/identifier.
    pub name: String,
    /// Resolution in physical pixels.
    pub width: u32,
    pub height: u32,
    /// Position in the virtual desktop (pixels).
    pub x: i32,
    pub y: i32,
    /// Scale factor (for example 1.0, 1.25, 2.0).
    pub scale_factor: f64,
    /// Whether this monitor is primary.
    pub primary: bool,
}

/// Bounding box of one monitor in the virtual desktop, as the
/// keybinder consumes it: inclusive corners plus the integer midpoint
/// the cursor is parked on by the `reset`/`cycle` actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorGeometry {
    /// Zero-based enumeration index.
    pub id: usize,
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub center_x: i32,
    pub center_y: i32,
}

impl MonitorGeometry {
    /// Build a geometry from a top-left corner and pixel dimensions.
    pub fn from_bounds(id: usize, x: i32, y: i32, width: u32, height: u32) -> Self {
        let x2 = x + width as i32;
        let y2 = y + height as i32;
        Self {
            id,
            x1: x,
            y1: y,
            x2,
            y2,
            center_x: (x + x2) / 2,
            center_y: (y + y2) / 2,
        }
    }

    /// Build a geometry from enumerated monitor info.
    pub fn from_monitor(id: usize, monitor: &MonitorInfo) -> Self {
        Self::from_bounds(id, monitor.x, monitor.y, monitor.width, monitor.height)
    }

    /// Whether the point lies inside the inclusive bounding box.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }
}

/// A single injected OS input event, as recorded by the virtual
/// backend and printed by replays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InjectedEvent {
    /// Absolute cursor move.
    MoveTo { x: i32, y: i32 },

    /// Mouse button press.
    MouseDown { button: MouseButton },

    /// Mouse button release.
    MouseUp { button: MouseButton },

    /// One-shot click (press and release).
    Click { button: MouseButton },

    /// Keyboard key press.
    KeyDown { key: String },

    /// Keyboard key release.
    KeyUp { key: String },

    /// One-shot key press (down and up).
    KeyPress { key: String },
}

/// Trait for OS input-injection backends.
///
/// All injection calls are synchronous and assumed fast; a failure is
/// surfaced to the caller rather than retried (the keybinder keeps
/// its asserted-state bookkeeping aligned with what it *attempted* to
/// emit).
pub trait InputPlatform: Send {
    /// Current pointer position in virtual desktop pixels.
    fn pointer_position(&mut self) -> FacepilotResult<(i32, i32)>;

    /// Move the pointer to an absolute position.
    fn move_to(&mut self, x: i32, y: i32) -> FacepilotResult<()>;

    /// Press a mouse button.
    fn mouse_down(&mut self, button: MouseButton) -> FacepilotResult<()>;

    /// Release a mouse button.
    fn mouse_up(&mut self, button: MouseButton) -> FacepilotResult<()>;

    /// Click a mouse button (press and release).
    fn click(&mut self, button: MouseButton) -> FacepilotResult<()>;

    /// Press a keyboard key by name (e.g. "space", "a", "enter").
    fn key_down(&mut self, key: &str) -> FacepilotResult<()>;

    /// Release a keyboard key.
    fn key_up(&mut self, key: &str) -> FacepilotResult<()>;

    /// Press and release a keyboard key.
    fn key_press(&mut self, key: &str) -> FacepilotResult<()>;

    /// Total virtual desktop size in pixels.
    fn screen_size(&mut self) -> FacepilotResult<(u32, u32)>;

    /// Enumerate connected monitors.
    fn monitors(&mut self) -> FacepilotResult<Vec<MonitorInfo>>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

/// Compute virtual desktop bounds that include all connected monitors.
/// Returns `(min_x, min_y, width, height)` in physical pixels.
pub fn virtual_desktop_bounds(monitors: &[MonitorInfo]) -> (i32, i32, u32, u32) {
    if monitors.is_empty() {
        return (0, 0, 1920, 1080);
    }

    let min_x = monitors.iter().map(|m| m.x).min().unwrap_or(0);
    let min_y = monitors.iter().map(|m| m.y).min().unwrap_or(0);
    let max_x = monitors
        .iter()
        .map(|m| m.x + m.width as i32)
        .max()
        .unwrap_or(1920);
    let max_y = monitors
        .iter()
        .map(|m| m.y + m.height as i32)
        .max()
        .unwrap_or(1080);

    let width = (max_x - min_x).max(1) as u32;
    let height = (max_y - min_y).max(1) as u32;
    (min_x, min_y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor(name: &str, x: i32, y: i32, width: u32, height: u32) -> MonitorInfo {
        MonitorInfo {
            name: name.to_string(),
            width,
            height,
            x,
            y,
            scale_factor: 1.0,
            primary: x == 0 && y == 0,
        }
    }

    #[test]
    fn virtual_bounds_cover_negative_origin_layout() {
        let monitors = vec![
            monitor("left", -1920, 0, 1920, 1080),
            monitor("main", 0, 0, 2560, 1440),
        ];

        let (x, y, w, h) = virtual_desktop_bounds(&monitors);
        assert_eq!(x, -1920);
        assert_eq!(y, 0);
        assert_eq!(w, 4480);
        assert_eq!(h, 1440);
    }

    #[test]
    fn geometry_center_is_integer_midpoint() {
        let geo = MonitorGeometry::from_bounds(0, 0, 0, 1920, 1080);
        assert_eq!(geo.center_x, 960);
        assert_eq!(geo.center_y, 540);
        assert_eq!(geo.x2, 1920);
    }

    #[test]
    fn geometry_contains_is_inclusive() {
        let geo = MonitorGeometry::from_bounds(1, 1920, 0, 1920, 1080);
        assert!(geo.contains(1920, 0));
        assert!(geo.contains(3840, 1080));
        assert!(!geo.contains(1919, 0));
        assert!(!geo.contains(3841, 500));
    }

    #[test]
    fn mouse_button_parse_rejects_unknown() {
        assert_eq!("left".parse::<MouseButton>().unwrap(), MouseButton::Left);
        assert!("pause".parse::<MouseButton>().is_err());
    }

    #[test]
    fn injected_event_serializes_tagged() {
        let event = InjectedEvent::MouseDown {
            button: MouseButton::Left,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"mouse_down\""));
        assert!(json.contains("\"button\":\"left\""));
    }
}
