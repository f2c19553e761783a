//! Recording backend for tests and offline replays.
//!
//! Injected events are appended to an in-memory log instead of being
//! delivered to the OS. The pointer position and monitor layout are
//! scriptable, so dispatcher behavior can be exercised
//! deterministically.

use facepilot_common::error::{FacepilotError, FacepilotResult};

use crate::{virtual_desktop_bounds, InjectedEvent, InputPlatform, MonitorInfo, MouseButton};

/// An in-memory platform that records every injected event.
pub struct VirtualPlatform {
    events: Vec<InjectedEvent>,
    pointer: (i32, i32),
    monitors: Vec<MonitorInfo>,
    /// When true, every injection call fails after recording nothing.
    fail_injections: bool,
}

impl VirtualPlatform {
    /// Create a platform with a single 1920x1080 monitor.
    pub fn new() -> Self {
        Self::with_monitors(vec![MonitorInfo {
            name: "virtual-0".to_string(),
            width: 1920,
            height: 1080,
            x: 0,
            y: 0,
            scale_factor: 1.0,
            primary: true,
        }])
    }

    /// Create a platform with an explicit monitor layout.
    pub fn with_monitors(monitors: Vec<MonitorInfo>) -> Self {
        Self {
            events: vec![],
            pointer: (0, 0),
            monitors,
            fail_injections: false,
        }
    }

    /// Park the pointer at an absolute position without recording an event.
    pub fn set_pointer(&mut self, x: i32, y: i32) {
        self.pointer = (x, y);
    }

    /// Make every subsequent injection call fail.
    pub fn fail_injections(&mut self, fail: bool) {
        self.fail_injections = fail;
    }

    /// Events recorded so far.
    pub fn events(&self) -> &[InjectedEvent] {
        &self.events
    }

    /// Drain and return the recorded events.
    pub fn take_events(&mut self) -> Vec<InjectedEvent> {
        std::mem::take(&mut self.events)
    }

    fn record(&mut self, event: InjectedEvent) -> FacepilotResult<()> {
        if self.fail_injections {
            return Err(FacepilotError::injection(
                "virtual platform configured to fail",
            ));
        }
        self.events.push(event);
        Ok(())
    }
}

impl Default for VirtualPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl InputPlatform for VirtualPlatform {
    fn pointer_position(&mut self) -> FacepilotResult<(i32, i32)> {
        Ok(self.pointer)
    }

    fn move_to(&mut self, x: i32, y: i32) -> FacepilotResult<()> {
        self.record(InjectedEvent::MoveTo { x, y })?;
        self.pointer = (x, y);
        Ok(())
    }

    fn mouse_down(&mut self, button: MouseButton) -> FacepilotResult<()> {
        self.record(InjectedEvent::MouseDown { button })
    }

    fn mouse_up(&mut self, button: MouseButton) -> FacepilotResult<()> {
        self.record(InjectedEvent::MouseUp { button })
    }

    fn click(&mut self, button: MouseButton) -> FacepilotResult<()> {
        self.record(InjectedEvent::Click { button })
    }

    fn key_down(&mut self, key: &str) -> FacepilotResult<()> {
        self.record(InjectedEvent::KeyDown {
            key: key.to_string(),
        })
    }

    fn key_up(&mut self, key: &str) -> FacepilotResult<()> {
        self.record(InjectedEvent::KeyUp {
            key: key.to_string(),
        })
    }

    fn key_press(&mut self, key: &str) -> FacepilotResult<()> {
        self.record(InjectedEvent::KeyPress {
            key: key.to_string(),
        })
    }

    fn screen_size(&mut self) -> FacepilotResult<(u32, u32)> {
        let (_, _, width, height) = virtual_desktop_bounds(&self.monitors);
        Ok((width, height))
    }

    fn monitors(&mut self) -> FacepilotResult<Vec<MonitorInfo>> {
        Ok(self.monitors.clone())
    }

    fn name(&self) -> &str {
        "virtual"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_events_in_order() {
        let mut platform = VirtualPlatform::new();
        platform.click(MouseButton::Left).unwrap();
        platform.key_down("space").unwrap();
        platform.key_up("space").unwrap();

        assert_eq!(
            platform.events(),
            &[
                InjectedEvent::Click {
                    button: MouseButton::Left
                },
                InjectedEvent::KeyDown {
                    key: "space".to_string()
                },
                InjectedEvent::KeyUp {
                    key: "space".to_string()
                },
            ]
        );
    }

    #[test]
    fn move_to_updates_pointer() {
        let mut platform = VirtualPlatform::new();
        platform.move_to(100, 200).unwrap();
        assert_eq!(platform.pointer_position().unwrap(), (100, 200));
    }

    #[test]
    fn failing_platform_records_nothing() {
        let mut platform = VirtualPlatform::new();
        platform.fail_injections(true);
        assert!(platform.click(MouseButton::Left).is_err());
        assert!(platform.events().is_empty());
    }

    #[test]
    fn screen_size_spans_all_monitors() {
        let mut platform = VirtualPlatform::with_monitors(vec![
            MonitorInfo {
                name: "a".to_string(),
                width: 1920,
                height: 1080,
                x: 0,
                y: 0,
                scale_factor: 1.0,
                primary: true,
            },
            MonitorInfo {
                name: "b".to_string(),
                width: 1920,
                height: 1080,
                x: 1920,
                y: 0,
                scale_factor: 1.0,
                primary: false,
            },
        ]);
        assert_eq!(platform.screen_size().unwrap(), (3840, 1080));
    }
}
