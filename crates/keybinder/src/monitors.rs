//! Monitor lookup for cursor placement actions.
//!
//! Geometries are enumerated once when the keybinder starts and kept
//! until an explicit refresh; the pointer can transiently sit outside
//! every known bounding box during display reconfiguration, so lookup
//! degrades to monitor 0 instead of failing.

use facepilot_common::error::FacepilotResult;
use facepilot_platform_core::{InputPlatform, MonitorGeometry};

/// Enumerated monitor geometries with pointer lookup and cyclic
/// ordering.
#[derive(Debug, Clone)]
pub struct MonitorLocator {
    monitors: Vec<MonitorGeometry>,
}

impl MonitorLocator {
    /// Enumerate monitors from the platform. If the platform reports
    /// none, a single monitor covering the whole screen is synthesized
    /// so lookup always has a fallback target.
    pub fn enumerate(platform: &mut dyn InputPlatform) -> FacepilotResult<Self> {
        let infos = platform.monitors()?;
        let monitors = if infos.is_empty() {
            let (width, height) = platform.screen_size()?;
            vec![MonitorGeometry::from_bounds(0, 0, 0, width, height)]
        } else {
            infos
                .iter()
                .enumerate()
                .map(|(id, info)| MonitorGeometry::from_monitor(id, info))
                .collect()
        };

        tracing::debug!(count = monitors.len(), "Enumerated monitors");
        Ok(Self { monitors })
    }

    /// Build a locator from explicit geometries (tests, replays).
    /// Must be non-empty.
    pub fn from_geometries(monitors: Vec<MonitorGeometry>) -> Self {
        assert!(!monitors.is_empty(), "locator needs at least one monitor");
        Self { monitors }
    }

    /// Id of the first monitor whose inclusive bounding box contains
    /// the point; monitor 0 when none does.
    pub fn locate(&self, x: i32, y: i32) -> usize {
        self.monitors
            .iter()
            .position(|m| m.contains(x, y))
            .unwrap_or(0)
    }

    /// The next monitor in cyclic enumeration order.
    pub fn next(&self, id: usize) -> usize {
        (id + 1) % self.monitors.len()
    }

    /// Geometry for an id; a stale id past the end falls back to
    /// monitor 0.
    pub fn get(&self, id: usize) -> &MonitorGeometry {
        self.monitors.get(id).unwrap_or(&self.monitors[0])
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facepilot_platform_core::{MonitorInfo, VirtualPlatform};

    fn three_monitors() -> MonitorLocator {
        MonitorLocator::from_geometries(vec![
            MonitorGeometry::from_bounds(0, 0, 0, 1920, 1080),
            MonitorGeometry::from_bounds(1, 1920, 0, 1920, 1080),
            MonitorGeometry::from_bounds(2, 3840, 0, 1280, 1024),
        ])
    }

    #[test]
    fn locate_returns_first_containing_monitor() {
        let locator = three_monitors();
        assert_eq!(locator.locate(100, 100), 0);
        assert_eq!(locator.locate(2000, 500), 1);
        assert_eq!(locator.locate(4000, 900), 2);
        // shared inclusive edge belongs to the earlier monitor
        assert_eq!(locator.locate(1920, 0), 0);
    }

    #[test]
    fn locate_falls_back_to_zero_outside_all_bounds() {
        let locator = three_monitors();
        assert_eq!(locator.locate(-500, -500), 0);
        assert_eq!(locator.locate(9999, 9999), 0);
    }

    #[test]
    fn next_cycles_through_all_monitors() {
        let locator = three_monitors();
        assert_eq!(locator.next(0), 1);
        assert_eq!(locator.next(1), 2);
        assert_eq!(locator.next(2), 0);
    }

    #[test]
    fn stale_id_falls_back_to_monitor_zero() {
        let locator = three_monitors();
        assert_eq!(locator.get(7).id, 0);
    }

    #[test]
    fn empty_enumeration_synthesizes_screen_monitor() {
        let mut platform = VirtualPlatform::with_monitors(Vec::<MonitorInfo>::new());
        let locator = MonitorLocator::enumerate(&mut platform).unwrap();
        assert_eq!(locator.len(), 1);
        assert_eq!(locator.get(0).x2, 1920);
    }
}
