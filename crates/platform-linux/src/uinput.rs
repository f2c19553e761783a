//! Input injection through a uinput virtual device.
//!
//! The kernel exposes `/dev/uinput` for creating virtual input
//! devices; events written to the device are indistinguishable from a
//! real mouse/keyboard to every application, on both X11 and Wayland.
//! The virtual device advertises absolute X/Y axes covering the whole
//! virtual desktop, so cursor moves are single absolute events rather
//! than relative deltas.

use std::fs::OpenOptions;

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{
    AbsInfo, AbsoluteAxisType, AttributeSet, EventType, InputEvent, Key, UinputAbsSetup,
};
use facepilot_common::error::{FacepilotError, FacepilotResult};
use facepilot_platform_core::{
    virtual_desktop_bounds, InputPlatform, MonitorInfo, MouseButton,
};

use crate::display::detect_monitors;

/// Key names accepted in binding profiles, mapped to kernel keycodes.
/// Single letters and digits map to their obvious keys; the rest are
/// the named editing/navigation/modifier keys.
const KEY_TABLE: &[(&str, Key)] = &[
    ("a", Key::KEY_A),
    ("b", Key::KEY_B),
    ("c", Key::KEY_C),
    ("d", Key::KEY_D),
    ("e", Key::KEY_E),
    ("f", Key::KEY_F),
    ("g", Key::KEY_G),
    ("h", Key::KEY_H),
    ("i", Key::KEY_I),
    ("j", Key::KEY_J),
    ("k", Key::KEY_K),
    ("l", Key::KEY_L),
    ("m", Key::KEY_M),
    ("n", Key::KEY_N),
    ("o", Key::KEY_O),
    ("p", Key::KEY_P),
    ("q", Key::KEY_Q),
    ("r", Key::KEY_R),
    ("s", Key::KEY_S),
    ("t", Key::KEY_T),
    ("u", Key::KEY_U),
    ("v", Key::KEY_V),
    ("w", Key::KEY_W),
    ("x", Key::KEY_X),
    ("y", Key::KEY_Y),
    ("z", Key::KEY_Z),
    ("0", Key::KEY_0),
    ("1", Key::KEY_1),
    ("2", Key::KEY_2),
    ("3", Key::KEY_3),
    ("4", Key::KEY_4),
    ("5", Key::KEY_5),
    ("6", Key::KEY_6),
    ("7", Key::KEY_7),
    ("8", Key::KEY_8),
    ("9", Key::KEY_9),
    ("space", Key::KEY_SPACE),
    ("enter", Key::KEY_ENTER),
    ("esc", Key::KEY_ESC),
    ("escape", Key::KEY_ESC),
    ("tab", Key::KEY_TAB),
    ("backspace", Key::KEY_BACKSPACE),
    ("delete", Key::KEY_DELETE),
    ("up", Key::KEY_UP),
    ("down", Key::KEY_DOWN),
    ("left", Key::KEY_LEFT),
    ("right", Key::KEY_RIGHT),
    ("home", Key::KEY_HOME),
    ("end", Key::KEY_END),
    ("pageup", Key::KEY_PAGEUP),
    ("pagedown", Key::KEY_PAGEDOWN),
    ("shift", Key::KEY_LEFTSHIFT),
    ("ctrl", Key::KEY_LEFTCTRL),
    ("alt", Key::KEY_LEFTALT),
    ("meta", Key::KEY_LEFTMETA),
    ("f1", Key::KEY_F1),
    ("f2", Key::KEY_F2),
    ("f3", Key::KEY_F3),
    ("f4", Key::KEY_F4),
    ("f5", Key::KEY_F5),
    ("f6", Key::KEY_F6),
    ("f7", Key::KEY_F7),
    ("f8", Key::KEY_F8),
    ("f9", Key::KEY_F9),
    ("f10", Key::KEY_F10),
    ("f11", Key::KEY_F11),
    ("f12", Key::KEY_F12),
];

fn lookup_key(name: &str) -> FacepilotResult<Key> {
    let lower = name.to_ascii_lowercase();
    KEY_TABLE
        .iter()
        .find(|(n, _)| *n == lower)
        .map(|(_, key)| *key)
        .ok_or_else(|| FacepilotError::injection(format!("unknown key name: {name:?}")))
}

fn button_key(button: MouseButton) -> Key {
    match button {
        MouseButton::Left => Key::BTN_LEFT,
        MouseButton::Right => Key::BTN_RIGHT,
        MouseButton::Middle => Key::BTN_MIDDLE,
    }
}

/// uinput-backed input injection.
///
/// The pointer position is tracked internally: uinput is write-only,
/// so the last absolute position we emitted is the position. It starts
/// at the center of the virtual desktop.
pub struct UinputPlatform {
    device: VirtualDevice,
    pointer: (i32, i32),
    monitors: Vec<MonitorInfo>,
    bounds: (i32, i32, u32, u32),
}

impl UinputPlatform {
    pub fn new() -> FacepilotResult<Self> {
        let monitors = detect_monitors()?;
        let bounds = virtual_desktop_bounds(&monitors);
        let (min_x, min_y, width, height) = bounds;
        let center = (min_x + width as i32 / 2, min_y + height as i32 / 2);

        let mut keys = AttributeSet::<Key>::new();
        keys.insert(Key::BTN_LEFT);
        keys.insert(Key::BTN_RIGHT);
        keys.insert(Key::BTN_MIDDLE);
        for (_, key) in KEY_TABLE {
            keys.insert(*key);
        }

        let abs_x = UinputAbsSetup::new(
            AbsoluteAxisType::ABS_X,
            AbsInfo::new(center.0, min_x, min_x + width as i32, 0, 0, 1),
        );
        let abs_y = UinputAbsSetup::new(
            AbsoluteAxisType::ABS_Y,
            AbsInfo::new(center.1, min_y, min_y + height as i32, 0, 0, 1),
        );

        let device = VirtualDeviceBuilder::new()
            .map_err(|e| {
                FacepilotError::platform(format!("failed to open /dev/uinput: {e}"))
            })?
            .name("facepilot virtual input")
            .with_keys(&keys)
            .map_err(|e| FacepilotError::platform(format!("uinput key setup failed: {e}")))?
            .with_absolute_axis(&abs_x)
            .map_err(|e| FacepilotError::platform(format!("uinput axis setup failed: {e}")))?
            .with_absolute_axis(&abs_y)
            .map_err(|e| FacepilotError::platform(format!("uinput axis setup failed: {e}")))?
            .build()
            .map_err(|e| {
                FacepilotError::platform(format!("failed to create uinput device: {e}"))
            })?;

        tracing::info!(
            monitors = monitors.len(),
            width,
            height,
            "uinput virtual device created"
        );

        Ok(Self {
            device,
            pointer: center,
            monitors,
            bounds,
        })
    }

    /// Whether the current process can create uinput devices.
    pub fn is_supported() -> bool {
        OpenOptions::new().write(true).open("/dev/uinput").is_ok()
    }

    fn emit_key(&mut self, key: Key, value: i32) -> FacepilotResult<()> {
        self.device
            .emit(&[InputEvent::new(EventType::KEY, key.code(), value)])
            .map_err(|e| FacepilotError::injection(format!("uinput write failed: {e}")))
    }
}

impl InputPlatform for UinputPlatform {
    fn pointer_position(&mut self) -> FacepilotResult<(i32, i32)> {
        Ok(self.pointer)
    }

    fn move_to(&mut self, x: i32, y: i32) -> FacepilotResult<()> {
        self.device
            .emit(&[
                InputEvent::new(EventType::ABSOLUTE, AbsoluteAxisType::ABS_X.0, x),
                InputEvent::new(EventType::ABSOLUTE, AbsoluteAxisType::ABS_Y.0, y),
            ])
            .map_err(|e| FacepilotError::injection(format!("uinput write failed: {e}")))?;
        self.pointer = (x, y);
        Ok(())
    }

    fn mouse_down(&mut self, button: MouseButton) -> FacepilotResult<()> {
        self.emit_key(button_key(button), 1)
    }

    fn mouse_up(&mut self, button: MouseButton) -> FacepilotResult<()> {
        self.emit_key(button_key(button), 0)
    }

    fn click(&mut self, button: MouseButton) -> FacepilotResult<()> {
        self.mouse_down(button)?;
        self.mouse_up(button)
    }

    fn key_down(&mut self, key: &str) -> FacepilotResult<()> {
        let key = lookup_key(key)?;
        self.emit_key(key, 1)
    }

    fn key_up(&mut self, key: &str) -> FacepilotResult<()> {
        let key = lookup_key(key)?;
        self.emit_key(key, 0)
    }

    fn key_press(&mut self, key: &str) -> FacepilotResult<()> {
        self.key_down(key)?;
        self.key_up(key)
    }

    fn screen_size(&mut self) -> FacepilotResult<(u32, u32)> {
        let (_, _, width, height) = self.bounds;
        Ok((width, height))
    }

    fn monitors(&mut self) -> FacepilotResult<Vec<MonitorInfo>> {
        Ok(self.monitors.clone())
    }

    fn name(&self) -> &str {
        "uinput"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_lookup_is_case_insensitive() {
        assert_eq!(lookup_key("space").unwrap(), Key::KEY_SPACE);
        assert_eq!(lookup_key("Space").unwrap(), Key::KEY_SPACE);
        assert_eq!(lookup_key("F5").unwrap(), Key::KEY_F5);
    }

    #[test]
    fn key_lookup_rejects_unknown_names() {
        assert!(lookup_key("hyper").is_err());
    }

    #[test]
    fn buttons_map_to_btn_codes() {
        assert_eq!(button_key(MouseButton::Left), Key::BTN_LEFT);
        assert_eq!(button_key(MouseButton::Middle), Key::BTN_MIDDLE);
    }
}
