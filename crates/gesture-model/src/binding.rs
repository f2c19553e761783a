//! Typed binding records.
//!
//! Profiles on disk store each binding as a raw JSON array: legacy
//! profiles carry 4 elements `[device, action, threshold, mode]`,
//! current ones carry 6 with `hold_mode` and `throttle_ms` appended.
//! `hold_mode` may arrive as a boolean or as the strings
//! "true"/"false" (any case). All of that is normalized exactly once,
//! here, at load time; the per-frame dispatch path only ever sees the
//! typed [`Binding`].

use facepilot_common::error::{FacepilotError, FacepilotResult};
use facepilot_platform_core::MouseButton;
use serde_json::Value;

/// Default hold mode for legacy 4-element bindings.
pub const DEFAULT_HOLD: bool = true;

/// Default throttle interval for legacy 4-element bindings (ms).
pub const DEFAULT_THROTTLE_MS: f64 = 200.0;

/// Which input device a binding drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    Mouse,
    Keyboard,
}

impl Device {
    /// Stable lowercase name, used as the state-key prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Mouse => "mouse",
            Device::Keyboard => "keyboard",
        }
    }
}

/// The advisory trigger mode stored in the profile.
///
/// For mouse bindings the effective mode is derived from the global
/// hold toggle at dispatch time, so this field is carried but not
/// consulted on the hot path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerMode {
    Single,
    Hold,
}

impl TriggerMode {
    fn parse(s: &str) -> FacepilotResult<Self> {
        match s {
            "single" => Ok(TriggerMode::Single),
            "hold" => Ok(TriggerMode::Hold),
            other => Err(FacepilotError::config(format!(
                "unknown trigger mode: {other:?}"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerMode::Single => "single",
            TriggerMode::Hold => "hold",
        }
    }
}

/// A mouse-device action: either one of the special cursor actions or
/// a plain button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    /// Edge-triggered toggle of the global activity flag.
    Pause,
    /// Park the cursor at the center of the current monitor.
    Reset,
    /// Park the cursor at the center of the next monitor.
    Cycle,
    /// A clickable/holdable button.
    Button(MouseButton),
}

impl MouseAction {
    fn parse(s: &str) -> FacepilotResult<Self> {
        match s {
            "pause" => Ok(MouseAction::Pause),
            "reset" => Ok(MouseAction::Reset),
            "cycle" => Ok(MouseAction::Cycle),
            other => Ok(MouseAction::Button(other.parse()?)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MouseAction::Pause => "pause",
            MouseAction::Reset => "reset",
            MouseAction::Cycle => "cycle",
            MouseAction::Button(button) => button.as_str(),
        }
    }
}

/// The action half of a binding.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingAction {
    Mouse(MouseAction),
    Key(String),
}

/// A fully-upgraded binding record.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub action: BindingAction,
    pub threshold: f64,
    pub mode: TriggerMode,
    /// Keyboard only: hold the key while the gesture is active
    /// (`true`) or emit throttled single presses (`false`).
    pub hold: bool,
    /// Keyboard only: minimum interval between throttled presses (ms).
    pub throttle_ms: f64,
}

impl Binding {
    /// The device this binding drives.
    pub fn device(&self) -> Device {
        match self.action {
            BindingAction::Mouse(_) => Device::Mouse,
            BindingAction::Key(_) => Device::Keyboard,
        }
    }

    /// The action's stable name (button, special action, or keysym).
    pub fn action_name(&self) -> &str {
        match &self.action {
            BindingAction::Mouse(action) => action.as_str(),
            BindingAction::Key(key) => key,
        }
    }

    /// The `device_action` key this binding's asserted state lives
    /// under (e.g. `mouse_left`, `keyboard_space`).
    pub fn state_key(&self) -> String {
        format!("{}_{}", self.device().as_str(), self.action_name())
    }

    /// Upgrade a raw profile tuple into a typed binding.
    ///
    /// Accepts the legacy 4-element and the current 6-element shapes;
    /// elements past the sixth are ignored.
    pub fn from_raw(values: &[Value]) -> FacepilotResult<Self> {
        if values.len() != 4 && values.len() < 6 {
            return Err(FacepilotError::config(format!(
                "binding tuple must have 4 or 6 elements, got {}",
                values.len()
            )));
        }

        let device = expect_str(&values[0], "device")?;
        let action = expect_str(&values[1], "action")?;
        let threshold = expect_f64(&values[2], "threshold")?;
        let mode = TriggerMode::parse(expect_str(&values[3], "mode")?)?;

        let (hold, throttle_ms) = if values.len() >= 6 {
            (
                coerce_hold(&values[4])?,
                expect_f64(&values[5], "throttle_ms")?,
            )
        } else {
            (DEFAULT_HOLD, DEFAULT_THROTTLE_MS)
        };

        let action = match device {
            "mouse" => BindingAction::Mouse(MouseAction::parse(action)?),
            "keyboard" => BindingAction::Key(action.to_string()),
            other => {
                return Err(FacepilotError::config(format!(
                    "unknown binding device: {other:?}"
                )))
            }
        };

        Ok(Self {
            action,
            threshold,
            mode,
            hold,
            throttle_ms,
        })
    }

    /// Serialize back to the current 6-element raw shape.
    pub fn to_raw(&self) -> Vec<Value> {
        vec![
            Value::from(self.device().as_str()),
            Value::from(self.action_name()),
            Value::from(self.threshold),
            Value::from(self.mode.as_str()),
            Value::from(self.hold),
            Value::from(self.throttle_ms),
        ]
    }
}

fn expect_str<'a>(value: &'a Value, field: &str) -> FacepilotResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| FacepilotError::config(format!("binding {field} must be a string")))
}

fn expect_f64(value: &Value, field: &str) -> FacepilotResult<f64> {
    value
        .as_f64()
        .ok_or_else(|| FacepilotError::config(format!("binding {field} must be a number")))
}

/// `hold_mode` arrives as a boolean from current profiles and as the
/// strings "true"/"false" from ones edited by hand.
fn coerce_hold(value: &Value) -> FacepilotResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        other => Err(FacepilotError::config(format!(
            "binding hold_mode must be a boolean or \"true\"/\"false\", got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(values: serde_json::Value) -> Vec<Value> {
        values.as_array().unwrap().clone()
    }

    #[test]
    fn legacy_tuple_gets_defaults() {
        let binding = Binding::from_raw(&raw(json!(["mouse", "left", 0.3, "single"]))).unwrap();
        assert_eq!(
            binding.action,
            BindingAction::Mouse(MouseAction::Button(MouseButton::Left))
        );
        assert_eq!(binding.threshold, 0.3);
        assert_eq!(binding.mode, TriggerMode::Single);
        assert!(binding.hold);
        assert_eq!(binding.throttle_ms, DEFAULT_THROTTLE_MS);
    }

    #[test]
    fn current_tuple_parses_all_fields() {
        let binding =
            Binding::from_raw(&raw(json!(["keyboard", "space", 0.5, "hold", false, 150.0])))
                .unwrap();
        assert_eq!(binding.action, BindingAction::Key("space".to_string()));
        assert!(!binding.hold);
        assert_eq!(binding.throttle_ms, 150.0);
    }

    #[test]
    fn hold_mode_string_is_coerced_case_insensitively() {
        let hold =
            Binding::from_raw(&raw(json!(["keyboard", "w", 0.4, "hold", "True", 200.0]))).unwrap();
        assert!(hold.hold);

        let throttled =
            Binding::from_raw(&raw(json!(["keyboard", "w", 0.4, "hold", "FALSE", 200.0])))
                .unwrap();
        assert!(!throttled.hold);
    }

    #[test]
    fn special_mouse_actions_parse() {
        for (name, expected) in [
            ("pause", MouseAction::Pause),
            ("reset", MouseAction::Reset),
            ("cycle", MouseAction::Cycle),
        ] {
            let binding = Binding::from_raw(&raw(json!(["mouse", name, 0.6, "single"]))).unwrap();
            assert_eq!(binding.action, BindingAction::Mouse(expected));
        }
    }

    #[test]
    fn state_keys_follow_device_action_shape() {
        let mouse = Binding::from_raw(&raw(json!(["mouse", "left", 0.3, "single"]))).unwrap();
        assert_eq!(mouse.state_key(), "mouse_left");

        let keyboard =
            Binding::from_raw(&raw(json!(["keyboard", "space", 0.5, "hold"]))).unwrap();
        assert_eq!(keyboard.state_key(), "keyboard_space");

        let pause = Binding::from_raw(&raw(json!(["mouse", "pause", 0.6, "single"]))).unwrap();
        assert_eq!(pause.state_key(), "mouse_pause");
    }

    #[test]
    fn invalid_shapes_are_config_errors() {
        assert!(Binding::from_raw(&raw(json!(["mouse", "left", 0.3]))).is_err());
        assert!(Binding::from_raw(&raw(json!(["mouse", "left", 0.3, "single", true]))).is_err());
        assert!(Binding::from_raw(&raw(json!(["gamepad", "a", 0.3, "single"]))).is_err());
        assert!(Binding::from_raw(&raw(json!(["mouse", "quadruple", 0.3, "single"]))).is_err());
        assert!(Binding::from_raw(&raw(json!(["mouse", "left", 0.3, "sometimes"]))).is_err());
        assert!(
            Binding::from_raw(&raw(json!(["keyboard", "w", 0.4, "hold", "maybe", 200.0])))
                .is_err()
        );
    }

    #[test]
    fn extra_elements_are_ignored() {
        let binding = Binding::from_raw(&raw(json!([
            "keyboard", "a", 0.5, "hold", true, 200.0, "comment"
        ])))
        .unwrap();
        assert_eq!(binding.action, BindingAction::Key("a".to_string()));
    }

    #[test]
    fn to_raw_round_trips_through_from_raw() {
        let binding =
            Binding::from_raw(&raw(json!(["keyboard", "space", 0.5, "hold", "false", 150.0])))
                .unwrap();
        let upgraded = Binding::from_raw(&binding.to_raw()).unwrap();
        assert_eq!(binding, upgraded);
    }
}
