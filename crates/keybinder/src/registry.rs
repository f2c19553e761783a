//! Per-binding state slots and resync against the live binding set.
//!
//! Every binding owns one boolean slot keyed by `device_action`
//! (`mouse_left`, `keyboard_space`), recording whether the action is
//! currently asserted: a down/press event has fired and no matching
//! release has. One extra slot under [`HOLDING_KEY`] is the global
//! hold-mode toggle for mouse buttons.
//!
//! When the binding set changes, [`BindingStates::resync`] rebuilds
//! the slot map: slots that exist before and after keep their value so
//! a reconfiguration never strands a held key, brand-new slots start
//! `false`, and slots whose binding disappeared are dropped. Throttle
//! timestamps live in a separate map that resync never touches.

use std::collections::HashMap;

use facepilot_gesture_model::BindingSet;

/// State-slot key of the global mouse hold-mode toggle.
pub const HOLDING_KEY: &str = "holding";

/// The per-binding asserted-state registry.
#[derive(Debug, Default)]
pub struct BindingStates {
    states: HashMap<String, bool>,
    last_fire_ms: HashMap<String, f64>,
    snapshot: BindingSet,
}

impl BindingStates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the live binding set differs from the last snapshot.
    pub fn needs_resync(&self, current: &BindingSet) -> bool {
        *current != self.snapshot
    }

    /// Rebuild the slot map for `current`, preserving surviving slots.
    /// Idempotent: resyncing an unchanged set leaves every value as-is.
    pub fn resync(&mut self, current: &BindingSet) {
        let mut next = HashMap::with_capacity(current.len() + 1);
        for (_, binding) in current.iter() {
            let key = binding.state_key();
            let value = self.states.get(&key).copied().unwrap_or(false);
            next.insert(key, value);
        }
        next.insert(
            HOLDING_KEY.to_string(),
            self.states.get(HOLDING_KEY).copied().unwrap_or(false),
        );

        self.states = next;
        self.snapshot = current.clone();
    }

    /// Whether the slot is asserted. Unknown slots read `false`.
    pub fn get(&self, key: &str) -> bool {
        self.states.get(key).copied().unwrap_or(false)
    }

    pub fn set(&mut self, key: &str, value: bool) {
        self.states.insert(key.to_string(), value);
    }

    /// The global mouse hold-mode toggle.
    pub fn is_holding(&self) -> bool {
        self.get(HOLDING_KEY)
    }

    pub fn set_holding(&mut self, holding: bool) {
        self.set(HOLDING_KEY, holding);
    }

    /// Last throttled-fire time for a slot. Slots that have never
    /// fired read negative infinity so the first activation always
    /// passes the throttle gate.
    pub fn last_fire_ms(&self, key: &str) -> f64 {
        self.last_fire_ms
            .get(key)
            .copied()
            .unwrap_or(f64::NEG_INFINITY)
    }

    pub fn record_fire(&mut self, key: &str, now_ms: f64) {
        self.last_fire_ms.insert(key.to_string(), now_ms);
    }

    /// The binding set the slots were last synced against.
    pub fn snapshot(&self) -> &BindingSet {
        &self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facepilot_gesture_model::Binding;
    use serde_json::json;

    fn binding(device: &str, action: &str) -> Binding {
        let raw = json!([device, action, 0.5, "single"]);
        Binding::from_raw(raw.as_array().unwrap()).unwrap()
    }

    fn set(entries: &[(&str, &str, &str)]) -> BindingSet {
        let mut set = BindingSet::default();
        for (gesture, device, action) in entries {
            set.insert(gesture.to_string(), binding(device, action));
        }
        set
    }

    #[test]
    fn resync_is_idempotent() {
        let bindings = set(&[("jawOpen", "mouse", "left"), ("mouthPucker", "keyboard", "space")]);

        let mut states = BindingStates::new();
        states.resync(&bindings);
        states.set("mouse_left", true);

        states.resync(&bindings);
        assert!(states.get("mouse_left"));
        assert!(!states.get("keyboard_space"));
        assert!(!states.needs_resync(&bindings));
    }

    #[test]
    fn surviving_slots_keep_their_value() {
        let before = set(&[("jawOpen", "mouse", "left"), ("browDownLeft", "mouse", "right")]);
        let after = set(&[("jawOpen", "mouse", "left"), ("mouthPucker", "keyboard", "space")]);

        let mut states = BindingStates::new();
        states.resync(&before);
        states.set("mouse_left", true);
        states.set("mouse_right", true);

        states.resync(&after);
        assert!(states.get("mouse_left"), "held slot survives reconfiguration");
        assert!(!states.get("keyboard_space"), "new slot defaults to false");
        assert!(!states.get("mouse_right"), "dropped slot is gone");
    }

    #[test]
    fn holding_slot_is_preserved_across_resyncs() {
        let mut states = BindingStates::new();
        states.resync(&set(&[("jawOpen", "mouse", "left")]));
        states.set_holding(true);

        states.resync(&set(&[("mouthPucker", "keyboard", "space")]));
        assert!(states.is_holding());
    }

    #[test]
    fn throttle_timestamps_survive_resync() {
        let mut states = BindingStates::new();
        states.resync(&set(&[("mouthPucker", "keyboard", "space")]));
        states.record_fire("keyboard_space", 1234.0);

        states.resync(&set(&[("jawOpen", "mouse", "left")]));
        assert_eq!(states.last_fire_ms("keyboard_space"), 1234.0);
    }

    #[test]
    fn unfired_slot_always_passes_throttle_gate() {
        let states = BindingStates::new();
        assert!(0.0 - states.last_fire_ms("keyboard_space") >= 200.0);
    }

    #[test]
    fn needs_resync_detects_value_changes() {
        let before = set(&[("jawOpen", "mouse", "left")]);
        let mut after = before.clone();
        after.insert("jawOpen".to_string(), binding("mouse", "right"));

        let mut states = BindingStates::new();
        states.resync(&before);
        assert!(states.needs_resync(&after));
    }
}
