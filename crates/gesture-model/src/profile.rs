//! Binding profiles.
//!
//! A profile is the live configuration the dispatcher consumes: two
//! ordered gesture-name → binding maps (mouse and keyboard) and the
//! global hold-trigger threshold. Profiles are edited externally
//! (settings UI, text editor) and re-read between frames; the
//! dispatcher detects changes by structural comparison against its
//! last snapshot, so everything here derives `PartialEq`.

use std::path::Path;
use std::sync::{Arc, Mutex};

use facepilot_common::error::{FacepilotError, FacepilotResult};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::binding::{Binding, Device};

/// A profile shared between the driving loop and whatever edits it.
/// The dispatcher takes one consistent snapshot per frame.
pub type SharedProfile = Arc<Mutex<BindingProfile>>;

fn default_hold_trigger_ms() -> f64 {
    500.0
}

/// The live binding configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingProfile {
    /// Ordered gesture-name → mouse binding entries.
    pub mouse_bindings: Vec<(String, Binding)>,

    /// Ordered gesture-name → keyboard binding entries.
    pub keyboard_bindings: Vec<(String, Binding)>,

    /// How long a single-mode mouse press must stay above threshold
    /// before it is promoted to a hold (ms).
    pub hold_trigger_ms: f64,
}

/// On-disk shape: binding values are raw 4- or 6-element arrays.
#[derive(Deserialize)]
struct RawProfile {
    #[serde(default)]
    mouse_bindings: Map<String, Value>,

    #[serde(default)]
    keyboard_bindings: Map<String, Value>,

    #[serde(default = "default_hold_trigger_ms")]
    hold_trigger_ms: f64,
}

impl Default for BindingProfile {
    fn default() -> Self {
        Self {
            mouse_bindings: vec![],
            keyboard_bindings: vec![],
            hold_trigger_ms: default_hold_trigger_ms(),
        }
    }
}

impl BindingProfile {
    /// Parse and upgrade a profile document.
    pub fn from_json(text: &str) -> FacepilotResult<Self> {
        let raw: RawProfile = serde_json::from_str(text)?;

        Ok(Self {
            mouse_bindings: upgrade_section(&raw.mouse_bindings, Device::Mouse)?,
            keyboard_bindings: upgrade_section(&raw.keyboard_bindings, Device::Keyboard)?,
            hold_trigger_ms: raw.hold_trigger_ms,
        })
    }

    /// Load a profile from disk.
    pub fn load(path: &Path) -> FacepilotResult<Self> {
        if !path.exists() {
            return Err(FacepilotError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serialize back to the current on-disk shape.
    pub fn to_json_pretty(&self) -> FacepilotResult<String> {
        let mut doc = Map::new();
        doc.insert(
            "mouse_bindings".to_string(),
            section_to_value(&self.mouse_bindings),
        );
        doc.insert(
            "keyboard_bindings".to_string(),
            section_to_value(&self.keyboard_bindings),
        );
        doc.insert("hold_trigger_ms".to_string(), Value::from(self.hold_trigger_ms));
        Ok(serde_json::to_string_pretty(&Value::Object(doc))?)
    }

    /// Merge mouse and keyboard bindings into one ordered set: mouse
    /// entries first, and a keyboard entry for an already-present
    /// gesture replaces the value without moving the key.
    pub fn combined(&self) -> BindingSet {
        let mut set = BindingSet::default();
        for (gesture, binding) in self.mouse_bindings.iter().chain(&self.keyboard_bindings) {
            set.insert(gesture.clone(), binding.clone());
        }
        set
    }
}

fn upgrade_section(
    section: &Map<String, Value>,
    expected: Device,
) -> FacepilotResult<Vec<(String, Binding)>> {
    let mut entries = Vec::with_capacity(section.len());
    for (gesture, value) in section {
        let values = value.as_array().ok_or_else(|| {
            FacepilotError::config(format!("binding for {gesture:?} must be an array"))
        })?;
        let binding = Binding::from_raw(values)?;
        if binding.device() != expected {
            return Err(FacepilotError::config(format!(
                "binding for {gesture:?} declares device {:?} in the {} section",
                binding.device().as_str(),
                expected.as_str()
            )));
        }
        entries.push((gesture.clone(), binding));
    }
    Ok(entries)
}

fn section_to_value(entries: &[(String, Binding)]) -> Value {
    let mut map = Map::new();
    for (gesture, binding) in entries {
        map.insert(gesture.clone(), Value::Array(binding.to_raw()));
    }
    Value::Object(map)
}

/// The merged, ordered gesture-name → binding mapping the dispatcher
/// iterates each frame. Also serves as the resync snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BindingSet {
    entries: Vec<(String, Binding)>,
}

impl BindingSet {
    /// Insert with dict-merge semantics: replacing an existing gesture
    /// keeps its original position.
    pub fn insert(&mut self, gesture: String, binding: Binding) {
        match self.entries.iter_mut().find(|(name, _)| *name == gesture) {
            Some((_, existing)) => *existing = binding,
            None => self.entries.push((gesture, binding)),
        }
    }

    /// Entries in iteration order.
    pub fn iter(&self) -> impl Iterator<Item = &(String, Binding)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{BindingAction, TriggerMode};

    const PROFILE: &str = r#"{
        "mouse_bindings": {
            "jawOpen": ["mouse", "left", 0.3, "single"],
            "browInnerUp": ["mouse", "pause", 0.6, "single"]
        },
        "keyboard_bindings": {
            "mouthPucker": ["keyboard", "space", 0.5, "hold", "false", 150.0]
        },
        "hold_trigger_ms": 750.0
    }"#;

    #[test]
    fn parses_mixed_legacy_and_current_tuples() {
        let profile = BindingProfile::from_json(PROFILE).unwrap();
        assert_eq!(profile.mouse_bindings.len(), 2);
        assert_eq!(profile.keyboard_bindings.len(), 1);
        assert_eq!(profile.hold_trigger_ms, 750.0);

        let (_, space) = &profile.keyboard_bindings[0];
        assert_eq!(space.action, BindingAction::Key("space".to_string()));
        assert!(!space.hold);
        assert_eq!(space.throttle_ms, 150.0);
    }

    #[test]
    fn hold_trigger_defaults_when_absent() {
        let profile = BindingProfile::from_json(r#"{"mouse_bindings": {}}"#).unwrap();
        assert_eq!(profile.hold_trigger_ms, 500.0);
    }

    #[test]
    fn section_device_mismatch_is_rejected() {
        let result = BindingProfile::from_json(
            r#"{"mouse_bindings": {"jawOpen": ["keyboard", "a", 0.3, "single"]}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn combined_preserves_mouse_then_keyboard_order() {
        let profile = BindingProfile::from_json(PROFILE).unwrap();
        let set = profile.combined();
        let order: Vec<&str> = set.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(order, ["jawOpen", "browInnerUp", "mouthPucker"]);
    }

    #[test]
    fn keyboard_entry_overrides_mouse_entry_in_place() {
        let profile = BindingProfile::from_json(
            r#"{
                "mouse_bindings": {
                    "jawOpen": ["mouse", "left", 0.3, "single"],
                    "browDownLeft": ["mouse", "right", 0.4, "single"]
                },
                "keyboard_bindings": {
                    "jawOpen": ["keyboard", "space", 0.5, "hold"]
                }
            }"#,
        )
        .unwrap();

        let set = profile.combined();
        let order: Vec<&str> = set.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(order, ["jawOpen", "browDownLeft"]);

        let (_, jaw) = set.iter().next().unwrap();
        assert_eq!(jaw.action, BindingAction::Key("space".to_string()));
    }

    #[test]
    fn snapshot_equality_is_structural() {
        let a = BindingProfile::from_json(PROFILE).unwrap();
        let b = BindingProfile::from_json(PROFILE).unwrap();
        assert_eq!(a.combined(), b.combined());

        let mut c = b.clone();
        c.mouse_bindings[0].1.threshold = 0.9;
        assert_ne!(a.combined(), c.combined());
    }

    #[test]
    fn to_json_round_trips() {
        let profile = BindingProfile::from_json(PROFILE).unwrap();
        let reparsed = BindingProfile::from_json(&profile.to_json_pretty().unwrap()).unwrap();
        assert_eq!(profile, reparsed);
        // mode strings survive the upgrade
        assert_eq!(reparsed.mouse_bindings[0].1.mode, TriggerMode::Single);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn any_binding() -> Binding {
            Binding::from_raw(
                serde_json::json!(["mouse", "left", 0.5, "single"])
                    .as_array()
                    .unwrap(),
            )
            .unwrap()
        }

        proptest! {
            /// Any insertion sequence, however many collisions, yields
            /// unique gesture keys in first-occurrence order.
            #[test]
            fn merge_keeps_first_occurrence_order(
                names in prop::collection::vec("[a-d]", 1..30)
            ) {
                let mut set = BindingSet::default();
                for name in &names {
                    set.insert(name.clone(), any_binding());
                }

                let keys: Vec<&str> = set.iter().map(|(name, _)| name.as_str()).collect();
                let mut expected: Vec<&str> = vec![];
                for name in &names {
                    if !expected.contains(&name.as_str()) {
                        expected.push(name.as_str());
                    }
                }
                prop_assert_eq!(keys, expected);
            }
        }
    }
}
