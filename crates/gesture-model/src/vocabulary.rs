//! The recognized gesture vocabulary.
//!
//! The face tracker reports one intensity per blendshape per frame,
//! in a fixed order. The vocabulary owns that order and the
//! name-to-index table; bindings referring to names outside the
//! vocabulary are skipped by the dispatcher.

use std::collections::HashMap;

/// Blendshape names in the order the MediaPipe face landmarker
/// reports them. Index in this slice == index in a frame's intensity
/// array.
pub const MEDIAPIPE_BLENDSHAPES: [&str; 52] = [
    "_neutral",
    "browDownLeft",
    "browDownRight",
    "browInnerUp",
    "browOuterUpLeft",
    "browOuterUpRight",
    "cheekPuff",
    "cheekSquintLeft",
    "cheekSquintRight",
    "eyeBlinkLeft",
    "eyeBlinkRight",
    "eyeLookDownLeft",
    "eyeLookDownRight",
    "eyeLookInLeft",
    "eyeLookInRight",
    "eyeLookOutLeft",
    "eyeLookOutRight",
    "eyeLookUpLeft",
    "eyeLookUpRight",
    "eyeSquintLeft",
    "eyeSquintRight",
    "eyeWideLeft",
    "eyeWideRight",
    "jawForward",
    "jawLeft",
    "jawOpen",
    "jawRight",
    "mouthClose",
    "mouthDimpleLeft",
    "mouthDimpleRight",
    "mouthFrownLeft",
    "mouthFrownRight",
    "mouthFunnel",
    "mouthLeft",
    "mouthLowerDownLeft",
    "mouthLowerDownRight",
    "mouthPressLeft",
    "mouthPressRight",
    "mouthPucker",
    "mouthRight",
    "mouthRollLower",
    "mouthRollUpper",
    "mouthShrugLower",
    "mouthShrugUpper",
    "mouthSmileLeft",
    "mouthSmileRight",
    "mouthStretchLeft",
    "mouthStretchRight",
    "mouthUpperUpLeft",
    "mouthUpperUpRight",
    "noseSneerLeft",
    "noseSneerRight",
];

/// An ordered gesture vocabulary with a name-to-index lookup table.
#[derive(Debug, Clone)]
pub struct GestureVocabulary {
    names: Vec<String>,
    indices: HashMap<String, usize>,
}

impl GestureVocabulary {
    /// The standard MediaPipe face-blendshape vocabulary.
    pub fn mediapipe() -> Self {
        Self::from_names(MEDIAPIPE_BLENDSHAPES.iter().copied())
    }

    /// Build a vocabulary from an ordered list of names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let indices = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self { names, indices }
    }

    /// Index of a gesture name in the per-frame intensity array.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    /// Whether the vocabulary recognizes this gesture name.
    pub fn contains(&self, name: &str) -> bool {
        self.indices.contains_key(name)
    }

    /// Ordered gesture names.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of gestures in the vocabulary (== expected frame length).
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for GestureVocabulary {
    fn default() -> Self {
        Self::mediapipe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mediapipe_vocabulary_has_52_entries() {
        let vocab = GestureVocabulary::mediapipe();
        assert_eq!(vocab.len(), 52);
        assert_eq!(vocab.names()[0], "_neutral");
        assert_eq!(vocab.names()[51], "noseSneerRight");
    }

    #[test]
    fn index_lookup_matches_order() {
        let vocab = GestureVocabulary::mediapipe();
        assert_eq!(vocab.index_of("jawOpen"), Some(25));
        assert_eq!(vocab.index_of("browInnerUp"), Some(3));
        assert_eq!(vocab.index_of("notAGesture"), None);
    }

    #[test]
    fn custom_vocabulary_indexes_in_insertion_order() {
        let vocab = GestureVocabulary::from_names(["a", "b", "c"]);
        assert_eq!(vocab.index_of("b"), Some(1));
        assert!(vocab.contains("c"));
        assert!(!vocab.contains("d"));
    }
}
