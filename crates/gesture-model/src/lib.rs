//! Facepilot Gesture Model
//!
//! Data model for mapping facial-gesture intensities to input
//! actions:
//!
//! - **Vocabulary:** the fixed, ordered list of blendshape names the
//!   face tracker reports, and the name-to-index table used to read a
//!   gesture's intensity out of a frame.
//! - **Bindings:** typed binding records, upgraded once at load time
//!   from the raw 4- or 6-element profile tuples.
//! - **Profiles:** the ordered mouse/keyboard binding maps plus the
//!   global hold-trigger threshold, with snapshot comparison for hot
//!   reload.
//! - **Frames:** recorded per-frame intensity samples in JSONL form
//!   for offline replay.

pub mod binding;
pub mod frames;
pub mod profile;
pub mod vocabulary;

pub use binding::{Binding, BindingAction, Device, MouseAction, TriggerMode};
pub use frames::FrameSample;
pub use profile::{BindingProfile, BindingSet, SharedProfile};
pub use vocabulary::{GestureVocabulary, MEDIAPIPE_BLENDSHAPES};
