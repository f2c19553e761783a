//! Replay recorded gesture frames through the virtual backend.
//!
//! Reads a JSONL frame file, dispatches every sample at its recorded
//! timestamp, and prints the injected events as JSONL. Nothing touches
//! the real mouse or keyboard, so a profile can be exercised against a
//! captured session before being trusted live.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context;

use facepilot_common::config::AppConfig;
use facepilot_common::error::FacepilotResult;
use facepilot_gesture_model::{BindingProfile, MEDIAPIPE_BLENDSHAPES};
use facepilot_keybinder::{ActivityFlag, Keybinder};
use facepilot_platform_core::{
    InjectedEvent, InputPlatform, MonitorInfo, MouseButton, VirtualPlatform,
};

/// Delegating handle so the recorded events stay reachable after the
/// backend is boxed into the keybinder.
#[derive(Clone)]
struct Recorder(Arc<Mutex<VirtualPlatform>>);

impl Recorder {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(VirtualPlatform::new())))
    }

    fn take_events(&self) -> Vec<InjectedEvent> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take_events()
    }

    fn inner(&self) -> std::sync::MutexGuard<'_, VirtualPlatform> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl InputPlatform for Recorder {
    fn pointer_position(&mut self) -> FacepilotResult<(i32, i32)> {
        self.inner().pointer_position()
    }

    fn move_to(&mut self, x: i32, y: i32) -> FacepilotResult<()> {
        self.inner().move_to(x, y)
    }

    fn mouse_down(&mut self, button: MouseButton) -> FacepilotResult<()> {
        self.inner().mouse_down(button)
    }

    fn mouse_up(&mut self, button: MouseButton) -> FacepilotResult<()> {
        self.inner().mouse_up(button)
    }

    fn click(&mut self, button: MouseButton) -> FacepilotResult<()> {
        self.inner().click(button)
    }

    fn key_down(&mut self, key: &str) -> FacepilotResult<()> {
        self.inner().key_down(key)
    }

    fn key_up(&mut self, key: &str) -> FacepilotResult<()> {
        self.inner().key_up(key)
    }

    fn key_press(&mut self, key: &str) -> FacepilotResult<()> {
        self.inner().key_press(key)
    }

    fn screen_size(&mut self) -> FacepilotResult<(u32, u32)> {
        self.inner().screen_size()
    }

    fn monitors(&mut self) -> FacepilotResult<Vec<MonitorInfo>> {
        self.inner().monitors()
    }

    fn name(&self) -> &str {
        "virtual"
    }
}

pub fn run(
    frames_path: PathBuf,
    profile_path: Option<PathBuf>,
    output: Option<PathBuf>,
    hold: bool,
) -> anyhow::Result<()> {
    let profile_path = profile_path.unwrap_or_else(|| AppConfig::load().profile_path);
    let profile = BindingProfile::load(&profile_path)
        .with_context(|| format!("loading profile {}", profile_path.display()))?;

    let text = std::fs::read_to_string(&frames_path)
        .with_context(|| format!("reading frames {}", frames_path.display()))?;
    let frames = facepilot_gesture_model::frames::parse_frames(&text)
        .with_context(|| format!("parsing frames {}", frames_path.display()))?;

    for (i, frame) in frames.iter().enumerate() {
        anyhow::ensure!(
            frame.values.len() >= MEDIAPIPE_BLENDSHAPES.len(),
            "frame {} has {} values, expected {}",
            i,
            frame.values.len(),
            MEDIAPIPE_BLENDSHAPES.len()
        );
    }

    let recorder = Recorder::new();
    let mut keybinder = Keybinder::new(
        Box::new(recorder.clone()),
        Arc::new(Mutex::new(profile)),
        ActivityFlag::new(true),
    );
    keybinder.start()?;
    keybinder.set_hold_mode(hold);

    let total = frames.len();
    for frame in &frames {
        if let Err(e) = keybinder.dispatch_at(&frame.values, frame.t_ms) {
            tracing::warn!(t_ms = frame.t_ms, error = %e, "Frame dispatch failed");
        }
    }
    keybinder.shutdown()?;

    let events = recorder.take_events();
    let mut out = String::new();
    for event in &events {
        out.push_str(&serde_json::to_string(event)?);
        out.push('\n');
    }

    match output {
        Some(path) => {
            std::fs::write(&path, out)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Replayed {total} frames, {} events -> {}", events.len(), path.display());
        }
        None => print!("{out}"),
    }

    Ok(())
}
