//! Live dispatch: gesture frames in on stdin, input events out.
//!
//! Each stdin line is a JSON array of blendshape intensities in the
//! standard order, one line per inference frame. Blank lines and lines
//! starting with `#` are skipped. The binding profile is polled for
//! changes and hot-reloaded without interrupting dispatch.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};

use facepilot_common::config::AppConfig;
use facepilot_gesture_model::{BindingProfile, SharedProfile, MEDIAPIPE_BLENDSHAPES};
use facepilot_keybinder::{ActivityFlag, Keybinder};
use facepilot_platform_core::{InputPlatform, VirtualPlatform};

pub async fn run(
    profile_path: Option<PathBuf>,
    hold: bool,
    poll_ms: Option<u64>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let config = AppConfig::load();
    let profile_path = profile_path.unwrap_or(config.profile_path);
    let poll_ms = poll_ms.unwrap_or(config.dispatch.profile_poll_ms);

    let profile = BindingProfile::load(&profile_path)
        .with_context(|| format!("loading profile {}", profile_path.display()))?;
    let shared: SharedProfile = Arc::new(Mutex::new(profile));
    let mut profile_mtime = file_mtime(&profile_path);

    let platform = select_platform(dry_run);
    let mut keybinder = Keybinder::new(platform, shared.clone(), ActivityFlag::new(true));
    keybinder.start()?;
    keybinder.set_hold_mode(hold);

    println!("Reading gesture frames from stdin (backend: {})", keybinder.platform_name());
    println!("Press Ctrl+C to stop...");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut poll = tokio::time::interval(std::time::Duration::from_millis(poll_ms.max(1)));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    continue;
                }
                match parse_frame(trimmed) {
                    Ok(frame) => {
                        if let Err(e) = keybinder.dispatch(&frame) {
                            tracing::warn!(error = %e, "Frame dispatch failed");
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "Skipping unparseable frame"),
                }
            }
            _ = poll.tick() => {
                reload_if_changed(&profile_path, &shared, &mut profile_mtime);
            }
            _ = &mut ctrl_c => {
                println!();
                tracing::info!("Interrupted, shutting down");
                break;
            }
        }
    }

    keybinder.shutdown()?;
    Ok(())
}

fn select_platform(dry_run: bool) -> Box<dyn InputPlatform> {
    if dry_run {
        tracing::info!("Using virtual backend (dry run)");
        return Box::new(VirtualPlatform::new());
    }

    #[cfg(target_os = "linux")]
    {
        use facepilot_platform_linux::UinputPlatform;
        if UinputPlatform::is_supported() {
            match UinputPlatform::new() {
                Ok(backend) => {
                    tracing::info!("Using uinput backend");
                    return Box::new(backend);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to initialize uinput backend, using virtual");
                }
            }
        } else {
            tracing::warn!(
                "/dev/uinput is not writable, using virtual backend — no real input will be injected. \
                 Run `facepilot check` for fixes"
            );
        }
    }

    #[cfg(not(target_os = "linux"))]
    tracing::warn!("No native backend for this platform, using virtual backend");

    Box::new(VirtualPlatform::new())
}

fn parse_frame(line: &str) -> anyhow::Result<Vec<f32>> {
    let frame: Vec<f32> = serde_json::from_str(line)?;
    if frame.len() < MEDIAPIPE_BLENDSHAPES.len() {
        anyhow::bail!(
            "frame has {} values, expected {}",
            frame.len(),
            MEDIAPIPE_BLENDSHAPES.len()
        );
    }
    Ok(frame)
}

fn file_mtime(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Reload the profile if its mtime moved. Parse failures keep the
/// previous profile in place.
fn reload_if_changed(path: &Path, shared: &SharedProfile, last_mtime: &mut Option<SystemTime>) {
    let mtime = file_mtime(path);
    if mtime == *last_mtime {
        return;
    }
    *last_mtime = mtime;

    match BindingProfile::load(path) {
        Ok(profile) => {
            let bindings = profile.combined().len();
            *shared.lock().unwrap_or_else(PoisonError::into_inner) = profile;
            tracing::info!(bindings, path = %path.display(), "Profile reloaded");
        }
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "Profile reload failed, keeping previous bindings");
        }
    }
}
