//! Validate a binding profile.

use std::path::PathBuf;

use anyhow::Context;

use facepilot_gesture_model::{Binding, BindingProfile, Device, GestureVocabulary};

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let profile = BindingProfile::load(&path)
        .with_context(|| format!("loading profile {}", path.display()))?;

    println!("Profile: {}", path.display());
    println!("  Hold trigger: {} ms", profile.hold_trigger_ms);
    println!();

    println!("Mouse bindings ({}):", profile.mouse_bindings.len());
    for (gesture, binding) in &profile.mouse_bindings {
        print_binding(gesture, binding);
    }
    println!();
    println!("Keyboard bindings ({}):", profile.keyboard_bindings.len());
    for (gesture, binding) in &profile.keyboard_bindings {
        print_binding(gesture, binding);
    }

    let vocabulary = GestureVocabulary::mediapipe();
    let mut warnings = 0usize;
    for (gesture, _) in profile
        .mouse_bindings
        .iter()
        .chain(&profile.keyboard_bindings)
    {
        if !vocabulary.contains(gesture) {
            println!("[WARN] Unknown gesture {gesture:?} — this binding will never fire");
            warnings += 1;
        }
    }
    for (gesture, _) in &profile.keyboard_bindings {
        if profile.mouse_bindings.iter().any(|(name, _)| name == gesture) {
            println!(
                "[WARN] Gesture {gesture:?} is bound in both sections — the keyboard binding wins"
            );
            warnings += 1;
        }
    }

    println!();
    let combined = profile.combined();
    if warnings == 0 {
        println!("Profile is valid: {} effective bindings.", combined.len());
    } else {
        println!(
            "Profile is valid with {warnings} warning(s): {} effective bindings.",
            combined.len()
        );
    }
    Ok(())
}

fn print_binding(gesture: &str, binding: &Binding) {
    match binding.device() {
        Device::Mouse => println!(
            "  {gesture} -> {} (threshold {}, mode {})",
            binding.action_name(),
            binding.threshold,
            binding.mode.as_str()
        ),
        Device::Keyboard => println!(
            "  {gesture} -> {} (threshold {}, {})",
            binding.action_name(),
            binding.threshold,
            if binding.hold {
                "hold".to_string()
            } else {
                format!("throttled every {} ms", binding.throttle_ms)
            }
        ),
    }
}
