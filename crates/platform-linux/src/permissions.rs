//! Permission detection and guidance for Linux.
//!
//! Facepilot injects input through a uinput virtual device, which
//! requires write access to `/dev/uinput`.

/// A system capability that Facepilot may need.
#[derive(Debug, Clone)]
pub struct Capability {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub required: bool,
    pub fix_instructions: Option<String>,
}

/// Check all capabilities and report status.
pub fn check_capabilities() -> Vec<Capability> {
    vec![
        check_uinput_access(),
        check_display_session(),
        check_xrandr(),
    ]
}

/// Check write access to the uinput device.
fn check_uinput_access() -> Capability {
    let available = std::fs::OpenOptions::new()
        .write(true)
        .open("/dev/uinput")
        .is_ok();

    Capability {
        name: "uinput device".to_string(),
        description: "Virtual input device for mouse/keyboard injection".to_string(),
        available,
        required: true,
        fix_instructions: if !available {
            Some(format!(
                "{}; load the module (sudo modprobe uinput) and grant access: \
                 sudo usermod -aG input $USER plus a udev rule such as \
                 KERNEL==\"uinput\", GROUP=\"input\", MODE=\"0660\", then log out/in",
                uinput_diagnostic()
            ))
        } else {
            None
        },
    }
}

/// Who we are vs. who owns the device, so the fix output says exactly
/// which group membership is missing.
#[cfg(target_os = "linux")]
fn uinput_diagnostic() -> String {
    use std::os::unix::fs::MetadataExt;

    let path = "/dev/uinput";
    let uid = unsafe { libc::geteuid() };
    let gid = unsafe { libc::getegid() };

    match std::fs::metadata(path) {
        Ok(meta) => {
            let mode = meta.mode() & 0o777;
            format!(
                "device={path} mode={mode:o} owner_uid={} owner_gid={} process_uid={uid} process_gid={gid}",
                meta.uid(),
                meta.gid()
            )
        }
        Err(err) => {
            format!("device={path} unavailable ({err}) process_uid={uid} process_gid={gid}")
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn uinput_diagnostic() -> String {
    "uinput is only available on Linux".to_string()
}

/// Check for a graphical session (monitor geometry queries).
fn check_display_session() -> Capability {
    let available = std::env::var("WAYLAND_DISPLAY").is_ok() || std::env::var("DISPLAY").is_ok();

    Capability {
        name: "Display session".to_string(),
        description: "Graphical session for monitor geometry detection".to_string(),
        available,
        required: false,
        fix_instructions: if !available {
            Some(
                "Run inside a desktop session; without one a single 1920x1080 monitor is assumed"
                    .to_string(),
            )
        } else {
            None
        },
    }
}

/// Check that xrandr is on PATH for multi-monitor layouts.
fn check_xrandr() -> Capability {
    let available = std::process::Command::new("xrandr")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false);

    Capability {
        name: "xrandr".to_string(),
        description: "Monitor layout query for multi-monitor cursor actions".to_string(),
        available,
        required: false,
        fix_instructions: if !available {
            Some("Install x11-xserver-utils (or your distro's xrandr package)".to_string())
        } else {
            None
        },
    }
}

/// Print a human-readable capability report.
pub fn print_capability_report(capabilities: &[Capability]) {
    println!("Capability report:");
    for cap in capabilities {
        let status = if cap.available {
            "[OK]  "
        } else if cap.required {
            "[FAIL]"
        } else {
            "[WARN]"
        };
        println!("{} {} — {}", status, cap.name, cap.description);
        if let Some(fix) = &cap.fix_instructions {
            println!("       Fix: {fix}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_set_covers_injection_session_and_layout() {
        let caps = check_capabilities();
        let names: Vec<&str> = caps.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["uinput device", "Display session", "xrandr"]);
        assert_eq!(caps.iter().filter(|c| c.required).count(), 1);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn uinput_diagnostic_names_device_and_process_ids() {
        let diag = uinput_diagnostic();
        assert!(diag.contains("device=/dev/uinput"));
        assert!(diag.contains("process_uid="));
    }
}
