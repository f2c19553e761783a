//! Display/monitor detection.

use facepilot_common::error::FacepilotResult;
use facepilot_platform_core::MonitorInfo;

/// Detect connected monitors.
///
/// On X11 sessions this shells out to `xrandr --listmonitors`; when
/// that is unavailable (Wayland without xrandr, headless), a single
/// 1920x1080 monitor is reported so cursor actions always have a
/// target.
pub fn detect_monitors() -> FacepilotResult<Vec<MonitorInfo>> {
    tracing::debug!("Detecting monitors");

    if std::env::var("DISPLAY").is_ok() {
        match query_xrandr() {
            Ok(monitors) if !monitors.is_empty() => return Ok(monitors),
            Ok(_) => tracing::warn!("xrandr reported no monitors, using fallback"),
            Err(e) => tracing::warn!(error = %e, "xrandr query failed, using fallback"),
        }
    }

    Ok(vec![fallback_monitor()])
}

fn fallback_monitor() -> MonitorInfo {
    MonitorInfo {
        name: "default".to_string(),
        width: 1920,
        height: 1080,
        x: 0,
        y: 0,
        scale_factor: 1.0,
        primary: true,
    }
}

fn query_xrandr() -> std::io::Result<Vec<MonitorInfo>> {
    let output = std::process::Command::new("xrandr")
        .arg("--listmonitors")
        .output()?;
    if !output.status.success() {
        return Err(std::io::Error::other(format!(
            "xrandr exited with {}",
            output.status
        )));
    }
    Ok(parse_listmonitors(&String::from_utf8_lossy(&output.stdout)))
}

/// Parse `xrandr --listmonitors` output, e.g.:
///
/// ```text
/// Monitors: 2
///  0: +*eDP-1 1920/344x1080/194+0+0  eDP-1
///  1: +HDMI-1 2560/597x1440/336+1920+0  HDMI-1
/// ```
pub fn parse_listmonitors(output: &str) -> Vec<MonitorInfo> {
    let mut monitors = vec![];

    for line in output.lines().skip(1) {
        let mut fields = line.split_whitespace();
        let Some(_index) = fields.next() else { continue };
        let Some(flags) = fields.next() else { continue };
        let Some(geometry) = fields.next() else { continue };
        let name = fields.next().unwrap_or("unknown").to_string();

        let Some((width, height, x, y)) = parse_geometry(geometry) else {
            tracing::warn!(geometry, "Unparseable monitor geometry");
            continue;
        };

        monitors.push(MonitorInfo {
            name,
            width,
            height,
            x,
            y,
            scale_factor: 1.0,
            primary: flags.contains('*'),
        });
    }

    monitors
}

/// Parse a geometry token like `1920/344x1080/194+0+0` into
/// `(width, height, x, y)`. Offsets may be negative (`+-1920+0`).
fn parse_geometry(token: &str) -> Option<(u32, u32, i32, i32)> {
    let mut parts = token.split('+');
    let dims = parts.next()?;
    let x: i32 = parts.next()?.parse().ok()?;
    let y: i32 = parts.next()?.parse().ok()?;

    let (w_part, h_part) = dims.split_once('x')?;
    let width: u32 = w_part.split('/').next()?.parse().ok()?;
    let height: u32 = h_part.split('/').next()?.parse().ok()?;

    Some((width, height, x, y))
}

/// Detect the current display server.
pub fn detect_display_server() -> DisplayServer {
    if std::env::var("WAYLAND_DISPLAY").is_ok() {
        DisplayServer::Wayland
    } else if std::env::var("DISPLAY").is_ok() {
        DisplayServer::X11
    } else {
        DisplayServer::Unknown
    }
}

/// Display server type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayServer {
    Wayland,
    X11,
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dual_monitor_listing() {
        let output = "Monitors: 2\n 0: +*eDP-1 1920/344x1080/194+0+0  eDP-1\n 1: +HDMI-1 2560/597x1440/336+1920+0  HDMI-1\n";
        let monitors = parse_listmonitors(output);

        assert_eq!(monitors.len(), 2);
        assert_eq!(monitors[0].name, "eDP-1");
        assert_eq!(monitors[0].width, 1920);
        assert!(monitors[0].primary);
        assert_eq!(monitors[1].x, 1920);
        assert_eq!(monitors[1].height, 1440);
        assert!(!monitors[1].primary);
    }

    #[test]
    fn parses_negative_offsets() {
        let output = "Monitors: 1\n 0: +*DP-1 1920/344x1080/194+-1920+0  DP-1\n";
        let monitors = parse_listmonitors(output);
        assert_eq!(monitors.len(), 1);
        assert_eq!(monitors[0].x, -1920);
    }

    #[test]
    fn skips_malformed_lines() {
        let output = "Monitors: 1\n garbage line\n";
        assert!(parse_listmonitors(output).is_empty());
    }
}
