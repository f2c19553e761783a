//! Check whether this machine can run Facepilot.

use facepilot_platform_core::virtual_desktop_bounds;
use facepilot_platform_linux::{
    detect_display_server, detect_monitors, permissions, DisplayServer,
};

pub fn run() -> anyhow::Result<()> {
    let session = match detect_display_server() {
        DisplayServer::Wayland => "Wayland",
        DisplayServer::X11 => "X11",
        DisplayServer::Unknown => "none detected",
    };
    println!("Session:         {session}");

    let monitors = detect_monitors()?;
    let (x, y, width, height) = virtual_desktop_bounds(&monitors);
    println!(
        "Virtual desktop: {width}x{height} at ({x}, {y}), {} monitor(s)",
        monitors.len()
    );
    for (i, m) in monitors.iter().enumerate() {
        println!(
            "  [{i}] {} {}x{}+{}+{}{}",
            m.name,
            m.width,
            m.height,
            m.x,
            m.y,
            if m.primary { " (primary)" } else { "" }
        );
    }
    println!();

    let capabilities = permissions::check_capabilities();
    permissions::print_capability_report(&capabilities);

    let missing: Vec<&str> = capabilities
        .iter()
        .filter(|c| c.required && !c.available)
        .map(|c| c.name.as_str())
        .collect();

    println!();
    if missing.is_empty() {
        println!("Ready: input injection is available.");
    } else {
        println!("Not ready: missing {}. See fixes above.", missing.join(", "));
    }

    Ok(())
}
