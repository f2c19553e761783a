//! Facepilot CLI — gesture-driven mouse and keyboard control.
//!
//! Usage:
//!   facepilot run [OPTIONS]          Drive input from live gesture frames
//!   facepilot simulate <FRAMES>      Replay recorded frames, print events
//!   facepilot validate <PROFILE>     Validate a binding profile
//!   facepilot check                  Check system capabilities

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "facepilot",
    about = "Hands-free mouse and keyboard control from facial gestures",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read gesture frames from stdin and inject input events
    Run {
        /// Binding profile path (defaults to the configured profile)
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Start with mouse buttons in hold mode instead of single-click mode
        #[arg(long)]
        hold: bool,

        /// Profile hot-reload poll interval in milliseconds
        #[arg(long)]
        poll_ms: Option<u64>,

        /// Use the recording virtual backend instead of uinput
        #[arg(long)]
        dry_run: bool,
    },

    /// Replay a recorded frame file through the virtual backend
    Simulate {
        /// Frame file (JSONL, one {"t": ms, "values": [...]} per line)
        frames: PathBuf,

        /// Binding profile path (defaults to the configured profile)
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Write injected events here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Start with mouse buttons in hold mode
        #[arg(long)]
        hold: bool,
    },

    /// Validate a binding profile and print its bindings
    Validate {
        /// Path to the profile document
        profile: PathBuf,
    },

    /// Check system capabilities
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    facepilot_common::logging::init_logging(&facepilot_common::config::LoggingConfig {
        level: log_level.to_string(),
        json: false,
        file: None,
    });

    match cli.command {
        Commands::Run {
            profile,
            hold,
            poll_ms,
            dry_run,
        } => commands::run::run(profile, hold, poll_ms, dry_run).await,
        Commands::Simulate {
            frames,
            profile,
            output,
            hold,
        } => commands::simulate::run(frames, profile, output, hold),
        Commands::Validate { profile } => commands::validate::run(profile),
        Commands::Check => commands::check::run(),
    }
}
