//! Recorded gesture frames.
//!
//! One sample per inference frame: elapsed milliseconds plus the full
//! intensity array in vocabulary order. Recordings are stored in
//! append-only JSONL form so replays can drive the dispatcher with
//! the original timing.

use serde::{Deserialize, Serialize};

/// A single per-frame intensity sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSample {
    /// Milliseconds since the recording started.
    #[serde(rename = "t")]
    pub t_ms: f64,

    /// Gesture intensities in vocabulary order.
    pub values: Vec<f32>,
}

impl FrameSample {
    pub fn new(t_ms: f64, values: Vec<f32>) -> Self {
        Self { t_ms, values }
    }
}

/// Parse frames from JSONL content (one JSON object per line).
pub fn parse_frames(jsonl: &str) -> Result<Vec<FrameSample>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize frames to JSONL format.
pub fn serialize_frames(frames: &[FrameSample]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for frame in frames {
        output.push_str(&serde_json::to_string(frame)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_comments_and_blank_lines() {
        let jsonl = "# recorded 2026-08-25\n\n{\"t\":0.0,\"values\":[0.1,0.2]}\n{\"t\":33.3,\"values\":[0.3,0.4]}\n";
        let frames = parse_frames(jsonl).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].t_ms, 33.3);
        assert_eq!(frames[1].values, vec![0.3, 0.4]);
    }

    #[test]
    fn serialized_frames_use_short_timestamp_field() {
        let frames = vec![FrameSample::new(16.7, vec![0.5])];
        let jsonl = serialize_frames(&frames).unwrap();
        assert!(jsonl.contains("\"t\":16.7"));
        let parsed = parse_frames(&jsonl).unwrap();
        assert_eq!(parsed, frames);
    }
}
