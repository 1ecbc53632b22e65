use std::path::Path;
use std::process::Command;

use serde::Deserialize;

use reel_core::{Duration, ReelError, ReelResult};

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Measure an audio file's duration with ffprobe.
pub fn probe_duration(ffprobe: &str, path: &Path) -> ReelResult<Duration> {
    if !path.exists() {
        return Err(ReelError::synthesis(format!(
            "audio file not found: {}",
            path.display()
        )));
    }

    let output = Command::new(ffprobe)
        .args(["-v", "quiet", "-print_format", "json", "-show_format"])
        .arg(path)
        .output()
        .map_err(|e| ReelError::synthesis_with(format!("failed to run {}", ffprobe), e))?;

    if !output.status.success() {
        return Err(ReelError::synthesis(format!(
            "{} failed: {}",
            ffprobe,
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    parse_probe_output(&String::from_utf8_lossy(&output.stdout))
}

fn parse_probe_output(json: &str) -> ReelResult<Duration> {
    let parsed: ProbeOutput = serde_json::from_str(json)
        .map_err(|e| ReelError::synthesis_with("failed to parse ffprobe output", e))?;
    let seconds: f64 = parsed
        .format
        .and_then(|f| f.duration)
        .and_then(|d| d.parse().ok())
        .ok_or_else(|| ReelError::synthesis("ffprobe reported no duration"))?;
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(ReelError::synthesis(format!(
            "audio has unusable duration {}",
            seconds
        )));
    }
    Ok(Duration::from_seconds(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        let json = r#"{"format": {"filename": "voice.mp3", "duration": "2.208000", "size": "35712"}}"#;
        let d = parse_probe_output(json).unwrap();
        assert!(d.approx_eq(Duration::from_seconds(2.208), 1e-9));
    }

    #[test]
    fn test_missing_duration() {
        assert!(parse_probe_output(r#"{"format": {}}"#).is_err());
        assert!(parse_probe_output(r#"{}"#).is_err());
    }

    #[test]
    fn test_zero_duration_rejected() {
        assert!(parse_probe_output(r#"{"format": {"duration": "0.000000"}}"#).is_err());
    }

    #[test]
    fn test_garbage_output() {
        let err = parse_probe_output("not json").unwrap_err();
        assert!(matches!(err, ReelError::Synthesis { .. }));
    }

    #[test]
    fn test_missing_file() {
        assert!(probe_duration("ffprobe", Path::new("/nonexistent/voice.mp3")).is_err());
    }
}
