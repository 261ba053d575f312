pub mod config;
pub mod group;
pub mod migrate;
pub mod run;
pub mod show;
pub mod timer;

use std::path::{Path, PathBuf};

use multitimer_core::{DurationValue, TimerDocument};

use crate::config::CliConfig;

/// Resolve the document path from the `--file` override and stored
/// preferences.
pub fn resolve_document(file: Option<&Path>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let config = CliConfig::load()?;
    config.document_path(file)
}

/// Load the document at `path`, or start an empty one if the file does not
/// exist yet.
pub fn load_or_default(path: &Path) -> Result<TimerDocument, Box<dyn std::error::Error>> {
    if path.exists() {
        Ok(TimerDocument::load(path)?)
    } else {
        Ok(TimerDocument::new())
    }
}

/// Accept either a bare number of seconds or an ISO-8601 duration.
pub fn parse_duration_arg(text: &str) -> Result<u64, Box<dyn std::error::Error>> {
    if let Ok(secs) = text.parse::<u64>() {
        return Ok(secs);
    }
    Ok(DurationValue::from_iso(text)?.total_seconds())
}

/// Canonical ISO-8601 rendering for a number of seconds.
pub fn iso(secs: u64) -> String {
    DurationValue::from_total_seconds(secs).iso().to_string()
}

/// Render milliseconds as HH:MM:SS, flooring toward zero.
pub fn format_hms(ms: u64) -> String {
    let total_secs = ms / 1_000;
    let hours = total_secs / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_seconds_and_iso() {
        assert_eq!(parse_duration_arg("90").unwrap(), 90);
        assert_eq!(parse_duration_arg("PT1M30S").unwrap(), 90);
        assert_eq!(parse_duration_arg("PT2H").unwrap(), 7_200);
        assert!(parse_duration_arg("ninety").is_err());
        assert!(parse_duration_arg("P1D").is_err());
    }

    #[test]
    fn renders_canonical_iso() {
        assert_eq!(iso(0), "P");
        assert_eq!(iso(90), "PT1M30S");
        assert_eq!(iso(7_200), "PT2H");
    }

    #[test]
    fn formats_hms() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(999), "00:00:00");
        assert_eq!(format_hms(1_000), "00:00:01");
        assert_eq!(format_hms(61_000), "00:01:01");
        assert_eq!(format_hms(3_600_000), "01:00:00");
        assert_eq!(format_hms(90_061_000), "25:01:01");
    }
}
