//! Timer document persistence.
//!
//! Documents are pretty-printed JSON with kebab-case keys; durations are
//! written as ISO-8601 period text. Each file carries a format version so
//! newer files are refused instead of misread. The conventional file
//! extension is `.timers`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::Context;
use crate::error::{Result, StorageError};
use crate::group::TimerGroup;
use crate::timer::{Timer, TimerSettings};

/// Version written to new documents; loading refuses anything newer.
pub const FORMAT_VERSION: u32 = 0;

/// Conventional extension for timer documents (without the dot).
pub const FILE_EXTENSION: &str = "timers";

/// On-disk form of a timer group: group settings plus one record per timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TimerDocument {
    #[serde(default)]
    pub format_version: u32,
    #[serde(default)]
    pub delay_start: bool,
    #[serde(default)]
    pub minutes_offset: u8,
    #[serde(default)]
    pub timers: Vec<TimerSettings>,
}

impl Default for TimerDocument {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            delay_start: false,
            minutes_offset: 0,
            timers: Vec::new(),
        }
    }
}

impl TimerDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a document. Files written by a newer release are refused;
    /// older files load and should then be run through [`migrate`].
    ///
    /// [`migrate`]: TimerDocument::migrate
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| StorageError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let document: TimerDocument =
            serde_json::from_str(&text).map_err(|e| StorageError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        if document.format_version > FORMAT_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: document.format_version,
                supported: FORMAT_VERSION,
            }
            .into());
        }
        debug!(path = %path.display(), timers = document.timers.len(), "loaded document");
        Ok(document)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).map_err(|e| StorageError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        fs::write(path, text).map_err(|e| StorageError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), "saved document");
        Ok(())
    }

    /// Written by an older release than this one?
    pub fn is_outdated(&self) -> bool {
        self.format_version < FORMAT_VERSION
    }

    /// Bring an older document up to the current format. Returns whether
    /// anything changed.
    pub fn migrate(&mut self) -> bool {
        if self.format_version >= FORMAT_VERSION {
            return false;
        }
        // TODO: apply per-version upgrade steps here once version 1 exists;
        // for now stamping the version is the whole migration.
        self.format_version = FORMAT_VERSION;
        true
    }

    /// Capture a live group's configuration.
    pub fn from_group(group: &TimerGroup) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            delay_start: group.delay_start(),
            minutes_offset: group.minutes_offset(),
            timers: group.timers().iter().map(Timer::settings).collect(),
        }
    }

    /// Build a live group from this document.
    pub fn build_group(&self, ctx: &Context) -> Result<TimerGroup> {
        let group = TimerGroup::new(ctx);
        group.set_delay_start(self.delay_start)?;
        group.set_minutes_offset(self.minutes_offset)?;
        for settings in &self.timers {
            group.add(&Timer::from_settings(ctx, settings))?;
        }
        Ok(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::scheduler::Scheduler;
    use std::sync::Arc;

    fn sample() -> TimerDocument {
        TimerDocument {
            format_version: FORMAT_VERSION,
            delay_start: true,
            minutes_offset: 15,
            timers: vec![
                TimerSettings {
                    name: "tea".into(),
                    interval: 180,
                    warn_after: 150,
                    repeat: false,
                },
                TimerSettings {
                    name: "eggs".into(),
                    interval: 420,
                    warn_after: 0,
                    repeat: true,
                },
            ],
        }
    }

    #[test]
    fn documents_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kitchen.timers");
        let document = sample();
        document.save(&path).unwrap();
        let loaded = TimerDocument::load(&path).unwrap();
        assert_eq!(loaded, document);
    }

    #[test]
    fn keys_are_kebab_case() {
        let json = serde_json::to_string_pretty(&sample()).unwrap();
        assert!(json.contains("\"format-version\""));
        assert!(json.contains("\"delay-start\""));
        assert!(json.contains("\"minutes-offset\""));
        assert!(json.contains("\"warn-after\""));
    }

    #[test]
    fn missing_fields_default() {
        let document: TimerDocument =
            serde_json::from_str("{\"timers\":[{\"name\":\"bare\"}]}").unwrap();
        assert_eq!(document.format_version, 0);
        assert!(!document.delay_start);
        assert_eq!(document.timers[0].interval, 0);
        assert!(!document.timers[0].repeat);
    }

    #[test]
    fn durations_persist_as_iso_text() {
        let json = serde_json::to_string_pretty(&sample()).unwrap();
        assert!(json.contains("\"interval\": \"PT3M\""));
        assert!(json.contains("\"warn-after\": \"PT2M30S\""));
        assert!(json.contains("\"interval\": \"PT7M\""));
        assert!(json.contains("\"warn-after\": \"P\""));

        let document: TimerDocument =
            serde_json::from_str("{\"timers\":[{\"name\":\"steep\",\"interval\":\"PT3M\"}]}")
                .unwrap();
        assert_eq!(document.timers[0].interval, 180);
        assert_eq!(document.timers[0].warn_after, 0);

        let err = serde_json::from_str::<TimerDocument>(
            "{\"timers\":[{\"name\":\"bad\",\"interval\":\"3 minutes\"}]}",
        )
        .unwrap_err();
        assert!(err.to_string().contains("3 minutes"));
    }

    #[test]
    fn newer_files_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.timers");
        let mut document = sample();
        document.format_version = FORMAT_VERSION + 1;
        fs::write(&path, serde_json::to_string(&document).unwrap()).unwrap();

        let err = TimerDocument::load(&path).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Storage(StorageError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn load_failures_name_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.timers");
        let err = TimerDocument::load(&path).unwrap_err();
        assert!(err.to_string().contains("missing.timers"));

        fs::write(&path, "not json").unwrap();
        assert!(TimerDocument::load(&path).is_err());
    }

    #[test]
    fn migrate_is_a_no_op_on_current_documents() {
        // With only one format version in the wild there is nothing to
        // upgrade yet; migrate must leave current documents untouched.
        let mut current = sample();
        assert!(!current.is_outdated());
        assert!(!current.migrate());
        assert_eq!(current, sample());
    }

    #[test]
    fn document_builds_a_matching_group() {
        let scheduler = Arc::new(Scheduler::new().unwrap());
        let ctx = Context::new(scheduler);
        let document = sample();
        let group = document.build_group(&ctx).unwrap();
        assert!(group.delay_start());
        assert_eq!(group.minutes_offset(), 15);
        let names: Vec<String> = group.timers().iter().map(Timer::name).collect();
        assert_eq!(names, ["tea", "eggs"]);
        assert_eq!(group.timers()[1].interval_secs(), 420);

        // And the round trip back preserves everything.
        assert_eq!(TimerDocument::from_group(&group), document);
    }

    #[test]
    fn out_of_range_offset_is_rejected_at_build_time() {
        let scheduler = Arc::new(Scheduler::new().unwrap());
        let ctx = Context::new(scheduler);
        let mut document = sample();
        document.minutes_offset = 75;
        assert!(document.build_group(&ctx).is_err());
    }
}
