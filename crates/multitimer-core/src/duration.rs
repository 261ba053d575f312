//! Duration value with three mutually consistent representations.
//!
//! A [`DurationValue`] simultaneously holds hour/minute/second components,
//! the total in seconds, and canonical ISO-8601 text (`PT1H30M`, or `P` for
//! zero). Every setter recomputes the sibling representations in one pass
//! and reports exactly which facets changed, so callers can forward the
//! changes to whatever is watching without ever observing a half-updated
//! value. Minutes and seconds of 60 or more roll over into the next larger
//! unit.

use std::fmt;

use crate::error::ConfigurationError;

const SECS_PER_HOUR: u64 = 3_600;
const SECS_PER_MINUTE: u64 = 60;

/// One facet update produced by a [`DurationValue`] setter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DurationChange {
    Hours { from: u64, to: u64 },
    Minutes { from: u64, to: u64 },
    Seconds { from: u64, to: u64 },
    TotalSeconds { from: u64, to: u64 },
    Iso { from: String, to: String },
}

/// Mutable duration with component, total-seconds and ISO-8601 views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationValue {
    hours: u64,
    minutes: u64,
    seconds: u64,
    total_seconds: u64,
    iso: String,
}

impl Default for DurationValue {
    fn default() -> Self {
        Self {
            hours: 0,
            minutes: 0,
            seconds: 0,
            total_seconds: 0,
            iso: "P".to_string(),
        }
    }
}

impl DurationValue {
    /// Zero duration (`"P"`).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_total_seconds(total_seconds: u64) -> Self {
        let mut value = Self::new();
        value.set_total_seconds(total_seconds);
        value
    }

    /// Parse ISO-8601 text into a fresh value. Rejects date components.
    pub fn from_iso(text: &str) -> Result<Self, ConfigurationError> {
        let mut value = Self::new();
        value.set_iso(text)?;
        Ok(value)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn hours(&self) -> u64 {
        self.hours
    }

    pub fn minutes(&self) -> u64 {
        self.minutes
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    /// Canonical ISO-8601 rendering; always normalized.
    pub fn iso(&self) -> &str {
        &self.iso
    }

    pub fn is_zero(&self) -> bool {
        self.total_seconds == 0
    }

    // ── Mutators ─────────────────────────────────────────────────────

    /// Replace the hour component, keeping minutes and seconds.
    pub fn set_hours(&mut self, hours: u64) -> Vec<DurationChange> {
        self.apply_total(
            hours
                .saturating_mul(SECS_PER_HOUR)
                .saturating_add(self.minutes * SECS_PER_MINUTE)
                .saturating_add(self.seconds),
        )
    }

    /// Replace the minute component. Values of 60 or more roll into hours.
    pub fn set_minutes(&mut self, minutes: u64) -> Vec<DurationChange> {
        self.apply_total(
            self.hours
                .saturating_mul(SECS_PER_HOUR)
                .saturating_add(minutes.saturating_mul(SECS_PER_MINUTE))
                .saturating_add(self.seconds),
        )
    }

    /// Replace the second component. Values of 60 or more roll upward.
    pub fn set_seconds(&mut self, seconds: u64) -> Vec<DurationChange> {
        self.apply_total(
            self.hours
                .saturating_mul(SECS_PER_HOUR)
                .saturating_add(self.minutes * SECS_PER_MINUTE)
                .saturating_add(seconds),
        )
    }

    pub fn set_total_seconds(&mut self, total_seconds: u64) -> Vec<DurationChange> {
        self.apply_total(total_seconds)
    }

    /// Parse and adopt ISO-8601 text. On rejection the value is untouched;
    /// accepted non-canonical spellings (`PT90M`) are normalized (`PT1H30M`).
    pub fn set_iso(&mut self, text: &str) -> Result<Vec<DurationChange>, ConfigurationError> {
        let total = parse_iso(text)?;
        Ok(self.apply_total(total))
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Decompose a total, re-render the ISO text and diff every facet.
    fn apply_total(&mut self, total_seconds: u64) -> Vec<DurationChange> {
        let hours = total_seconds / SECS_PER_HOUR;
        let minutes = (total_seconds % SECS_PER_HOUR) / SECS_PER_MINUTE;
        let seconds = total_seconds % SECS_PER_MINUTE;
        let iso = render_iso(hours, minutes, seconds);

        let mut changes = Vec::new();
        if self.hours != hours {
            changes.push(DurationChange::Hours { from: self.hours, to: hours });
            self.hours = hours;
        }
        if self.minutes != minutes {
            changes.push(DurationChange::Minutes { from: self.minutes, to: minutes });
            self.minutes = minutes;
        }
        if self.seconds != seconds {
            changes.push(DurationChange::Seconds { from: self.seconds, to: seconds });
            self.seconds = seconds;
        }
        if self.total_seconds != total_seconds {
            changes.push(DurationChange::TotalSeconds {
                from: self.total_seconds,
                to: total_seconds,
            });
            self.total_seconds = total_seconds;
        }
        if self.iso != iso {
            changes.push(DurationChange::Iso {
                from: std::mem::replace(&mut self.iso, iso.clone()),
                to: iso,
            });
        }
        changes
    }
}

impl fmt::Display for DurationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.iso)
    }
}

/// Render canonical ISO-8601: zero components omitted, `"P"` when all zero.
fn render_iso(hours: u64, minutes: u64, seconds: u64) -> String {
    if hours == 0 && minutes == 0 && seconds == 0 {
        return "P".to_string();
    }
    let mut out = String::from("PT");
    if hours > 0 {
        out.push_str(&format!("{hours}H"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}M"));
    }
    if seconds > 0 {
        out.push_str(&format!("{seconds}S"));
    }
    out
}

/// Parse `P`/`PT#H#M#S` text into total seconds.
///
/// Components are optional but must appear in H, M, S order, each at most
/// once. Anything before the `T` (date components such as `P1Y2M3D`) is
/// rejected outright.
fn parse_iso(text: &str) -> Result<u64, ConfigurationError> {
    let invalid = |message: &str| ConfigurationError::InvalidIsoDuration {
        text: text.to_string(),
        message: message.to_string(),
    };

    let body = text
        .strip_prefix('P')
        .ok_or_else(|| invalid("must start with 'P'"))?;
    if body.is_empty() {
        return Ok(0);
    }
    let mut rest = match body.strip_prefix('T') {
        Some(after_t) => after_t,
        None => {
            return Err(ConfigurationError::DateComponentsUnsupported {
                text: text.to_string(),
            })
        }
    };

    // Designators still allowed at the current position, in order.
    let mut allowed: &[char] = &['H', 'M', 'S'];
    let mut total: u64 = 0;
    while !rest.is_empty() {
        let digits_len = rest
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| invalid("missing unit designator"))?;
        if digits_len == 0 {
            return Err(invalid("expected a number"));
        }
        let value: u64 = rest[..digits_len]
            .parse()
            .map_err(|_| invalid("component too large"))?;
        let mut designators = rest[digits_len..].chars();
        let designator = match designators.next() {
            Some(c) => c,
            None => return Err(invalid("missing unit designator")),
        };

        let position = allowed.iter().position(|&c| c == designator).ok_or_else(|| {
            invalid(&format!("unexpected designator '{designator}'"))
        })?;
        let unit_seconds = match designator {
            'H' => SECS_PER_HOUR,
            'M' => SECS_PER_MINUTE,
            _ => 1,
        };
        total = value
            .checked_mul(unit_seconds)
            .and_then(|component| total.checked_add(component))
            .ok_or_else(|| invalid("duration too large"))?;

        allowed = &allowed[position + 1..];
        rest = designators.as_str();
    }
    Ok(total)
}

/// Serde adapter for whole-second fields that live on disk as canonical
/// ISO-8601 period text (`#[serde(with = "...::iso_seconds")]`).
pub mod iso_seconds {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DurationValue;

    pub fn serialize<S>(secs: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(DurationValue::from_total_seconds(*secs).iso())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        DurationValue::from_iso(&text)
            .map(|value| value.total_seconds())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn set_hours_from_zero() {
        let mut value = DurationValue::new();
        let changes = value.set_hours(2);
        assert_eq!(value.hours(), 2);
        assert_eq!(value.minutes(), 0);
        assert_eq!(value.seconds(), 0);
        assert_eq!(value.total_seconds(), 7_200);
        assert_eq!(value.iso(), "PT2H");
        // Only hours, total and ISO moved.
        assert_eq!(changes.len(), 3);
        assert!(changes.contains(&DurationChange::Hours { from: 0, to: 2 }));
        assert!(changes.contains(&DurationChange::TotalSeconds { from: 0, to: 7_200 }));
        assert!(changes.contains(&DurationChange::Iso {
            from: "P".into(),
            to: "PT2H".into()
        }));
    }

    #[test]
    fn components_roll_over() {
        let mut value = DurationValue::new();
        value.set_hours(1);
        value.set_minutes(123);
        value.set_seconds(3 * 3_600 + 4 * 60 + 5);
        assert_eq!(value.hours(), 6);
        assert_eq!(value.minutes(), 7);
        assert_eq!(value.seconds(), 5);
        assert_eq!(value.iso(), "PT6H7M5S");
    }

    #[test]
    fn zero_renders_bare_p() {
        let mut value = DurationValue::from_total_seconds(90);
        assert_eq!(value.iso(), "PT1M30S");
        let changes = value.set_total_seconds(0);
        assert_eq!(value.iso(), "P");
        assert!(changes.contains(&DurationChange::Iso {
            from: "PT1M30S".into(),
            to: "P".into()
        }));
    }

    #[test]
    fn parses_each_shape() {
        assert_eq!(DurationValue::from_iso("P").unwrap().total_seconds(), 0);
        assert_eq!(DurationValue::from_iso("PT").unwrap().total_seconds(), 0);
        assert_eq!(DurationValue::from_iso("PT2H").unwrap().total_seconds(), 7_200);
        assert_eq!(DurationValue::from_iso("PT45S").unwrap().total_seconds(), 45);
        assert_eq!(
            DurationValue::from_iso("PT1H2M3S").unwrap().total_seconds(),
            3_723
        );
    }

    #[test]
    fn normalizes_non_canonical_text() {
        let value = DurationValue::from_iso("PT90M").unwrap();
        assert_eq!(value.total_seconds(), 5_400);
        assert_eq!(value.iso(), "PT1H30M");

        let zero = DurationValue::from_iso("PT").unwrap();
        assert_eq!(zero.iso(), "P");
    }

    #[test]
    fn rejects_date_components_and_leaves_value_alone() {
        let mut value = DurationValue::from_total_seconds(75);
        let before = value.clone();
        let err = value.set_iso("P1Y2M3D").unwrap_err();
        assert!(matches!(err, ConfigurationError::DateComponentsUnsupported { .. }));
        assert_eq!(value, before);
    }

    #[test]
    fn rejects_malformed_text() {
        for text in ["", "12:00", "PT1X", "PTH", "pt1h", "PT1S2M", "PT1M1M", "PT1H junk"] {
            assert!(
                DurationValue::from_iso(text).is_err(),
                "expected rejection of {text:?}"
            );
        }
    }

    #[test]
    fn rejects_overflowing_components() {
        assert!(DurationValue::from_iso("PT99999999999999999999H").is_err());
        assert!(DurationValue::from_iso("PT18446744073709551615H").is_err());
    }

    #[test]
    fn large_hours_survive_round_trips() {
        let value = DurationValue::from_total_seconds(365 * 24 * 3_600);
        assert_eq!(value.iso(), "PT8760H");
        let back = DurationValue::from_iso(value.iso()).unwrap();
        assert_eq!(back.total_seconds(), value.total_seconds());
    }

    #[test]
    fn setting_same_value_reports_no_changes() {
        let mut value = DurationValue::from_total_seconds(120);
        assert!(value.set_total_seconds(120).is_empty());
        assert!(value.set_iso("PT2M").unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn total_seconds_round_trips_through_iso(total in any::<u64>()) {
            let value = DurationValue::from_total_seconds(total);
            let back = DurationValue::from_iso(value.iso()).unwrap();
            prop_assert_eq!(back.total_seconds(), total);
            prop_assert_eq!(back.iso(), value.iso());
        }

        #[test]
        fn components_always_normalized(
            hours in 0u64..100_000,
            minutes in 0u64..100_000,
            seconds in 0u64..1_000_000,
        ) {
            let mut value = DurationValue::new();
            value.set_hours(hours);
            value.set_minutes(minutes);
            value.set_seconds(seconds);
            prop_assert!(value.minutes() < 60);
            prop_assert!(value.seconds() < 60);
            prop_assert_eq!(
                value.total_seconds(),
                hours * 3_600 + minutes * 60 + seconds
            );
            prop_assert_eq!(
                value.hours() * 3_600 + value.minutes() * 60 + value.seconds(),
                value.total_seconds()
            );
        }
    }
}
