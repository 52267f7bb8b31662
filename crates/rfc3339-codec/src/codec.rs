//! RFC 3339 text to and from in-memory temporal values.
//!
//! Four shapes are supported: an absolute instant ([`DateTime<Utc>`]), an
//! offset-qualified civil timestamp ([`DateTime<FixedOffset>`]), and two
//! millisecond-precision wrappers ([`LegacyInstant`], [`LegacyTimestamp`])
//! for call sites that expect older date and timestamp representations.
//!
//! Parsing requires explicit offset information: `"2022-11-17T00:00:00Z"`
//! and `"2022-11-17T00:00:00.000+05:00"` are accepted, a bare civil body
//! is not. Zone-naive text is handled by [`crate::civil`], where the
//! reference zone is an explicit parameter.
//!
//! Formatting is asymmetric on purpose. Instants normalize to the `Z`
//! designator; offset timestamps keep the offset they were constructed
//! with. One formatter cannot serve both without losing information.

use chrono::{DateTime, Duration, FixedOffset, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CodecError, Result};

// ── Formatting ──────────────────────────────────────────────────────────────

/// Render an instant as RFC 3339 text with the `Z` designator.
///
/// Sub-second digits are emitted in SI groups (none, milli, micro, nano),
/// the smallest group that loses no precision the instant carries. The
/// output is deterministic: equal instants always yield equal strings, and
/// [`parse_instant`] recovers the instant exactly.
///
/// # Examples
///
/// ```
/// use rfc3339_codec::{format_instant, parse_instant};
///
/// let instant = parse_instant("2022-11-17T05:00:00+05:00").unwrap();
/// assert_eq!(format_instant(instant), "2022-11-17T00:00:00Z");
/// ```
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Render an offset timestamp as RFC 3339 text, preserving its offset.
///
/// ```
/// use rfc3339_codec::{format_offset_timestamp, parse_offset_timestamp};
///
/// let ts = parse_offset_timestamp("2022-11-17T00:00:00.000+05:00").unwrap();
/// assert_eq!(format_offset_timestamp(ts), "2022-11-17T00:00:00+05:00");
/// ```
pub fn format_offset_timestamp(timestamp: DateTime<FixedOffset>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Render a legacy instant value through the instant formatter.
pub fn format_legacy_instant(value: LegacyInstant) -> String {
    format_instant(value.to_instant())
}

/// Render a legacy timestamp value through the instant formatter.
pub fn format_legacy_timestamp(value: LegacyTimestamp) -> String {
    format_instant(value.to_instant())
}

// ── Parsing ─────────────────────────────────────────────────────────────────

/// Parse RFC 3339 text into an absolute instant.
///
/// The text must carry explicit offset information (`Z` or `±HH:MM`); the
/// civil fields and offset collapse into the UTC point they denote.
///
/// # Errors
///
/// [`CodecError::MalformedText`] when the text does not match the RFC 3339
/// grammar or lacks offset information, [`CodecError::FieldOutOfRange`]
/// when a calendar field is impossible (month 13, day 32).
pub fn parse_instant(text: &str) -> Result<DateTime<Utc>> {
    parse_offset_timestamp(text).map(|ts| ts.with_timezone(&Utc))
}

/// Parse RFC 3339 text into an offset-qualified civil timestamp.
///
/// Same grammar acceptance as [`parse_instant`], but the civil fields and
/// the offset the text was written in survive. Note that equality on the
/// result compares denoted instants: `00:00Z` and `05:00+05:00` are equal
/// while displaying different fields.
///
/// # Errors
///
/// As [`parse_instant`].
pub fn parse_offset_timestamp(text: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text).map_err(|err| CodecError::from_parse(text, err))
}

/// Parse RFC 3339 text into a legacy instant value.
///
/// Parses to an instant, then truncates to millisecond precision:
/// fractional digits beyond the third are dropped, never rounded.
///
/// ```
/// use rfc3339_codec::parse_legacy_instant;
///
/// let value = parse_legacy_instant("2022-11-17T00:00:00.123456Z").unwrap();
/// assert_eq!(value.epoch_millis(), 1_668_643_200_123);
/// ```
///
/// # Errors
///
/// As [`parse_instant`].
pub fn parse_legacy_instant(text: &str) -> Result<LegacyInstant> {
    parse_instant(text).map(LegacyInstant::from_instant)
}

/// Parse RFC 3339 text into a legacy timestamp value.
///
/// Identical truncation rule to [`parse_legacy_instant`]; only the result
/// type differs.
///
/// # Errors
///
/// As [`parse_instant`].
pub fn parse_legacy_timestamp(text: &str) -> Result<LegacyTimestamp> {
    parse_instant(text).map(LegacyTimestamp::from_instant)
}

// ── Legacy millisecond wrappers ─────────────────────────────────────────────

/// Drop sub-millisecond digits. Truncation, not rounding: the wrappers
/// must agree with epoch-millisecond arithmetic done elsewhere.
fn truncate_to_millis(instant: DateTime<Utc>) -> DateTime<Utc> {
    let sub_ms_nanos = i64::from(instant.timestamp_subsec_nanos() % 1_000_000);
    instant - Duration::nanoseconds(sub_ms_nanos)
}

/// Millisecond-precision wrapper around an instant, for call sites that
/// expect a legacy date type.
///
/// The wrapped instant never carries sub-millisecond digits; constructors
/// truncate. Equality, ordering, and hashing follow the wrapped instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LegacyInstant(DateTime<Utc>);

impl LegacyInstant {
    /// Wrap an instant, truncating to millisecond precision.
    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Self(truncate_to_millis(instant))
    }

    /// Build from epoch milliseconds, `None` outside the representable range.
    pub fn from_epoch_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(Self)
    }

    /// Milliseconds since the Unix epoch.
    pub fn epoch_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// The wrapped instant. No information to recover beyond milliseconds.
    pub fn to_instant(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Millisecond-precision wrapper semantically identical to
/// [`LegacyInstant`], typed separately for legacy "database timestamp"
/// call sites so the two cannot be mixed up at a signature boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LegacyTimestamp(DateTime<Utc>);

impl LegacyTimestamp {
    /// Wrap an instant, truncating to millisecond precision.
    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Self(truncate_to_millis(instant))
    }

    /// Build from epoch milliseconds, `None` outside the representable range.
    pub fn from_epoch_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(Self)
    }

    /// Milliseconds since the Unix epoch.
    pub fn epoch_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// The wrapped instant.
    pub fn to_instant(&self) -> DateTime<Utc> {
        self.0
    }
}

// Both wrappers serialize as bare epoch milliseconds, matching how legacy
// consumers exchange them.

impl Serialize for LegacyInstant {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.epoch_millis())
    }
}

impl<'de> Deserialize<'de> for LegacyInstant {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = i64::deserialize(deserializer)?;
        Self::from_epoch_millis(millis)
            .ok_or_else(|| serde::de::Error::custom(format!("epoch millis out of range: {millis}")))
    }
}

impl Serialize for LegacyTimestamp {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.epoch_millis())
    }
}

impl<'de> Deserialize<'de> for LegacyTimestamp {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = i64::deserialize(deserializer)?;
        Self::from_epoch_millis(millis)
            .ok_or_else(|| serde::de::Error::custom(format!("epoch millis out of range: {millis}")))
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ── formatting ──────────────────────────────────────────────────────

    #[test]
    fn test_format_normalizes_to_utc() {
        let instant = parse_instant("2022-11-17T05:00:00+05:00").unwrap();
        assert_eq!(format_instant(instant), "2022-11-17T00:00:00Z");
    }

    #[test]
    fn test_format_emits_millisecond_fraction() {
        let instant = parse_instant("2022-11-17T00:00:00.123Z").unwrap();
        assert_eq!(format_instant(instant), "2022-11-17T00:00:00.123Z");
    }

    #[test]
    fn test_format_keeps_submillisecond_digits() {
        // The instant formatter must not silently drop precision it has;
        // only the legacy conversions truncate.
        let instant = parse_instant("2022-11-17T00:00:00.123456Z").unwrap();
        assert_eq!(format_instant(instant), "2022-11-17T00:00:00.123456Z");
    }

    #[test]
    fn test_format_offset_timestamp_preserves_offset() {
        let ts = parse_offset_timestamp("2022-11-17T09:30:00.500+09:00").unwrap();
        assert_eq!(format_offset_timestamp(ts), "2022-11-17T09:30:00.500+09:00");
    }

    // ── parsing ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_instant_roundtrips_nanoseconds() {
        let instant = parse_instant("2022-11-17T00:00:00.123456789Z").unwrap();
        assert_eq!(parse_instant(&format_instant(instant)).unwrap(), instant);
    }

    #[test]
    fn test_offset_independence_of_instant_equality() {
        let east = parse_instant("2022-11-17T05:00:00+05:00").unwrap();
        let utc = parse_instant("2022-11-17T00:00:00Z").unwrap();
        assert_eq!(east, utc);
    }

    #[test]
    fn test_parse_offset_timestamp_retains_civil_fields() {
        let ts = parse_offset_timestamp("2022-11-17T00:00:00.000+05:00").unwrap();
        assert_eq!(ts.offset().local_minus_utc(), 5 * 3600);
        assert_eq!(ts.naive_local().to_string(), "2022-11-17 00:00:00");
    }

    #[test]
    fn test_offset_sweep_shifts_denoted_instant() {
        // Same civil body under hour offsets -9..9: each offset moves the
        // denoted instant by exactly that offset.
        let civil_body = "2022-11-17T00:00:00.000";
        let utc_instant = parse_instant(&format!("{civil_body}Z")).unwrap();
        for hours in -9i64..9 {
            let text = format!("{civil_body}{hours:+03}:00");
            let instant = parse_instant(&text).unwrap();
            assert_eq!(instant, utc_instant - Duration::hours(hours), "at {text}");
        }
    }

    #[test]
    fn test_excess_fraction_digits_truncate() {
        let instant = parse_instant("2022-11-17T00:00:00.123456789999Z").unwrap();
        assert_eq!(instant.timestamp_subsec_nanos(), 123_456_789);
    }

    // ── rejection ───────────────────────────────────────────────────────

    #[test]
    fn test_parse_rejects_missing_offset() {
        let err = parse_instant("2022-11-17T00:00:00.000").unwrap_err();
        assert!(matches!(err, CodecError::MalformedText(_)), "got: {err}");
    }

    #[test]
    fn test_parse_rejects_month_thirteen() {
        let err = parse_instant("2022-13-01T00:00:00Z").unwrap_err();
        assert!(matches!(err, CodecError::FieldOutOfRange(_)), "got: {err}");
    }

    #[test]
    fn test_parse_rejects_day_thirty_two() {
        let err = parse_instant("2022-11-32T00:00:00Z").unwrap_err();
        assert!(matches!(err, CodecError::FieldOutOfRange(_)), "got: {err}");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_instant("not-a-timestamp").unwrap_err();
        assert!(matches!(err, CodecError::MalformedText(_)), "got: {err}");
    }

    #[test]
    fn test_parse_offset_timestamp_rejects_missing_offset() {
        let err = parse_offset_timestamp("2022-11-17T00:00:00").unwrap_err();
        assert!(matches!(err, CodecError::MalformedText(_)), "got: {err}");
    }

    // ── legacy wrappers ─────────────────────────────────────────────────

    #[test]
    fn test_legacy_truncates_microsecond_digits() {
        let fine = parse_legacy_instant("2022-11-17T00:00:00.123456Z").unwrap();
        let coarse = parse_legacy_instant("2022-11-17T00:00:00.123Z").unwrap();
        assert_eq!(fine.epoch_millis(), coarse.epoch_millis());
        assert_eq!(fine, coarse);
    }

    #[test]
    fn test_legacy_truncation_never_rounds() {
        let value = parse_legacy_instant("2022-11-17T00:00:00.999999Z").unwrap();
        assert_eq!(value.epoch_millis() % 1000, 999);
    }

    #[test]
    fn test_legacy_instant_and_timestamp_agree() {
        let text = "2022-11-17T00:00:00.123456Z";
        let instant = parse_legacy_instant(text).unwrap();
        let timestamp = parse_legacy_timestamp(text).unwrap();
        assert_eq!(instant.epoch_millis(), timestamp.epoch_millis());
    }

    #[test]
    fn test_format_legacy_emits_millisecond_utc() {
        let value = parse_legacy_timestamp("2022-11-17T05:00:00.123999+05:00").unwrap();
        assert_eq!(format_legacy_timestamp(value), "2022-11-17T00:00:00.123Z");
    }

    #[test]
    fn test_legacy_from_epoch_millis_checks_range() {
        assert!(LegacyInstant::from_epoch_millis(1_668_643_200_123).is_some());
        assert!(LegacyInstant::from_epoch_millis(i64::MAX).is_none());
    }

    #[test]
    fn test_legacy_serializes_as_epoch_millis() {
        let value = parse_legacy_instant("2022-11-17T00:00:00.123Z").unwrap();
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "1668643200123");
        let back: LegacyInstant = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_legacy_deserialize_rejects_out_of_range() {
        let result: std::result::Result<LegacyTimestamp, _> =
            serde_json::from_str(&i64::MAX.to_string());
        assert!(result.is_err());
    }

    // ── round-trip properties ───────────────────────────────────────────

    // Epoch-millisecond bounds of 0001-01-01T00:00:00Z..9999-12-31T23:59:59.999Z,
    // the four-digit-year range the RFC 3339 grammar covers.
    const MIN_MILLIS: i64 = -62_135_596_800_000;
    const MAX_MILLIS: i64 = 253_402_300_799_999;

    proptest! {
        #[test]
        fn roundtrip_any_millisecond_instant(millis in MIN_MILLIS..=MAX_MILLIS) {
            let value = LegacyInstant::from_epoch_millis(millis).unwrap();
            let text = format_legacy_instant(value);
            prop_assert_eq!(parse_legacy_instant(&text).unwrap(), value);
        }

        #[test]
        fn roundtrip_preserves_carried_precision(
            secs in (MIN_MILLIS / 1000)..=(MAX_MILLIS / 1000),
            nanos in 0u32..1_000_000_000,
        ) {
            let instant = DateTime::from_timestamp(secs, nanos).unwrap();
            prop_assert_eq!(parse_instant(&format_instant(instant)).unwrap(), instant);
        }
    }
}
