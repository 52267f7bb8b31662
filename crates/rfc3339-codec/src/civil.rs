//! Conversion between absolute instants and civil wall-clock fields.
//!
//! An absolute instant has no wall-clock representation of its own; it
//! acquires one when paired with an offset or zone. Projecting instant `I`
//! through offset `O` yields civil fields `C = I + O`; interpreting civil
//! fields asserted to be in `O` recovers `I = C - O`. For named zones the
//! offset is itself a function of the instant (daylight-saving rules), so
//! both directions resolve the offset at the instant in question rather
//! than assuming a fixed one.
//!
//! Zone-naive civil text is ambiguous on its own. Every conversion here
//! takes the reference zone as an explicit, required parameter; there is
//! no implicit process-zone fallback, so the same inputs produce the same
//! instants on every machine.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Duration, FixedOffset, LocalResult, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::{OffsetComponents, Tz};
use serde::Serialize;

use crate::error::{CodecError, Result};

// ── Reference zones ─────────────────────────────────────────────────────────

/// A rule mapping `(zone, instant)` to a UTC offset.
///
/// Used only while converting between instants and civil fields; no value
/// stores a zone. Named zones consult the compiled IANA table, which is
/// immutable for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceZone {
    /// Offset `+00:00` at every instant.
    Utc,
    /// A fixed offset, e.g. `+05:00`. No daylight rule.
    Fixed(FixedOffset),
    /// An IANA zone, e.g. `Asia/Tokyo`. Offset may vary with the instant.
    Named(Tz),
}

impl ReferenceZone {
    /// Look up an IANA zone identifier.
    ///
    /// # Errors
    ///
    /// [`CodecError::UnresolvedZone`] when the identifier has no entry in
    /// the zone table.
    pub fn named(id: &str) -> Result<Self> {
        id.parse::<Tz>()
            .map(Self::Named)
            .map_err(|_| CodecError::UnresolvedZone(format!("'{id}'")))
    }

    /// The UTC offset this zone resolves to at `instant`.
    ///
    /// A pure function of `(self, instant)`; for [`ReferenceZone::Named`]
    /// the answer depends on the instant because of daylight-saving
    /// transitions.
    pub fn offset_at(&self, instant: DateTime<Utc>) -> FixedOffset {
        match self {
            ReferenceZone::Utc => Utc.fix(),
            ReferenceZone::Fixed(offset) => *offset,
            ReferenceZone::Named(tz) => tz.offset_from_utc_datetime(&instant.naive_utc()).fix(),
        }
    }

    /// Whether daylight saving is in effect at `instant`.
    ///
    /// Always `false` for [`ReferenceZone::Utc`] and fixed offsets.
    pub fn dst_active_at(&self, instant: DateTime<Utc>) -> bool {
        match self {
            ReferenceZone::Named(tz) => {
                tz.offset_from_utc_datetime(&instant.naive_utc()).dst_offset() != Duration::zero()
            }
            _ => false,
        }
    }
}

impl FromStr for ReferenceZone {
    type Err = CodecError;

    /// Accepts `"UTC"`/`"Z"`, an IANA identifier, or a fixed-offset
    /// literal such as `"+05:00"`.
    fn from_str(s: &str) -> Result<Self> {
        if s == "UTC" || s == "Z" {
            return Ok(ReferenceZone::Utc);
        }
        if let Ok(tz) = s.parse::<Tz>() {
            return Ok(ReferenceZone::Named(tz));
        }
        s.parse::<FixedOffset>()
            .map(ReferenceZone::Fixed)
            .map_err(|_| CodecError::UnresolvedZone(format!("'{s}'")))
    }
}

impl fmt::Display for ReferenceZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceZone::Utc => f.write_str("UTC"),
            ReferenceZone::Fixed(offset) => write!(f, "{offset}"),
            ReferenceZone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

// ── Projection: instant to civil fields ─────────────────────────────────────

/// An instant re-expressed as civil fields under a resolved offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CivilProjection {
    /// The civil fields with the offset they were resolved under.
    pub local: DateTime<FixedOffset>,
    /// Whether daylight saving was in effect at the projected instant.
    pub dst_active: bool,
}

impl CivilProjection {
    /// The wall-clock fields alone, offset stripped.
    pub fn civil(&self) -> NaiveDateTime {
        self.local.naive_local()
    }

    /// The offset the zone resolved to.
    pub fn offset(&self) -> FixedOffset {
        *self.local.offset()
    }
}

/// Project an instant through a reference zone: `C = I + O`.
///
/// Total: every instant has civil fields in every zone.
///
/// # Examples
///
/// ```
/// use rfc3339_codec::{civil::{project, ReferenceZone}, parse_instant};
///
/// let instant = parse_instant("2022-11-17T00:00:00.000Z").unwrap();
/// let tokyo = ReferenceZone::named("Asia/Tokyo").unwrap();
/// assert_eq!(project(instant, &tokyo).civil().to_string(), "2022-11-17 09:00:00");
/// ```
pub fn project(instant: DateTime<Utc>, zone: &ReferenceZone) -> CivilProjection {
    let offset = zone.offset_at(instant);
    CivilProjection {
        local: instant.with_timezone(&offset),
        dst_active: zone.dst_active_at(instant),
    }
}

// ── Interpretation: civil fields to instant ─────────────────────────────────

/// Interpret civil fields as an instant in a reference zone: `I = C - O`.
///
/// The offset subtracted is the one the civil fields fall under, looked up
/// in the zone's rule, not an offset captured at some other time.
///
/// # Errors
///
/// [`CodecError::AmbiguousCivilTime`] when the civil fields occur twice
/// (a fall-back transition replays them) or never (a spring-forward
/// transition skips them) in a named zone. The conversion never guesses
/// one of the candidate instants.
pub fn interpret(civil: NaiveDateTime, zone: &ReferenceZone) -> Result<DateTime<Utc>> {
    let resolved = match zone {
        ReferenceZone::Utc => LocalResult::Single(Utc.from_utc_datetime(&civil)),
        ReferenceZone::Fixed(offset) => offset
            .from_local_datetime(&civil)
            .map(|local| local.with_timezone(&Utc)),
        ReferenceZone::Named(tz) => tz
            .from_local_datetime(&civil)
            .map(|local| local.with_timezone(&Utc)),
    };
    match resolved {
        LocalResult::Single(instant) => Ok(instant),
        LocalResult::Ambiguous(..) => Err(CodecError::AmbiguousCivilTime(format!(
            "'{civil}' occurs twice in {zone}"
        ))),
        LocalResult::None => Err(CodecError::AmbiguousCivilTime(format!(
            "'{civil}' does not exist in {zone}"
        ))),
    }
}

/// Parse a zone-naive RFC 3339 body (date, `T`, time, optional fraction).
///
/// Text carrying an offset or `Z` is rejected here; that is
/// [`crate::codec::parse_offset_timestamp`]'s grammar. Fractional digits
/// beyond nanosecond precision truncate.
///
/// # Errors
///
/// [`CodecError::MalformedText`] and [`CodecError::FieldOutOfRange`] under
/// the same policy as the codec.
pub fn parse_civil(text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|err| CodecError::from_parse(text, err))
}

/// Parse zone-naive civil text and interpret it in a reference zone.
///
/// This is the whole "no offset supplied anywhere" pipeline: the reference
/// zone is the required parameter that fixes which instant the text
/// denotes.
///
/// # Examples
///
/// ```
/// use rfc3339_codec::civil::{parse_civil_in, ReferenceZone};
///
/// let civil = "2022-11-17T00:00:00.000";
/// let as_utc = parse_civil_in(civil, &ReferenceZone::Utc).unwrap();
/// let as_tokyo = parse_civil_in(civil, &ReferenceZone::named("Asia/Tokyo").unwrap()).unwrap();
/// assert_eq!(as_utc - as_tokyo, chrono::Duration::hours(9));
/// ```
///
/// # Errors
///
/// As [`parse_civil`] and [`interpret`].
pub fn parse_civil_in(text: &str, zone: &ReferenceZone) -> Result<DateTime<Utc>> {
    interpret(parse_civil(text)?, zone)
}

/// The instant at civil midnight of `instant`'s date in a reference zone.
///
/// Projects, zeroes the time-of-day fields, and reinterprets in the same
/// zone.
///
/// # Errors
///
/// [`CodecError::AmbiguousCivilTime`] when midnight of that date is
/// skipped or replayed by a daylight-saving transition in the zone.
pub fn truncate_to_day(instant: DateTime<Utc>, zone: &ReferenceZone) -> Result<DateTime<Utc>> {
    let midnight = project(instant, zone).civil().date().and_time(NaiveTime::MIN);
    interpret(midnight, zone)
}

// ── Tests ───────────────────────────────────────────────────────────────────
