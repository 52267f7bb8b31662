//! # rfc3339-codec
//!
//! Bidirectional conversion between RFC 3339 text and in-memory temporal
//! values, plus the arithmetic relating an absolute instant to civil
//! wall-clock fields under a reference zone.
//!
//! "Instant" and "civil timestamp" are different concepts and the API keeps
//! them apart: an instant is a zone-independent point on the timeline, a
//! civil timestamp is wall-clock fields that denote an instant only once an
//! offset is attached. Text without offset information never silently
//! becomes an instant; interpreting it requires a reference zone passed as
//! an explicit argument, never read from process environment. Every
//! operation is a pure function of its inputs and may be called from any
//! number of threads; the only process-wide state is the compiled IANA
//! zone table, which is read-only.
//!
//! ## Modules
//!
//! - [`codec`]: RFC 3339 formatting and parsing for instants, offset
//!   timestamps, and the legacy millisecond-precision wrappers
//! - [`civil`]: projection of instants to civil fields and back under
//!   explicit reference zones
//! - [`error`]: error types
//!
//! ## Example
//!
//! ```
//! use rfc3339_codec::{civil::{parse_civil_in, ReferenceZone}, format_instant, parse_instant};
//!
//! // Offset-carrying text denotes an instant on its own.
//! let instant = parse_instant("2022-11-17T05:00:00.000+05:00").unwrap();
//! assert_eq!(format_instant(instant), "2022-11-17T00:00:00Z");
//!
//! // Zone-naive text denotes one only relative to a reference zone.
//! let tokyo = ReferenceZone::named("Asia/Tokyo").unwrap();
//! let in_tokyo = parse_civil_in("2022-11-17T00:00:00.000", &tokyo).unwrap();
//! assert_eq!(format_instant(in_tokyo), "2022-11-16T15:00:00Z");
//! ```

pub mod civil;
pub mod codec;
pub mod error;

pub use civil::{
    interpret, parse_civil, parse_civil_in, project, truncate_to_day, CivilProjection,
    ReferenceZone,
};
pub use codec::{
    format_instant, format_legacy_instant, format_legacy_timestamp, format_offset_timestamp,
    parse_instant, parse_legacy_instant, parse_legacy_timestamp, parse_offset_timestamp,
    LegacyInstant, LegacyTimestamp,
};
pub use error::CodecError;
