//! Event identifier generation.
//!
//! Identifiers have the shape
//! `<yyyymmddTHHMMSSffffff>-<counter>-<event type>`, e.g.
//! `20260105T142233123456-000000-push`. The timestamp/counter pair is
//! strictly increasing per generator, so two events stored within the same
//! microsecond still get distinct identifiers, and identifiers sort in the
//! order they were issued.

use crate::types::Timestamp;

/// Replacement for an event type that sanitizes to nothing.
pub const UNKNOWN_EVENT_TYPE: &str = "unknown";

/// Longest sanitized event type kept in an identifier.
const MAX_EVENT_TYPE_LEN: usize = 64;

/// Timestamp part of an identifier, and its rendered length.
const STAMP_FORMAT: &str = "%Y%m%dT%H%M%S%6f";
const STAMP_LEN: usize = 21;

/// Width of the zero-padded counter; the counter never exceeds this.
const COUNTER_WIDTH: usize = 6;
const MAX_COUNTER: u32 = 999_999;

/// Reduce an event type to characters that are safe in a storage key.
///
/// Keeps ASCII alphanumerics, `-`, `_` and `.`; whitespace becomes `_`;
/// everything else (path separators, control characters, non-ASCII) is
/// dropped. `..` runs collapse to `.` and leading/trailing `.`/`_` are
/// trimmed, so the result can never name a parent directory.
pub fn sanitize_event_type(event_type: &str) -> String {
    let mut cleaned: String = event_type
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();

    while cleaned.contains("..") {
        cleaned = cleaned.replace("..", ".");
    }

    let trimmed: String = cleaned
        .trim_matches(|c| c == '.' || c == '_')
        .chars()
        .take(MAX_EVENT_TYPE_LEN)
        .collect();

    if trimmed.is_empty() {
        UNKNOWN_EVENT_TYPE.to_string()
    } else {
        trimmed
    }
}

/// Issues strictly increasing event identifiers.
///
/// Not internally synchronized: the event store owns one generator behind
/// its writer lock so that issue order and storage order coincide.
#[derive(Debug, Default)]
pub struct IdentifierGenerator {
    last_micros: i64,
    counter: u32,
}

impl IdentifierGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a generator whose next identifier sorts after `last_issued`,
    /// even if the clock is now behind it (e.g. after a restart).
    ///
    /// An identifier that does not parse leaves the generator in its
    /// initial state.
    pub fn resume_after(last_issued: &str) -> Self {
        parse_position(last_issued)
            .map(|(last_micros, counter)| Self {
                last_micros,
                counter,
            })
            .unwrap_or_default()
    }

    /// Produce the next identifier for an event of `event_type` received at
    /// `now`.
    ///
    /// If the clock has not advanced past the previous identifier (same
    /// microsecond, or the clock stepped backwards) the previous timestamp is
    /// reused with an incremented counter.
    pub fn next(&mut self, event_type: &str, now: Timestamp) -> String {
        let now_micros = now.timestamp_micros();

        if now_micros > self.last_micros {
            self.last_micros = now_micros;
            self.counter = 0;
        } else if self.counter < MAX_COUNTER {
            self.counter += 1;
        } else {
            self.last_micros += 1;
            self.counter = 0;
        }

        let stamp = chrono::DateTime::from_timestamp_micros(self.last_micros).unwrap_or(now);

        format!(
            "{}-{:0width$}-{}",
            stamp.format(STAMP_FORMAT),
            self.counter,
            sanitize_event_type(event_type),
            width = COUNTER_WIDTH,
        )
    }
}

/// Extract the (microseconds, counter) position encoded in an identifier.
fn parse_position(identifier: &str) -> Option<(i64, u32)> {
    let mut parts = identifier.splitn(3, '-');
    let stamp = parts.next()?;
    let counter = parts.next()?;
    if stamp.len() != STAMP_LEN || counter.len() != COUNTER_WIDTH {
        return None;
    }

    let seconds = chrono::NaiveDateTime::parse_from_str(stamp.get(..15)?, "%Y%m%dT%H%M%S").ok()?;
    let micros: i64 = stamp.get(15..)?.parse().ok()?;
    let counter: u32 = counter.parse().ok()?;

    Some((seconds.and_utc().timestamp_micros() + micros, counter))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
