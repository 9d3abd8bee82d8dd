use chrono::TimeDelta;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

// @module: Subtitle timestamp parsing and formatting

// @const: Lenient timestamp regex, [d.]h:mm[:ss[(.|,)fraction]]
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d+)\.)?(\d+):(\d{1,2})(?::(\d{1,2})(?:[.,](\d{1,9}))?)?$")
        .expect("Invalid timestamp regex")
});

const MILLIS_PER_HOUR: i64 = 3_600_000;
const MILLIS_PER_MINUTE: i64 = 60_000;
const MILLIS_PER_SECOND: i64 = 1_000;

/// Parse a subtitle timestamp such as `00:01:02,345`, `0:01:02.34` or `1.02:00:00`.
///
/// Both comma and dot are accepted as the fraction separator, so SRT files written
/// with either convention parse the same way. The fraction is a decimal fraction of
/// a second: `.5`, `.50` and `.500` are all half a second.
pub fn parse_timestamp(input: &str) -> Option<TimeDelta> {
    let caps = TIMESTAMP_REGEX.captures(input.trim())?;

    let number = |idx: usize| -> Option<i64> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };

    let days = number(1)?;
    let hours = number(2)?;
    let minutes = number(3)?;
    let seconds = number(4)?;

    if minutes >= 60 || seconds >= 60 {
        return None;
    }
    // With an explicit day part the hour field is a clock hour
    if caps.get(1).is_some() && hours >= 24 {
        return None;
    }

    let nanos = match caps.get(5) {
        Some(m) => {
            let digits = m.as_str();
            let value: i64 = digits.parse().ok()?;
            value * 10_i64.pow(9 - digits.len() as u32)
        }
        None => 0,
    };

    let millis = days
        .checked_mul(24)?
        .checked_add(hours)?
        .checked_mul(MILLIS_PER_HOUR)?
        .checked_add(minutes * MILLIS_PER_MINUTE)?
        .checked_add(seconds * MILLIS_PER_SECOND)?;

    TimeDelta::try_milliseconds(millis)?.checked_add(&TimeDelta::nanoseconds(nanos))
}

/// Parse a possibly signed timestamp, or a bare number of milliseconds.
///
/// Used for shift offsets on the command line: `-00:00:01,500`, `+0:00:02.00`, `2500`.
pub fn parse_signed_timestamp(input: &str) -> Option<TimeDelta> {
    let trimmed = input.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let magnitude = if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
        TimeDelta::try_milliseconds(rest.parse().ok()?)?
    } else {
        parse_timestamp(rest)?
    };

    Some(if negative { -magnitude } else { magnitude })
}

/// Split a non-negative timestamp into hours, minutes, seconds and milliseconds.
///
/// Negative values cannot be written in either format and are clamped to zero.
fn clock_parts(time: TimeDelta) -> (i64, i64, i64, i64) {
    let ms = if time < TimeDelta::zero() {
        warn!("Negative timestamp {}ms clamped to zero", time.num_milliseconds());
        0
    } else {
        time.num_milliseconds()
    };

    (
        ms / MILLIS_PER_HOUR,
        (ms % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE,
        (ms % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND,
        ms % MILLIS_PER_SECOND,
    )
}

/// Format a timestamp as SRT `hh:mm:ss,fff`. Hours are total elapsed hours.
pub fn format_srt_timestamp(time: TimeDelta) -> String {
    let (hours, minutes, seconds, millis) = clock_parts(time);
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Format a timestamp as ASS `h:mm:ss.cc`.
pub fn format_ass_timestamp(time: TimeDelta) -> String {
    let (hours, minutes, seconds, millis) = clock_parts(time);
    format!("{}:{:02}:{:02}.{:02}", hours, minutes, seconds, millis / 10)
}

/// Convert a timestamp to fractional milliseconds
pub(crate) fn to_millis_f64(time: TimeDelta) -> f64 {
    match time.num_microseconds() {
        Some(us) => us as f64 / 1_000.0,
        None => time.num_milliseconds() as f64,
    }
}

/// Convert fractional milliseconds back to a timestamp, rounded to the microsecond
pub(crate) fn from_millis_f64(ms: f64) -> TimeDelta {
    TimeDelta::microseconds((ms * 1_000.0).round() as i64)
}
