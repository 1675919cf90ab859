use chrono::{DateTime, Duration, FixedOffset, Local, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{GuideError, GuideResult};

/// chrono pattern for XMLTV timestamps, e.g. `20240324013000 -0700`.
pub const XMLTV_TIME_FORMAT: &str = "%Y%m%d%H%M%S %z";

/// Human-readable form of [`XMLTV_TIME_FORMAT`] used in error messages.
pub const XMLTV_TIME_LAYOUT: &str = "yyyyMMddHHmmss ±hhmm";

/// Minutes in one (offset-local) day.
pub const MINUTES_PER_DAY: u32 = 1440;

/// Fourteen digits, one space, signed four-digit offset. Nothing else.
static XMLTV_TIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{14} [+-]\d{4}$").expect("Failed to compile XMLTV timestamp regex")
});

/// Parse an XMLTV timestamp (`yyyyMMddHHmmss ±hhmm`) into an offset-aware instant.
///
/// The offset is kept as written in the feed; no zone conversion happens here.
pub fn parse_xmltv_time(value: &str) -> GuideResult<DateTime<FixedOffset>> {
    if !XMLTV_TIME_REGEX.is_match(value) {
        return Err(GuideError::invalid_format(value, XMLTV_TIME_LAYOUT));
    }

    DateTime::parse_from_str(value, XMLTV_TIME_FORMAT)
        .map_err(|_| GuideError::invalid_format(value, XMLTV_TIME_LAYOUT))
}

/// Whole minutes from `from` to `to`, truncated toward zero.
pub fn whole_minutes(from: DateTime<FixedOffset>, to: DateTime<FixedOffset>) -> i64 {
    (to - from).num_minutes()
}

/// Minutes elapsed since offset-local midnight, ignoring seconds.
pub fn minutes_since_midnight(instant: &DateTime<FixedOffset>) -> u32 {
    instant.hour() * 60 + instant.minute()
}

/// The latest `midnight + k * slot_width` boundary at or before `instant`.
///
/// `slot_width` must be non-zero; callers validate it beforehand.
pub fn align_to_slot(instant: DateTime<FixedOffset>, slot_width: u32) -> DateTime<FixedOffset> {
    let minutes = minutes_since_midnight(&instant);
    let aligned = (minutes / slot_width) * slot_width;

    instant
        - Duration::minutes(i64::from(minutes - aligned))
        - Duration::seconds(i64::from(instant.second()))
        - Duration::nanoseconds(i64::from(instant.nanosecond()))
}

/// Current instant in the server's local offset.
pub fn current_instant() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}
