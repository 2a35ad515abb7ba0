//! Timestamps in the `asctime` layout duplicity prints, e.g.
//! `Tue Oct 11 11:02:01 2016`.

use chrono::{NaiveDateTime, TimeDelta, Timelike, Weekday};

const ASCTIME_WITHOUT_WEEKDAY: &str = "%b %e %H:%M:%S %Y";

/// Parse an `asctime`-style timestamp into a naive (local) date-time.
///
/// Month and weekday names are English whatever the runtime locale. The
/// weekday must be a valid abbreviation but is not checked against the date.
/// Days may be space padded (`Oct  4`). A leap second (`:60`) rolls over to
/// second 0 of the following minute, as `mktime` normalises it.
pub fn parse_asctime(text: &str) -> Result<NaiveDateTime, String> {
    let text = text.trim_start();
    let (weekday, rest) = text
        .split_once(char::is_whitespace)
        .ok_or_else(|| format!("expected weekday and date, found {text:?}"))?;

    if weekday.len() != 3 || !weekday.starts_with(char::is_uppercase) {
        return Err(format!("unknown weekday {weekday:?}"));
    }
    weekday
        .parse::<Weekday>()
        .map_err(|_| format!("unknown weekday {weekday:?}"))?;

    let parsed = NaiveDateTime::parse_from_str(rest, ASCTIME_WITHOUT_WEEKDAY)
        .map_err(|e| format!("{e} in {rest:?}"))?;

    if parsed.nanosecond() >= 1_000_000_000 {
        let whole = parsed.with_nanosecond(0).unwrap_or(parsed);
        return Ok(whole + TimeDelta::seconds(1));
    }

    Ok(parsed)
}
