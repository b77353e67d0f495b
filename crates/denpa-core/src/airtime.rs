use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use regex::Regex;

/// Fallback episode length when the source supplies none.
pub const DEFAULT_EPISODE_DURATION_MIN: u32 = 24;

/// JST is UTC+9; broadcasts before 09:00 JST land on the previous UTC day.
const JST_OFFSET_HOURS: u32 = 9;

// ── Regex patterns (compiled once) ──────────────────────────────

static RE_CLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2}):(\d{2})\b").unwrap());

static RE_ZONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([A-Z]{3,4})\)").unwrap());

static RE_FIRST_INT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)").unwrap());

/// Extract the first integer from a free-text duration
/// (`"24 min per episode"` → `24`).
pub fn parse_duration_to_minutes(text: &str) -> Option<u32> {
    let caps = RE_FIRST_INT.captures(text)?;
    caps[1].parse().ok()
}

/// Resolve a calendar-day air date plus a human broadcast string
/// (`"Saturdays at 20:50 (JST)"`) into the absolute UTC instant of broadcast.
///
/// Only the clock time and the parenthesized zone abbreviation matter; the
/// day-of-week text is ignored. A missing zone is assumed to be JST. Zones
/// other than JST are not offset-converted: their clock time is applied
/// directly as UTC wall time on the air-date day. Seconds are always zeroed.
///
/// Returns `None` when either input is empty or the air date is unparseable.
/// A broadcast string with no recognizable clock time falls back to the raw
/// air date.
pub fn parse_air_time(air_date: &str, broadcast: &str) -> Option<DateTime<Utc>> {
    if air_date.is_empty() || broadcast.is_empty() {
        return None;
    }
    let base = parse_air_date(air_date)?;

    let clock = RE_CLOCK.captures(broadcast).and_then(|caps| {
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        (hour < 24 && minute < 60).then_some((hour, minute))
    });
    let Some((hour, minute)) = clock else {
        return zero_seconds(base);
    };

    let zone = RE_ZONE
        .captures(broadcast)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| "JST".to_string());

    let day = base.date_naive();
    let (day, utc_hour) = if zone == "JST" {
        if hour >= JST_OFFSET_HOURS {
            (day, hour - JST_OFFSET_HOURS)
        } else {
            (day.pred_opt()?, hour + 24 - JST_OFFSET_HOURS)
        }
    } else {
        (day, hour)
    };

    let time = NaiveTime::from_hms_opt(utc_hour, minute, 0)?;
    Some(day.and_time(time).and_utc())
}

/// Convenience wrapper over [`parse_air_time`] for callers holding optional
/// fields straight from the data source.
pub fn get_air_date_time(
    air_date: Option<&str>,
    broadcast: Option<&str>,
) -> Option<DateTime<Utc>> {
    parse_air_time(air_date?, broadcast?)
}

/// Parse either a full RFC 3339 instant or a bare `YYYY-MM-DD` date.
fn parse_air_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(date.and_time(NaiveTime::MIN).and_utc())
}

fn zero_seconds(dt: DateTime<Utc>) -> Option<DateTime<Utc>> {
    dt.with_second(0)?.with_nanosecond(0)
}
