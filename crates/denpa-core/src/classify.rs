use chrono::{DateTime, Duration, Utc};

use crate::airtime::{parse_air_time, DEFAULT_EPISODE_DURATION_MIN};

/// Sentinel countdown while an episode is inside its airing window.
pub const AIRING_NOW: &str = "AIRING NOW";
/// Countdown for an episode whose air instant has just passed.
pub const JUST_AIRED: &str = "JUST AIRED";

/// Episodes older than this are stale, not "recently aired".
const RECENTLY_AIRED_DAYS: i64 = 7;

/// Which text convention `calculate_countdown` uses inside the airing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountdownStyle {
    /// The `"AIRING NOW"` sentinel, used by list and card views.
    #[default]
    Compact,
    /// Elapsed-aware wording, used by the in-page notification surface.
    Detailed,
}

/// True iff the resolved air instant is strictly in the future and within
/// 24 hours of `now`.
pub fn is_airing_today(now: DateTime<Utc>, air_date: &str, broadcast: &str) -> bool {
    match parse_air_time(air_date, broadcast) {
        Some(air) => air > now && air - now < Duration::hours(24),
        None => false,
    }
}

/// True iff `now` falls within `[air_start, air_start + duration]`, both
/// bounds inclusive. Duration defaults to 24 minutes.
pub fn is_currently_airing(
    now: DateTime<Utc>,
    air_date: &str,
    broadcast: &str,
    duration_minutes: Option<u32>,
) -> bool {
    let Some(air) = parse_air_time(air_date, broadcast) else {
        return false;
    };
    let duration = episode_duration(duration_minutes);
    air <= now && now <= air + duration
}

/// True iff the resolved instant is at or before `now` and within the last
/// seven days.
pub fn has_already_aired(now: DateTime<Utc>, air_date: &str, broadcast: &str) -> bool {
    let Some(air) = parse_air_time(air_date, broadcast) else {
        return false;
    };
    air <= now && now - air <= Duration::days(RECENTLY_AIRED_DAYS)
}

/// Human countdown to the resolved air instant.
///
/// Inside the airing window the text depends on `style`; outside the
/// airing-today window the result is empty and the caller decides the
/// fallback display.
pub fn calculate_countdown(
    now: DateTime<Utc>,
    air_date: &str,
    broadcast: &str,
    duration_minutes: Option<u32>,
    style: CountdownStyle,
) -> String {
    let Some(air) = parse_air_time(air_date, broadcast) else {
        return String::new();
    };

    if is_currently_airing(now, air_date, broadcast, duration_minutes) {
        return match style {
            CountdownStyle::Compact => AIRING_NOW.to_string(),
            CountdownStyle::Detailed => {
                let elapsed = (now - air).num_minutes();
                format!("Airing ({elapsed}m elapsed)")
            }
        };
    }

    if !is_airing_today(now, air_date, broadcast) {
        return String::new();
    }

    let diff = air - now;
    if diff <= Duration::zero() {
        return JUST_AIRED.to_string();
    }
    if diff < Duration::hours(1) {
        format!("{}m", diff.num_minutes())
    } else if diff < Duration::hours(24) {
        format!("{}h", diff.num_hours())
    } else if diff < Duration::days(30) {
        format!("{}d", diff.num_days())
    } else {
        String::new()
    }
}

/// Ephemeral per-tick classification. Never stored as source of truth.
#[derive(Debug, Clone, PartialEq)]
pub struct AirTimeInfo {
    pub air_time: DateTime<Utc>,
    pub is_airing_today: bool,
    pub is_currently_airing: bool,
    pub has_already_aired: bool,
    pub countdown: String,
    /// Elapsed fraction of the duration window, clamped to `[0, 1]`.
    /// Present only while currently airing.
    pub progress: Option<f64>,
}

/// Bundle every classification into one structure.
///
/// Returns `None` when the air date is absent or unresolvable.
pub fn get_air_time_info(
    now: DateTime<Utc>,
    air_date: Option<&str>,
    broadcast: Option<&str>,
    duration_minutes: Option<u32>,
) -> Option<AirTimeInfo> {
    let air_date = air_date?;
    let broadcast = broadcast?;
    let air_time = parse_air_time(air_date, broadcast)?;

    let currently_airing = is_currently_airing(now, air_date, broadcast, duration_minutes);
    let progress = currently_airing.then(|| {
        let elapsed = (now - air_time).num_milliseconds() as f64;
        let total = episode_duration(duration_minutes).num_milliseconds() as f64;
        (elapsed / total).clamp(0.0, 1.0)
    });

    Some(AirTimeInfo {
        air_time,
        is_airing_today: is_airing_today(now, air_date, broadcast),
        is_currently_airing: currently_airing,
        has_already_aired: has_already_aired(now, air_date, broadcast),
        countdown: calculate_countdown(
            now,
            air_date,
            broadcast,
            duration_minutes,
            CountdownStyle::Compact,
        ),
        progress,
    })
}

fn episode_duration(duration_minutes: Option<u32>) -> Duration {
    Duration::minutes(duration_minutes.unwrap_or(DEFAULT_EPISODE_DURATION_MIN) as i64)
}
