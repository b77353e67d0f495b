use chrono::{DateTime, Duration, Utc};

use crate::airtime::parse_air_time;
use crate::models::Episode;

/// How far back a past episode still counts as the "next" one to surface.
const TRAILING_WINDOW_HOURS: i64 = 24;

/// The single most relevant episode of a series and its resolved air instant.
#[derive(Debug, Clone, PartialEq)]
pub struct NextEpisode {
    pub episode: Episode,
    pub air_time: DateTime<Utc>,
}

/// Pick the most relevant episode: the soonest upcoming one, falling back to
/// the most recent one that aired within the last 24 hours.
///
/// Source ordering is not trusted; episodes are ordered by number before
/// scanning. Episodes with no air date or an unresolvable schedule are
/// skipped.
pub fn find_next_episode(
    episodes: &[Episode],
    broadcast: Option<&str>,
    now: DateTime<Utc>,
) -> Option<NextEpisode> {
    if episodes.is_empty() {
        return None;
    }
    let broadcast = broadcast?;

    let mut ordered: Vec<&Episode> = episodes.iter().collect();
    ordered.sort_by_key(|ep| ep.episode_number);

    let mut soonest_upcoming: Option<NextEpisode> = None;
    let mut latest_recent: Option<NextEpisode> = None;

    for episode in ordered {
        let Some(air_date) = episode.air_date.as_deref() else {
            continue;
        };
        let Some(air_time) = parse_air_time(air_date, broadcast) else {
            continue;
        };

        if air_time > now {
            let sooner = soonest_upcoming
                .as_ref()
                .map_or(true, |best| air_time < best.air_time);
            if sooner {
                soonest_upcoming = Some(NextEpisode {
                    episode: episode.clone(),
                    air_time,
                });
            }
        } else if now - air_time <= Duration::hours(TRAILING_WINDOW_HOURS) {
            let later = latest_recent
                .as_ref()
                .map_or(true, |best| air_time > best.air_time);
            if later {
                latest_recent = Some(NextEpisode {
                    episode: episode.clone(),
                    air_time,
                });
            }
        }
    }

    soonest_upcoming.or(latest_recent)
}
