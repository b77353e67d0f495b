use serde::{Deserialize, Serialize};

use crate::airtime::{parse_duration_to_minutes, DEFAULT_EPISODE_DURATION_MIN};

/// One episode of a series, as supplied by the data source.
///
/// `air_date` is the ISO-8601 instant for the broadcast *calendar day* in the
/// originating timezone; the clock time comes from the series' broadcast
/// string and is resolved separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    #[serde(default)]
    pub id: Option<String>,
    pub episode_number: u32,
    #[serde(default)]
    pub title_en: Option<String>,
    #[serde(default)]
    pub title_jp: Option<String>,
    #[serde(default)]
    pub air_date: Option<String>,
}

impl Episode {
    /// Returns the best available display title.
    pub fn display_title(&self) -> String {
        self.title_en
            .clone()
            .or_else(|| self.title_jp.clone())
            .unwrap_or_else(|| format!("Episode {}", self.episode_number))
    }
}

/// Identity and schedule for one tracked series.
///
/// An item with no `broadcast` or no next-episode air date cannot be
/// scheduled or classified; every consumer skips it silently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedItem {
    /// Opaque stable identifier.
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Human-readable schedule, e.g. `"Saturdays at 20:50 (JST)"`.
    #[serde(default)]
    pub broadcast: Option<String>,
    /// Free-text episode duration, e.g. `"24 min per episode"`.
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub next_episode: Option<Episode>,
}

impl TrackedItem {
    /// Episode length in minutes, extracted from the free-text duration.
    pub fn duration_minutes(&self) -> u32 {
        self.duration
            .as_deref()
            .and_then(parse_duration_to_minutes)
            .unwrap_or(DEFAULT_EPISODE_DURATION_MIN)
    }

    /// Air date of the next episode, if the source supplied one.
    pub fn air_date(&self) -> Option<&str> {
        self.next_episode.as_ref()?.air_date.as_deref()
    }

    pub fn preferred_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(duration: Option<&str>) -> TrackedItem {
        TrackedItem {
            id: "1".into(),
            title: None,
            broadcast: None,
            duration: duration.map(String::from),
            next_episode: None,
        }
    }

    #[test]
    fn test_duration_minutes_extracts_first_integer() {
        assert_eq!(item(Some("24 min per episode")).duration_minutes(), 24);
        assert_eq!(item(Some("1 hr 45 min")).duration_minutes(), 1);
    }

    #[test]
    fn test_duration_minutes_defaults() {
        assert_eq!(item(None).duration_minutes(), 24);
        assert_eq!(item(Some("unknown")).duration_minutes(), 24);
    }

    #[test]
    fn test_episode_display_title_fallbacks() {
        let ep = Episode {
            id: None,
            episode_number: 7,
            title_en: None,
            title_jp: None,
            air_date: None,
        };
        assert_eq!(ep.display_title(), "Episode 7");

        let ep = Episode {
            title_jp: Some("約束".into()),
            ..ep
        };
        assert_eq!(ep.display_title(), "約束");
    }

    #[test]
    fn test_camel_case_wire_shape() {
        let json = serde_json::json!({
            "id": "1535",
            "broadcast": "Saturdays at 20:50 (JST)",
            "nextEpisode": {
                "episodeNumber": 12,
                "titleEn": "Kira",
                "airDate": "2025-08-30"
            }
        });
        let item: TrackedItem = serde_json::from_value(json).unwrap();
        assert_eq!(item.next_episode.unwrap().episode_number, 12);
    }
}
