use serde::{Deserialize, Serialize};

use denpa_core::models::{Episode, TrackedItem};

/// Commands posted into the engine worker. The host never touches worker
/// state directly; this enum is the entire surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EngineCommand {
    /// Replace the watched set: clears every pending timer and the
    /// notified-set, then re-arms from scratch.
    StartWatching { items: Vec<TrackedItem> },
    /// Cancel pending timers. The notified-set survives so a later re-arm in
    /// the same session does not re-fire sent notifications.
    StopWatching,
    /// Shift the engine's notion of "now". Zero restores real time.
    SetTimeOffset { offset_ms: i64 },
    /// Force one off-cycle countdown pass.
    TriggerUpdate,
    /// Terminate the worker thread. Commands sent afterwards are dropped.
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationType {
    Warning,
    AiringSoon,
    Airing,
    FinishedAiring,
}

impl NotificationType {
    /// Stable wire and deduplication name.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Warning => "warning",
            NotificationType::AiringSoon => "airing-soon",
            NotificationType::Airing => "airing",
            NotificationType::FinishedAiring => "finished-airing",
        }
    }
}

/// Events emitted by the engine to its subscriber.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EngineEvent {
    Notification {
        notification_type: NotificationType,
        item: TrackedItem,
        episode: Episode,
    },
    Countdown {
        item_id: String,
        countdown: String,
        is_airing: bool,
        has_aired: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        progress: Option<f64>,
    },
}
