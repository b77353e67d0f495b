use std::collections::HashSet;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use denpa_core::classify::{self, CountdownStyle};
use denpa_core::clock::Clock;
use denpa_core::models::TrackedItem;
use denpa_core::parse_air_time;

use crate::protocol::{EngineCommand, EngineEvent, NotificationType};

/// How often countdown updates are recomputed for every tracked item.
pub const TICK_INTERVAL: StdDuration = StdDuration::from_secs(5);

/// Lead time for the pre-air warning notification.
const WARNING_LEAD_MIN: i64 = 5;

/// Items whose air instant is further than this from "now" are not armed.
const SCHEDULE_WINDOW_HOURS: i64 = 24;

/// Sleep used when no timer is pending; the select loop re-evaluates on every
/// command and tick anyway.
const IDLE_WAIT: StdDuration = StdDuration::from_secs(3600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    Warning,
    Airing,
}

#[derive(Debug, Clone)]
struct PendingTimer {
    fire_at: DateTime<Utc>,
    kind: TimerKind,
    item_index: usize,
}

/// The engine state machine. Lives on its own thread; all state is owned
/// here and reachable only through [`EngineCommand`]s.
pub(crate) struct EngineWorker {
    clock: Clock,
    events: UnboundedSender<EngineEvent>,
    items: Vec<TrackedItem>,
    /// Countdown passes only run between StartWatching and StopWatching.
    watching: bool,
    timers: Vec<PendingTimer>,
    notified: HashSet<String>,
    /// Item ids observed inside their airing window on the previous
    /// countdown pass.
    airing_last_tick: HashSet<String>,
}

impl EngineWorker {
    pub(crate) fn new(clock: Clock, events: UnboundedSender<EngineEvent>) -> Self {
        Self {
            clock,
            events,
            items: Vec::new(),
            watching: false,
            timers: Vec::new(),
            notified: HashSet::new(),
            airing_last_tick: HashSet::new(),
        }
    }

    pub(crate) async fn run(mut self, mut commands: UnboundedReceiver<EngineCommand>) {
        let mut tick = tokio::time::interval(TICK_INTERVAL);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            let wait = self.next_timer_wait();
            tokio::select! {
                cmd = commands.recv() => {
                    match cmd {
                        Some(EngineCommand::Shutdown) => break,
                        Some(cmd) => self.handle_command(cmd),
                        // Every handle dropped: terminal stop.
                        None => break,
                    }
                }
                _ = tick.tick() => self.emit_countdowns(),
                _ = tokio::time::sleep(wait), if !self.timers.is_empty() => {
                    self.fire_due_timers();
                }
            }
        }

        tracing::debug!("engine worker stopped");
    }

    fn next_timer_wait(&self) -> StdDuration {
        let Some(earliest) = self.timers.iter().map(|t| t.fire_at).min() else {
            return IDLE_WAIT;
        };
        (earliest - self.clock.now())
            .to_std()
            .unwrap_or(StdDuration::ZERO)
    }

    fn handle_command(&mut self, cmd: EngineCommand) {
        match cmd {
            EngineCommand::StartWatching { items } => {
                tracing::debug!(count = items.len(), "start watching");
                self.watching = true;
                self.timers.clear();
                self.notified.clear();
                self.airing_last_tick.clear();
                self.items = items;
                self.arm_timers();
                // Fresh subscribers get data before the first natural tick.
                self.emit_countdowns();
            }
            EngineCommand::StopWatching => {
                // The notified-set survives so a re-arm in the same session
                // does not re-fire already-sent notifications. Items stay
                // too; SetTimeOffset can still re-arm against them.
                self.watching = false;
                self.timers.clear();
            }
            EngineCommand::SetTimeOffset { offset_ms } => {
                self.clock.set_offset_ms(offset_ms);
                // Armed deadlines were computed against the old "now".
                self.timers.clear();
                self.arm_timers();
            }
            EngineCommand::TriggerUpdate => self.emit_countdowns(),
            // Intercepted by the run loop; nothing to do at this level.
            EngineCommand::Shutdown => {}
        }
    }

    /// One scheduling pass over the current item list.
    fn arm_timers(&mut self) {
        let now = self.clock.now();
        let window = Duration::hours(SCHEDULE_WINDOW_HOURS);
        let mut fire_now: Vec<(usize, NotificationType)> = Vec::new();

        for (index, item) in self.items.iter().enumerate() {
            let Some(air) = resolved_air_time(item) else {
                tracing::debug!(id = %item.id, "skipping unschedulable item");
                continue;
            };
            let distance = air - now;
            if distance > window || distance < -window {
                continue;
            }

            let duration = Duration::minutes(item.duration_minutes() as i64);
            if air <= now && now <= air + duration {
                // Already inside the airing window: notify once, no timer.
                fire_now.push((index, NotificationType::Airing));
                continue;
            }

            let warning_at = air - Duration::minutes(WARNING_LEAD_MIN);
            if warning_at <= now && now < air {
                // The five-minute mark has already passed.
                fire_now.push((index, NotificationType::AiringSoon));
            } else if warning_at > now && warning_at - now < window {
                self.timers.push(PendingTimer {
                    fire_at: warning_at,
                    kind: TimerKind::Warning,
                    item_index: index,
                });
            }

            if air > now && distance < window {
                self.timers.push(PendingTimer {
                    fire_at: air,
                    kind: TimerKind::Airing,
                    item_index: index,
                });
            }
        }

        for (index, kind) in fire_now {
            self.notify(index, kind);
        }
    }

    fn fire_due_timers(&mut self) {
        let now = self.clock.now();
        let mut due = Vec::new();
        self.timers.retain(|timer| {
            if timer.fire_at <= now {
                due.push(timer.clone());
                false
            } else {
                true
            }
        });

        for timer in due {
            let kind = match timer.kind {
                TimerKind::Warning => NotificationType::Warning,
                TimerKind::Airing => NotificationType::Airing,
            };
            self.notify(timer.item_index, kind);
        }
    }

    /// Emit one countdown update per still-relevant item, plus any
    /// airing-window-exit notifications observed since the last pass.
    fn emit_countdowns(&mut self) {
        if !self.watching {
            return;
        }
        let now = self.clock.now();
        let window = Duration::hours(SCHEDULE_WINDOW_HOURS);
        let mut airing_now: HashSet<String> = HashSet::new();
        let mut finished: Vec<usize> = Vec::new();

        for (index, item) in self.items.iter().enumerate() {
            let duration = Some(item.duration_minutes());
            let Some(info) = classify::get_air_time_info(
                now,
                item.air_date(),
                item.broadcast.as_deref(),
                duration,
            ) else {
                continue;
            };
            let distance = info.air_time - now;
            if distance > window || distance < -window {
                continue;
            }

            if info.is_currently_airing {
                airing_now.insert(item.id.clone());
            } else if self.airing_last_tick.contains(&item.id) && info.has_already_aired {
                finished.push(index);
            }

            let countdown = if info.is_currently_airing {
                classify::calculate_countdown(
                    now,
                    item.air_date().unwrap_or_default(),
                    item.broadcast.as_deref().unwrap_or_default(),
                    duration,
                    CountdownStyle::Detailed,
                )
            } else {
                info.countdown
            };

            let _ = self.events.send(EngineEvent::Countdown {
                item_id: item.id.clone(),
                countdown,
                is_airing: info.is_currently_airing,
                has_aired: info.has_already_aired,
                progress: info.progress,
            });
        }

        self.airing_last_tick = airing_now;
        for index in finished {
            self.notify(index, NotificationType::FinishedAiring);
        }
    }

    /// Send one notification, deduplicated per (type, item, episode) for the
    /// lifetime of the watching session.
    fn notify(&mut self, item_index: usize, kind: NotificationType) {
        let Some(item) = self.items.get(item_index) else {
            tracing::warn!(index = item_index, "notification for unknown item index");
            return;
        };
        let Some(episode) = item.next_episode.clone() else {
            return;
        };

        let key = format!("{}-{}-{}", kind.as_str(), item.id, episode.episode_number);
        if !self.notified.insert(key) {
            return;
        }

        tracing::info!(
            id = %item.id,
            episode = episode.episode_number,
            kind = kind.as_str(),
            "notification"
        );
        let _ = self.events.send(EngineEvent::Notification {
            notification_type: kind,
            item: item.clone(),
            episode,
        });
    }
}

/// The absolute UTC air instant of an item's next episode, if resolvable.
fn resolved_air_time(item: &TrackedItem) -> Option<DateTime<Utc>> {
    parse_air_time(item.air_date()?, item.broadcast.as_deref()?)
}
