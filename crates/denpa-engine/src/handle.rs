use tokio::sync::mpsc::{self, UnboundedReceiver};

use denpa_core::clock::Clock;
use denpa_core::models::TrackedItem;

use crate::protocol::{EngineCommand, EngineEvent};
use crate::worker::EngineWorker;

/// Host-side handle to the notification engine.
///
/// Cheap to clone. All engine state lives on the worker thread and is only
/// reachable through commands, so a UI re-subscribe can never race an
/// in-flight timer callback.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<EngineCommand>,
}

impl EngineHandle {
    /// Spawn the engine on its own thread and return the event stream.
    pub fn spawn() -> Option<(Self, UnboundedReceiver<EngineEvent>)> {
        Self::spawn_with_clock(Clock::new())
    }

    /// Spawn with a caller-supplied clock, so host-side classification calls
    /// share the engine's (possibly offset) notion of now.
    pub fn spawn_with_clock(clock: Clock) -> Option<(Self, UnboundedReceiver<EngineEvent>)> {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        std::thread::Builder::new()
            .name("air-notify".into())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_time()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        tracing::error!("failed to build engine runtime: {e}");
                        return;
                    }
                };
                runtime.block_on(EngineWorker::new(clock, event_tx).run(cmd_rx));
            })
            .map_err(|e| tracing::error!("failed to spawn engine thread: {e}"))
            .ok()?;

        Some((Self { tx: cmd_tx }, event_rx))
    }

    pub fn start_watching(&self, items: Vec<TrackedItem>) {
        let _ = self.tx.send(EngineCommand::StartWatching { items });
    }

    pub fn stop_watching(&self) {
        let _ = self.tx.send(EngineCommand::StopWatching);
    }

    pub fn set_time_offset(&self, offset_ms: i64) {
        let _ = self.tx.send(EngineCommand::SetTimeOffset { offset_ms });
    }

    pub fn trigger_update(&self) {
        let _ = self.tx.send(EngineCommand::TriggerUpdate);
    }

    /// Terminal teardown. The worker thread exits as soon as it sees the
    /// shutdown command, even while other handle clones are still alive;
    /// anything those clones send afterwards is dropped.
    pub fn stop(self) {
        let _ = self.tx.send(EngineCommand::Shutdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Utc};
    use denpa_core::models::Episode;
    use std::time::Duration;

    fn currently_airing_item() -> TrackedItem {
        // Built from the real clock: the episode started this very minute,
        // expressed as a UTC broadcast so no zone arithmetic applies.
        let now = Utc::now();
        TrackedItem {
            id: "live".into(),
            title: Some("Live Series".into()),
            broadcast: Some(format!(
                "Todays at {:02}:{:02} (UTC)",
                now.hour(),
                now.minute()
            )),
            duration: Some("24 min per episode".into()),
            next_episode: Some(Episode {
                id: None,
                episode_number: 1,
                title_en: None,
                title_jp: None,
                air_date: Some(now.format("%Y-%m-%dT00:00:00Z").to_string()),
            }),
        }
    }

    #[tokio::test]
    async fn test_spawned_engine_round_trip() {
        let (engine, mut events) = EngineHandle::spawn().expect("engine thread");
        engine.start_watching(vec![currently_airing_item()]);

        // The immediate scheduling pass produces an airing notification and
        // a countdown update without waiting for the 5-second tick.
        let mut saw_notification = false;
        let mut saw_countdown = false;
        for _ in 0..2 {
            let event = tokio::time::timeout(Duration::from_secs(2), events.recv())
                .await
                .expect("event before timeout")
                .expect("engine alive");
            match event {
                EngineEvent::Notification { .. } => saw_notification = true,
                EngineEvent::Countdown { is_airing, .. } => saw_countdown = is_airing,
            }
        }
        assert!(saw_notification);
        assert!(saw_countdown);

        engine.stop();
    }

    #[tokio::test]
    async fn test_stop_halts_worker_with_clones_alive() {
        let (engine, mut events) = EngineHandle::spawn().expect("engine thread");
        let survivor = engine.clone();
        engine.start_watching(vec![currently_airing_item()]);

        engine.stop();
        // The worker exits and drops its event sender, so the stream ends
        // even though another handle clone is still held.
        loop {
            match tokio::time::timeout(Duration::from_secs(2), events.recv()).await {
                // Events emitted before the shutdown was seen.
                Ok(Some(_)) => continue,
                Ok(None) => break,
                Err(_) => panic!("worker kept running after stop"),
            }
        }

        // Commands from the surviving clone land in a closed channel and
        // are silently dropped.
        survivor.trigger_update();
    }

    #[tokio::test]
    async fn test_trigger_update_reaches_worker() {
        let (engine, mut events) = EngineHandle::spawn().expect("engine thread");
        engine.start_watching(vec![currently_airing_item()]);

        engine.trigger_update();
        // At least one event arrives; exact count depends on tick timing.
        let event = tokio::time::timeout(Duration::from_secs(2), events.recv())
            .await
            .expect("event before timeout");
        assert!(event.is_some());
    }
}
