mod config;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use denpa_engine::{CountdownStore, EngineEvent, EngineHandle};

use crate::config::{WatchdError, Watchlist};

#[derive(Parser, Debug)]
#[command(
    name = "denpa-watchd",
    about = "Broadcast-time notification daemon for tracked anime"
)]
struct Args {
    /// Path to the TOML watchlist (defaults to the user config dir).
    #[arg(long)]
    watchlist: Option<PathBuf>,

    /// Shift the engine clock by this many milliseconds, for demoing
    /// time-sensitive behavior without waiting for a broadcast window.
    #[arg(long, default_value_t = 0)]
    time_offset_ms: i64,

    /// Emit one countdown pass, print the state, and exit.
    #[arg(long)]
    tick_once: bool,
}

#[tokio::main]
async fn main() -> Result<(), WatchdError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "denpa=info".into()),
        )
        .init();

    let args = Args::parse();

    let path = args.watchlist.unwrap_or_else(Watchlist::default_path);
    let watchlist = Watchlist::load(&path)?;
    tracing::info!(
        items = watchlist.items.len(),
        path = %path.display(),
        "loaded watchlist"
    );

    let (engine, mut events) = EngineHandle::spawn()
        .ok_or_else(|| WatchdError::Engine("failed to start engine thread".into()))?;

    if args.time_offset_ms != 0 {
        tracing::info!(offset_ms = args.time_offset_ms, "applying dev time offset");
        engine.set_time_offset(args.time_offset_ms);
    }
    engine.start_watching(watchlist.items);
    engine.trigger_update();

    let mut store = CountdownStore::new();

    if args.tick_once {
        // Give the immediate pass a moment to land, then report and exit.
        tokio::time::sleep(Duration::from_secs(1)).await;
        while let Ok(event) = events.try_recv() {
            log_event(&event);
            store.apply(&event);
        }
        for (id, entry) in store.snapshot() {
            tracing::info!(
                item = %id,
                countdown = %entry.countdown,
                airing = entry.is_airing,
                aired = entry.has_aired,
                "state"
            );
        }
        engine.stop();
        return Ok(());
    }

    while let Some(event) = events.recv().await {
        log_event(&event);
        store.apply(&event);
    }

    Ok(())
}

fn log_event(event: &EngineEvent) {
    match event {
        EngineEvent::Notification {
            notification_type,
            item,
            episode,
        } => {
            tracing::info!(
                item = %item.preferred_title(),
                episode = episode.episode_number,
                kind = notification_type.as_str(),
                "notification"
            );
        }
        EngineEvent::Countdown {
            item_id,
            countdown,
            is_airing,
            progress,
            ..
        } => {
            tracing::debug!(
                item = %item_id,
                countdown = %countdown,
                airing = is_airing,
                progress = progress.unwrap_or(0.0),
                "countdown"
            );
        }
    }
}
