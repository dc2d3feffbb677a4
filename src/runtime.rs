// Single-owner event loop
// Every input (gestures, timer ticks, media signals) is handled to completion on
// one task, in arrival order. After each event the new view snapshot is published.
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::audio::headless::{CallLog, HeadlessBackend};
use crate::audio::MediaEvent;
use crate::commands::Command;
use crate::error::ConfigError;
use crate::settings::AppSettings;
use crate::state::{AppState, ViewSnapshot};
use crate::timer::{TickEvent, TokioScheduler};

/// Inputs from the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Command(Command),
    Shutdown,
}

pub struct Runtime {
    state: AppState,
    ticks: UnboundedReceiver<TickEvent>,
    media: UnboundedReceiver<MediaEvent>,
    snapshots: watch::Sender<ViewSnapshot>,
    media_log: CallLog,
}

impl Runtime {
    /// Runtime backed by headless media sources and tokio tickers
    pub fn headless(settings: &AppSettings) -> Result<Self, ConfigError> {
        let catalog = settings.build_catalog()?;
        let (tick_tx, ticks) = mpsc::unbounded_channel();
        let (media_tx, media) = mpsc::unbounded_channel();

        let backend = HeadlessBackend::with_signals(media_tx);
        let media_log = backend.log();
        let scheduler = Box::new(TokioScheduler::new(tick_tx));
        let state = AppState::new(settings, catalog, &backend, scheduler);
        let (snapshots, _) = watch::channel(state.snapshot());

        Ok(Self {
            state,
            ticks,
            media,
            snapshots,
            media_log,
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.snapshots.subscribe()
    }

    /// Calls made on the media sources so far
    pub fn media_log(&self) -> CallLog {
        self.media_log.clone()
    }

    /// Run until `Shutdown` arrives or every event sender is gone. The state is
    /// torn down before returning, so no ticker outlives the loop.
    pub async fn run(self, mut events: UnboundedReceiver<AppEvent>) -> ViewSnapshot {
        let Runtime {
            mut state,
            mut ticks,
            mut media,
            snapshots,
            ..
        } = self;
        info!("runtime: starting event loop");

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    None => {
                        info!("runtime: event channel closed, shutting down");
                        break;
                    }
                    Some(AppEvent::Shutdown) => {
                        info!("runtime: shutdown requested");
                        break;
                    }
                    Some(AppEvent::Command(command)) => {
                        info!(?command, "runtime: command");
                        state.dispatch(command);
                    }
                },
                Some(tick) = ticks.recv() => {
                    if let Some(event) = state.on_tick(tick) {
                        debug!(?event, "runtime: timer");
                    }
                }
                Some((channel, signal)) = media.recv() => {
                    state.on_media_signal(channel, signal);
                }
            }
            publish(&snapshots, &state);
        }

        state.shutdown();
        publish(&snapshots, &state);
        state.snapshot()
    }
}

fn publish(snapshots: &watch::Sender<ViewSnapshot>, state: &AppState) {
    let snapshot = state.snapshot();
    snapshots.send_if_modified(|current| {
        if *current == snapshot {
            return false;
        }
        *current = snapshot;
        true
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::headless::SourceOp;
    use crate::audio::{MediaChannel, PlayerStatus};
    use crate::scene::SceneId;
    use crate::state::View;
    use crate::timer::{BreathPhase, TimerMode};
    use std::time::Duration;

    fn one_minute() -> AppSettings {
        let mut settings = AppSettings::default();
        settings.timer.minutes = 1;
        settings
    }

    fn send(tx: &mpsc::UnboundedSender<AppEvent>, command: Command) {
        tx.send(AppEvent::Command(command)).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_runs_to_expiry() {
        let runtime = Runtime::headless(&one_minute()).unwrap();
        let snapshots = runtime.subscribe();
        let (tx, rx) = mpsc::unbounded_channel();
        let core = tokio::spawn(runtime.run(rx));

        send(&tx, Command::SelectScene { scene: SceneId::Rain });
        send(&tx, Command::StartTimer);

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        {
            let snapshot = snapshots.borrow();
            assert_eq!(snapshot.view, View::Player(SceneId::Rain));
            assert_eq!(snapshot.status, PlayerStatus::Playing);
            assert_eq!(snapshot.timer.pre_start_countdown, Some(2));
        }

        tokio::time::sleep(Duration::from_secs(2)).await;
        {
            let snapshot = snapshots.borrow();
            assert!(snapshot.timer.is_running);
            assert_eq!(snapshot.timer.remaining_seconds, 60);
        }

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(snapshots.borrow().timer.remaining_seconds, 30);

        tokio::time::sleep(Duration::from_secs(31)).await;
        {
            let snapshot = snapshots.borrow();
            assert!(!snapshot.timer.is_running);
            assert_eq!(snapshot.timer.remaining_seconds, 0);
            // Expiry does not pause by default
            assert!(snapshot.playback.is_main_playing);
        }

        drop(tx);
        let last = core.await.unwrap();
        assert_eq!(last.view, View::Home);
    }

    #[tokio::test(start_paused = true)]
    async fn test_breath_phase_follows_wall_clock() {
        let runtime = Runtime::headless(&one_minute()).unwrap();
        let snapshots = runtime.subscribe();
        let (tx, rx) = mpsc::unbounded_channel();
        let core = tokio::spawn(runtime.run(rx));

        send(&tx, Command::SelectScene { scene: SceneId::Night });
        send(&tx, Command::SwitchTimerMode);
        send(&tx, Command::StartTimer);

        // Running from t=3s; breath flips at 7s, 11s
        tokio::time::sleep(Duration::from_millis(3_500)).await;
        assert_eq!(snapshots.borrow().timer.mode, TimerMode::Breath);
        assert_eq!(snapshots.borrow().timer.breath_phase, Some(BreathPhase::In));

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(snapshots.borrow().timer.breath_phase, Some(BreathPhase::Out));
        assert_eq!(snapshots.borrow().timer.remaining_seconds, 56);

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(snapshots.borrow().timer.breath_phase, Some(BreathPhase::In));

        tx.send(AppEvent::Shutdown).unwrap();
        core.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_go_home_stops_ticking() {
        let runtime = Runtime::headless(&one_minute()).unwrap();
        let snapshots = runtime.subscribe();
        let log = runtime.media_log();
        let (tx, rx) = mpsc::unbounded_channel();
        let core = tokio::spawn(runtime.run(rx));

        send(&tx, Command::SelectScene { scene: SceneId::Forest });
        send(&tx, Command::StartTimer);
        tokio::time::sleep(Duration::from_millis(5_500)).await;
        assert_eq!(snapshots.borrow().timer.remaining_seconds, 58);

        send(&tx, Command::GoHome);
        tokio::time::sleep(Duration::from_secs(10)).await;
        {
            let snapshot = snapshots.borrow();
            assert_eq!(snapshot.view, View::Home);
            assert!(!snapshot.timer.is_running);
            assert_eq!(snapshot.timer.remaining_seconds, 60);
            assert_eq!(snapshot.status, PlayerStatus::Idle);
        }
        assert_eq!(log.count(MediaChannel::Main, &SourceOp::Pause), 1);

        tx.send(AppEvent::Shutdown).unwrap();
        core.await.unwrap();
    }
}
