// Cancellable periodic tickers
// A ticker lives exactly as long as its guard: dropping the guard cancels it.
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::trace;

pub const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);
pub const BREATH_PERIOD: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum TickKind {
    /// One-second countdown, drives pre-start and the session countdown
    Countdown,
    /// Four-second inhale/exhale alternation
    Breath,
}

impl TickKind {
    pub fn period(self) -> Duration {
        match self {
            TickKind::Countdown => COUNTDOWN_PERIOD,
            TickKind::Breath => BREATH_PERIOD,
        }
    }
}

/// A tick delivered by a scheduler. `ticker` identifies the guard that produced it,
/// so ticks still queued after cancellation can be told apart from live ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickEvent {
    pub kind: TickKind,
    pub ticker: u64,
}

/// Owning handle for a running ticker
pub struct TickerGuard {
    kind: TickKind,
    id: u64,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TickerGuard {
    pub fn new(kind: TickKind, id: u64, cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            kind,
            id,
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn accepts(&self, tick: TickEvent) -> bool {
        tick.kind == self.kind && tick.ticker == self.id
    }
}

impl Drop for TickerGuard {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            trace!(kind = ?self.kind, id = self.id, "ticker cancelled");
            cancel();
        }
    }
}

impl std::fmt::Debug for TickerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickerGuard")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .finish()
    }
}

/// Source of periodic ticks for the timer
pub trait TickScheduler: Send {
    fn schedule(&self, kind: TickKind) -> TickerGuard;
}

/// Spawns a tokio interval per ticker and forwards its ticks into a channel.
/// Must be used from within a tokio runtime.
pub struct TokioScheduler {
    ticks: UnboundedSender<TickEvent>,
    next_id: AtomicU64,
}

impl TokioScheduler {
    pub fn new(ticks: UnboundedSender<TickEvent>) -> Self {
        Self {
            ticks,
            next_id: AtomicU64::new(1),
        }
    }
}

impl TickScheduler for TokioScheduler {
    fn schedule(&self, kind: TickKind) -> TickerGuard {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let tx = self.ticks.clone();
        let period = kind.period();

        let handle = tokio::spawn(async move {
            // First tick one full period after start, not immediately
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(TickEvent { kind, ticker: id }).is_err() {
                    break;
                }
            }
        });

        trace!(?kind, id, "ticker started");
        TickerGuard::new(kind, id, move || handle.abort())
    }
}

/// Scheduler that never fires on its own. Tests drive it by handing
/// `next_tick` results to the timer, and inspect which tickers are alive.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    live: Arc<Mutex<BTreeSet<(TickKind, u64)>>>,
    next_id: Arc<AtomicU64>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tick from the live ticker of `kind`, if one is running
    pub fn next_tick(&self, kind: TickKind) -> Option<TickEvent> {
        self.live
            .lock()
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|&(kind, ticker)| TickEvent { kind, ticker })
    }

    pub fn is_live(&self, kind: TickKind) -> bool {
        self.next_tick(kind).is_some()
    }

    pub fn live_count(&self) -> usize {
        self.live.lock().len()
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule(&self, kind: TickKind) -> TickerGuard {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.live.lock().insert((kind, id));
        let live = Arc::clone(&self.live);
        TickerGuard::new(kind, id, move || {
            live.lock().remove(&(kind, id));
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_manual_guard_drop_releases_ticker() {
        let scheduler = ManualScheduler::new();
        let guard = scheduler.schedule(TickKind::Breath);
        assert!(scheduler.is_live(TickKind::Breath));
        assert!(!scheduler.is_live(TickKind::Countdown));

        let tick = scheduler.next_tick(TickKind::Breath).unwrap();
        assert!(guard.accepts(tick));

        drop(guard);
        assert_eq!(scheduler.live_count(), 0);
    }

    #[test]
    fn test_guard_rejects_foreign_ticks() {
        let scheduler = ManualScheduler::new();
        let first = scheduler.schedule(TickKind::Countdown);
        let stale = scheduler.next_tick(TickKind::Countdown).unwrap();
        drop(first);

        let second = scheduler.schedule(TickKind::Countdown);
        assert!(!second.accepts(stale));
        assert!(!second.accepts(TickEvent {
            kind: TickKind::Breath,
            ticker: second.id(),
        }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_ticker_fires_each_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduler = TokioScheduler::new(tx);
        let guard = scheduler.schedule(TickKind::Breath);

        tokio::time::sleep(Duration::from_millis(3_900)).await;
        assert!(rx.try_recv().is_err());

        let tick = rx.recv().await.unwrap();
        assert!(guard.accepts(tick));
        let tick = rx.recv().await.unwrap();
        assert_eq!(tick.kind, TickKind::Breath);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_ticker_stops_after_drop() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduler = TokioScheduler::new(tx);
        let guard = scheduler.schedule(TickKind::Countdown);

        assert!(rx.recv().await.is_some());
        drop(guard);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }
}
