// Focus / breathing session timer
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::ticker::{TickEvent, TickKind, TickScheduler, TickerGuard};

pub const PRESTART_SECONDS: u8 = 3;
pub const MIN_MINUTES: i64 = 1;
pub const MAX_MINUTES: i64 = 60;
pub const DEFAULT_MINUTES: i64 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    #[default]
    Focus,
    Breath,
}

impl TimerMode {
    pub fn toggled(self) -> Self {
        match self {
            TimerMode::Focus => TimerMode::Breath,
            TimerMode::Breath => TimerMode::Focus,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathPhase {
    In,
    Out,
}

impl BreathPhase {
    fn flipped(self) -> Self {
        match self {
            BreathPhase::In => BreathPhase::Out,
            BreathPhase::Out => BreathPhase::In,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    Idle,
    PreStart(u8),
    Running,
}

/// What a tick changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    PreStart(u8),
    Started,
    Tick(u32),
    Breath(BreathPhase),
    /// Countdown reached zero; fired once per session
    Expired,
}

/// Read-only view of the timer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerState {
    pub mode: TimerMode,
    pub initial_duration_seconds: u32,
    pub remaining_seconds: u32,
    pub is_running: bool,
    pub pre_start_countdown: Option<u8>,
    pub breath_phase: Option<BreathPhase>,
}

#[derive(Debug)]
enum Phase {
    Idle,
    PreStart {
        count: u8,
        countdown: TickerGuard,
    },
    Running {
        countdown: TickerGuard,
        breath: Option<(BreathPhase, TickerGuard)>,
    },
}

pub struct FocusTimer {
    mode: TimerMode,
    initial_seconds: u32,
    remaining_seconds: u32,
    phase: Phase,
    scheduler: Box<dyn TickScheduler>,
}

fn minutes_to_seconds(minutes: i64) -> u32 {
    // Clamped to [1, 60] so the cast cannot truncate
    (minutes.clamp(MIN_MINUTES, MAX_MINUTES) * 60) as u32
}

impl FocusTimer {
    pub fn new(scheduler: Box<dyn TickScheduler>, minutes: i64, mode: TimerMode) -> Self {
        let initial_seconds = minutes_to_seconds(minutes);
        Self {
            mode,
            initial_seconds,
            remaining_seconds: initial_seconds,
            phase: Phase::Idle,
            scheduler,
        }
    }

    /// Begin the 3-2-1 countdown. Ignored unless idle.
    pub fn start(&mut self) {
        if !matches!(self.phase, Phase::Idle) {
            debug!("timer: start ignored, session already active");
            return;
        }
        let countdown = self.scheduler.schedule(TickKind::Countdown);
        self.phase = Phase::PreStart {
            count: PRESTART_SECONDS,
            countdown,
        };
        info!(mode = ?self.mode, seconds = self.initial_seconds, "timer: pre-start");
    }

    /// Abandon the session without firing expiry. Ignored when idle.
    pub fn stop(&mut self) {
        if matches!(self.phase, Phase::Idle) {
            return;
        }
        // Dropping the old phase releases its tickers
        self.phase = Phase::Idle;
        self.remaining_seconds = self.initial_seconds;
        info!("timer: stopped");
    }

    /// Refill the countdown. Only while idle.
    pub fn reset(&mut self) {
        if matches!(self.phase, Phase::Idle) {
            self.remaining_seconds = self.initial_seconds;
        }
    }

    /// Set the session length in minutes, clamped to [1, 60]. Ignored while running.
    pub fn set_initial_duration(&mut self, minutes: i64) {
        if self.is_running() {
            debug!("timer: duration change ignored while running");
            return;
        }
        self.initial_seconds = minutes_to_seconds(minutes);
        self.remaining_seconds = self.initial_seconds;
    }

    /// Toggle FOCUS/BREATH. Ignored while running.
    pub fn switch_mode(&mut self) {
        if self.is_running() {
            debug!("timer: mode switch ignored while running");
            return;
        }
        self.mode = self.mode.toggled();
    }

    /// Feed a tick from the scheduler. Ticks from tickers that are no longer
    /// owned by the current phase are dropped.
    pub fn on_tick(&mut self, tick: TickEvent) -> Option<TimerEvent> {
        match tick.kind {
            TickKind::Countdown => self.on_countdown_tick(tick),
            TickKind::Breath => self.on_breath_tick(tick),
        }
    }

    fn on_countdown_tick(&mut self, tick: TickEvent) -> Option<TimerEvent> {
        match &mut self.phase {
            Phase::PreStart { count, countdown } if countdown.accepts(tick) => {
                *count -= 1;
                if *count > 0 {
                    return Some(TimerEvent::PreStart(*count));
                }
                self.enter_running();
                Some(TimerEvent::Started)
            }
            Phase::Running { countdown, .. } if countdown.accepts(tick) => {
                self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
                if self.remaining_seconds > 0 {
                    return Some(TimerEvent::Tick(self.remaining_seconds));
                }
                self.phase = Phase::Idle;
                info!("timer: session complete");
                Some(TimerEvent::Expired)
            }
            _ => None,
        }
    }

    fn on_breath_tick(&mut self, tick: TickEvent) -> Option<TimerEvent> {
        match &mut self.phase {
            Phase::Running {
                breath: Some((phase, guard)),
                ..
            } if guard.accepts(tick) => {
                *phase = phase.flipped();
                Some(TimerEvent::Breath(*phase))
            }
            _ => None,
        }
    }

    fn enter_running(&mut self) {
        let Phase::PreStart { countdown, .. } = std::mem::replace(&mut self.phase, Phase::Idle)
        else {
            return;
        };
        let breath = match self.mode {
            TimerMode::Breath => Some((BreathPhase::In, self.scheduler.schedule(TickKind::Breath))),
            TimerMode::Focus => None,
        };
        self.remaining_seconds = self.initial_seconds;
        self.phase = Phase::Running { countdown, breath };
        info!(mode = ?self.mode, seconds = self.remaining_seconds, "timer: running");
    }

    /// Release every ticker; the timer ends idle
    pub fn shutdown(&mut self) {
        self.stop();
    }

    pub fn phase(&self) -> TimerPhase {
        match &self.phase {
            Phase::Idle => TimerPhase::Idle,
            Phase::PreStart { count, .. } => TimerPhase::PreStart(*count),
            Phase::Running { .. } => TimerPhase::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn initial_seconds(&self) -> u32 {
        self.initial_seconds
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn pre_start_countdown(&self) -> Option<u8> {
        match &self.phase {
            Phase::PreStart { count, .. } => Some(*count),
            _ => None,
        }
    }

    pub fn breath_phase(&self) -> Option<BreathPhase> {
        match &self.phase {
            Phase::Running {
                breath: Some((phase, _)),
                ..
            } => Some(*phase),
            _ => None,
        }
    }

    /// Fraction of the session elapsed, in [0, 1]
    pub fn progress(&self) -> f32 {
        1.0 - self.remaining_seconds as f32 / self.initial_seconds as f32
    }

    /// Remaining time as MM:SS
    pub fn display(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_seconds / 60,
            self.remaining_seconds % 60
        )
    }

    pub fn state(&self) -> TimerState {
        TimerState {
            mode: self.mode,
            initial_duration_seconds: self.initial_seconds,
            remaining_seconds: self.remaining_seconds,
            is_running: self.is_running(),
            pre_start_countdown: self.pre_start_countdown(),
            breath_phase: self.breath_phase(),
        }
    }
}
