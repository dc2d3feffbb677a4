// Session timer with pre-start countdown and breathing guide

pub mod session;
pub mod ticker;

pub use session::{BreathPhase, FocusTimer, TimerEvent, TimerMode, TimerPhase, TimerState};
pub use ticker::{ManualScheduler, TickEvent, TickKind, TickScheduler, TokioScheduler};
