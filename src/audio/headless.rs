// Headless media backend
// Records every call made on its sources and optionally echoes lifecycle signals,
// standing in for real media elements when no renderer is attached.
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use super::source::{MediaBackend, MediaChannel, MediaEvent, MediaSignal, StreamSource};

#[derive(Debug, Clone, PartialEq)]
pub enum SourceOp {
    SetSrc(String),
    Play,
    Pause,
    SetLoop(bool),
    SetVolume(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceCall {
    pub channel: MediaChannel,
    pub op: SourceOp,
}

/// Shared call log, cheap to clone
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<SourceCall>>>,
}

impl CallLog {
    fn push(&self, channel: MediaChannel, op: SourceOp) {
        self.calls.lock().push(SourceCall { channel, op });
    }

    pub fn calls(&self) -> Vec<SourceCall> {
        self.calls.lock().clone()
    }

    /// Operations issued on one channel, in order
    pub fn ops(&self, channel: MediaChannel) -> Vec<SourceOp> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.channel == channel)
            .map(|c| c.op.clone())
            .collect()
    }

    pub fn count(&self, channel: MediaChannel, op: &SourceOp) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.channel == channel && &c.op == op)
            .count()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

#[derive(Debug, Default)]
pub struct HeadlessBackend {
    log: CallLog,
    signals: Option<UnboundedSender<MediaEvent>>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose sources report `LoadStart` on a new URL and `Playing` on play,
    /// as an always-reachable stream would.
    pub fn with_signals(signals: UnboundedSender<MediaEvent>) -> Self {
        Self {
            log: CallLog::default(),
            signals: Some(signals),
        }
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }
}

impl MediaBackend for HeadlessBackend {
    fn create(&self, channel: MediaChannel) -> Box<dyn StreamSource> {
        Box::new(HeadlessSource {
            channel,
            log: self.log.clone(),
            signals: self.signals.clone(),
            has_src: false,
        })
    }
}

struct HeadlessSource {
    channel: MediaChannel,
    log: CallLog,
    signals: Option<UnboundedSender<MediaEvent>>,
    has_src: bool,
}

impl HeadlessSource {
    fn emit(&self, signal: MediaSignal) {
        if let Some(tx) = &self.signals {
            // Receiver gone means the runtime is shutting down
            let _ = tx.send((self.channel, signal));
        }
    }
}

impl StreamSource for HeadlessSource {
    fn set_src(&mut self, url: &str) {
        debug!(channel = ?self.channel, url, "source: set src");
        self.log.push(self.channel, SourceOp::SetSrc(url.to_string()));
        self.has_src = true;
        self.emit(MediaSignal::LoadStart);
    }

    fn play(&mut self) {
        debug!(channel = ?self.channel, "source: play");
        self.log.push(self.channel, SourceOp::Play);
        if self.has_src {
            self.emit(MediaSignal::Playing);
        }
    }

    fn pause(&mut self) {
        debug!(channel = ?self.channel, "source: pause");
        self.log.push(self.channel, SourceOp::Pause);
    }

    fn set_loop(&mut self, looping: bool) {
        self.log.push(self.channel, SourceOp::SetLoop(looping));
    }

    fn set_volume(&mut self, volume: f32) {
        self.log.push(self.channel, SourceOp::SetVolume(volume));
    }
}
