// Playback controller
// Owns play/pause intent for the main stream and the ambient loops, and reconciles
// that intent with the lifecycle signals coming back from the sources.
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::source::{MediaBackend, MediaChannel, MediaSignal, StreamSource};
use crate::scene::{AmbientSoundId, Catalog};

/// What the main stream is doing, as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Idle,
    Paused,
    Buffering,
    Playing,
}

struct MainChannel {
    source: Box<dyn StreamSource>,
    url: Option<String>,
    playing: bool,
    buffering: bool,
    /// Set once the element reported `Playing` for the current URL
    ready: bool,
}

struct AmbientChannel {
    source: Box<dyn StreamSource>,
    enabled: bool,
}

pub struct PlaybackController {
    main: MainChannel,
    ambient: BTreeMap<AmbientSoundId, AmbientChannel>,
    master_volume: f32,
}

impl PlaybackController {
    /// Create one source per channel. Ambient sources get their loop URL and loop
    /// flag immediately but stay paused.
    pub fn new(backend: &dyn MediaBackend, catalog: &Catalog) -> Self {
        let main = MainChannel {
            source: backend.create(MediaChannel::Main),
            url: None,
            playing: false,
            buffering: false,
            ready: false,
        };

        let ambient = AmbientSoundId::ALL
            .into_iter()
            .map(|id| {
                let mut source = backend.create(MediaChannel::Ambient(id));
                source.set_src(&catalog.ambient(id).stream_url);
                source.set_loop(true);
                source.set_volume(0.0);
                (id, AmbientChannel { source, enabled: false })
            })
            .collect();

        Self {
            main,
            ambient,
            master_volume: 1.0,
        }
    }

    /// Point the main stream at `url`. Play intent is kept: a playing stream
    /// resumes on the new URL, a paused one only loads.
    pub fn load(&mut self, url: &str) {
        info!(url, resume = self.main.playing, "player: loading main stream");
        self.main.source.set_src(url);
        self.main.url = Some(url.to_string());
        self.main.ready = false;

        if self.main.playing {
            self.main.source.play();
            self.main.buffering = true;
        } else {
            self.main.buffering = false;
        }
    }

    pub fn set_main_playing(&mut self, playing: bool) {
        if playing {
            if self.main.playing {
                return;
            }
            if self.main.url.is_none() {
                debug!("player: play requested with nothing loaded");
                return;
            }
            self.main.playing = true;
            self.main.source.play();
            if !self.main.ready {
                self.main.buffering = true;
            }
        } else {
            if !self.main.playing {
                return;
            }
            self.main.playing = false;
            self.main.buffering = false;
            self.main.source.pause();
        }
    }

    pub fn toggle_main(&mut self) {
        let playing = self.main.playing;
        self.set_main_playing(!playing);
    }

    /// Pause and forget the main stream URL
    pub fn unload(&mut self) {
        self.set_main_playing(false);
        self.main.url = None;
        self.main.ready = false;
        self.main.buffering = false;
    }

    pub fn on_media_signal(&mut self, channel: MediaChannel, signal: MediaSignal) {
        match channel {
            MediaChannel::Main => self.on_main_signal(signal),
            MediaChannel::Ambient(id) => {
                // Loops restart themselves; nothing to reconcile
                if signal == MediaSignal::Error {
                    warn!(sound = %id, "player: ambient loop reported an error");
                }
            }
        }
    }

    fn on_main_signal(&mut self, signal: MediaSignal) {
        debug!(?signal, "player: main stream signal");
        match signal {
            MediaSignal::LoadStart => {
                // Reloading: wanted playback waits for the next `Playing`
                self.main.ready = false;
                self.main.buffering = self.main.playing;
            }
            MediaSignal::Playing => {
                self.main.ready = true;
                self.main.buffering = false;
            }
            MediaSignal::Waiting | MediaSignal::Stalled => {
                self.main.ready = false;
                self.main.buffering = true;
            }
            MediaSignal::Error => {
                // No retry: a broken stream stays buffering while play is wanted
                warn!(url = ?self.main.url, "player: main stream error");
                self.main.ready = false;
                if self.main.playing {
                    self.main.buffering = true;
                }
            }
        }
    }

    pub fn set_ambient_enabled(&mut self, sound: AmbientSoundId, enabled: bool) {
        let Some(channel) = self.ambient.get_mut(&sound) else {
            return;
        };
        if channel.enabled == enabled {
            return;
        }
        channel.enabled = enabled;
        if enabled {
            channel.source.play();
        } else {
            channel.source.pause();
        }
        debug!(%sound, enabled, "player: ambient loop toggled");
    }

    pub fn toggle_ambient(&mut self, sound: AmbientSoundId) {
        let enabled = self.is_ambient_enabled(sound);
        self.set_ambient_enabled(sound, !enabled);
    }

    /// Push a gain to an ambient loop; called on every mixer change
    pub fn set_ambient_gain(&mut self, sound: AmbientSoundId, gain: f32) {
        if let Some(channel) = self.ambient.get_mut(&sound) {
            channel.source.set_volume(gain);
        }
    }

    pub fn set_master_volume(&mut self, volume: f32) -> f32 {
        let volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        self.master_volume = volume;
        self.main.source.set_volume(volume);
        volume
    }

    /// Pause the main stream and every ambient loop
    pub fn stop_all(&mut self) {
        self.unload();
        for sound in AmbientSoundId::ALL {
            self.set_ambient_enabled(sound, false);
        }
    }

    pub fn is_main_playing(&self) -> bool {
        self.main.playing
    }

    pub fn is_buffering(&self) -> bool {
        self.main.buffering
    }

    pub fn current_url(&self) -> Option<&str> {
        self.main.url.as_deref()
    }

    pub fn is_ambient_enabled(&self, sound: AmbientSoundId) -> bool {
        self.ambient.get(&sound).is_some_and(|c| c.enabled)
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    pub fn status(&self) -> PlayerStatus {
        match (&self.main.url, self.main.playing, self.main.buffering) {
            (None, _, _) => PlayerStatus::Idle,
            (Some(_), _, true) => PlayerStatus::Buffering,
            (Some(_), true, false) => PlayerStatus::Playing,
            (Some(_), false, false) => PlayerStatus::Paused,
        }
    }
}
