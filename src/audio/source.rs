// Stream source abstraction
// A source is an opaque media element: it streams a URL and reports its lifecycle.
use serde::{Deserialize, Serialize};

use crate::scene::AmbientSoundId;

/// Which media element a call or signal belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaChannel {
    Main,
    Ambient(AmbientSoundId),
}

/// Lifecycle signals emitted by a media element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaSignal {
    LoadStart,
    Playing,
    Waiting,
    Stalled,
    Error,
}

/// A lifecycle signal tagged with the channel that emitted it
pub type MediaEvent = (MediaChannel, MediaSignal);

/// Capability handed to the playback controller for a single channel
pub trait StreamSource: Send {
    fn set_src(&mut self, url: &str);
    fn play(&mut self);
    fn pause(&mut self);
    fn set_loop(&mut self, looping: bool);
    fn set_volume(&mut self, volume: f32);
}

/// Creates one source per channel
pub trait MediaBackend {
    fn create(&self, channel: MediaChannel) -> Box<dyn StreamSource>;
}
