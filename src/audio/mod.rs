// Audio playback module
// Media elements are abstracted behind StreamSource; no decoding happens here.

pub mod headless;
pub mod mixer;
pub mod player;
pub mod source;

pub use mixer::VolumeMixer;
pub use player::{PlaybackController, PlayerStatus};
pub use source::{MediaBackend, MediaChannel, MediaEvent, MediaSignal, StreamSource};
