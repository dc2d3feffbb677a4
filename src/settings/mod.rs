// Settings management

#[allow(clippy::module_inception)]
pub mod settings;

pub use settings::{AppSettings, CatalogSettings, LanguageSettings, PlaybackSettings, TimerSettings};
