// Per-sound volume levels for the ambient loops
use serde::Serialize;
use std::collections::BTreeMap;

use crate::scene::AmbientSoundId;

#[derive(Debug, Clone, Default, Serialize)]
pub struct VolumeMixer {
    levels: BTreeMap<AmbientSoundId, f32>,
}

impl VolumeMixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a level clamped to [0, 1] and return what was stored.
    /// NaN is treated as silence.
    pub fn set_volume(&mut self, sound: AmbientSoundId, value: f32) -> f32 {
        let level = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        self.levels.insert(sound, level);
        level
    }

    /// Last stored level, 0.0 if never set
    pub fn volume(&self, sound: AmbientSoundId) -> f32 {
        self.levels.get(&sound).copied().unwrap_or(0.0)
    }

    pub fn levels(&self) -> impl Iterator<Item = (AmbientSoundId, f32)> + '_ {
        AmbientSoundId::ALL.into_iter().map(|id| (id, self.volume(id)))
    }
}
