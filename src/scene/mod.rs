// Scene catalog and selection

pub mod catalog;
pub mod selector;

pub use catalog::{AmbientSound, AmbientSoundId, Catalog, Scene, SceneId, SceneMeta};
pub use selector::SceneSelector;
