// Scene and ambient sound catalog
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;
use crate::locale::TextKey;

/// Every scene the player knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneId {
    Rain,
    Forest,
    Ocean,
    Night,
    Cafe,
}

impl SceneId {
    pub const ALL: [SceneId; 5] = [
        SceneId::Rain,
        SceneId::Forest,
        SceneId::Ocean,
        SceneId::Night,
        SceneId::Cafe,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SceneId::Rain => "rain",
            SceneId::Forest => "forest",
            SceneId::Ocean => "ocean",
            SceneId::Night => "night",
            SceneId::Cafe => "cafe",
        }
    }

    pub fn title_key(self) -> TextKey {
        match self {
            SceneId::Rain => TextKey::SceneRain,
            SceneId::Forest => TextKey::SceneForest,
            SceneId::Ocean => TextKey::SceneOcean,
            SceneId::Night => TextKey::SceneNight,
            SceneId::Cafe => TextKey::SceneCafe,
        }
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SceneId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SceneId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CatalogError::UnknownScene(s.to_string()))
    }
}

/// The fixed set of ambient loops that can be mixed under the main stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmbientSoundId {
    Rain,
    Fire,
    Birds,
}

impl AmbientSoundId {
    pub const ALL: [AmbientSoundId; 3] = [
        AmbientSoundId::Rain,
        AmbientSoundId::Fire,
        AmbientSoundId::Birds,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AmbientSoundId::Rain => "rain",
            AmbientSoundId::Fire => "fire",
            AmbientSoundId::Birds => "birds",
        }
    }

    pub fn label_key(self) -> TextKey {
        match self {
            AmbientSoundId::Rain => TextKey::AmbientRain,
            AmbientSoundId::Fire => TextKey::AmbientFire,
            AmbientSoundId::Birds => TextKey::AmbientBirds,
        }
    }
}

impl fmt::Display for AmbientSoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AmbientSoundId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AmbientSoundId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CatalogError::UnknownAmbient(s.to_string()))
    }
}

/// Display-only data attached to a scene
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneMeta {
    pub title: TextKey,
    pub accent_color: &'static str,
}

/// A themed scene with a non-empty playlist of stream URLs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    id: SceneId,
    playlist: Vec<String>,
    meta: SceneMeta,
}

impl Scene {
    pub fn new(id: SceneId, playlist: Vec<String>, meta: SceneMeta) -> Result<Self, CatalogError> {
        if playlist.is_empty() {
            return Err(CatalogError::EmptyPlaylist(id));
        }
        Ok(Self { id, playlist, meta })
    }

    pub fn id(&self) -> SceneId {
        self.id
    }

    pub fn playlist(&self) -> &[String] {
        &self.playlist
    }

    /// URL at `index`, wrapping around the playlist length
    pub fn track(&self, index: usize) -> &str {
        &self.playlist[index % self.playlist.len()]
    }

    pub fn meta(&self) -> &SceneMeta {
        &self.meta
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmbientSound {
    pub id: AmbientSoundId,
    pub stream_url: String,
}

/// Static catalog of scenes and ambient sounds, immutable after load
#[derive(Debug, Clone)]
pub struct Catalog {
    scenes: BTreeMap<SceneId, Scene>,
    ambient: BTreeMap<AmbientSoundId, AmbientSound>,
}

fn default_playlist(id: SceneId) -> Vec<String> {
    let urls: &[&str] = match id {
        SceneId::Rain => &[
            "https://streams.zenflow.fm/lofi-rain.mp3",
            "https://streams.zenflow.fm/chillhop.mp3",
        ],
        SceneId::Forest => &[
            "https://streams.zenflow.fm/forest-piano.mp3",
            "https://streams.zenflow.fm/acoustic-morning.mp3",
            "https://streams.zenflow.fm/folk-focus.mp3",
        ],
        SceneId::Ocean => &["https://streams.zenflow.fm/deep-ambient.mp3"],
        SceneId::Night => &[
            "https://streams.zenflow.fm/synthwave-night.mp3",
            "https://streams.zenflow.fm/dark-ambient.mp3",
        ],
        SceneId::Cafe => &["https://streams.zenflow.fm/jazz-cafe.mp3"],
    };
    urls.iter().map(|u| u.to_string()).collect()
}

fn default_accent(id: SceneId) -> &'static str {
    match id {
        SceneId::Rain => "#5b7fa3",
        SceneId::Forest => "#4f7d5a",
        SceneId::Ocean => "#2f8fa8",
        SceneId::Night => "#3b3363",
        SceneId::Cafe => "#a0714f",
    }
}

fn default_ambient_url(id: AmbientSoundId) -> &'static str {
    match id {
        AmbientSoundId::Rain => "https://streams.zenflow.fm/loops/rain.ogg",
        AmbientSoundId::Fire => "https://streams.zenflow.fm/loops/fire.ogg",
        AmbientSoundId::Birds => "https://streams.zenflow.fm/loops/birds.ogg",
    }
}

fn default_meta(id: SceneId) -> SceneMeta {
    SceneMeta {
        title: id.title_key(),
        accent_color: default_accent(id),
    }
}

impl Catalog {
    /// The built-in scenes and loops
    pub fn builtin() -> Self {
        let scenes = SceneId::ALL
            .into_iter()
            .map(|id| {
                let scene = Scene {
                    id,
                    playlist: default_playlist(id),
                    meta: default_meta(id),
                };
                (id, scene)
            })
            .collect();

        let ambient = AmbientSoundId::ALL
            .into_iter()
            .map(|id| {
                let sound = AmbientSound {
                    id,
                    stream_url: default_ambient_url(id).to_string(),
                };
                (id, sound)
            })
            .collect();

        Self { scenes, ambient }
    }

    /// Built-in catalog with playlist / loop URLs replaced where configured
    pub fn with_overrides(
        playlists: &BTreeMap<SceneId, Vec<String>>,
        ambient_urls: &BTreeMap<AmbientSoundId, String>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::builtin();

        for (&id, playlist) in playlists {
            let scene = Scene::new(id, playlist.clone(), default_meta(id))?;
            catalog.scenes.insert(id, scene);
        }
        for (&id, url) in ambient_urls {
            catalog.ambient.insert(
                id,
                AmbientSound {
                    id,
                    stream_url: url.clone(),
                },
            );
        }

        Ok(catalog)
    }

    pub fn scene(&self, id: SceneId) -> &Scene {
        // Every SceneId is inserted at construction
        &self.scenes[&id]
    }

    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.values()
    }

    pub fn ambient(&self, id: AmbientSoundId) -> &AmbientSound {
        &self.ambient[&id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_every_scene() {
        let catalog = Catalog::builtin();
        for id in SceneId::ALL {
            let scene = catalog.scene(id);
            assert_eq!(scene.id(), id);
            assert!(!scene.playlist().is_empty());
        }
        assert_eq!(catalog.scenes().count(), SceneId::ALL.len());
    }

    #[test]
    fn test_empty_playlist_rejected() {
        let meta = SceneMeta {
            title: TextKey::SceneRain,
            accent_color: "#000000",
        };
        let err = Scene::new(SceneId::Rain, vec![], meta).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyPlaylist(SceneId::Rain)));
    }

    #[test]
    fn test_override_with_empty_playlist_fails() {
        let mut playlists = BTreeMap::new();
        playlists.insert(SceneId::Cafe, Vec::new());
        assert!(Catalog::with_overrides(&playlists, &BTreeMap::new()).is_err());
    }

    #[test]
    fn test_overrides_replace_urls() {
        let mut playlists = BTreeMap::new();
        playlists.insert(SceneId::Ocean, vec!["http://a".to_string(), "http://b".to_string()]);
        let mut ambient = BTreeMap::new();
        ambient.insert(AmbientSoundId::Fire, "http://fire".to_string());

        let catalog = Catalog::with_overrides(&playlists, &ambient).unwrap();
        assert_eq!(catalog.scene(SceneId::Ocean).playlist(), ["http://a", "http://b"]);
        assert_eq!(catalog.ambient(AmbientSoundId::Fire).stream_url, "http://fire");
        assert_eq!(
            catalog.ambient(AmbientSoundId::Rain).stream_url,
            default_ambient_url(AmbientSoundId::Rain)
        );
    }

    #[test]
    fn test_track_wraps() {
        let catalog = Catalog::builtin();
        let forest = catalog.scene(SceneId::Forest);
        assert_eq!(forest.track(0), forest.track(forest.playlist().len()));
    }

    #[test]
    fn test_id_parsing() {
        assert_eq!("Forest".parse::<SceneId>().unwrap(), SceneId::Forest);
        assert_eq!(" fire ".parse::<AmbientSoundId>().unwrap(), AmbientSoundId::Fire);
        assert!("jungle".parse::<SceneId>().is_err());
        assert!("wind".parse::<AmbientSoundId>().is_err());
    }
}
