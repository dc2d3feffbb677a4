// Active scene and playlist position
use tracing::info;

use super::catalog::{Scene, SceneId};
use crate::audio::player::PlaybackController;

#[derive(Debug, Clone)]
struct ActiveScene {
    scene: Scene,
    track_index: usize,
}

#[derive(Debug, Default)]
pub struct SceneSelector {
    active: Option<ActiveScene>,
}

impl SceneSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate `scene` at its first track and start playing it
    pub fn enter_scene(&mut self, scene: &Scene, player: &mut PlaybackController) {
        info!(scene = %scene.id(), "scene: entering");
        self.active = Some(ActiveScene {
            scene: scene.clone(),
            track_index: 0,
        });
        player.load(scene.track(0));
        player.set_main_playing(true);
    }

    /// Clear the active scene and stop the main stream
    pub fn exit_scene(&mut self, player: &mut PlaybackController) {
        if let Some(active) = self.active.take() {
            info!(scene = %active.scene.id(), "scene: leaving");
        }
        player.unload();
    }

    /// Move to the next track, wrapping at the end. No-op without an active
    /// scene or with a single-track playlist.
    pub fn advance_track(&mut self, player: &mut PlaybackController) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let len = active.scene.playlist().len();
        if len < 2 {
            return;
        }
        active.track_index = (active.track_index + 1) % len;
        info!(
            scene = %active.scene.id(),
            track = active.track_index,
            "scene: next track"
        );
        player.load(active.scene.track(active.track_index));
    }

    pub fn active_scene_id(&self) -> Option<SceneId> {
        self.active.as_ref().map(|a| a.scene.id())
    }

    pub fn active_scene(&self) -> Option<&Scene> {
        self.active.as_ref().map(|a| &a.scene)
    }

    /// Index into the active playlist; 0 when no scene is active
    pub fn current_track_index(&self) -> usize {
        self.active.as_ref().map_or(0, |a| a.track_index)
    }

    pub fn has_multiple_tracks(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| a.scene.playlist().len() > 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::headless::{CallLog, HeadlessBackend, SourceOp};
    use crate::audio::source::{MediaChannel, MediaSignal};
    use crate::scene::catalog::Catalog;

    fn setup() -> (SceneSelector, PlaybackController, Catalog, CallLog) {
        let catalog = Catalog::builtin();
        let backend = HeadlessBackend::new();
        let log = backend.log();
        let player = PlaybackController::new(&backend, &catalog);
        log.clear();
        (SceneSelector::new(), player, catalog, log)
    }

    #[test]
    fn test_enter_scene_plays_first_track() {
        let (mut selector, mut player, catalog, log) = setup();
        let rain = catalog.scene(SceneId::Rain);
        selector.enter_scene(rain, &mut player);

        assert_eq!(selector.active_scene_id(), Some(SceneId::Rain));
        assert_eq!(selector.current_track_index(), 0);
        assert!(player.is_main_playing());
        assert_eq!(
            log.ops(MediaChannel::Main),
            vec![SourceOp::SetSrc(rain.track(0).to_string()), SourceOp::Play]
        );
    }

    #[test]
    fn test_advance_wraps_around() {
        let (mut selector, mut player, catalog, _log) = setup();
        let forest = catalog.scene(SceneId::Forest);
        let len = forest.playlist().len();
        assert!(len > 1);
        selector.enter_scene(forest, &mut player);

        for step in 1..=len {
            selector.advance_track(&mut player);
            assert_eq!(selector.current_track_index(), step % len);
            assert_eq!(player.current_url(), Some(forest.track(step)));
        }
        assert_eq!(selector.current_track_index(), 0);
    }

    #[test]
    fn test_advance_keeps_paused_intent() {
        let (mut selector, mut player, catalog, log) = setup();
        selector.enter_scene(catalog.scene(SceneId::Night), &mut player);
        player.on_media_signal(MediaChannel::Main, MediaSignal::Playing);
        player.set_main_playing(false);

        log.clear();
        selector.advance_track(&mut player);
        assert!(!player.is_main_playing());
        assert_eq!(log.count(MediaChannel::Main, &SourceOp::Play), 0);
    }

    #[test]
    fn test_advance_without_scene_is_noop() {
        let (mut selector, mut player, _catalog, log) = setup();
        selector.advance_track(&mut player);
        assert_eq!(selector.active_scene_id(), None);
        assert!(log.calls().is_empty());
    }

    #[test]
    fn test_single_track_scene_does_not_advance() {
        let (mut selector, mut player, catalog, log) = setup();
        selector.enter_scene(catalog.scene(SceneId::Ocean), &mut player);
        assert!(!selector.has_multiple_tracks());

        log.clear();
        selector.advance_track(&mut player);
        assert_eq!(selector.current_track_index(), 0);
        assert!(log.calls().is_empty());
    }

    #[test]
    fn test_exit_scene_stops_main() {
        let (mut selector, mut player, catalog, _log) = setup();
        selector.enter_scene(catalog.scene(SceneId::Cafe), &mut player);
        selector.exit_scene(&mut player);

        assert_eq!(selector.active_scene_id(), None);
        assert!(!player.is_main_playing());
        assert_eq!(player.current_url(), None);
    }
}
