// Application state management
// AppState owns every component for the lifetime of one session and is the only
// thing the event loop talks to.
use serde::Serialize;
use tracing::{debug, info};

use crate::audio::{MediaBackend, MediaChannel, MediaSignal, PlaybackController, PlayerStatus, VolumeMixer};
use crate::commands::Command;
use crate::locale::{Locale, TextKey};
use crate::scene::{AmbientSoundId, Catalog, SceneId, SceneMeta, SceneSelector};
use crate::settings::AppSettings;
use crate::timer::{
    BreathPhase, FocusTimer, TickEvent, TickScheduler, TimerEvent, TimerMode, TimerPhase, TimerState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "scene", rename_all = "snake_case")]
pub enum View {
    Home,
    Player(SceneId),
}

/// Snapshot of the main stream as seen by the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackState {
    pub active_scene_id: Option<SceneId>,
    pub current_track_index: usize,
    pub is_main_playing: bool,
    pub is_buffering: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmbientState {
    pub sound: AmbientSoundId,
    pub enabled: bool,
    pub volume: f32,
}

/// Everything the presentation layer needs to render one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub view: View,
    /// Display data of the active scene; `None` on the home view
    pub scene: Option<SceneMeta>,
    pub locale: Locale,
    pub status: PlayerStatus,
    pub playback: PlaybackState,
    pub ambient: Vec<AmbientState>,
    pub master_volume: f32,
    pub timer: TimerState,
    pub timer_display: String,
}

impl ViewSnapshot {
    /// One-line human readable summary in the active locale
    pub fn status_line(&self) -> String {
        let text = |key: TextKey| self.locale.text(key);
        let View::Player(scene) = self.view else {
            return format!("{} | {}", text(TextKey::AppTitle), text(TextKey::ChooseScene));
        };

        let status = match self.status {
            PlayerStatus::Playing => text(TextKey::Playing),
            PlayerStatus::Buffering => text(TextKey::Buffering),
            PlayerStatus::Paused | PlayerStatus::Idle => text(TextKey::Paused),
        };
        let mut line = format!(
            "{} [{}] {}",
            text(scene.title_key()),
            self.playback.current_track_index + 1,
            status
        );

        for ambient in self.ambient.iter().filter(|a| a.enabled) {
            line.push_str(&format!(
                " | {} {:.0}%",
                text(ambient.sound.label_key()),
                ambient.volume * 100.0
            ));
        }

        let timer = &self.timer;
        if let Some(count) = timer.pre_start_countdown {
            line.push_str(&format!(" | {} {}", text(TextKey::GetReady), count));
        } else if timer.is_running {
            let mode = match timer.breath_phase {
                Some(BreathPhase::In) => text(TextKey::BreatheIn),
                Some(BreathPhase::Out) => text(TextKey::BreatheOut),
                None => text(TextKey::Focus),
            };
            line.push_str(&format!(" | {} {}", mode, self.timer_display));
        } else if timer.remaining_seconds == 0 {
            line.push_str(&format!(" | {}", text(TextKey::SessionComplete)));
        } else {
            let mode = match timer.mode {
                TimerMode::Focus => text(TextKey::Focus),
                TimerMode::Breath => text(TextKey::Breath),
            };
            line.push_str(&format!(" | {} {}", mode, self.timer_display));
        }
        line
    }
}

pub struct AppState {
    catalog: Catalog,
    view: View,
    locale: Locale,
    pause_on_timer_end: bool,
    mixer: VolumeMixer,
    scenes: SceneSelector,
    player: PlaybackController,
    timer: FocusTimer,
}

impl AppState {
    pub fn new(
        settings: &AppSettings,
        catalog: Catalog,
        backend: &dyn MediaBackend,
        scheduler: Box<dyn TickScheduler>,
    ) -> Self {
        let mut player = PlaybackController::new(backend, &catalog);
        player.set_master_volume(settings.playback.master_volume);

        let mut mixer = VolumeMixer::new();
        for (&sound, &level) in &settings.playback.ambient_volumes {
            let level = mixer.set_volume(sound, level);
            player.set_ambient_gain(sound, level);
        }

        let timer = FocusTimer::new(scheduler, settings.timer.minutes, settings.timer.mode);

        Self {
            catalog,
            view: View::Home,
            locale: settings.language.locale,
            pause_on_timer_end: settings.playback.pause_on_timer_end,
            mixer,
            scenes: SceneSelector::new(),
            player,
            timer,
        }
    }

    pub fn dispatch(&mut self, command: Command) {
        debug!(?command, "state: dispatch");
        match command {
            Command::SelectScene { scene } => self.select_scene(scene),
            Command::GoHome => self.go_home(),
            Command::TogglePlay => self.player.toggle_main(),
            Command::SetPlaying { playing } => self.player.set_main_playing(playing),
            Command::NextTrack => self.scenes.advance_track(&mut self.player),
            Command::SetVolume { sound, volume } => self.set_volume(sound, volume),
            Command::ToggleAmbient { sound } => self.toggle_ambient(sound),
            Command::SetMasterVolume { volume } => {
                self.player.set_master_volume(volume);
            }
            Command::CycleLocale => self.locale = self.locale.next(),
            Command::StartTimer
            | Command::StopTimer
            | Command::ResetTimer
            | Command::SetTimerMinutes { .. }
            | Command::SwitchTimerMode => self.dispatch_timer(command),
        }
    }

    fn dispatch_timer(&mut self, command: Command) {
        // The timer belongs to the player view
        if self.view == View::Home {
            debug!(?command, "state: timer command ignored on home view");
            return;
        }
        match command {
            Command::StartTimer => self.timer.start(),
            Command::StopTimer => self.timer.stop(),
            Command::ResetTimer => self.timer.reset(),
            Command::SetTimerMinutes { minutes } => self.timer.set_initial_duration(minutes),
            Command::SwitchTimerMode => self.timer.switch_mode(),
            _ => {}
        }
    }

    /// Enter the player view for `scene`. Switching scenes from the player view
    /// keeps the timer and the ambient mix.
    pub fn select_scene(&mut self, scene: SceneId) {
        info!(%scene, "state: scene selected");
        self.scenes
            .enter_scene(self.catalog.scene(scene), &mut self.player);
        self.view = View::Player(scene);
    }

    /// Back to the scene picker: cancel the timer, silence every source and
    /// clear the active scene in one step.
    pub fn go_home(&mut self) {
        if self.view == View::Home {
            return;
        }
        info!("state: returning home");
        self.timer.stop();
        self.timer.reset();
        self.scenes.exit_scene(&mut self.player);
        self.player.stop_all();
        self.view = View::Home;
    }

    /// Loops only play alongside a scene. Levels can still be set from home.
    pub fn toggle_ambient(&mut self, sound: AmbientSoundId) {
        if self.view == View::Home {
            debug!(%sound, "state: ambient toggle ignored on home view");
            return;
        }
        self.player.toggle_ambient(sound);
    }

    /// Mixer change; the loop's gain follows immediately
    pub fn set_volume(&mut self, sound: AmbientSoundId, volume: f32) {
        let level = self.mixer.set_volume(sound, volume);
        self.player.set_ambient_gain(sound, level);
    }

    pub fn on_tick(&mut self, tick: TickEvent) -> Option<TimerEvent> {
        let event = self.timer.on_tick(tick)?;
        if event == TimerEvent::Expired && self.pause_on_timer_end {
            info!("state: session over, pausing main stream");
            self.player.set_main_playing(false);
        }
        Some(event)
    }

    pub fn on_media_signal(&mut self, channel: MediaChannel, signal: MediaSignal) {
        self.player.on_media_signal(channel, signal);
    }

    /// Teardown: nothing keeps ticking or playing after this
    pub fn shutdown(&mut self) {
        self.timer.shutdown();
        self.scenes.exit_scene(&mut self.player);
        self.player.stop_all();
        self.view = View::Home;
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn mixer(&self) -> &VolumeMixer {
        &self.mixer
    }

    pub fn player(&self) -> &PlaybackController {
        &self.player
    }

    pub fn timer(&self) -> &FocusTimer {
        &self.timer
    }

    pub fn timer_phase(&self) -> TimerPhase {
        self.timer.phase()
    }

    pub fn playback_state(&self) -> PlaybackState {
        PlaybackState {
            active_scene_id: self.scenes.active_scene_id(),
            current_track_index: self.scenes.current_track_index(),
            is_main_playing: self.player.is_main_playing(),
            is_buffering: self.player.is_buffering(),
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            view: self.view,
            scene: self.scenes.active_scene().map(|s| s.meta().clone()),
            locale: self.locale,
            status: self.player.status(),
            playback: self.playback_state(),
            ambient: self
                .mixer
                .levels()
                .map(|(sound, volume)| AmbientState {
                    sound,
                    enabled: self.player.is_ambient_enabled(sound),
                    volume,
                })
                .collect(),
            master_volume: self.player.master_volume(),
            timer: self.timer.state(),
            timer_display: self.timer.display(),
        }
    }
}
