// User gestures forwarded by the presentation layer
use serde::{Deserialize, Serialize};

use crate::error::CommandParseError;
use crate::scene::{AmbientSoundId, SceneId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    SelectScene { scene: SceneId },
    GoHome,
    TogglePlay,
    SetPlaying { playing: bool },
    NextTrack,
    SetVolume { sound: AmbientSoundId, volume: f32 },
    ToggleAmbient { sound: AmbientSoundId },
    SetMasterVolume { volume: f32 },
    StartTimer,
    StopTimer,
    ResetTimer,
    SetTimerMinutes { minutes: i64 },
    SwitchTimerMode,
    CycleLocale,
}

impl Command {
    /// Parse a whitespace-separated gesture such as `scene rain`, `vol fire 0.4`
    /// or `timer start`.
    pub fn parse_line(line: &str) -> Result<Self, CommandParseError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandParseError::Empty);
        };
        let head = head.to_ascii_lowercase();

        let command = match head.as_str() {
            "scene" => {
                let value = expect_arg(words.next(), "scene", "a scene name")?;
                let scene = value.parse().map_err(|_| invalid("scene", value))?;
                Command::SelectScene { scene }
            }
            "home" => Command::GoHome,
            "toggle" => Command::TogglePlay,
            "play" => Command::SetPlaying { playing: true },
            "pause" => Command::SetPlaying { playing: false },
            "next" => Command::NextTrack,
            "vol" => {
                let name = expect_arg(words.next(), "vol", "a sound and a level")?;
                let sound = name.parse().map_err(|_| invalid("vol", name))?;
                let level = expect_arg(words.next(), "vol", "a sound and a level")?;
                let volume = level.parse().map_err(|_| invalid("vol", level))?;
                Command::SetVolume { sound, volume }
            }
            "ambient" => {
                let name = expect_arg(words.next(), "ambient", "a sound name")?;
                let sound = name.parse().map_err(|_| invalid("ambient", name))?;
                Command::ToggleAmbient { sound }
            }
            "master" => {
                let level = expect_arg(words.next(), "master", "a level")?;
                let volume = level.parse().map_err(|_| invalid("master", level))?;
                Command::SetMasterVolume { volume }
            }
            "timer" => {
                let action = expect_arg(words.next(), "timer", "start|stop|reset|mode|<minutes>")?;
                match action.to_ascii_lowercase().as_str() {
                    "start" => Command::StartTimer,
                    "stop" => Command::StopTimer,
                    "reset" => Command::ResetTimer,
                    "mode" => Command::SwitchTimerMode,
                    _ => {
                        let minutes = action.parse().map_err(|_| invalid("timer", action))?;
                        Command::SetTimerMinutes { minutes }
                    }
                }
            }
            "lang" => Command::CycleLocale,
            _ => return Err(CommandParseError::Unknown(head)),
        };

        Ok(command)
    }
}

fn expect_arg<'a>(
    word: Option<&'a str>,
    command: &'static str,
    expected: &'static str,
) -> Result<&'a str, CommandParseError> {
    word.ok_or(CommandParseError::MissingArgument { command, expected })
}

fn invalid(command: &'static str, value: &str) -> CommandParseError {
    CommandParseError::InvalidArgument {
        command,
        value: value.to_string(),
    }
}
