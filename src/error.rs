// Error types for the fallible edges: config loading, catalog building, gesture parsing.
// Player and timer operations never fail; invalid requests are ignored.
use std::path::PathBuf;
use thiserror::Error;

use crate::scene::SceneId;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("scene `{0}` must have at least one stream URL")]
    EmptyPlaylist(SceneId),

    #[error("unknown scene `{0}`")]
    UnknownScene(String),

    #[error("unknown ambient sound `{0}`")]
    UnknownAmbient(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid catalog in settings")]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command `{0}`")]
    Unknown(String),

    #[error("`{command}` expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("invalid argument `{value}` for `{command}`")]
    InvalidArgument { command: &'static str, value: String },
}
