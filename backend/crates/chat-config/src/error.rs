use std::panic::Location;
use std::path::PathBuf;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum ConfigError {
    #[error("{section} config invalid: {message} {location}")]
    Invalid {
        section: &'static str,
        message: String,
        location: ErrorLocation,
    },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Cannot determine current working directory: {source}")]
    WorkingDirectory {
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    #[track_caller]
    fn invalid<S: Into<String>>(section: &'static str, message: S) -> Self {
        ConfigError::Invalid {
            section,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Invalid `[server]` section
    #[track_caller]
    pub fn server<S: Into<String>>(message: S) -> Self {
        Self::invalid("server", message)
    }

    /// Invalid `[websocket]` section
    #[track_caller]
    pub fn websocket<S: Into<String>>(message: S) -> Self {
        Self::invalid("websocket", message)
    }

    /// Invalid `[broadcaster]` section
    #[track_caller]
    pub fn broadcaster<S: Into<String>>(message: S) -> Self {
        Self::invalid("broadcaster", message)
    }

    /// Invalid `[logging]` section
    #[track_caller]
    pub fn logging<S: Into<String>>(message: S) -> Self {
        Self::invalid("logging", message)
    }
}

pub type ConfigErrorResult<T> = StdResult<T, ConfigError>;
