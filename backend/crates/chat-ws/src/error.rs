use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WsError {
    #[error("Connection closed: {reason} {location}")]
    ConnectionClosed {
        reason: String,
        location: ErrorLocation,
    },

    #[error("WebSocket transport error: {source} {location}")]
    Transport {
        #[source]
        source: axum::Error,
        location: ErrorLocation,
    },

    #[error("Broadcaster stopped, cannot accept {event} {location}")]
    BroadcasterStopped {
        event: &'static str,
        location: ErrorLocation,
    },
}

impl WsError {
    #[track_caller]
    pub fn connection_closed<S: Into<String>>(reason: S) -> Self {
        Self::ConnectionClosed {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn broadcaster_stopped(event: &'static str) -> Self {
        Self::BroadcasterStopped {
            event,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Orderly close by the remote side, as opposed to a transport failure
    pub fn is_orderly_close(&self) -> bool {
        matches!(self, Self::ConnectionClosed { .. })
    }
}

impl From<axum::Error> for WsError {
    #[track_caller]
    fn from(source: axum::Error) -> Self {
        Self::Transport {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, WsError>;
