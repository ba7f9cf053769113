//! Error types for Showreel Core

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for player operations
pub type Result<T> = std::result::Result<T, Error>;

/// Text shown on the error overlay, whatever the failure kind
pub const RETRY_MESSAGE: &str = "Unable to load video. Please try again.";

/// Errors returned by player commands and configuration
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Invalid playback state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Player has been destroyed")]
    Destroyed,

    #[error("Failed to parse source list: {0}")]
    SourceList(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for diagnostics
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::ConfigInvalid(_) => "CONFIG_INVALID",
            Error::InvalidStateTransition { .. } => "INVALID_STATE",
            Error::Destroyed => "DESTROYED",
            Error::SourceList(_) => "SOURCE_LIST",
        }
    }
}

/// Playback failure recorded in `PlayerState::last_error`.
///
/// All variants render the same retry affordance; they only differ in the
/// diagnostics they carry.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayerError {
    /// Source unreachable or unsupported
    #[error("Failed to load media ({code}): {message}")]
    LoadFailed { code: MediaErrorCode, message: String },

    /// The media resource refused the play attempt
    #[error("Playback rejected: {reason}")]
    PlaybackRejected { reason: String },

    /// Runtime decode fault reported by the media resource
    #[error("Decode error: {message}")]
    DecodeError { message: String },
}

impl PlayerError {
    /// Build the error matching a media error code
    pub fn from_media(code: MediaErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            MediaErrorCode::Decode => PlayerError::DecodeError { message },
            _ => PlayerError::LoadFailed { code, message },
        }
    }

    /// Returns the error code for diagnostics
    pub fn error_code(&self) -> &'static str {
        match self {
            PlayerError::LoadFailed { .. } => "LOAD_FAILED",
            PlayerError::PlaybackRejected { .. } => "PLAYBACK_REJECTED",
            PlayerError::DecodeError { .. } => "DECODE_ERROR",
        }
    }

    /// Message for the error overlay
    pub fn user_message(&self) -> &'static str {
        RETRY_MESSAGE
    }
}

/// Error codes reported by the host media element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaErrorCode {
    /// Fetching was aborted by the user agent
    Aborted,
    /// A network error interrupted the download
    Network,
    /// The resource could not be decoded
    Decode,
    /// No supported source was found
    SrcNotSupported,
    /// The host reported an error without a known code
    Unknown,
}

impl MediaErrorCode {
    /// Map the numeric `MediaError.code` value
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => MediaErrorCode::Aborted,
            2 => MediaErrorCode::Network,
            3 => MediaErrorCode::Decode,
            4 => MediaErrorCode::SrcNotSupported,
            _ => MediaErrorCode::Unknown,
        }
    }
}

impl std::fmt::Display for MediaErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaErrorCode::Aborted => write!(f, "aborted"),
            MediaErrorCode::Network => write!(f, "network"),
            MediaErrorCode::Decode => write!(f, "decode"),
            MediaErrorCode::SrcNotSupported => write!(f, "src_not_supported"),
            MediaErrorCode::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_code_mapping() {
        assert_eq!(MediaErrorCode::from_code(2), MediaErrorCode::Network);
        assert_eq!(MediaErrorCode::from_code(4), MediaErrorCode::SrcNotSupported);
        assert_eq!(MediaErrorCode::from_code(42), MediaErrorCode::Unknown);
    }

    #[test]
    fn test_decode_code_becomes_decode_error() {
        let err = PlayerError::from_media(MediaErrorCode::Decode, "corrupt frame");
        assert_eq!(err.error_code(), "DECODE_ERROR");

        let err = PlayerError::from_media(MediaErrorCode::SrcNotSupported, "");
        assert!(matches!(err, PlayerError::LoadFailed { .. }));
    }

    #[test]
    fn test_same_user_message_for_all_kinds() {
        let kinds = [
            PlayerError::from_media(MediaErrorCode::Network, "offline"),
            PlayerError::PlaybackRejected { reason: "NotAllowedError".into() },
            PlayerError::DecodeError { message: "bad".into() },
        ];
        assert!(kinds.iter().all(|e| e.user_message() == RETRY_MESSAGE));
    }
}
