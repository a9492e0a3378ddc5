//! Player handles
//!
//! A handle is the per-item playback resource. The controller is the only
//! caller of its commands; the rendering layer just creates and drops it.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Errors reported by a player handle
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    #[error("media failed to load: {reason}")]
    Load { reason: String },
    #[error("seek to {position:?} failed: {reason}")]
    Seek { position: Duration, reason: String },
}

impl PlaybackError {
    pub fn load(reason: impl Into<String>) -> Self {
        PlaybackError::Load {
            reason: reason.into(),
        }
    }

    pub fn seek(position: Duration, reason: impl Into<String>) -> Self {
        PlaybackError::Seek {
            position,
            reason: reason.into(),
        }
    }
}

/// Commands the controller issues to a player.
///
/// Commands are fire-and-forget. An `Err` return is a failure detected
/// synchronously; later failures come back through
/// [`PlaybackController::on_player_error`](super::PlaybackController::on_player_error).
pub trait PlayerHandle {
    /// Start or resume playback from the current position
    fn play(&mut self) -> Result<(), PlaybackError>;

    /// Pause, keeping the current position
    fn pause(&mut self);

    /// Move the playhead
    fn seek(&mut self, position: Duration) -> Result<(), PlaybackError>;
}

impl<H: PlayerHandle + ?Sized> PlayerHandle for Box<H> {
    fn play(&mut self) -> Result<(), PlaybackError> {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn seek(&mut self, position: Duration) -> Result<(), PlaybackError> {
        (**self).seek(position)
    }
}

/// Logical playback state of one feed item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemState {
    /// No handle exists (outside the rendered window)
    #[default]
    Unmounted,
    Paused,
    Playing,
    /// Terminal for the current handle; a remount starts over
    Errored,
}

impl ItemState {
    pub fn is_playing(&self) -> bool {
        matches!(self, ItemState::Playing)
    }

    pub fn is_errored(&self) -> bool {
        matches!(self, ItemState::Errored)
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemState::Unmounted => write!(f, "Unmounted"),
            ItemState::Paused => write!(f, "Paused"),
            ItemState::Playing => write!(f, "Playing"),
            ItemState::Errored => write!(f, "Error"),
        }
    }
}
