//! Clock-driven player
//!
//! Stands in for a real decoder in the terminal: it validates the media
//! locator on play, keeps a playhead, and reports end-of-media when its clock
//! runs past the clip length.

use std::time::Duration;

use super::handle::{PlaybackError, PlayerHandle};
use crate::models::VideoPost;

/// URI schemes the player accepts
const SUPPORTED_SCHEMES: &[&str] = &["http", "https", "file", "gs"];

/// Simulated player for one feed item
#[derive(Debug, Clone)]
pub struct SimulatedPlayer {
    uri: String,
    duration: Duration,
    position: Duration,
    playing: bool,
}

impl SimulatedPlayer {
    pub fn new(uri: impl Into<String>, duration: Duration) -> Self {
        Self {
            uri: uri.into(),
            duration,
            position: Duration::ZERO,
            playing: false,
        }
    }

    /// Player for a post's media and clip length
    pub fn for_post(post: &VideoPost) -> Self {
        Self::new(post.uri.clone(), post.clip_duration())
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Playhead as a fraction of the clip (0.0 - 1.0)
    pub fn progress(&self) -> f64 {
        let total = self.duration.as_secs_f64();
        if total > 0.0 {
            (self.position.as_secs_f64() / total).min(1.0)
        } else {
            0.0
        }
    }

    /// Advance the clock by `dt`.
    ///
    /// Returns true when this step reached end-of-media. The player then
    /// stops at the end, so each pass completes exactly once.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if !self.playing {
            return false;
        }

        self.position = self.position.saturating_add(dt);
        if self.position >= self.duration {
            self.position = self.duration;
            self.playing = false;
            return true;
        }
        false
    }

    fn check_source(&self) -> Result<(), PlaybackError> {
        let uri = self.uri.trim();
        if uri.is_empty() {
            return Err(PlaybackError::load("empty media locator"));
        }

        let scheme = uri.split_once("://").map(|(scheme, _)| scheme);
        match scheme {
            Some(s) if SUPPORTED_SCHEMES.contains(&s.to_ascii_lowercase().as_str()) => Ok(()),
            Some(s) => Err(PlaybackError::load(format!("unsupported scheme '{}'", s))),
            None => Err(PlaybackError::load(format!("not a media URI: {}", uri))),
        }
    }
}

impl PlayerHandle for SimulatedPlayer {
    fn play(&mut self) -> Result<(), PlaybackError> {
        self.check_source()?;
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, position: Duration) -> Result<(), PlaybackError> {
        if position > self.duration {
            return Err(PlaybackError::seek(position, "beyond end of clip"));
        }
        self.position = position;
        Ok(())
    }
}
