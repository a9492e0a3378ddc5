//! External player - hand a post's media to VLC or mpv
//!
//! The in-terminal feed only simulates playback; `open` launches a real
//! player on the current post's URI.

use std::process::Stdio;
use std::str::FromStr;
use thiserror::Error;
use tokio::process::{Child, Command};
use tracing::info;

/// Supported external players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerType {
    #[default]
    Vlc,
    Mpv,
}

impl PlayerType {
    /// Command used to launch this player
    pub fn command(&self) -> &'static str {
        match self {
            PlayerType::Vlc => {
                #[cfg(target_os = "macos")]
                if std::path::Path::new("/Applications/VLC.app").exists() {
                    return "/Applications/VLC.app/Contents/MacOS/VLC";
                }
                "vlc"
            }
            PlayerType::Mpv => "mpv",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PlayerType::Vlc => "VLC",
            PlayerType::Mpv => "mpv",
        }
    }

    /// Arguments for playing `uri`, looping like the in-feed player does
    pub fn args(&self, uri: &str, looping: bool) -> Vec<String> {
        let mut args = vec![uri.to_string()];
        match self {
            PlayerType::Vlc => {
                args.push("--no-video-title-show".into());
                if looping {
                    args.push("--loop".into());
                }
            }
            PlayerType::Mpv => {
                args.push("--force-window=immediate".into());
                if looping {
                    args.push("--loop-file=inf".into());
                }
            }
        }
        args
    }
}

impl std::fmt::Display for PlayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PlayerType {
    type Err = PlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vlc" => Ok(PlayerType::Vlc),
            "mpv" => Ok(PlayerType::Mpv),
            other => Err(PlayerError::Unsupported(other.to_string())),
        }
    }
}

/// Errors from external player operations
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Player '{0}' not found. Install it first.")]
    NotFound(String),
    #[error("Unsupported player '{0}' (expected vlc or mpv)")]
    Unsupported(String),
    #[error("Failed to start player: {0}")]
    StartFailed(#[from] std::io::Error),
    #[error("Nothing to play: post has no media URI")]
    EmptyUri,
}

/// Launches an external player process
pub struct LocalPlayer {
    player_type: PlayerType,
}

impl LocalPlayer {
    pub fn new(player_type: PlayerType) -> Self {
        Self { player_type }
    }

    pub fn player_type(&self) -> PlayerType {
        self.player_type
    }

    /// Check if the player is on PATH
    pub async fn is_available(&self) -> bool {
        let cmd = self.player_type.command();

        if cmd.starts_with('/') {
            return std::path::Path::new(cmd).exists();
        }

        Command::new("which")
            .arg(cmd)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Spawn the player on `uri`
    pub async fn play(&self, uri: &str, looping: bool) -> Result<Child, PlayerError> {
        if uri.trim().is_empty() {
            return Err(PlayerError::EmptyUri);
        }

        let mut cmd = Command::new(self.player_type.command());
        cmd.args(self.player_type.args(uri, looping));
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::null());

        info!(player = %self.player_type, %uri, "launching external player");

        cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PlayerError::NotFound(self.player_type.command().to_string())
            } else {
                PlayerError::StartFailed(e)
            }
        })
    }

    /// Play and wait for the player to close
    pub async fn play_and_wait(&self, uri: &str, looping: bool) -> Result<(), PlayerError> {
        let mut child = self.play(uri, looping).await?;
        let _ = child.wait().await;
        Ok(())
    }
}
