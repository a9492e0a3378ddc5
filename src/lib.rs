//! JobTok - terminal client for the JobTok short-video job feed
//!
//! A paging feed where exactly one video plays at a time: the item most
//! visible in the viewport, looping until the user scrolls away.
//!
//! # Modules
//!
//! - `playback` - Active-item controller, player handles, viewport geometry
//! - `feed` - Feed sources (JSON file, HTTP) and queries
//! - `models` - Video post data
//! - `player` - External VLC/mpv launcher
//! - `app` - Application state and navigation
//! - `ui` - TUI components
//! - `cli` / `commands` - Scriptable subcommands
//! - `config` - Config file and environment overrides

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod feed;
pub mod models;
pub mod playback;
pub mod player;
pub mod ui;

// Re-export commonly used types
pub use app::{App, AppAction, AppState, FeedScreen, SubmissionList};
pub use config::Config;
pub use feed::{FeedFilter, FeedSource, FeedSpec, HttpFeedSource, JsonFileSource};
pub use models::{SubmissionStatus, VideoPost};
pub use playback::{
    ControllerEvent, EventOutcome, ItemState, PlaybackController, PlaybackError, PlayerHandle,
    SimulatedPlayer, VisibleItem,
};
