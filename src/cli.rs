//! CLI - Command Line Interface for JobTok
//!
//! Everything the TUI shows is also scriptable. All output is JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # Main feed from an HTTP endpoint
//! jobtok --source https://api.example.com feed --limit 10 --json
//!
//! # Submissions of one post, starting at a given submission
//! jobtok submissions 3Fq9xYb2 --start Kp0aZ71c
//!
//! # Which item would play for these visibility fractions?
//! jobtok select 0.3 0.8 0.4 --threshold 0.5
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::player::PlayerType;
use crate::playback::VisibleItem;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    /// General error
    Error = 1,
    InvalidArgs = 2,
    /// Feed source unreachable or unreadable
    SourceError = 3,
    /// Post or user not found
    NotFound = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// JobTok - terminal client for the short-video job feed
///
/// Run without arguments to launch the interactive TUI.
/// Use subcommands for scripting.
#[derive(Parser, Debug)]
#[command(
    name = "jobtok",
    version,
    about = "Terminal client for the JobTok short-video job feed",
    long_about = "Browse the JobTok feed as a paging list where exactly one video \
                  plays at a time.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  jobtok                                 Launch interactive TUI\n\
                  jobtok feed --limit 5                  Print the main feed\n\
                  jobtok profile u_42 --json             A user's posts and totals\n\
                  jobtok select 0.6 0.6 --first-index 2  Pick the item that plays"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Feed location: JSON file path or http(s) endpoint
    #[arg(long, short = 's', global = true)]
    pub source: Option<String>,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the main feed
    #[command(visible_alias = "f")]
    Feed(FeedCmd),

    /// Print the submissions made against a post
    #[command(visible_alias = "subs")]
    Submissions(SubmissionsCmd),

    /// Print a user's posts and totals
    #[command(visible_alias = "p")]
    Profile(ProfileCmd),

    /// Choose the active item from visibility fractions
    Select(SelectCmd),

    /// Play a post in VLC or mpv
    #[command(visible_alias = "o")]
    Open(OpenCmd),
}

/// Print the main feed (active, non-submission posts)
#[derive(Args, Debug)]
pub struct FeedCmd {
    /// Include submissions and inactive posts
    #[arg(long, short = 'a')]
    pub all: bool,

    /// Maximum number of posts
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,
}

/// Print the submissions of one post
#[derive(Args, Debug)]
pub struct SubmissionsCmd {
    /// Post whose submissions to list
    #[arg(required = true)]
    pub video_id: String,

    /// Rotate the list to start at this submission
    #[arg(long)]
    pub start: Option<String>,
}

/// Print a user's posts and totals
#[derive(Args, Debug)]
pub struct ProfileCmd {
    #[arg(required = true)]
    pub user_id: String,
}

/// Run threshold selection over a list of visibility fractions
#[derive(Args, Debug)]
pub struct SelectCmd {
    /// Visible fraction of each on-screen item, in list order
    #[arg(required = true, num_args = 1..)]
    pub fractions: Vec<f32>,

    /// Minimum fraction for an item to become active
    #[arg(long, short = 't')]
    pub threshold: Option<f32>,

    /// Feed index of the first fraction
    #[arg(long, default_value = "0")]
    pub first_index: usize,

    /// Currently active index, reported back when nothing qualifies
    #[arg(long)]
    pub current: Option<usize>,
}

impl SelectCmd {
    /// Fractions paired with consecutive feed indices
    ///
    /// Fractions whose index would overflow `usize` are dropped.
    pub fn visible_items(&self) -> Vec<VisibleItem> {
        self.fractions
            .iter()
            .enumerate()
            .map_while(|(i, fraction)| {
                let index = self.first_index.checked_add(i)?;
                Some(VisibleItem::new(index, *fraction))
            })
            .collect()
    }

    /// Feed length implied by the arguments, or None if it overflows `usize`
    pub fn feed_len(&self) -> Option<usize> {
        let visible_end = self.first_index.checked_add(self.fractions.len())?;
        match self.current {
            Some(current) => Some(visible_end.max(current.checked_add(1)?)),
            None => Some(visible_end),
        }
    }
}

/// Play a post in an external player
#[derive(Args, Debug)]
pub struct OpenCmd {
    #[arg(required = true)]
    pub video_id: String,

    /// Player to use (defaults to config, then vlc)
    #[arg(long, short = 'p', value_enum)]
    pub player: Option<PlayerChoice>,

    /// Play once instead of looping
    #[arg(long)]
    pub no_loop: bool,
}

/// External player selection
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerChoice {
    #[default]
    Vlc,
    Mpv,
}

impl From<PlayerChoice> for PlayerType {
    fn from(choice: PlayerChoice) -> Self {
        match choice {
            PlayerChoice::Vlc => PlayerType::Vlc,
            PlayerChoice::Mpv => PlayerType::Mpv,
        }
    }
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Result of `select`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectResult {
    /// Item that plays after this visibility update
    pub active_index: Option<usize>,
    /// Whether the active item changed
    pub changed: bool,
    pub threshold: f32,
}

/// Result of `open`
#[derive(Debug, Serialize)]
pub struct OpenResponse {
    pub status: &'static str,
    pub video_id: String,
    pub uri: String,
    pub player: String,
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print data wrapped in the JSON envelope
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        let output = JsonOutput::success(data);
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    /// Print a line of human-readable output
    pub fn line(&self, msg: impl std::fmt::Display) {
        println!("{}", msg);
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet and JSON mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// ID Validation
// =============================================================================

fn id_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{1,128}$").ok())
        .as_ref()
}

/// Validate a post or user id (document-id charset, 1-128 chars)
pub fn validate_id(id: &str) -> Result<&str, &'static str> {
    if id_pattern().is_some_and(|re| re.is_match(id)) {
        Ok(id)
    } else {
        Err("Invalid id (expected 1-128 letters, digits, '-' or '_')")
    }
}

// =============================================================================
// Tests
// =============================================================================
