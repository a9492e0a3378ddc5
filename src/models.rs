//! Data structures and types for JobTok
//!
//! Contains the shared models used across the application:
//! - **Posts**: video posts as stored in the `videos` collection
//! - **Submissions**: review status of posts made against another post
//!
//! Field names on the wire follow the document schema (camelCase).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Clip length assumed when a post carries no duration
pub const DEFAULT_CLIP_SECS: f64 = 15.0;

// =============================================================================
// Submission Models
// =============================================================================

/// Review status of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl SubmissionStatus {
    /// Label shown on the review buttons
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "Pending",
            SubmissionStatus::Accepted => "Accepted",
            SubmissionStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// =============================================================================
// Post Models
// =============================================================================

/// A video post from the `videos` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoPost {
    #[serde(rename = "videoId", alias = "id")]
    pub id: String,
    pub user_id: String,
    #[serde(alias = "videoUrl")]
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub shares: u64,
    #[serde(default)]
    pub views: u64,
    /// Clip length in seconds
    #[serde(rename = "duration", default)]
    pub duration_secs: f64,
    /// Set when this post is a submission against another post
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_video_id: Option<String>,
    #[serde(default)]
    pub submissions: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_status: Option<SubmissionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl VideoPost {
    /// Minimal post, mostly useful for fixtures
    pub fn new(id: impl Into<String>, user_id: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            uri: uri.into(),
            thumbnail: None,
            description: String::new(),
            tags: Vec::new(),
            likes: 0,
            comments: 0,
            shares: 0,
            views: 0,
            duration_secs: 0.0,
            original_video_id: None,
            submissions: 0,
            submission_status: None,
            created_at: None,
            is_active: true,
        }
    }

    /// Whether this post was made against another post
    pub fn is_submission(&self) -> bool {
        self.original_video_id.is_some()
    }

    /// Author handle as shown on cards: `@` plus the first 8 chars of the user id
    pub fn handle(&self) -> String {
        let short: String = self.user_id.chars().take(8).collect();
        format!("@{}", short)
    }

    /// Clip length, falling back to [`DEFAULT_CLIP_SECS`]
    pub fn clip_duration(&self) -> Duration {
        if self.duration_secs.is_finite() && self.duration_secs > 0.0 {
            Duration::from_secs_f64(self.duration_secs)
        } else {
            Duration::from_secs_f64(DEFAULT_CLIP_SECS)
        }
    }

    /// Effective review status (submissions default to pending)
    pub fn review_status(&self) -> Option<SubmissionStatus> {
        if self.is_submission() {
            Some(self.submission_status.unwrap_or_default())
        } else {
            None
        }
    }

    /// Hashtags formatted for display
    pub fn format_tags(&self) -> String {
        self.tags
            .iter()
            .map(|t| format!("#{}", t.trim_start_matches('#')))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for VideoPost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} - {} [♥ {} · 👁 {}]",
            self.id,
            self.handle(),
            self.description,
            format_count(self.likes),
            format_count(self.views)
        )?;
        if let Some(status) = self.review_status() {
            write!(f, " ({})", status)?;
        }
        Ok(())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Format a counter compactly (e.g. 950, 1.2K, 3.4M)
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Format duration as HH:MM:SS or MM:SS
pub fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

// =============================================================================
// Tests
// =============================================================================
