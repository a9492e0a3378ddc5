//! CLI Command Handlers
//!
//! Each handler takes its parsed args, the resolved feed location and the
//! Output helper, and returns an ExitCode. The data-shaping halves are plain
//! functions so they can be tested without a source.

use serde::Serialize;
use tracing::{debug, warn};

use crate::cli::{
    ExitCode, FeedCmd, OpenCmd, OpenResponse, Output, ProfileCmd, SelectCmd, SelectResult,
    SubmissionsCmd,
};
use crate::config::Config;
use crate::feed::query::{self, FeedFilter};
use crate::feed::{FeedSource, FeedSpec, ProfileStats};
use crate::models::VideoPost;
use crate::playback::select_candidate;
use crate::player::{LocalPlayer, PlayerError, PlayerType};

/// Fetch the whole collection from `source`
async fn load_posts(source: &str, output: &Output) -> Result<Vec<VideoPost>, ExitCode> {
    let spec = FeedSpec::parse(source);
    output.info(format!("Loading feed from {}", spec));
    spec.fetch().await.map_err(|e| {
        warn!(%spec, error = %e, "feed load failed");
        output.error(format!("Failed to load feed: {:#}", e), ExitCode::SourceError)
    })
}

/// Print posts as JSON or one per line
fn print_posts(posts: &[VideoPost], output: &Output) -> ExitCode {
    if output.json {
        if let Err(e) = output.print(posts) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    } else {
        for (i, post) in posts.iter().enumerate() {
            output.line(format!("{:>3}. {}", i + 1, post));
        }
    }
    ExitCode::Success
}

// =============================================================================
// Feed Command
// =============================================================================

/// Posts `feed` prints, in feed order
pub fn feed_posts(posts: &[VideoPost], cmd: &FeedCmd) -> Vec<VideoPost> {
    let filter = if cmd.all {
        FeedFilter::All
    } else {
        FeedFilter::Main
    };
    let mut posts = filter.apply(posts);
    if let Some(limit) = cmd.limit {
        posts.truncate(limit);
    }
    posts
}

pub async fn feed_cmd(cmd: FeedCmd, source: &str, output: &Output) -> ExitCode {
    let posts = match load_posts(source, output).await {
        Ok(posts) => posts,
        Err(code) => return code,
    };
    print_posts(&feed_posts(&posts, &cmd), output)
}

// =============================================================================
// Submissions Command
// =============================================================================

/// Submissions of `cmd.video_id`, rotated to `cmd.start` when given
pub fn submission_posts(posts: &[VideoPost], cmd: &SubmissionsCmd) -> Result<Vec<VideoPost>, String> {
    if query::find(posts, &cmd.video_id).is_none() {
        return Err(format!("Post not found: {}", cmd.video_id));
    }

    let submissions = FeedFilter::SubmissionsFor(cmd.video_id.clone()).apply(posts);
    match cmd.start.as_deref() {
        Some(start) if query::find(&submissions, start).is_none() => Err(format!(
            "Submission {} not found for post {}",
            start, cmd.video_id
        )),
        Some(start) => Ok(query::rotate_to(submissions, start)),
        None => Ok(submissions),
    }
}

pub async fn submissions_cmd(cmd: SubmissionsCmd, source: &str, output: &Output) -> ExitCode {
    let posts = match load_posts(source, output).await {
        Ok(posts) => posts,
        Err(code) => return code,
    };
    match submission_posts(&posts, &cmd) {
        Ok(submissions) => print_posts(&submissions, output),
        Err(msg) => output.error(msg, ExitCode::NotFound),
    }
}

// =============================================================================
// Profile Command
// =============================================================================

/// Profile response
#[derive(Debug, Serialize)]
pub struct ProfileOutput {
    pub user_id: String,
    pub stats: ProfileStats,
    pub videos: Vec<VideoPost>,
}

pub fn profile_of(posts: &[VideoPost], user_id: &str) -> Option<ProfileOutput> {
    let videos = FeedFilter::ByUser(user_id.to_string()).apply(posts);
    if videos.is_empty() {
        return None;
    }
    Some(ProfileOutput {
        user_id: user_id.to_string(),
        stats: ProfileStats::from_posts(&videos),
        videos,
    })
}

pub async fn profile_cmd(cmd: ProfileCmd, source: &str, output: &Output) -> ExitCode {
    let posts = match load_posts(source, output).await {
        Ok(posts) => posts,
        Err(code) => return code,
    };

    let Some(profile) = profile_of(&posts, &cmd.user_id) else {
        return output.error(format!("No posts for user {}", cmd.user_id), ExitCode::NotFound);
    };

    if output.json {
        if let Err(e) = output.print(&profile) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
        return ExitCode::Success;
    }

    let stats = profile.stats;
    output.line(format!(
        "@{}  {} videos  ♥ {}  👁 {}  ⇄ {} submissions",
        profile.user_id,
        stats.videos,
        stats.likes,
        stats.views,
        stats.submissions_received
    ));
    print_posts(&profile.videos, output)
}

// =============================================================================
// Select Command
// =============================================================================

/// Apply one visibility update to an optional current item
pub fn select_active(cmd: &SelectCmd, threshold: f32) -> Result<SelectResult, String> {
    if let Some(bad) = cmd
        .fractions
        .iter()
        .find(|f| !f.is_finite() || !(0.0..=1.0).contains(*f))
    {
        return Err(format!("Visibility fraction out of range [0, 1]: {}", bad));
    }
    if !(0.0..=1.0).contains(&threshold) {
        return Err(format!("Threshold out of range [0, 1]: {}", threshold));
    }

    let Some(feed_len) = cmd.feed_len() else {
        return Err("Feed index too large".to_string());
    };

    let candidate = select_candidate(&cmd.visible_items(), threshold, feed_len);
    debug!(?candidate, current = ?cmd.current, threshold, "selection");

    Ok(SelectResult {
        active_index: candidate.or(cmd.current),
        changed: candidate.is_some() && candidate != cmd.current,
        threshold,
    })
}

pub fn select_cmd(cmd: SelectCmd, config: &Config, output: &Output) -> ExitCode {
    let threshold = cmd.threshold.unwrap_or_else(|| config.threshold());
    let result = match select_active(&cmd, threshold) {
        Ok(result) => result,
        Err(msg) => return output.error(msg, ExitCode::InvalidArgs),
    };

    if output.json {
        if let Err(e) = output.print(&result) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    } else {
        match result.active_index {
            Some(index) if result.changed => output.line(format!("{} (changed)", index)),
            Some(index) => output.line(index),
            None => output.line("none"),
        }
    }
    ExitCode::Success
}

// =============================================================================
// Open Command
// =============================================================================

/// Player from the flag, then the config file, then the default
pub fn resolve_player(cmd: &OpenCmd, config: &Config) -> Result<PlayerType, PlayerError> {
    match (cmd.player, config.player.as_deref()) {
        (Some(choice), _) => Ok(choice.into()),
        (None, Some(name)) => name.parse(),
        (None, None) => Ok(PlayerType::default()),
    }
}

pub async fn open_cmd(cmd: OpenCmd, source: &str, config: &Config, output: &Output) -> ExitCode {
    let player_type = match resolve_player(&cmd, config) {
        Ok(p) => p,
        Err(e) => return output.error(e.to_string(), ExitCode::InvalidArgs),
    };

    let posts = match load_posts(source, output).await {
        Ok(posts) => posts,
        Err(code) => return code,
    };
    let Some(post) = query::find(&posts, &cmd.video_id) else {
        return output.error(format!("Post not found: {}", cmd.video_id), ExitCode::NotFound);
    };

    let player = LocalPlayer::new(player_type);
    if !player.is_available().await {
        return output.error(
            PlayerError::NotFound(player_type.command().to_string()).to_string(),
            ExitCode::Error,
        );
    }

    let response = OpenResponse {
        status: "playing",
        video_id: post.id.clone(),
        uri: post.uri.clone(),
        player: player_type.to_string(),
    };
    if output.json {
        if let Err(e) = output.print(&response) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    } else {
        output.info(format!("Playing {} in {}...", post.handle(), player_type));
    }

    match player.play_and_wait(&post.uri, !cmd.no_loop).await {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(e.to_string(), ExitCode::Error),
    }
}
