//! Feed queries
//!
//! The collection is fetched whole; these helpers carve the views the
//! screens need out of it without changing relative order.

use serde::Serialize;

use crate::models::{SubmissionStatus, VideoPost};

/// Which posts a screen shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedFilter {
    /// Main feed: active posts that are not submissions
    Main,
    /// Every post, submissions and inactive included
    All,
    /// Submissions made against one post
    SubmissionsFor(String),
    /// Posts owned by one user
    ByUser(String),
}

impl FeedFilter {
    pub fn matches(&self, post: &VideoPost) -> bool {
        match self {
            FeedFilter::Main => post.is_active && !post.is_submission(),
            FeedFilter::All => true,
            FeedFilter::SubmissionsFor(id) => post.original_video_id.as_deref() == Some(id),
            FeedFilter::ByUser(user_id) => post.user_id == *user_id,
        }
    }

    /// Matching posts, in source order
    pub fn apply(&self, posts: &[VideoPost]) -> Vec<VideoPost> {
        posts.iter().filter(|p| self.matches(p)).cloned().collect()
    }
}

/// Rotate `posts` so the post with `start_id` comes first.
///
/// The relative cyclic order is kept; an unknown id leaves the order as is.
pub fn rotate_to(mut posts: Vec<VideoPost>, start_id: &str) -> Vec<VideoPost> {
    if let Some(index) = posts.iter().position(|p| p.id == start_id) {
        posts.rotate_left(index);
    }
    posts
}

pub fn find<'a>(posts: &'a [VideoPost], id: &str) -> Option<&'a VideoPost> {
    posts.iter().find(|p| p.id == id)
}

/// Record a review decision on the in-memory copy of a submission.
///
/// Returns false if no submission with that id exists.
pub fn set_submission_status(posts: &mut [VideoPost], id: &str, status: SubmissionStatus) -> bool {
    match posts.iter_mut().find(|p| p.id == id && p.is_submission()) {
        Some(post) => {
            post.submission_status = Some(status);
            true
        }
        None => false,
    }
}

/// Totals shown on a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ProfileStats {
    pub videos: usize,
    pub likes: u64,
    pub views: u64,
    pub submissions_received: u64,
}

impl ProfileStats {
    pub fn from_posts(posts: &[VideoPost]) -> Self {
        posts.iter().fold(Self::default(), |mut stats, post| {
            stats.videos += 1;
            stats.likes += post.likes;
            stats.views += post.views;
            stats.submissions_received += post.submissions as u64;
            stats
        })
    }
}
