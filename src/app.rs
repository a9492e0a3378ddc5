//! App state and core application logic
//!
//! Owns the screens, the navigation stack and the feed collection. Each
//! paging screen wraps one playback controller; the app forwards focus,
//! scroll and clock ticks to it and turns its notifications into status text.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info};

use crate::config::{Config, DEFAULT_OVERSCAN};
use crate::feed::query::{self, FeedFilter};
use crate::feed::ProfileStats;
use crate::models::{SubmissionStatus, VideoPost};
use crate::playback::{
    ControllerEvent, FeedScroller, PlaybackController, SimulatedPlayer,
    DEFAULT_VISIBILITY_THRESHOLD,
};

/// Page height used before the first resize
pub const DEFAULT_PAGE_HEIGHT: u16 = 20;

// =============================================================================
// App State Enum
// =============================================================================

/// Screen currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// Main paging feed
    #[default]
    Feed,
    /// Current user's posts
    Profile,
    /// Submissions of one post with their review status
    SubmissionList,
    /// Paging feed of one post's submissions
    Submissions,
}

// =============================================================================
// Loading State
// =============================================================================

/// Loading state for async operations
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadingState {
    #[default]
    Idle,
    Loading(Option<String>),
    Error(String),
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadingState::Error(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            LoadingState::Loading(Some(msg)) => Some(msg),
            LoadingState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

// =============================================================================
// Selection State
// =============================================================================

/// Selection state for list views
#[derive(Debug, Clone, Default)]
pub struct ListState {
    pub selected: usize,
    pub offset: usize,
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self {
            selected: 0,
            offset: 0,
            len,
        }
    }

    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.offset {
                self.offset = self.selected;
            }
        }
    }

    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    pub fn last(&mut self) {
        if self.len > 0 {
            self.selected = self.len - 1;
        }
    }

    /// Update offset to keep selected item visible
    pub fn scroll_into_view(&mut self, visible_height: usize) {
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if visible_height > 0 && self.selected >= self.offset + visible_height {
            self.offset = self.selected - visible_height + 1;
        }
    }

    /// Update length, clamping the selection
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
        self.offset = self.offset.min(self.selected);
    }
}

// =============================================================================
// Feed Screen
// =============================================================================

/// A paging feed: controller, scroll animation and mounted window
#[derive(Debug)]
pub struct FeedScreen {
    pub controller: PlaybackController<SimulatedPlayer>,
    pub scroller: FeedScroller,
    pub title: String,
    pub overscan: usize,
    /// Post whose submissions this screen lists
    pub origin: Option<VideoPost>,
}

impl FeedScreen {
    pub fn new(
        title: impl Into<String>,
        posts: Vec<VideoPost>,
        threshold: f32,
        overscan: usize,
        height: u16,
    ) -> Self {
        Self {
            controller: PlaybackController::with_posts(threshold, posts),
            scroller: FeedScroller::new(height),
            title: title.into(),
            overscan,
            origin: None,
        }
    }

    pub fn len(&self) -> usize {
        self.controller.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controller.is_empty()
    }

    pub fn active_post(&self) -> Option<&VideoPost> {
        self.controller.active_post()
    }

    /// Swap in a fresh sequence and snap the scroll to the active post
    pub fn replace(&mut self, posts: Vec<VideoPost>) {
        self.controller.replace_feed(posts);
        let len = self.len();
        self.scroller
            .jump_to(self.controller.active_index().unwrap_or(0), len);
    }

    pub fn next(&mut self) {
        self.scroller.next(self.len());
    }

    pub fn prev(&mut self) {
        self.scroller.prev(self.len());
    }

    pub fn first(&mut self) {
        self.scroller.scroll_to(0, self.len());
    }

    pub fn last(&mut self) {
        let len = self.len();
        self.scroller.scroll_to(len.saturating_sub(1), len);
    }

    pub fn resize(&mut self, height: u16) {
        self.scroller.resize(height);
    }

    /// Advance one frame.
    ///
    /// Steps the scroll animation, remounts the rendered window, reports the
    /// new visibility and runs the player clocks. Returns the controller's
    /// notifications for this frame.
    pub fn tick(&mut self, dt: Duration) -> Vec<ControllerEvent> {
        self.scroller.tick();

        let len = self.len();
        let viewport = *self.scroller.viewport();
        self.controller.sync_window(
            viewport.rendered_window(len, self.overscan),
            |_, post| SimulatedPlayer::for_post(post),
        );
        self.controller
            .on_visibility_changed(&viewport.visible_items(len));

        let completed: Vec<usize> = self
            .controller
            .handles_mut()
            .filter_map(|(index, player)| player.advance(dt).then_some(index))
            .collect();
        for index in completed {
            self.controller.on_playback_completed(index);
        }

        self.controller.drain_events()
    }
}

// =============================================================================
// Profile
// =============================================================================

/// Profile view state
#[derive(Debug, Clone, Default)]
pub struct ProfileState {
    pub posts: Vec<VideoPost>,
    pub list: ListState,
    pub stats: ProfileStats,
}

impl ProfileState {
    pub fn set_posts(&mut self, posts: Vec<VideoPost>) {
        self.list.set_len(posts.len());
        self.stats = ProfileStats::from_posts(&posts);
        self.posts = posts;
    }

    pub fn selected_post(&self) -> Option<&VideoPost> {
        self.posts.get(self.list.selected)
    }
}

// =============================================================================
// Submission List
// =============================================================================

/// Submissions of one post, listed with their review status
#[derive(Debug, Clone)]
pub struct SubmissionList {
    pub origin: VideoPost,
    pub posts: Vec<VideoPost>,
    pub list: ListState,
}

impl SubmissionList {
    pub fn new(origin: VideoPost, posts: Vec<VideoPost>) -> Self {
        Self {
            list: ListState::new(posts.len()),
            origin,
            posts,
        }
    }

    /// Swap in a fresh list, keeping the selected submission if it is still there
    pub fn set_posts(&mut self, posts: Vec<VideoPost>) {
        let selected = self.selected_post().map(|p| p.id.clone());
        self.list.set_len(posts.len());
        if let Some(index) = selected.and_then(|id| posts.iter().position(|p| p.id == id)) {
            self.list.selected = index;
            self.list.scroll_into_view(0);
        }
        self.posts = posts;
    }

    pub fn selected_post(&self) -> Option<&VideoPost> {
        self.posts.get(self.list.selected)
    }
}

// =============================================================================
// Actions
// =============================================================================

/// Work the event loop has to do outside the key handler
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Fetch the feed again
    Refresh,
    /// Hand a post to the external player
    OpenExternal(VideoPost),
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
#[derive(Debug)]
pub struct App {
    pub state: AppState,
    pub nav_stack: Vec<AppState>,
    pub running: bool,
    /// Global error message (popup)
    pub error: Option<String>,
    /// One-line status shown in the footer
    pub status: Option<String>,
    pub loading: LoadingState,
    /// Signed-in user
    pub user_id: Option<String>,
    /// Whole collection as last fetched, with local review decisions
    pub posts: Vec<VideoPost>,

    pub feed: FeedScreen,
    pub profile: ProfileState,
    pub submission_list: Option<SubmissionList>,
    pub submissions: Option<FeedScreen>,

    threshold: f32,
    overscan: usize,
    page_height: u16,
    terminal_focused: bool,
    pending: Option<AppAction>,
}

impl Default for App {
    fn default() -> Self {
        Self::with_settings(DEFAULT_VISIBILITY_THRESHOLD, DEFAULT_OVERSCAN, None)
    }
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(threshold: f32, overscan: usize, user_id: Option<String>) -> Self {
        Self {
            state: AppState::Feed,
            nav_stack: Vec::new(),
            running: true,
            error: None,
            status: None,
            loading: LoadingState::Loading(Some("Loading feed...".into())),
            user_id,
            posts: Vec::new(),
            feed: FeedScreen::new(
                "For You",
                Vec::new(),
                threshold,
                overscan,
                DEFAULT_PAGE_HEIGHT,
            ),
            profile: ProfileState::default(),
            submission_list: None,
            submissions: None,
            threshold,
            overscan,
            page_height: DEFAULT_PAGE_HEIGHT,
            terminal_focused: true,
            pending: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_settings(config.threshold(), config.overscan(), config.current_user())
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error = Some(msg.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Take the pending action, if any
    pub fn take_action(&mut self) -> Option<AppAction> {
        self.pending.take()
    }

    // -------------------------------------------------------------------------
    // Data
    // -------------------------------------------------------------------------

    /// Install a freshly fetched collection into every screen
    pub fn load_posts(&mut self, posts: Vec<VideoPost>) {
        info!(count = posts.len(), "feed loaded");
        self.posts = posts;
        self.loading = LoadingState::Idle;

        self.feed.replace(FeedFilter::Main.apply(&self.posts));

        let mine = match &self.user_id {
            Some(user) => FeedFilter::ByUser(user.clone()).apply(&self.posts),
            None => Vec::new(),
        };
        self.profile.set_posts(mine);

        if let Some(list) = self.submission_list.as_mut() {
            let id = list.origin.id.clone();
            if let Some(origin) = query::find(&self.posts, &id) {
                list.origin = origin.clone();
            }
            list.set_posts(FeedFilter::SubmissionsFor(id).apply(&self.posts));
        }

        if let Some(screen) = self.submissions.as_mut() {
            if let Some(origin) = screen.origin.as_ref() {
                let id = origin.id.clone();
                screen.origin = query::find(&self.posts, &id).cloned().or(screen.origin.take());
                // Keep the rotation the screen was opened with
                let start = screen.controller.posts().first().map(|p| p.id.clone());
                let posts = FeedFilter::SubmissionsFor(id).apply(&self.posts);
                screen.replace(match start {
                    Some(start) => query::rotate_to(posts, &start),
                    None => posts,
                });
            }
        }
    }

    /// A fetch failed
    pub fn load_failed(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        self.loading = LoadingState::Error(msg.clone());
        self.set_error(msg);
    }

    // -------------------------------------------------------------------------
    // Screens and focus
    // -------------------------------------------------------------------------

    /// Paging screen for a state, if it is one
    fn screen_mut(&mut self, state: AppState) -> Option<&mut FeedScreen> {
        match state {
            AppState::Feed => Some(&mut self.feed),
            AppState::Submissions => self.submissions.as_mut(),
            AppState::Profile | AppState::SubmissionList => None,
        }
    }

    /// Paging screen currently shown
    pub fn current_screen(&self) -> Option<&FeedScreen> {
        match self.state {
            AppState::Feed => Some(&self.feed),
            AppState::Submissions => self.submissions.as_ref(),
            AppState::Profile | AppState::SubmissionList => None,
        }
    }

    pub fn current_screen_mut(&mut self) -> Option<&mut FeedScreen> {
        self.screen_mut(self.state)
    }

    /// Move to `state`, pausing the screen left and resuming the one shown
    fn transition(&mut self, state: AppState) {
        let from = self.state;
        if let Some(screen) = self.screen_mut(from) {
            screen.controller.on_focus_lost();
        }
        self.state = state;
        if self.terminal_focused {
            if let Some(screen) = self.screen_mut(state) {
                screen.controller.on_focus_gained();
            }
        }
        debug!(?from, to = ?state, "screen changed");
    }

    /// Navigate to a new state, pushing current to stack
    pub fn navigate(&mut self, state: AppState) {
        if self.state != state {
            self.nav_stack.push(self.state);
            self.transition(state);
        }
    }

    /// Go back to previous state
    pub fn back(&mut self) -> bool {
        let Some(prev) = self.nav_stack.pop() else {
            return false;
        };
        let leaving = self.state;
        self.transition(prev);
        if !self.nav_stack.contains(&leaving) {
            match leaving {
                // Releases its player handles
                AppState::Submissions => self.submissions = None,
                AppState::SubmissionList => self.submission_list = None,
                AppState::Feed | AppState::Profile => {}
            }
        }
        true
    }

    /// Toggle between the feed and profile tabs
    pub fn switch_tab(&mut self) {
        match self.state {
            AppState::Feed => self.transition(AppState::Profile),
            AppState::Profile => self.transition(AppState::Feed),
            AppState::SubmissionList | AppState::Submissions => {}
        }
    }

    /// Terminal window gained or lost focus
    pub fn set_terminal_focus(&mut self, focused: bool) {
        if self.terminal_focused == focused {
            return;
        }
        self.terminal_focused = focused;
        if let Some(screen) = self.current_screen_mut() {
            if focused {
                screen.controller.on_focus_gained();
            } else {
                screen.controller.on_focus_lost();
            }
        }
    }

    /// Terminal rows available to one feed page
    pub fn resize(&mut self, page_height: u16) {
        self.page_height = page_height;
        self.feed.resize(page_height);
        if let Some(screen) = self.submissions.as_mut() {
            screen.resize(page_height);
        }
    }

    /// Advance the shown screen one frame
    pub fn tick(&mut self, dt: Duration) {
        let Some(screen) = self.current_screen_mut() else {
            return;
        };
        let events = screen.tick(dt);
        for event in events {
            match event {
                ControllerEvent::ActiveIndexChanged { previous, current } => {
                    debug!(?previous, ?current, "active item changed");
                }
                ControllerEvent::ItemErrored { index, error } => {
                    self.status = Some(format!("Item {} failed: {}", index + 1, error));
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Submissions
    // -------------------------------------------------------------------------

    /// List the submissions of the profile selection, or of the feed's active post
    pub fn open_submissions(&mut self) {
        let origin = match self.state {
            AppState::Profile => self.profile.selected_post().cloned(),
            AppState::Feed => self.feed.active_post().cloned(),
            AppState::SubmissionList | AppState::Submissions => None,
        };
        let Some(origin) = origin else {
            return;
        };
        if origin.is_submission() {
            self.status = Some("Submissions can't have submissions of their own".into());
            return;
        }

        let posts = FeedFilter::SubmissionsFor(origin.id.clone()).apply(&self.posts);
        if posts.is_empty() {
            self.status = Some(format!("No submissions for {}'s post yet", origin.handle()));
            return;
        }

        self.submission_list = Some(SubmissionList::new(origin, posts));
        self.navigate(AppState::SubmissionList);
    }

    /// Page through the listed submissions, starting at the selected one
    pub fn open_submission_feed(&mut self) {
        let Some(list) = self.submission_list.as_ref() else {
            return;
        };
        let Some(start) = list.selected_post().map(|p| p.id.clone()) else {
            return;
        };

        let mut screen = FeedScreen::new(
            format!("Submissions for {}", list.origin.handle()),
            query::rotate_to(list.posts.clone(), &start),
            self.threshold,
            self.overscan,
            self.page_height,
        );
        screen.origin = Some(list.origin.clone());
        debug!(%start, "opening submissions feed");
        self.submissions = Some(screen);
        self.navigate(AppState::Submissions);
    }

    /// Accept or reject the submission on screen. Only the owner of the
    /// original post may review.
    pub fn review_active(&mut self, status: SubmissionStatus) {
        let Some(screen) = self.submissions.as_mut() else {
            return;
        };
        let owner = screen.origin.as_ref().map(|o| o.user_id.as_str());
        if owner.is_none() || owner != self.user_id.as_deref() {
            self.error = Some("Only the owner of this post can review submissions".into());
            return;
        }

        let Some(target) = screen.active_post().map(|p| (p.id.clone(), p.handle())) else {
            return;
        };
        let (id, handle) = target;

        query::set_submission_status(screen.controller.posts_mut(), &id, status);
        query::set_submission_status(&mut self.posts, &id, status);
        if let Some(list) = self.submission_list.as_mut() {
            query::set_submission_status(&mut list.posts, &id, status);
        }
        info!(submission = %id, %status, "submission reviewed");
        self.status = Some(format!("{} {}'s submission", status.label(), handle));
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.error = None;

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return true;
            }
            KeyCode::Esc => return self.back(),
            KeyCode::Tab => {
                self.switch_tab();
                return true;
            }
            KeyCode::Char('r') => {
                self.loading = LoadingState::Loading(Some("Refreshing feed...".into()));
                self.pending = Some(AppAction::Refresh);
                return true;
            }
            KeyCode::Char('o') => {
                let post = match self.state {
                    AppState::Profile => self.profile.selected_post().cloned(),
                    AppState::SubmissionList => self
                        .submission_list
                        .as_ref()
                        .and_then(|l| l.selected_post().cloned()),
                    _ => self.current_screen().and_then(|s| s.active_post().cloned()),
                };
                if let Some(post) = post {
                    self.pending = Some(AppAction::OpenExternal(post));
                }
                return true;
            }
            _ => {}
        }

        match self.state {
            AppState::Feed => self.handle_feed_key(key),
            AppState::Profile => self.handle_profile_key(key),
            AppState::SubmissionList => self.handle_submission_list_key(key),
            AppState::Submissions => self.handle_submissions_key(key),
        }
    }

    /// Paging keys shared by both paging screens
    fn handle_paging_key(&mut self, key: KeyEvent) -> bool {
        let Some(screen) = self.current_screen_mut() else {
            return false;
        };
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => screen.next(),
            KeyCode::Up | KeyCode::Char('k') => screen.prev(),
            KeyCode::Char('g') | KeyCode::Home => screen.first(),
            KeyCode::Char('G') | KeyCode::End => screen.last(),
            _ => return false,
        }
        true
    }

    fn handle_feed_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter => {
                self.open_submissions();
                true
            }
            _ => self.handle_paging_key(key),
        }
    }

    fn handle_submissions_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('a') => {
                self.review_active(SubmissionStatus::Accepted);
                true
            }
            KeyCode::Char('x') => {
                self.review_active(SubmissionStatus::Rejected);
                true
            }
            _ => self.handle_paging_key(key),
        }
    }

    fn handle_profile_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter => {
                self.open_submissions();
                true
            }
            code => handle_selection_key(&mut self.profile.list, code),
        }
    }

    fn handle_submission_list_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter => {
                self.open_submission_feed();
                true
            }
            code => match self.submission_list.as_mut() {
                Some(list) => handle_selection_key(&mut list.list, code),
                None => false,
            },
        }
    }
}

/// Selection keys shared by the list screens
fn handle_selection_key(list: &mut ListState, code: KeyCode) -> bool {
    match code {
        KeyCode::Up | KeyCode::Char('k') => list.up(),
        KeyCode::Down | KeyCode::Char('j') => list.down(),
        KeyCode::Char('g') | KeyCode::Home => list.first(),
        KeyCode::Char('G') | KeyCode::End => list.last(),
        _ => return false,
    }
    true
}

// =============================================================================
// Unit Tests
// =============================================================================
