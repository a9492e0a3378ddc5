//! Active-item playback controller
//!
//! Owns the feed sequence and an index-addressed arena of player handles.
//! Exactly one index is active whenever the feed is non-empty, and only the
//! active item's player is ever told to play.
//!
//! Every entry point is a synchronous check against current state, so
//! visibility, completion and error callbacks may arrive in any order.

use std::collections::BTreeMap;
use std::ops::Range;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::handle::{ItemState, PlaybackError, PlayerHandle};
use crate::models::VideoPost;

/// Minimum visible fraction an item needs before it can become active
pub const DEFAULT_VISIBILITY_THRESHOLD: f32 = 0.5;

// =============================================================================
// Events
// =============================================================================

/// One on-screen item as reported by the rendering layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleItem {
    pub index: usize,
    /// Share of the item's bounds on screen, in [0, 1]
    pub visible_fraction: f32,
}

impl VisibleItem {
    pub fn new(index: usize, visible_fraction: f32) -> Self {
        Self {
            index,
            visible_fraction,
        }
    }
}

/// Notifications for observers of the controller
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    ActiveIndexChanged {
        previous: Option<usize>,
        current: Option<usize>,
    },
    ItemErrored {
        index: usize,
        error: PlaybackError,
    },
}

/// What an input event did to controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// State changed and commands were issued
    Applied,
    /// Nothing to do
    Unchanged,
    /// The event referenced an item that is not active (or no longer mounted)
    Stale,
}

// =============================================================================
// Selection
// =============================================================================

/// Pick the item that should become active.
///
/// The candidate is the item with the largest visible fraction that is at
/// least `threshold`. Exact ties go to the smaller index. Indices outside
/// `0..len` are skipped and non-finite fractions count as 0.
pub fn select_candidate(visible: &[VisibleItem], threshold: f32, len: usize) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;

    for item in visible {
        if item.index >= len {
            continue;
        }
        let fraction = if item.visible_fraction.is_finite() {
            item.visible_fraction
        } else {
            0.0
        };
        if fraction < threshold {
            continue;
        }

        best = match best {
            Some((index, best_fraction))
                if best_fraction > fraction
                    || (best_fraction == fraction && index < item.index) =>
            {
                Some((index, best_fraction))
            }
            _ => Some((item.index, fraction)),
        };
    }

    best.map(|(index, _)| index)
}

// =============================================================================
// Controller
// =============================================================================

#[derive(Debug)]
struct Slot<H> {
    handle: H,
    state: ItemState,
    error: Option<PlaybackError>,
}

impl<H> Slot<H> {
    fn new(handle: H) -> Self {
        Self {
            handle,
            state: ItemState::Paused,
            error: None,
        }
    }
}

/// Playback controller for a paging feed
#[derive(Debug)]
pub struct PlaybackController<H> {
    posts: Vec<VideoPost>,
    active: Option<usize>,
    slots: BTreeMap<usize, Slot<H>>,
    threshold: f32,
    focused: bool,
    events: Vec<ControllerEvent>,
}

impl<H: PlayerHandle> Default for PlaybackController<H> {
    fn default() -> Self {
        Self::new(DEFAULT_VISIBILITY_THRESHOLD)
    }
}

impl<H: PlayerHandle> PlaybackController<H> {
    /// Create an empty controller. The threshold is clamped into [0, 1].
    pub fn new(threshold: f32) -> Self {
        let threshold = if threshold.is_finite() {
            threshold.clamp(0.0, 1.0)
        } else {
            DEFAULT_VISIBILITY_THRESHOLD
        };

        Self {
            posts: Vec::new(),
            active: None,
            slots: BTreeMap::new(),
            threshold,
            focused: true,
            events: Vec::new(),
        }
    }

    /// Create a controller already holding a feed
    pub fn with_posts(threshold: f32, posts: Vec<VideoPost>) -> Self {
        let mut controller = Self::new(threshold);
        controller.replace_feed(posts);
        controller
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn posts(&self) -> &[VideoPost] {
        &self.posts
    }

    /// Edit posts in place. The sequence itself only changes through
    /// `replace_feed`.
    pub fn posts_mut(&mut self) -> &mut [VideoPost] {
        &mut self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Index of the item allowed to play
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_post(&self) -> Option<&VideoPost> {
        self.active.and_then(|i| self.posts.get(i))
    }

    /// Logical state of an item (`Unmounted` when it has no handle)
    pub fn state(&self, index: usize) -> ItemState {
        self.slots
            .get(&index)
            .map(|slot| slot.state)
            .unwrap_or_default()
    }

    /// Failure recorded against an item's current handle
    pub fn error(&self, index: usize) -> Option<&PlaybackError> {
        self.slots.get(&index).and_then(|slot| slot.error.as_ref())
    }

    pub fn handle(&self, index: usize) -> Option<&H> {
        self.slots.get(&index).map(|slot| &slot.handle)
    }

    /// Mutable access for driving a handle's clock. Commands still go
    /// through the controller.
    pub fn handles_mut(&mut self) -> impl Iterator<Item = (usize, &mut H)> + '_ {
        self.slots
            .iter_mut()
            .map(|(index, slot)| (*index, &mut slot.handle))
    }

    /// Indices that currently have a handle, ascending
    pub fn mounted(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.keys().copied()
    }

    /// Take all queued notifications
    pub fn drain_events(&mut self) -> Vec<ControllerEvent> {
        std::mem::take(&mut self.events)
    }

    // -------------------------------------------------------------------------
    // Feed and handle lifecycle
    // -------------------------------------------------------------------------

    /// Replace the whole feed.
    ///
    /// All handles are released (items remount against the new sequence).
    /// The active post keeps its place if it is still in the feed, otherwise
    /// the first item becomes active.
    pub fn replace_feed(&mut self, posts: Vec<VideoPost>) {
        let previous = self.active;
        let previous_id = self.active_post().map(|p| p.id.clone());

        if let Some(index) = previous {
            self.pause_slot(index);
        }
        self.slots.clear();
        self.posts = posts;

        let current = if self.posts.is_empty() {
            None
        } else {
            previous_id
                .as_deref()
                .and_then(|id| self.posts.iter().position(|p| p.id == id))
                .or(Some(0))
        };
        self.active = current;

        let changed = previous != current
            || previous_id.as_deref() != self.active_post().map(|p| p.id.as_str());

        info!(count = self.posts.len(), active = ?current, "feed replaced");

        if changed {
            self.events
                .push(ControllerEvent::ActiveIndexChanged { previous, current });
        }
    }

    /// Attach a freshly created handle to an item.
    ///
    /// The item starts `Paused`; if it is the active item it immediately
    /// starts from the beginning. Returns false for indices outside the feed.
    pub fn mount(&mut self, index: usize, handle: H) -> bool {
        if index >= self.posts.len() {
            debug!(index, len = self.posts.len(), "mount outside feed ignored");
            return false;
        }

        if let Some(mut old) = self.slots.insert(index, Slot::new(handle)) {
            if old.state.is_playing() {
                old.handle.pause();
            }
            debug!(index, "handle replaced");
        }

        if self.active == Some(index) {
            self.start_from_beginning(index);
        }
        true
    }

    /// Release an item's handle
    pub fn unmount(&mut self, index: usize) -> Option<H> {
        let mut slot = self.slots.remove(&index)?;
        if slot.state.is_playing() {
            slot.handle.pause();
        }
        Some(slot.handle)
    }

    /// Mount every item in `window` that lacks a handle and unmount the rest
    pub fn sync_window<F>(&mut self, window: Range<usize>, mut make_handle: F)
    where
        F: FnMut(usize, &VideoPost) -> H,
    {
        let outside: Vec<usize> = self
            .slots
            .keys()
            .copied()
            .filter(|index| !window.contains(index))
            .collect();
        for index in outside {
            self.unmount(index);
        }

        let end = window.end.min(self.posts.len());
        for index in window.start..end {
            if !self.slots.contains_key(&index) {
                let handle = make_handle(index, &self.posts[index]);
                self.mount(index, handle);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Input events
    // -------------------------------------------------------------------------

    /// React to a change in the set of on-screen items
    pub fn on_visibility_changed(&mut self, visible: &[VisibleItem]) -> EventOutcome {
        let Some(candidate) = select_candidate(visible, self.threshold, self.posts.len()) else {
            return EventOutcome::Unchanged;
        };

        if self.active == Some(candidate) {
            return EventOutcome::Unchanged;
        }

        self.activate(candidate);
        EventOutcome::Applied
    }

    /// An item's player reached end-of-media: loop it if it is still active
    pub fn on_playback_completed(&mut self, index: usize) -> EventOutcome {
        if self.active != Some(index) {
            debug!(index, active = ?self.active, "stale completion ignored");
            return EventOutcome::Stale;
        }

        // Paused in the background: keep the playhead for the resume
        if !self.focused {
            debug!(index, "completion while unfocused ignored");
            return EventOutcome::Stale;
        }

        match self.slots.get(&index).map(|slot| slot.state) {
            Some(ItemState::Playing) | Some(ItemState::Paused) => {}
            state => {
                debug!(index, ?state, "completion for unplayable item ignored");
                return EventOutcome::Stale;
            }
        }

        self.start_from_beginning(index);
        EventOutcome::Applied
    }

    /// A handle reported an asynchronous failure
    pub fn on_player_error(&mut self, index: usize, error: PlaybackError) -> EventOutcome {
        match self.slots.get(&index) {
            Some(slot) if !slot.state.is_errored() => {}
            _ => {
                debug!(index, %error, "error for unmounted or errored item ignored");
                return EventOutcome::Stale;
            }
        }

        self.mark_errored(index, error);
        EventOutcome::Applied
    }

    /// Screen went to the background: pause without losing position
    pub fn on_focus_lost(&mut self) {
        if !self.focused {
            return;
        }
        self.focused = false;
        if let Some(index) = self.active {
            self.pause_slot(index);
        }
        debug!(active = ?self.active, "focus lost");
    }

    /// Screen came back: resume the active item where it was
    pub fn on_focus_gained(&mut self) {
        if self.focused {
            return;
        }
        self.focused = true;
        if let Some(index) = self.active {
            self.resume(index);
        }
        debug!(active = ?self.active, "focus gained");
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    fn activate(&mut self, index: usize) {
        let previous = self.active;
        if let Some(prev) = previous {
            self.pause_slot(prev);
        }

        self.active = Some(index);
        self.start_from_beginning(index);

        debug!(?previous, current = index, "active item changed");
        self.events.push(ControllerEvent::ActiveIndexChanged {
            previous,
            current: Some(index),
        });
    }

    /// seek(0) then play. While unfocused only the seek is issued.
    fn start_from_beginning(&mut self, index: usize) {
        let focused = self.focused;
        let result = match self.slots.get_mut(&index) {
            Some(slot) if !slot.state.is_errored() => {
                let mut result = slot.handle.seek(Duration::ZERO);
                if result.is_ok() && focused {
                    result = slot.handle.play();
                }
                if result.is_ok() {
                    slot.state = if focused {
                        ItemState::Playing
                    } else {
                        ItemState::Paused
                    };
                }
                result
            }
            _ => return,
        };

        if let Err(error) = result {
            self.mark_errored(index, error);
        }
    }

    fn resume(&mut self, index: usize) {
        let result = match self.slots.get_mut(&index) {
            Some(slot) if slot.state == ItemState::Paused => {
                let result = slot.handle.play();
                if result.is_ok() {
                    slot.state = ItemState::Playing;
                }
                result
            }
            _ => return,
        };

        if let Err(error) = result {
            self.mark_errored(index, error);
        }
    }

    fn pause_slot(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(&index) {
            if slot.state.is_playing() {
                slot.handle.pause();
                slot.state = ItemState::Paused;
            }
        }
    }

    fn mark_errored(&mut self, index: usize, error: PlaybackError) {
        if let Some(slot) = self.slots.get_mut(&index) {
            warn!(index, %error, "playback failed");
            slot.state = ItemState::Errored;
            slot.error = Some(error.clone());
            self.events
                .push(ControllerEvent::ItemErrored { index, error });
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Cmd {
        Play(usize),
        Pause(usize),
        Seek(usize, Duration),
    }

    type Log = Rc<RefCell<Vec<Cmd>>>;

    #[derive(Debug)]
    struct Recorder {
        index: usize,
        log: Log,
        fail_play: bool,
    }

    impl PlayerHandle for Recorder {
        fn play(&mut self) -> Result<(), PlaybackError> {
            self.log.borrow_mut().push(Cmd::Play(self.index));
            if self.fail_play {
                Err(PlaybackError::load("unsupported codec"))
            } else {
                Ok(())
            }
        }

        fn pause(&mut self) {
            self.log.borrow_mut().push(Cmd::Pause(self.index));
        }

        fn seek(&mut self, position: Duration) -> Result<(), PlaybackError> {
            self.log.borrow_mut().push(Cmd::Seek(self.index, position));
            Ok(())
        }
    }

    fn posts(n: usize) -> Vec<VideoPost> {
        (0..n)
            .map(|i| VideoPost::new(format!("v{}", i), "u1", format!("https://cdn/v{}.mp4", i)))
            .collect()
    }

    fn controller(n: usize) -> (PlaybackController<Recorder>, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut c = PlaybackController::with_posts(DEFAULT_VISIBILITY_THRESHOLD, posts(n));
        for i in 0..n {
            c.mount(
                i,
                Recorder {
                    index: i,
                    log: log.clone(),
                    fail_play: false,
                },
            );
        }
        log.borrow_mut().clear();
        c.drain_events();
        (c, log)
    }

    fn vis(items: &[(usize, f32)]) -> Vec<VisibleItem> {
        items.iter().map(|&(i, f)| VisibleItem::new(i, f)).collect()
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    #[test]
    fn test_select_largest_fraction() {
        let visible = vis(&[(0, 0.3), (1, 0.8), (2, 0.4)]);
        assert_eq!(select_candidate(&visible, 0.5, 3), Some(1));
    }

    #[test]
    fn test_select_tie_prefers_smaller_index() {
        let visible = vis(&[(3, 0.6), (2, 0.6)]);
        assert_eq!(select_candidate(&visible, 0.5, 4), Some(2));
    }

    #[test]
    fn test_select_below_threshold() {
        let visible = vis(&[(0, 0.49), (1, 0.2)]);
        assert_eq!(select_candidate(&visible, 0.5, 2), None);
        // Exactly at threshold qualifies
        assert_eq!(select_candidate(&vis(&[(1, 0.5)]), 0.5, 2), Some(1));
    }

    #[test]
    fn test_select_skips_out_of_range_and_nan() {
        let visible = vis(&[(5, 1.0), (0, f32::NAN), (1, 0.7)]);
        assert_eq!(select_candidate(&visible, 0.5, 2), Some(1));
    }

    #[test]
    fn test_threshold_is_clamped() {
        let c: PlaybackController<Recorder> = PlaybackController::new(1.7);
        assert_eq!(c.threshold(), 1.0);
        let c: PlaybackController<Recorder> = PlaybackController::new(f32::NAN);
        assert_eq!(c.threshold(), DEFAULT_VISIBILITY_THRESHOLD);
    }

    // -------------------------------------------------------------------------
    // Feed lifecycle
    // -------------------------------------------------------------------------

    #[test]
    fn test_empty_feed_has_no_active_index() {
        let c: PlaybackController<Recorder> = PlaybackController::default();
        assert_eq!(c.active_index(), None);
        assert!(c.is_empty());
    }

    #[test]
    fn test_replace_feed_activates_first() {
        let mut c: PlaybackController<Recorder> = PlaybackController::default();
        c.replace_feed(posts(3));
        assert_eq!(c.active_index(), Some(0));
        assert_eq!(
            c.drain_events(),
            vec![ControllerEvent::ActiveIndexChanged {
                previous: None,
                current: Some(0)
            }]
        );
    }

    #[test]
    fn test_replace_feed_keeps_active_post() {
        let (mut c, _log) = controller(3);
        c.on_visibility_changed(&vis(&[(2, 1.0)]));
        c.drain_events();

        // Post v2 moves to the front
        let mut reordered = posts(3);
        reordered.rotate_left(2);
        c.replace_feed(reordered);

        assert_eq!(c.active_index(), Some(0));
        assert_eq!(c.active_post().map(|p| p.id.as_str()), Some("v2"));
        assert_eq!(c.mounted().count(), 0);
    }

    #[test]
    fn test_replace_feed_with_empty() {
        let (mut c, _log) = controller(2);
        c.replace_feed(Vec::new());
        assert_eq!(c.active_index(), None);
        assert_eq!(
            c.drain_events(),
            vec![ControllerEvent::ActiveIndexChanged {
                previous: Some(0),
                current: None
            }]
        );
    }

    #[test]
    fn test_mount_active_starts_from_beginning() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut c = PlaybackController::with_posts(0.5, posts(2));
        c.mount(
            1,
            Recorder {
                index: 1,
                log: log.clone(),
                fail_play: false,
            },
        );
        assert!(log.borrow().is_empty());
        assert_eq!(c.state(1), ItemState::Paused);

        c.mount(
            0,
            Recorder {
                index: 0,
                log: log.clone(),
                fail_play: false,
            },
        );
        assert_eq!(*log.borrow(), vec![Cmd::Seek(0, Duration::ZERO), Cmd::Play(0)]);
        assert_eq!(c.state(0), ItemState::Playing);
    }

    #[test]
    fn test_mount_outside_feed_rejected() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut c = PlaybackController::with_posts(0.5, posts(1));
        let mounted = c.mount(
            4,
            Recorder {
                index: 4,
                log,
                fail_play: false,
            },
        );
        assert!(!mounted);
        assert_eq!(c.state(4), ItemState::Unmounted);
    }

    #[test]
    fn test_unmount_pauses_playing_handle() {
        let (mut c, log) = controller(2);
        let handle = c.unmount(0);
        assert!(handle.is_some());
        assert_eq!(*log.borrow(), vec![Cmd::Pause(0)]);
        assert_eq!(c.state(0), ItemState::Unmounted);
        // Active index is a playback concern, not a windowing one
        assert_eq!(c.active_index(), Some(0));
    }

    #[test]
    fn test_sync_window() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut c = PlaybackController::with_posts(0.5, posts(6));
        let make = |i: usize, _: &VideoPost| Recorder {
            index: i,
            log: log.clone(),
            fail_play: false,
        };

        c.sync_window(0..2, make);
        assert_eq!(c.mounted().collect::<Vec<_>>(), vec![0, 1]);

        let make = |i: usize, _: &VideoPost| Recorder {
            index: i,
            log: log.clone(),
            fail_play: false,
        };
        c.sync_window(3..10, make);
        assert_eq!(c.mounted().collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    #[test]
    fn test_transition_pauses_then_seeks_then_plays() {
        let (mut c, log) = controller(3);
        let outcome = c.on_visibility_changed(&vis(&[(0, 0.3), (1, 0.8), (2, 0.4)]));

        assert_eq!(outcome, EventOutcome::Applied);
        assert_eq!(c.active_index(), Some(1));
        assert_eq!(
            *log.borrow(),
            vec![Cmd::Pause(0), Cmd::Seek(1, Duration::ZERO), Cmd::Play(1)]
        );
        assert_eq!(c.state(0), ItemState::Paused);
        assert_eq!(c.state(1), ItemState::Playing);
        assert_eq!(
            c.drain_events(),
            vec![ControllerEvent::ActiveIndexChanged {
                previous: Some(0),
                current: Some(1)
            }]
        );
    }

    #[test]
    fn test_below_threshold_keeps_active() {
        let (mut c, log) = controller(3);
        let outcome = c.on_visibility_changed(&vis(&[(0, 0.45), (1, 0.45)]));
        assert_eq!(outcome, EventOutcome::Unchanged);
        assert_eq!(c.active_index(), Some(0));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_same_candidate_is_noop() {
        let (mut c, log) = controller(2);
        assert_eq!(c.on_visibility_changed(&vis(&[(0, 1.0)])), EventOutcome::Unchanged);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_active_without_handle_then_mounted() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut c = PlaybackController::with_posts(0.5, posts(5));
        c.on_visibility_changed(&vis(&[(4, 1.0)]));
        assert_eq!(c.active_index(), Some(4));
        assert!(log.borrow().is_empty());

        c.mount(
            4,
            Recorder {
                index: 4,
                log: log.clone(),
                fail_play: false,
            },
        );
        assert_eq!(*log.borrow(), vec![Cmd::Seek(4, Duration::ZERO), Cmd::Play(4)]);
    }

    // -------------------------------------------------------------------------
    // Completion
    // -------------------------------------------------------------------------

    #[test]
    fn test_completion_loops_active() {
        let (mut c, log) = controller(3);
        c.on_visibility_changed(&vis(&[(1, 0.9)]));
        log.borrow_mut().clear();

        assert_eq!(c.on_playback_completed(1), EventOutcome::Applied);
        assert_eq!(*log.borrow(), vec![Cmd::Seek(1, Duration::ZERO), Cmd::Play(1)]);
        assert_eq!(c.state(1), ItemState::Playing);
    }

    #[test]
    fn test_stale_completion_ignored() {
        let (mut c, log) = controller(3);
        c.on_visibility_changed(&vis(&[(1, 0.9)]));
        log.borrow_mut().clear();

        assert_eq!(c.on_playback_completed(0), EventOutcome::Stale);
        assert!(log.borrow().is_empty());
        assert_eq!(c.active_index(), Some(1));
    }

    // -------------------------------------------------------------------------
    // Focus
    // -------------------------------------------------------------------------

    #[test]
    fn test_focus_round_trip_resumes_without_seek() {
        let (mut c, log) = controller(2);
        c.on_focus_lost();
        c.on_focus_gained();
        assert_eq!(*log.borrow(), vec![Cmd::Pause(0), Cmd::Play(0)]);
        assert_eq!(c.active_index(), Some(0));
    }

    #[test]
    fn test_repeated_focus_events_are_idempotent() {
        let (mut c, log) = controller(2);
        c.on_focus_gained();
        c.on_focus_lost();
        c.on_focus_lost();
        assert_eq!(*log.borrow(), vec![Cmd::Pause(0)]);
    }

    #[test]
    fn test_selection_while_unfocused_defers_play() {
        let (mut c, log) = controller(3);
        c.on_focus_lost();
        log.borrow_mut().clear();

        c.on_visibility_changed(&vis(&[(2, 1.0)]));
        assert_eq!(*log.borrow(), vec![Cmd::Seek(2, Duration::ZERO)]);
        assert_eq!(c.state(2), ItemState::Paused);

        log.borrow_mut().clear();
        c.on_focus_gained();
        assert_eq!(*log.borrow(), vec![Cmd::Play(2)]);
        assert_eq!(c.state(2), ItemState::Playing);
    }

    // -------------------------------------------------------------------------
    // Failures
    // -------------------------------------------------------------------------

    #[test]
    fn test_play_failure_marks_errored_and_stays_active() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut c = PlaybackController::with_posts(0.5, posts(2));
        c.mount(
            0,
            Recorder {
                index: 0,
                log: log.clone(),
                fail_play: true,
            },
        );

        assert_eq!(c.state(0), ItemState::Errored);
        assert_eq!(c.active_index(), Some(0));
        assert!(matches!(c.error(0), Some(PlaybackError::Load { .. })));
        let events = c.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, ControllerEvent::ItemErrored { index: 0, .. })));

        // No further automatic commands
        log.borrow_mut().clear();
        assert_eq!(c.on_playback_completed(0), EventOutcome::Stale);
        c.on_focus_lost();
        c.on_focus_gained();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_async_error_then_remount_recovers() {
        let (mut c, log) = controller(2);
        let err = PlaybackError::load("network dropped");
        assert_eq!(c.on_player_error(0, err.clone()), EventOutcome::Applied);
        assert_eq!(c.state(0), ItemState::Errored);
        assert_eq!(c.on_player_error(0, err), EventOutcome::Stale);

        // Other items keep working
        c.on_visibility_changed(&vis(&[(1, 1.0)]));
        assert_eq!(c.state(1), ItemState::Playing);

        c.unmount(0);
        c.mount(
            0,
            Recorder {
                index: 0,
                log: log.clone(),
                fail_play: false,
            },
        );
        assert_eq!(c.state(0), ItemState::Paused);
        assert!(c.error(0).is_none());
    }
}
