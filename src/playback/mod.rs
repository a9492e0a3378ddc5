//! Feed playback
//!
//! - Controller: picks the single active item and drives its player
//! - Handle: player handle trait, per-item state and playback errors
//! - Sim: clock-driven player used by the TUI
//! - Viewport: paging-list geometry that produces visibility events

pub mod controller;
pub mod handle;
pub mod sim;
pub mod viewport;

pub use controller::{
    select_candidate, ControllerEvent, EventOutcome, PlaybackController, VisibleItem,
    DEFAULT_VISIBILITY_THRESHOLD,
};
pub use handle::{ItemState, PlaybackError, PlayerHandle};
pub use sim::SimulatedPlayer;
pub use viewport::{FeedScroller, Viewport};
