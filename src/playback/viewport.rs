//! Paging-list geometry
//!
//! The rendering side of the feed: which items are on screen, how much of
//! each is visible, and which items should hold a player handle. All sizes
//! are terminal rows.

use std::ops::Range;

use super::controller::VisibleItem;

/// A vertical window over a list of equally tall items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub item_height: u16,
    pub height: u16,
    /// Rows scrolled past the top of the first item
    pub offset: u32,
}

impl Viewport {
    pub fn new(item_height: u16, height: u16) -> Self {
        Self {
            item_height,
            height,
            offset: 0,
        }
    }

    /// Top row of an item in list coordinates
    ///
    /// Saturates at `u32::MAX` for lists too long to address in rows.
    pub fn offset_of(&self, index: usize) -> u32 {
        rows_for(index, self.item_height)
    }

    /// Largest offset that still fills the viewport
    pub fn max_offset(&self, len: usize) -> u32 {
        rows_for(len, self.item_height).saturating_sub(self.height as u32)
    }

    /// Indices intersecting the viewport
    pub fn visible_range(&self, len: usize) -> Range<usize> {
        if self.item_height == 0 || self.height == 0 || len == 0 {
            return 0..0;
        }
        let ih = self.item_height as u32;
        let first = (self.offset / ih) as usize;
        let bottom = self.offset.saturating_add(self.height as u32);
        let last = bottom.div_ceil(ih) as usize;
        first.min(len)..last.min(len)
    }

    /// Visible items with the fraction of each item on screen
    pub fn visible_items(&self, len: usize) -> Vec<VisibleItem> {
        let ih = self.item_height as u32;
        let view_top = self.offset;
        let view_bottom = self.offset.saturating_add(self.height as u32);

        self.visible_range(len)
            .filter_map(|index| {
                let top = self.offset_of(index);
                let bottom = top.saturating_add(ih);
                let rows = bottom.min(view_bottom).saturating_sub(top.max(view_top));
                (rows > 0).then(|| VisibleItem::new(index, rows as f32 / ih as f32))
            })
            .collect()
    }

    /// Visible range widened by `overscan` items on each side
    pub fn rendered_window(&self, len: usize, overscan: usize) -> Range<usize> {
        let visible = self.visible_range(len);
        if visible.is_empty() {
            return visible;
        }
        visible.start.saturating_sub(overscan)..visible.end.saturating_add(overscan).min(len)
    }
}

/// Total rows spanned by `count` items
fn rows_for(count: usize, item_height: u16) -> u32 {
    u32::try_from(count)
        .unwrap_or(u32::MAX)
        .saturating_mul(item_height as u32)
}

/// Animated paging scroll over a [`Viewport`]
///
/// Each page is one full viewport tall. `tick` moves the offset a few rows
/// toward the target page, which produces the intermediate visibility a
/// finger-driven paging list reports.
#[derive(Debug, Clone)]
pub struct FeedScroller {
    viewport: Viewport,
    target: u32,
    step: u32,
}

impl FeedScroller {
    pub fn new(height: u16) -> Self {
        Self {
            viewport: Viewport::new(height, height),
            target: 0,
            step: Self::step_for(height),
        }
    }

    fn step_for(height: u16) -> u32 {
        (height as u32 / 4).max(1)
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Page the scroll is heading to
    pub fn target_index(&self) -> usize {
        match self.viewport.item_height {
            0 => 0,
            ih => (self.target / ih as u32) as usize,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.viewport.offset == self.target
    }

    /// Change page height, keeping the target page
    pub fn resize(&mut self, height: u16) {
        if height == self.viewport.height {
            return;
        }
        let page = self.target_index();
        self.viewport.item_height = height;
        self.viewport.height = height;
        self.step = Self::step_for(height);
        self.target = self.viewport.offset_of(page);
        self.viewport.offset = self.target;
    }

    /// Start scrolling toward an item
    pub fn scroll_to(&mut self, index: usize, len: usize) {
        if len == 0 {
            self.target = 0;
            return;
        }
        let index = index.min(len - 1);
        self.target = self
            .viewport
            .offset_of(index)
            .min(self.viewport.max_offset(len));
    }

    /// Move to an item without animating
    pub fn jump_to(&mut self, index: usize, len: usize) {
        self.scroll_to(index, len);
        self.viewport.offset = self.target;
    }

    pub fn next(&mut self, len: usize) {
        self.scroll_to(self.target_index().saturating_add(1), len);
    }

    pub fn prev(&mut self, len: usize) {
        self.scroll_to(self.target_index().saturating_sub(1), len);
    }

    /// Advance the animation one step; returns true if the offset moved
    pub fn tick(&mut self) -> bool {
        let offset = self.viewport.offset;
        if offset == self.target {
            return false;
        }
        self.viewport.offset = if offset < self.target {
            offset.saturating_add(self.step).min(self.target)
        } else {
            offset.saturating_sub(self.step).max(self.target)
        };
        true
    }
}
