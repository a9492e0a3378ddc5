//! Paging feed view
//!
//! Each post is a full-height card. While a scroll animation is running two
//! cards share the viewport, each drawn as the slice of it that is on screen.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::app::FeedScreen;
use crate::models::{format_count, format_duration, VideoPost};
use crate::playback::ItemState;
use crate::ui::Theme;

/// Width of the progress bar, in cells
const PROGRESS_WIDTH: usize = 30;

/// Render a paging screen into `area`
pub fn render(frame: &mut Frame, area: Rect, screen: &FeedScreen) {
    let active = screen.controller.active_index();
    let title = match active {
        Some(i) => format!(" {} ({}/{}) ", screen.title, i + 1, screen.len()),
        None => format!(" {} ", screen.title),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if screen.controller.is_focused() {
            Theme::border_focused()
        } else {
            Theme::border()
        })
        .title(Span::styled(title, Theme::title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if screen.is_empty() {
        let empty = Paragraph::new("Nothing here yet")
            .style(Theme::dimmed())
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let viewport = screen.scroller.viewport();
    for item in viewport.visible_items(screen.len()) {
        let top = viewport.offset_of(item.index) as i64 - viewport.offset as i64;
        let skip = (-top).max(0) as u16;
        let y = inner.y + top.max(0) as u16;
        let rows = viewport
            .item_height
            .saturating_sub(skip)
            .min(inner.bottom().saturating_sub(y));
        if rows == 0 {
            continue;
        }

        let slice = Rect::new(inner.x, y, inner.width, rows);
        let card = Paragraph::new(card_lines(screen, item.index))
            .wrap(Wrap { trim: true })
            .scroll((skip, 0));
        frame.render_widget(card, slice);
    }
}

/// Text of one card
pub fn card_lines(screen: &FeedScreen, index: usize) -> Vec<Line<'static>> {
    let Some(post) = screen.controller.posts().get(index) else {
        return Vec::new();
    };
    let state = screen.controller.state(index);
    let marker = if screen.controller.active_index() == Some(index) {
        "  ● active"
    } else {
        ""
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!(" {} ", state_label(state)), Theme::item_state(state)),
            Span::raw("  "),
            Span::styled(post.handle(), Theme::handle()),
            Span::styled(marker, Theme::dimmed()),
        ]),
        Line::from(""),
    ];

    if !post.description.is_empty() {
        lines.push(Line::styled(post.description.clone(), Theme::text()));
    }
    if !post.tags.is_empty() {
        lines.push(Line::styled(post.format_tags(), Theme::keybind()));
    }
    lines.push(Line::from(""));

    let (progress, position, duration) = match screen.controller.handle(index) {
        Some(player) => (player.progress(), player.position(), player.duration()),
        None => (0.0, Default::default(), post.clip_duration()),
    };
    lines.push(progress_line(progress, position, duration));
    lines.push(counters_line(post));

    if let Some(status) = post.review_status() {
        lines.push(Line::from(vec![
            Span::styled("Review: ", Theme::dimmed()),
            Span::styled(status.label(), Theme::review(status)),
        ]));
    }

    if let Some(error) = screen.controller.error(index) {
        lines.push(Line::styled(format!("✗ {}", error), Theme::error()));
    }

    lines
}

fn state_label(state: ItemState) -> &'static str {
    match state {
        ItemState::Playing => "▶ PLAYING",
        ItemState::Paused => "❚❚ PAUSED",
        ItemState::Errored => "✗ ERROR",
        ItemState::Unmounted => "· IDLE",
    }
}

fn progress_line(
    progress: f64,
    position: std::time::Duration,
    duration: std::time::Duration,
) -> Line<'static> {
    let filled = ((progress.clamp(0.0, 1.0)) * PROGRESS_WIDTH as f64).round() as usize;
    Line::from(vec![
        Span::styled("█".repeat(filled), Theme::progress_bar()),
        Span::styled("░".repeat(PROGRESS_WIDTH - filled), Theme::progress_bar_empty()),
        Span::styled(
            format!(" {} / {}", format_duration(position), format_duration(duration)),
            Theme::dimmed(),
        ),
    ])
}

fn counters_line(post: &VideoPost) -> Line<'static> {
    let mut spans = vec![
        Span::styled(format!("♥ {}", format_count(post.likes)), Theme::title()),
        Span::raw("  "),
        Span::styled(format!("💬 {}", format_count(post.comments)), Theme::text()),
        Span::raw("  "),
        Span::styled(format!("↗ {}", format_count(post.shares)), Theme::text()),
        Span::raw("  "),
        Span::styled(format!("👁 {}", format_count(post.views)), Theme::dimmed()),
    ];
    if post.submissions > 0 {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("⇄ {} submissions", post.submissions),
            Theme::keybind(),
        ));
    }
    Line::from(spans)
}
