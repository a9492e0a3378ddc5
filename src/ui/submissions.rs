//! Submissions list: every reply to one post with its review badge

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
};

use crate::app::SubmissionList;
use crate::models::VideoPost;
use crate::ui::Theme;

pub fn render(frame: &mut Frame, area: Rect, list: &SubmissionList) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(
            format!(" Submissions for {} ({}) ", list.origin.handle(), list.posts.len()),
            Theme::title(),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if list.posts.is_empty() {
        let empty = Paragraph::new("No submissions yet")
            .style(Theme::dimmed())
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let height = inner.height as usize;
    let mut offset = list.list.offset.min(list.list.selected);
    if height > 0 && list.list.selected >= offset + height {
        offset = list.list.selected + 1 - height;
    }

    let items: Vec<ListItem> = list
        .posts
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(i, post)| submission_row(post, i == list.list.selected))
        .collect();
    frame.render_widget(List::new(items).style(Theme::text()), inner);
}

fn submission_row(post: &VideoPost, selected: bool) -> ListItem<'static> {
    let marker = if selected { "▸ " } else { "  " };
    let status = post.review_status().unwrap_or_default();

    let mut spans = vec![
        Span::styled(marker, Theme::keybind()),
        Span::styled(
            format!("[{}]", status.label().to_uppercase()),
            Theme::review(status),
        ),
        Span::raw(" "),
        Span::styled(post.handle(), Theme::handle()),
    ];
    if !post.description.is_empty() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            post.description.clone(),
            if selected {
                Theme::list_item_selected()
            } else {
                Theme::text()
            },
        ));
    }
    ListItem::new(Line::from(spans))
}
