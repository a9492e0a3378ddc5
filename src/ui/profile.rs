//! Profile view: the signed-in user's posts and totals

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
};

use crate::app::ProfileState;
use crate::models::{format_count, VideoPost};
use crate::ui::Theme;

pub fn render(frame: &mut Frame, area: Rect, profile: &ProfileState, user_id: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let Some(user_id) = user_id else {
        let hint = Paragraph::new("No user configured. Set user_id in config.toml or JOBTOK_USER.")
            .style(Theme::dimmed())
            .alignment(Alignment::Center)
            .block(panel(" PROFILE "));
        frame.render_widget(hint, area);
        return;
    };

    let stats = profile.stats;
    let summary = Paragraph::new(Line::from(vec![
        Span::styled(format!("@{}", user_id), Theme::handle()),
        Span::raw("   "),
        Span::styled(format!("{} videos", stats.videos), Theme::text()),
        Span::raw("  "),
        Span::styled(format!("♥ {}", format_count(stats.likes)), Theme::title()),
        Span::raw("  "),
        Span::styled(format!("👁 {}", format_count(stats.views)), Theme::dimmed()),
        Span::raw("  "),
        Span::styled(
            format!("⇄ {} submissions", stats.submissions_received),
            Theme::keybind(),
        ),
    ]))
    .block(panel(" PROFILE "));
    frame.render_widget(summary, chunks[0]);

    let block = panel(" MY VIDEOS ");
    let inner = block.inner(chunks[1]);
    frame.render_widget(block, chunks[1]);

    if profile.posts.is_empty() {
        let empty = Paragraph::new("You haven't posted anything yet")
            .style(Theme::dimmed())
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let height = inner.height as usize;
    let mut offset = profile.list.offset.min(profile.list.selected);
    if height > 0 && profile.list.selected >= offset + height {
        offset = profile.list.selected + 1 - height;
    }

    let items: Vec<ListItem> = profile
        .posts
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(i, post)| post_row(post, i == profile.list.selected))
        .collect();
    frame.render_widget(List::new(items).style(Theme::text()), inner);
}

fn panel(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(title, Theme::title()))
}

fn post_row(post: &VideoPost, selected: bool) -> ListItem<'static> {
    let marker = if selected { "▸ " } else { "  " };
    let description = if post.description.is_empty() {
        post.id.clone()
    } else {
        post.description.clone()
    };

    let line = Line::from(vec![
        Span::styled(marker, Theme::keybind()),
        Span::styled(
            description,
            if selected {
                Theme::list_item_selected()
            } else {
                Theme::text()
            },
        ),
        Span::raw("  "),
        Span::styled(format!("♥ {}", format_count(post.likes)), Theme::dimmed()),
        Span::raw(" "),
        Span::styled(format!("⇄ {}", post.submissions), Theme::keybind()),
    ]);
    ListItem::new(line)
}
