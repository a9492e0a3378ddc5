//! Terminal UI components
//!
//! Built with ratatui. `render` draws the whole frame: a header with the
//! tabs, the current screen, and a one-line status bar.

pub mod feed;
pub mod profile;
pub mod submissions;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::app::{App, AppState};

const HEADER_HEIGHT: u16 = 3;
const STATUS_HEIGHT: u16 = 1;

/// Split the frame into header, content and status bar
pub fn layout(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// Rows one feed page gets in a terminal of `area`
pub fn page_height(area: Rect) -> u16 {
    // Content block borders take two rows
    layout(area)[1].height.saturating_sub(2).max(1)
}

/// Draw the whole UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Theme::text()), area);

    let [header, content, status] = layout(area);
    render_header(frame, header, app);

    match app.state {
        AppState::Feed => feed::render(frame, content, &app.feed),
        AppState::SubmissionList => match app.submission_list.as_ref() {
            Some(list) => submissions::render(frame, content, list),
            None => feed::render(frame, content, &app.feed),
        },
        AppState::Submissions => match app.submissions.as_ref() {
            Some(screen) => feed::render(frame, content, screen),
            None => feed::render(frame, content, &app.feed),
        },
        AppState::Profile => {
            profile::render(frame, content, &app.profile, app.user_id.as_deref())
        }
    }

    render_status_bar(frame, status, app);

    if let Some(ref error) = app.error {
        render_error_popup(frame, area, error);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let tab = |label: &'static str, on: bool| {
        if on {
            Span::styled(format!(" {} ", label), Theme::list_item_selected())
        } else {
            Span::styled(format!(" {} ", label), Theme::dimmed())
        }
    };

    let mut spans = vec![
        Span::styled("Job", Theme::handle()),
        Span::styled("Tok", Theme::title()),
        Span::raw("   "),
        tab("FEED", app.state == AppState::Feed),
        Span::raw(" "),
        tab("PROFILE", app.state == AppState::Profile),
    ];
    if matches!(app.state, AppState::SubmissionList | AppState::Submissions) {
        spans.push(Span::raw(" "));
        spans.push(tab("SUBMISSIONS", true));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(header, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let left = if let Some(msg) = app.loading.message() {
        if app.loading.is_loading() {
            Span::styled(format!(" ⟳ {} ", msg), Theme::loading())
        } else {
            Span::styled(format!(" ✗ {} ", msg), Theme::error())
        }
    } else if let Some(ref status) = app.status {
        Span::styled(format!(" {} ", status), Theme::text())
    } else {
        Span::styled(format!(" {} posts ", app.feed.len()), Theme::dimmed())
    };

    let help = match app.state {
        AppState::Feed => " j/k:page  ↵:submissions  o:open  r:refresh  tab:profile  q:quit ",
        AppState::Profile => " j/k:select  ↵:submissions  o:open  tab:feed  q:quit ",
        AppState::SubmissionList => " j/k:select  ↵:watch  o:open  esc:back  q:quit ",
        AppState::Submissions => " j/k:page  a:accept  x:reject  o:open  esc:back  q:quit ",
    };

    let line = Line::from(vec![left, Span::raw("│"), Span::styled(help, Theme::keybind())]);
    frame.render_widget(Paragraph::new(line).style(Theme::status_bar()), area);
}

fn render_error_popup(frame: &mut Frame, area: Rect, error: &str) {
    let width = 60.min(area.width.saturating_sub(4));
    let height = 5.min(area.height);
    let popup = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    };

    frame.render_widget(Clear, popup);
    let block = Paragraph::new(vec![Line::from(""), Line::styled(error.to_string(), Theme::error())])
        .alignment(Alignment::Center)
        .wrap(ratatui::widgets::Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Theme::error())
                .title(Span::styled(" ✗ ERROR ", Theme::error()))
                .style(Style::default().bg(Theme::BACKGROUND)),
        );
    frame.render_widget(block, popup);
}
