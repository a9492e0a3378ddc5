//! JobTok theme
//!
//! Short-video palette (hot pink on near-black, cyan accents) and the style
//! helpers every view uses.

use ratatui::style::{Color, Modifier, Style};

use crate::models::SubmissionStatus;
use crate::playback::ItemState;

/// Color palette and style helpers
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #121212
    pub const BACKGROUND: Color = Color::Rgb(0x12, 0x12, 0x12);

    /// Primary: #fe2c55 (brand pink)
    pub const PRIMARY: Color = Color::Rgb(0xfe, 0x2c, 0x55);

    /// Secondary: #25f4ee (brand cyan)
    pub const SECONDARY: Color = Color::Rgb(0x25, 0xf4, 0xee);

    /// Text: #f1f1f2
    pub const TEXT: Color = Color::Rgb(0xf1, 0xf1, 0xf2);

    /// Muted text: #8a8b91
    pub const DIM: Color = Color::Rgb(0x8a, 0x8b, 0x91);

    /// Success: #2ecc71
    pub const SUCCESS: Color = Color::Rgb(0x2e, 0xcc, 0x71);

    /// Warning: #f5a623
    pub const WARNING: Color = Color::Rgb(0xf5, 0xa6, 0x23);

    /// Error: #ff4d4f
    pub const ERROR: Color = Color::Rgb(0xff, 0x4d, 0x4f);

    /// Panels and bars
    pub const SURFACE: Color = Color::Rgb(0x1f, 0x1f, 0x23);

    pub const BORDER: Color = Color::Rgb(0x3a, 0x3a, 0x42);

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Author handles
    pub fn handle() -> Style {
        Style::default()
            .fg(Self::SECONDARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    /// Selected row in lists
    pub fn list_item_selected() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::SECONDARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn progress_bar() -> Style {
        Style::default().fg(Self::PRIMARY).bg(Self::SURFACE)
    }

    pub fn progress_bar_empty() -> Style {
        Style::default().fg(Self::BORDER).bg(Self::SURFACE)
    }

    pub fn keybind() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::SURFACE)
    }

    pub fn loading() -> Style {
        Style::default()
            .fg(Self::SECONDARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Badge for an item's playback state
    pub fn item_state(state: ItemState) -> Style {
        match state {
            ItemState::Playing => Style::default()
                .fg(Self::BACKGROUND)
                .bg(Self::SUCCESS)
                .add_modifier(Modifier::BOLD),
            ItemState::Paused => Style::default().fg(Self::BACKGROUND).bg(Self::WARNING),
            ItemState::Errored => Style::default()
                .fg(Self::TEXT)
                .bg(Self::ERROR)
                .add_modifier(Modifier::BOLD),
            ItemState::Unmounted => Style::default().fg(Self::DIM).bg(Self::SURFACE),
        }
    }

    /// Review decision on a submission
    pub fn review(status: SubmissionStatus) -> Style {
        match status {
            SubmissionStatus::Pending => Style::default().fg(Self::WARNING),
            SubmissionStatus::Accepted => Style::default()
                .fg(Self::SUCCESS)
                .add_modifier(Modifier::BOLD),
            SubmissionStatus::Rejected => Style::default()
                .fg(Self::ERROR)
                .add_modifier(Modifier::BOLD),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// COLOR UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// WCAG relative luminance of an sRGB color
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    let linear = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// Contrast ratio between two colors, from 1.0 to 21.0.
/// Non-RGB colors have no defined ratio.
pub fn contrast_ratio(fg: Color, bg: Color) -> Option<f64> {
    match (fg, bg) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let l1 = relative_luminance(r1, g1, b1);
            let l2 = relative_luminance(r2, g2, b2);
            let (hi, lo) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
            Some((hi + 0.05) / (lo + 0.05))
        }
        _ => None,
    }
}
