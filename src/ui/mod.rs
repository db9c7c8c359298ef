// Top-level rendering.
// Contains the header, the menu screen, forms, the status bar, and the help overlay.

mod form;
mod header;
mod menu;

use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::state::{NoticeLevel, Screen};

/// Seconds a notice stays in the status bar.
const NOTICE_SECS: i64 = 8;

/// Render one frame for the current screen.
pub fn draw<F>(frame: &mut Frame, app: &mut App<F>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    header::draw_header(frame, app, chunks[0]);

    match app.nav.current() {
        Screen::Onboarding => form::draw_form(
            frame,
            &app.onboarding_form,
            "Let us get to know you",
            "Tell us your first name and email to get started.",
            chunks[1],
        ),
        Screen::Home => menu::draw_home(frame, app, chunks[1]),
        Screen::Profile => form::draw_form(
            frame,
            &app.profile_form,
            "Personal information",
            "Space toggles notifications. Enter saves, Ctrl+L logs out.",
            chunks[1],
        ),
    }

    draw_status_bar(frame, app, chunks[2]);

    // Drawn last so it covers the screen.
    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Draw the status bar with keybinding hints, or the latest notice.
fn draw_status_bar<F>(frame: &mut Frame, app: &App<F>, area: Rect) {
    if let Some(notice) = app.notice.as_ref().filter(|n| !n.is_older_than(NOTICE_SECS)) {
        let (icon, color) = match notice.level {
            NoticeLevel::Error => ("❌", Color::Red),
            NoticeLevel::Warn => ("⚠️", Color::Yellow),
            NoticeLevel::Info => ("ℹ️", Color::Cyan),
        };
        let status = Paragraph::new(Line::from(vec![
            Span::raw(format!(" {} ", icon)),
            Span::styled(notice.message.as_str(), Style::default().fg(color)),
        ]));
        frame.render_widget(status, area);
        return;
    }

    let hints: Vec<(&str, &str)> = match app.nav.current() {
        Screen::Onboarding => vec![
            ("Tab", "Next field"),
            ("↵", "Continue"),
            ("Esc", "Quit"),
        ],
        Screen::Home if app.menu.search_focused => vec![
            ("type", "Search"),
            ("↵/Esc", "Done"),
        ],
        Screen::Home => vec![
            ("↑↓", "Navigate"),
            ("/", "Search"),
            ("←→", "Category"),
            ("Space", "Toggle"),
            ("p", "Profile"),
            ("?", "Help"),
            ("q", "Quit"),
        ],
        Screen::Profile => vec![
            ("Tab", "Next field"),
            ("↵", "Save"),
            ("^L", "Logout"),
            ("Esc", "Back"),
        ],
    };

    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(Span::raw(format!(" {} ", key)));
        spans.push(Span::styled(
            format!("{} ", label),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let status = Paragraph::new(Line::from(spans));
    frame.render_widget(status, area);
}

/// Rect of at most `width` x `height`, centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Key reference drawn over the current screen.
fn draw_help_overlay(frame: &mut Frame) {
    let popup = centered(frame.area(), 52, 18);
    frame.render_widget(Clear, popup);

    let key_style = Style::default().fg(Color::Cyan);
    let dim = Style::default().fg(Color::DarkGray);
    let shortcut = |keys: &'static str, action: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<14}", keys), key_style),
            Span::raw(action),
        ])
    };

    let mut lines = vec![
        Line::styled("Menu screen", Style::default().add_modifier(Modifier::BOLD)),
        Line::default(),
    ];
    lines.extend([
        shortcut("↑/↓ or j/k", "Navigate menu"),
        shortcut("/", "Search dishes"),
        shortcut("←/→ or h/l", "Move between categories"),
        shortcut("Space/Enter", "Toggle category"),
        shortcut("c", "Clear categories"),
        shortcut("p", "Edit profile"),
        shortcut("r", "Retry loading the menu"),
        shortcut("R", "Download the menu again"),
        shortcut("?", "Show/hide this help"),
        shortcut("q", "Quit"),
    ]);
    lines.push(Line::default());
    lines.push(Line::styled("  Esc or ? closes this window", dim));

    let help = Paragraph::new(lines).block(
        Block::bordered()
            .border_style(key_style)
            .title(" Help ")
            .title_style(key_style.add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(help, popup);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_fits_inside_area() {
        let area = Rect::new(0, 2, 100, 30);
        assert_eq!(centered(area, 52, 18), Rect::new(24, 8, 52, 18));

        let small = Rect::new(0, 0, 40, 10);
        assert_eq!(centered(small, 52, 18), small);
    }
}
