// Header bar rendering.
// Shows the restaurant name, the screen trail, and the profile initials badge.

use ratatui::{prelude::*, widgets::*};

use crate::app::App;

/// Draw the header at the top of the screen.
pub fn draw_header<F>(frame: &mut Frame, app: &App<F>, area: Rect) {
    let trail = app.nav.trail();
    let last = trail.len().saturating_sub(1);

    let mut spans: Vec<Span> = Vec::new();
    for (i, title) in trail.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" › ", Style::default().fg(Color::DarkGray)));
        }
        let style = if i == last {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(*title, style));
    }

    let initials = app.profile.initials();
    let badge = if initials.is_empty() {
        String::new()
    } else {
        format!(" [{}] ", initials)
    };

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Little Lemon ")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .title(
            Line::from(Span::styled(
                badge,
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ))
            .right_aligned(),
        );

    let header = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(header, area);
}
