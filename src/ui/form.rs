// Form rendering.
// Draws the onboarding and profile forms with a cursor on the focused field.

use ratatui::{prelude::*, widgets::*};

use crate::state::{FieldValue, FormState};

/// Draw a form inside a bordered block, centered in `area`.
pub fn draw_form(frame: &mut Frame, form: &FormState, title: &str, intro: &str, area: Rect) {
    let form_width = area.width.min(64);
    let form_height = (form.fields.len() as u16 * 3 + 6).min(area.height);
    let form_x = area.x + (area.width.saturating_sub(form_width)) / 2;
    let form_y = area.y + (area.height.saturating_sub(form_height)) / 2;
    let form_area = Rect::new(form_x, form_y, form_width, form_height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(format!(" {} ", title));
    let inner = block.inner(form_area);
    frame.render_widget(block, form_area);

    let mut constraints = vec![Constraint::Length(2)]; // Intro
    constraints.extend(form.fields.iter().map(|_| Constraint::Length(3)));
    constraints.push(Constraint::Min(1)); // Message

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let intro_widget = Paragraph::new(intro).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(intro_widget, chunks[0]);

    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let border = if focused { Color::Yellow } else { Color::DarkGray };

        let line = match &field.value {
            FieldValue::Text(text) => {
                let mut spans = vec![Span::raw(text.as_str())];
                if focused {
                    spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
                }
                Line::from(spans)
            }
            FieldValue::Toggle(on) => {
                let (label, color) = if *on {
                    ("[x] On", Color::Green)
                } else {
                    ("[ ] Off", Color::DarkGray)
                };
                Line::from(Span::styled(label, Style::default().fg(color)))
            }
        };

        let input = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(format!(" {} ", field.label)),
        );
        frame.render_widget(input, chunks[i + 1]);
    }

    if let Some(message) = &form.message {
        let message_widget = Paragraph::new(message.as_str())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true });
        frame.render_widget(message_widget, chunks[form.fields.len() + 1]);
    }
}
