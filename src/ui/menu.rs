// Home screen rendering.
// Search bar, category chips, and the filtered menu list with loading and empty states.

use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::menu::MenuItem;
use crate::state::LoadingState;

/// Render a loading indicator.
pub fn render_loading(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(format!("⏳ {}...", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(text, area);
}

/// Render an error message.
pub fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let text = Paragraph::new(format!("❌ {}", error))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true });
    frame.render_widget(text, area);
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(text, area);
}

/// Draw the whole Home screen.
pub fn draw_home<F>(frame: &mut Frame, app: &mut App<F>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search bar
            Constraint::Length(3), // Category chips
            Constraint::Min(1),    // Menu list
        ])
        .split(area);

    draw_search_bar(frame, app, chunks[0]);
    draw_categories(frame, app, chunks[1]);
    draw_menu_list(frame, app, chunks[2]);
}

fn draw_search_bar<F>(frame: &mut Frame, app: &App<F>, area: Rect) {
    let focused = app.menu.search_focused;
    let border = if focused { Color::Yellow } else { Color::DarkGray };

    let mut spans = vec![Span::styled("🔍 ", Style::default().fg(Color::DarkGray))];
    if app.menu.search_input.is_empty() && !focused {
        let hint = if app.controller.is_ready() {
            "Search menu... (press /)"
        } else {
            "Search starts once the menu is loaded"
        };
        spans.push(Span::styled(hint, Style::default().fg(Color::DarkGray)));
    } else {
        spans.push(Span::raw(app.menu.search_input.as_str()));
    }
    if focused {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    }
    if app.controller.is_searching() {
        spans.push(Span::styled("  searching…", Style::default().fg(Color::DarkGray)));
    }

    let search = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(search, area);
}

fn draw_categories<F>(frame: &mut Frame, app: &App<F>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Order for delivery! ");

    let categories = app.menu.categories();
    if categories.is_empty() {
        frame.render_widget(block, area);
        return;
    }

    let mut spans = Vec::new();
    for (i, category) in categories.iter().enumerate() {
        let selected = app.controller.is_selected(category);
        let under_cursor = i == app.menu.category_cursor && !app.menu.search_focused;

        let mut style = if selected {
            Style::default().fg(Color::White).bg(Color::Green)
        } else {
            Style::default().fg(Color::Green)
        };
        if under_cursor {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }

        spans.push(Span::styled(format!(" {} ", capitalize(category)), style));
        spans.push(Span::raw(" "));
    }

    let chips = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(chips, area);
}

fn draw_menu_list<F>(frame: &mut Frame, app: &mut App<F>, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Menu ");
    let inner = block.inner(area);

    match &app.menu.load {
        LoadingState::Idle => {
            frame.render_widget(block, area);
            render_empty(frame, inner, "Menu not loaded yet");
        }
        LoadingState::Loading => {
            frame.render_widget(block, area);
            render_loading(frame, inner, "Loading menu");
        }
        LoadingState::Error(e) => {
            frame.render_widget(block, area);
            render_error(frame, inner, &format!("{e}\n\nPress r to retry"));
        }
        LoadingState::Loaded(_) => {
            let results = app.controller.results();
            if results.is_empty() {
                let message = if app.controller.criteria().is_unfiltered() {
                    "The menu is empty. Press R to download it again"
                } else {
                    "No dishes match your search"
                };
                frame.render_widget(block, area);
                render_empty(frame, inner, message);
                return;
            }

            let items: Vec<ListItem> = results.iter().map(menu_list_item).collect();
            let title = format!(" Menu ({}) ", results.len());

            let list_widget = List::new(items)
                .block(Block::default().borders(Borders::ALL).title(title))
                .highlight_style(
                    Style::default()
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("> ");

            frame.render_stateful_widget(list_widget, area, &mut app.menu.list.list_state);
        }
    }
}

fn menu_list_item(item: &MenuItem) -> ListItem<'static> {
    ListItem::new(vec![
        Line::from(vec![
            Span::styled(
                item.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(item.display_price(), Style::default().fg(Color::Green)),
        ]),
        Line::from(Span::styled(
            truncate(&item.description, 90),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ])
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
