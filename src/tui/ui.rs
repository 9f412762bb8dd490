//! UI rendering functions for the TUI.
//!
//! Lays out the note form on the left, the note list on the right, and a
//! status line plus shortcut bar along the bottom.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use super::app::{App, Focus, StatusKind};

/// Main rendering function for the TUI.
pub fn draw(frame: &mut Frame, app: &App) {
    let size = frame.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Form and list
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Shortcut bar
        ])
        .split(size);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(main_chunks[0]);

    let form_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(3),    // Content
            Constraint::Length(3), // Tag
        ])
        .split(content_chunks[0]);

    render_field(frame, app, Focus::Title, app.title_input(), form_chunks[0]);
    render_field(frame, app, Focus::Content, app.content_input(), form_chunks[1]);
    render_field(frame, app, Focus::Tag, app.tag_input(), form_chunks[2]);
    render_note_list(frame, app, content_chunks[1]);
    render_status_line(frame, app, main_chunks[1]);
    render_shortcut_bar(frame, app, main_chunks[2]);

    if let Some(term) = app.search_prompt() {
        render_search_prompt(frame, term, size);
    }
}

fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

/// Renders one form field with a cursor indicator when focused.
fn render_field(frame: &mut Frame, app: &App, field: Focus, value: &str, area: Rect) {
    let is_focused = app.focus() == field && app.search_prompt().is_none();
    let title = match field {
        Focus::Title => "Title",
        Focus::Content => "Content",
        Focus::Tag => "Tag",
        Focus::NoteList => "Notes",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style(is_focused));

    let mut content = value.to_string();
    if is_focused {
        content.push('█');
    }

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Renders the note list with each note's id, title and tags.
fn render_note_list(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focus() == Focus::NoteList && app.search_prompt().is_none();

    let title = match app.active_search() {
        Some(term) => format!("Notes matching \"{term}\" ({})", app.notes().len()),
        None => format!("Notes ({})", app.notes().len()),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style(is_focused));

    let items: Vec<ListItem> = app
        .notes()
        .iter()
        .map(|note| {
            let mut spans = vec![
                Span::styled(
                    format!("#{} ", note.id()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(note.title().to_string()),
            ];
            for tag in note.tags() {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(
                    format!("[{}]", tag.title()),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::ITALIC),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::REVERSED),
    );

    let mut list_state = ListState::default();
    list_state.select(app.selected_index());

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_status_line(frame: &mut Frame, app: &App, area: Rect) {
    let line = match app.status() {
        Some(status) => {
            let style = match status.kind {
                StatusKind::Info => Style::default().fg(Color::Green),
                StatusKind::Error => Style::default().fg(Color::Red),
            };
            Line::from(Span::styled(status.message.clone(), style))
        }
        None => Line::from(""),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Renders the shortcut bar at the bottom of the screen.
///
/// Format: `Key: action | Key: action` with keys highlighted in cyan.
fn render_shortcut_bar(frame: &mut Frame, app: &App, area: Rect) {
    let key_style = Style::default().fg(Color::Cyan);
    let sep_style = Style::default().fg(Color::DarkGray);

    let shortcuts: &[(&str, &str)] = if app.search_prompt().is_some() {
        &[("Enter", "search"), ("Esc", "cancel")]
    } else if app.focus() == Focus::NoteList {
        &[
            ("j/k", "select"),
            ("^A", "add"),
            ("^U", "update"),
            ("^D", "delete"),
            ("^F", "search"),
            ("^R", "all"),
            ("Tab", "next"),
            ("^Q", "quit"),
        ]
    } else {
        &[
            ("^A", "add"),
            ("^U", "update"),
            ("^D", "delete"),
            ("^F", "search"),
            ("^R", "all"),
            ("Tab", "next"),
            ("Esc", "clear"),
            ("^Q", "quit"),
        ]
    };

    let mut spans = Vec::with_capacity(shortcuts.len() * 3);
    for (i, (key, action)) in shortcuts.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", sep_style));
        }
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::raw(format!(": {action}")));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Renders the search dialog centered over the rest of the screen.
fn render_search_prompt(frame: &mut Frame, term: &str, area: Rect) {
    let popup = centered_rect(50, 3, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Search Notes: enter search term")
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(format!("{term}█")).block(block), popup);
}

/// Returns a rect `percent_x` wide and `height` rows tall centered in `area`.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = area.width.saturating_mul(percent_x) / 100;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
