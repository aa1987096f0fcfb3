//! Terminal rendering of the page
//!
//! Layout: header (logo + theme icon), form row (URL input + submit
//! control), content (loading placeholder, error, result card or help),
//! status bar.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode};
use crate::render::ResultView;
use crate::ui::Palette;

/// Main render function
pub fn render_ui(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let palette = app.palette();

    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Form
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, chunks[0], app, palette);
    render_form(frame, chunks[1], app, palette);
    render_content(frame, chunks[2], app, palette);
    render_status_bar(frame, chunks[3], app, palette);
}

fn panel<'a>(palette: &Palette, title: &'a str) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(palette.border())
        .title(Span::styled(title, palette.title()))
}

fn render_header(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(12)])
        .split(area);

    let logo = Paragraph::new(Line::from(vec![
        Span::styled(
            "TIKTOK",
            Style::default()
                .fg(palette.text)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "MASTER",
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(palette.border()),
    );
    frame.render_widget(logo, chunks[0]);

    // The icon shows the mode a toggle would switch to
    let icon = if !app.page.light_icon_hidden {
        "☀ light"
    } else {
        "☾ dark"
    };
    let toggle = Paragraph::new(Span::styled(icon, palette.keybind()))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(palette.border()),
        );
    frame.render_widget(toggle, chunks[1]);
}

fn render_form(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let button_width = (app.page.submit.label.chars().count() as u16 + 4).max(14);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(button_width)])
        .split(area);

    let editing = app.input_mode == InputMode::Editing;
    let text = if editing {
        let (before, after) = app.page.input.split_at_cursor();
        format!("{}│{}", before, after)
    } else if app.page.input.value.is_empty() {
        "Paste a TikTok link, press i to edit".to_string()
    } else {
        app.page.input.value.clone()
    };

    let input = Paragraph::new(text)
        .style(if !editing && app.page.input.value.is_empty() {
            palette.dimmed()
        } else {
            palette.input()
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(if editing {
                    palette.border_focused()
                } else {
                    palette.border()
                })
                .title(Span::styled(" TikTok URL ", palette.title())),
        );
    frame.render_widget(input, chunks[0]);

    let button = Paragraph::new(Span::styled(
        app.page.submit.label.as_str(),
        palette.button(app.page.submit.disabled),
    ))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(palette.border()),
    );
    frame.render_widget(button, chunks[1]);
}

fn render_content(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    if app.page.is_loading() {
        render_skeleton(frame, area, palette);
    } else if let Some(message) = app.page.visible_error() {
        render_error(frame, area, message, palette);
    } else if let Some(view) = app.page.visible_result() {
        render_result(frame, area, app, view, palette);
    } else {
        render_help(frame, area, palette);
    }
}

fn render_skeleton(frame: &mut Frame, area: Rect, palette: &Palette) {
    let block = panel(palette, " VIDEO ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let bar = |width: usize| Line::from(Span::styled("░".repeat(width), palette.dimmed()));
    let skeleton = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("⟳ Fetching video info...", palette.loading())),
        Line::from(""),
        bar(32),
        bar(24),
        Line::from(""),
        bar(40),
        bar(40),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(skeleton, inner);
}

fn render_error(frame: &mut Frame, area: Rect, message: &str, palette: &Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(palette.error())
        .title(Span::styled(" ✗ ERROR ", palette.error()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let para = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message, palette.error())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    frame.render_widget(para, inner);
}

fn render_result(frame: &mut Frame, area: Rect, app: &App, view: &ResultView, palette: &Palette) {
    let block = panel(palette, " VIDEO ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .split(inner);

    let summary = Paragraph::new(vec![
        Line::from(Span::styled(
            view.title.as_str(),
            Style::default()
                .fg(palette.text)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(view.duration_text.as_str(), palette.dimmed())),
        Line::from(vec![
            Span::styled("Thumbnail: ", palette.dimmed()),
            Span::styled(view.thumbnail_src.as_str(), palette.link()),
        ]),
    ])
    .wrap(Wrap { trim: true });
    frame.render_widget(summary, chunks[0]);

    let items: Vec<ListItem> = view
        .links
        .iter()
        .enumerate()
        .map(|(i, link)| {
            let is_selected = i == app.formats.selected;
            let marker = if is_selected { "▸ " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(
                    marker,
                    if is_selected {
                        palette.keybind()
                    } else {
                        palette.dimmed()
                    },
                ),
                Span::styled(
                    link.text.as_str(),
                    if is_selected {
                        palette.highlighted()
                    } else {
                        palette.text()
                    },
                ),
                Span::raw(" "),
                Span::styled(format!(".{}", link.format.ext), palette.dimmed()),
            ]))
        })
        .collect();

    let title = format!(" FORMATS ({}) ", view.links.len());
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(palette.border())
            .title(Span::styled(title, palette.title())),
    );
    frame.render_widget(list, chunks[1]);
}

fn render_help(frame: &mut Frame, area: Rect, palette: &Palette) {
    let block = panel(palette, " TIKTOK DOWNLOADER ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let key_line = |key: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(key, palette.keybind()),
            Span::styled(desc, palette.dimmed()),
        ])
    };

    let help = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Paste a TikTok link and press Enter",
            palette.text(),
        )),
        Line::from(""),
        key_line("  ↵   ", "Fetch video / download format"),
        key_line("  ↑↓  ", "Choose format"),
        key_line("  i   ", "Edit URL"),
        key_line("  t   ", "Toggle light/dark"),
        key_line("  q   ", "Quit"),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(help, inner);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let mode = match app.input_mode {
        InputMode::Normal => Span::styled(
            " NORMAL ",
            Style::default().fg(palette.on_primary).bg(palette.primary),
        ),
        InputMode::Editing => Span::styled(
            " INSERT ",
            Style::default().fg(palette.on_primary).bg(palette.success),
        ),
    };

    let status = match app.status.as_deref() {
        Some(msg) => Span::styled(format!(" {} ", msg), palette.success()),
        None => Span::raw(" "),
    };

    let help = Span::styled(
        " ↵:submit  esc:navigate  t:theme  q:quit ",
        palette.dimmed(),
    );

    let line = Line::from(vec![mode, status, Span::raw("│"), help]);
    frame.render_widget(Paragraph::new(line).style(palette.status_bar()), area);
}
