use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use crate::tui::app::{App, InputMode};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let form = centered(area, 50, 11);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(3), // Email
            Constraint::Length(3), // Password
            Constraint::Min(0),    // Hint
        ])
        .split(form);

    let title = Paragraph::new(Line::from(Span::styled(
        "Acesse sua conta",
        Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let masked = "•".repeat(app.password.value().chars().count());
    render_field(frame, chunks[1], app, "Email", app.email.value(), app.input_mode == InputMode::Email);
    render_field(frame, chunks[2], app, "Senha", &masked, app.input_mode == InputMode::Password);

    let hint = Paragraph::new(Line::from(Span::styled(
        "Enter: continuar | Tab: trocar campo | Esc: sair",
        Style::default().fg(theme.muted),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(hint, chunks[3]);

    // Cursor at the end of the focused field
    let (field, input) = match app.input_mode {
        InputMode::Password => (chunks[2], &app.password),
        _ => (chunks[1], &app.email),
    };
    let width = field.width.saturating_sub(2) as usize;
    let scroll = input.visual_scroll(width);
    let cursor = input.visual_cursor().saturating_sub(scroll);
    frame.set_cursor(field.x + 1 + cursor as u16, field.y + 1);
}

fn render_field(frame: &mut Frame, area: Rect, app: &App, label: &str, value: &str, focused: bool) {
    let border = if focused { app.theme.primary } else { app.theme.border };
    let paragraph = Paragraph::new(value).block(
        Block::default()
            .borders(Borders::ALL)
            .title(label)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(paragraph, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
