use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use crate::tui::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let summary = app.summary.clone().unwrap_or_default();
    let theme = &app.theme;

    render_stat(frame, chunks[0], app, "Pacientes", summary.total_patients, theme.primary);
    render_stat(frame, chunks[1], app, "Consultas hoje", summary.appointments_today, theme.success);
    render_stat(frame, chunks[2], app, "Visitas no mês", summary.home_visits_month, theme.info);
    render_stat(frame, chunks[3], app, "Exames pendentes", summary.pending_exams, theme.warning);
}

fn render_stat(frame: &mut Frame, area: Rect, app: &App, label: &str, value: u64, color: Color) {
    let value = if app.summary.is_some() { value.to_string() } else { "-".to_string() };

    let text = vec![
        Line::from(Span::styled(label, Style::default().fg(app.theme.muted))),
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(ratatui::layout::Alignment::Center);

    frame.render_widget(paragraph, area);
}
