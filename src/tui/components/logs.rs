use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};
use crate::tui::app::{App, LogLevel};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let items: Vec<ListItem> = app
        .logs
        .iter()
        .rev()
        .take((area.height as usize).saturating_sub(2))
        .map(|log| {
            let (icon, color) = match log.level {
                LogLevel::Info => ("ℹ", theme.info),
                LogLevel::Success => ("✓", theme.success),
                LogLevel::Warning => ("⚠", theme.warning),
                LogLevel::Error => ("✗", theme.error),
            };

            let content = vec![
                Span::styled(format!("{} ", icon), Style::default().fg(color)),
                Span::styled(
                    log.timestamp.format("[%H:%M:%S]").to_string(),
                    Style::default().fg(theme.muted),
                ),
                Span::raw(" "),
                Span::raw(log.message.as_str()),
            ];

            ListItem::new(Line::from(content))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Atividade")
            .border_style(Style::default().fg(theme.primary)),
    );

    frame.render_widget(list, area);
}
