use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use crate::tui::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let mut title = vec![
        Span::styled("✚ ", Style::default().fg(theme.success)),
        Span::styled(
            "UBS 360",
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
    ];

    if let Some(user) = &app.user {
        title.push(Span::raw(" | "));
        title.push(Span::styled(
            format!("{} ({})", user.name, user.role),
            Style::default().fg(theme.foreground),
        ));

        let (badge, color) = match app.unread {
            Some(0) => ("🔔 0".to_string(), theme.muted),
            Some(n) => (format!("🔔 {}", n), theme.warning),
            None => ("🔔 -".to_string(), theme.muted),
        };
        title.push(Span::raw(" | "));
        title.push(Span::styled(badge, Style::default().fg(color).add_modifier(Modifier::BOLD)));
    }

    if app.is_loading {
        title.push(Span::styled("  ⟳", Style::default().fg(theme.info)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.primary));

    let paragraph = Paragraph::new(Line::from(title))
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
