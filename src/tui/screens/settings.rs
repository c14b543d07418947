use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};
use crate::tui::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let config = &app.ctx.config;
    let theme = &app.theme;

    let settings = vec![
        ("Backend", config.api.base_url.clone()),
        ("Request timeout", format!("{}s", config.api.timeout_secs)),
        ("Local storage", config.storage.path.clone()),
        ("Poll interval", format!("{}s", config.notifications.poll_interval_secs)),
        ("Log file", config.logging.file.clone()),
        ("Theme (t)", format!("{:?}", app.theme_name)),
        (
            "Logged in as",
            app.user
                .as_ref()
                .map(|u| format!("{} <{}>", u.name, u.email))
                .unwrap_or_default(),
        ),
    ];

    let items: Vec<ListItem> = settings
        .iter()
        .map(|(key, value)| {
            let content = vec![
                Span::styled(format!("{:20}", key), Style::default().fg(theme.warning)),
                Span::raw(": "),
                Span::styled(value.as_str(), Style::default().fg(theme.foreground)),
            ];
            ListItem::new(Line::from(content))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Configuração")
            .border_style(Style::default().fg(theme.primary)),
    );

    frame.render_widget(list, area);
}
