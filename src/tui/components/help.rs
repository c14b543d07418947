use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem},
    Frame,
};
use crate::tui::app::App;

const KEYBINDINGS: [(&str, &str); 12] = [
    ("Tab / Shift+Tab", "Next / Previous screen"),
    ("1-5", "Jump to screen"),
    ("↑ / ↓", "Navigate items"),
    ("r", "Refresh data"),
    ("/", "Search patients"),
    ("← / →", "Previous / next page"),
    ("Enter", "Mark notification as read"),
    ("a", "Mark all notifications as read"),
    ("t", "Toggle theme (Settings)"),
    ("L", "Log out"),
    ("h / ?", "Toggle help"),
    ("q / Esc", "Quit"),
];

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let items: Vec<ListItem> = KEYBINDINGS
        .iter()
        .map(|(key, desc)| {
            let content = vec![
                Span::styled(
                    format!("{:15}", key),
                    Style::default()
                        .fg(theme.warning)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" - "),
                Span::styled(*desc, Style::default().fg(theme.foreground)),
            ];
            ListItem::new(Line::from(content))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Atalhos")
            .border_style(Style::default().fg(theme.primary)),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(list, area);
}
