use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};
use crate::tui::{
    app::{App, Screen},
    components,
};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),      // Stats
            Constraint::Percentage(50), // Indicators or groups
            Constraint::Min(0),         // Logs
        ])
        .split(area);

    components::stats::render(frame, chunks[0], app);

    if app.can_view(Screen::Indicators) {
        components::chart::render(frame, chunks[1], app);
    } else {
        render_groups(frame, chunks[1], app);
    }

    components::logs::render(frame, chunks[2], app);
}

fn render_groups(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let groups = app
        .summary
        .as_ref()
        .map(|s| s.patients_by_group.as_slice())
        .unwrap_or_default();

    let items: Vec<ListItem> = groups
        .iter()
        .map(|g| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:20}", g.group), Style::default().fg(theme.warning)),
                Span::styled(g.count.to_string(), Style::default().fg(theme.foreground)),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Pacientes por grupo")
            .border_style(Style::default().fg(theme.primary)),
    );
    frame.render_widget(list, area);
}
