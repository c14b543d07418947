use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};
use crate::{tui::app::App, utils};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let header_cells = ["", "Data", "Título", "Mensagem"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(theme.warning)));

    let header = Row::new(header_cells)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .height(1)
        .bottom_margin(1);

    let rows = app.notifications.iter().map(|n| {
        let style = if n.read {
            Style::default().fg(theme.muted)
        } else {
            Style::default().fg(theme.foreground).add_modifier(Modifier::BOLD)
        };
        let cells = vec![
            Cell::from(if n.read { " " } else { "●" }).style(Style::default().fg(theme.info)),
            Cell::from(n.created_at.format("%d/%m %H:%M").to_string()),
            Cell::from(utils::truncate(&n.title, 30)),
            Cell::from(n.message.clone()),
        ];

        Row::new(cells).style(style).height(1)
    });

    let title = format!(
        "Notificações ({} não lidas) - Enter: marcar lida | a: marcar todas",
        app.unread.unwrap_or(0)
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Length(12),
            Constraint::Percentage(30),
            Constraint::Min(0),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(theme.primary)),
    )
    .highlight_style(Style::default().bg(theme.highlight))
    .highlight_symbol(">> ");

    let mut state = TableState::default();
    if !app.notifications.is_empty() {
        state.select(Some(app.selected_index));
    }

    frame.render_stateful_widget(table, area, &mut state);
}
