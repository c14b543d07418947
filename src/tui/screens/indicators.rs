use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};
use crate::tui::{app::App, components};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45), // Chart
            Constraint::Min(0),         // Criteria of the selected program
        ])
        .split(area);

    components::chart::render(frame, chunks[0], app);
    render_criteria(frame, chunks[1], app);
}

fn render_criteria(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let header = Row::new(["Código", "Critério", "Situação"].map(|h| {
        Cell::from(h).style(Style::default().fg(theme.warning))
    }))
    .style(Style::default().add_modifier(Modifier::BOLD))
    .bottom_margin(1);

    let (title, rows) = match app.selected_indicator() {
        Some(indicator) => {
            let rows: Vec<Row> = indicator
                .criteria
                .iter()
                .map(|c| {
                    Row::new(vec![
                        Cell::from(c.code.clone()),
                        Cell::from(c.description.clone()),
                        Cell::from(format!("● {:?}", c.status))
                            .style(Style::default().fg(theme.status(c.status))),
                    ])
                })
                .collect();
            let title = format!(
                "{} ({} pacientes) - ↑/↓ troca programa",
                indicator.program.label(),
                indicator.patient_count
            );
            (title, rows)
        }
        None => ("Sem indicadores".to_string(), Vec::new()),
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Percentage(70),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(theme.primary)),
    );

    frame.render_widget(table, area);
}
