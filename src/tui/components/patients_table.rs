use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};
use crate::{eligibility::EligibilityCalculator, tui::app::App, utils};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let calc = EligibilityCalculator::today_utc();

    let header_cells = ["Nome", "CPF", "Nascimento", "Idade", "Grupos"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(theme.warning)));

    let header = Row::new(header_cells)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .height(1)
        .bottom_margin(1);

    let rows = app.patients.iter().map(|patient| {
        let name_style = if patient.active {
            Style::default().fg(theme.foreground)
        } else {
            Style::default().fg(theme.muted).add_modifier(Modifier::CROSSED_OUT)
        };
        let age = calc
            .age_years(&patient.birth_date)
            .map(|a| a.to_string())
            .unwrap_or_else(|| "-".to_string());

        let cells = vec![
            Cell::from(utils::truncate(&patient.name, 28)).style(name_style),
            Cell::from(patient.cpf.as_deref().map(utils::format_cpf).unwrap_or_default()),
            Cell::from(utils::format_date(&patient.birth_date)),
            Cell::from(age),
            Cell::from(patient.flags.labels().join(", ")).style(Style::default().fg(theme.info)),
        ];

        Row::new(cells).height(1)
    });

    let widths = [
        Constraint::Percentage(30),
        Constraint::Percentage(18),
        Constraint::Percentage(14),
        Constraint::Percentage(8),
        Constraint::Percentage(30),
    ];

    let title = format!(
        "Pacientes ({}), página {}/{}",
        app.patient_total,
        app.patient_page,
        app.patient_pages.max(1)
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(theme.primary)),
        )
        .highlight_style(
            Style::default()
                .bg(theme.highlight)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    let mut state = TableState::default();
    if !app.patients.is_empty() {
        state.select(Some(app.selected_index));
    }

    frame.render_stateful_widget(table, area, &mut state);
}
