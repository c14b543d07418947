use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use crate::{
    eligibility::EligibilityCalculator,
    tui::{
        app::{App, InputMode},
        components,
    },
    utils,
};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),      // Search
            Constraint::Percentage(70), // Patients table
            Constraint::Min(0),         // Selected patient
        ])
        .split(area);

    render_search(frame, chunks[0], app);
    components::patients_table::render(frame, chunks[1], app);
    render_details(frame, chunks[2], app);
}

fn render_search(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let searching = app.input_mode == InputMode::Search;

    let width = area.width.saturating_sub(2) as usize;
    let scroll = app.search.visual_scroll(width);
    let border = if searching { theme.warning } else { theme.border };

    let input = Paragraph::new(app.search.value())
        .scroll((0, scroll as u16))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Buscar (nome, CPF ou CNS) - /")
                .border_style(Style::default().fg(border)),
        );
    frame.render_widget(input, area);

    if searching {
        let cursor = app.search.visual_cursor().saturating_sub(scroll);
        frame.set_cursor(area.x + 1 + cursor as u16, area.y + 1);
    }
}

fn render_details(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let label = Style::default().fg(theme.warning);

    let lines = match app.selected_patient() {
        Some(p) => {
            let calc = EligibilityCalculator::today_utc();
            let band = calc.age_band(&p.birth_date).map(|b| b.label()).unwrap_or("-");
            vec![
                Line::from(vec![
                    Span::styled(p.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(format!("  ({})", band)),
                ]),
                Line::from(vec![
                    Span::styled("CNS: ", label),
                    Span::raw(p.cns.clone().unwrap_or_default()),
                    Span::styled("  Mãe: ", label),
                    Span::raw(p.mother_name.clone().unwrap_or_default()),
                ]),
                Line::from(vec![
                    Span::styled("Endereço: ", label),
                    Span::raw(format!(
                        "{}, {} - {}",
                        p.address.street, p.address.number, p.address.neighborhood
                    )),
                ]),
                Line::from(vec![
                    Span::styled("Telefone: ", label),
                    Span::raw(p.phone.clone().unwrap_or_default()),
                    Span::styled("  Cadastro: ", label),
                    Span::raw(p.created_at.as_ref().map(utils::format_timestamp).unwrap_or_default()),
                ]),
            ]
        }
        None => vec![Line::from(Span::styled(
            "Nenhum paciente selecionado",
            Style::default().fg(theme.muted),
        ))],
    };

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Detalhes")
            .border_style(Style::default().fg(theme.border)),
    );
    frame.render_widget(paragraph, area);
}
