use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders},
    Frame,
};
use crate::{
    models::{Indicator, IndicatorStatus},
    tui::app::App,
};

/// Share of criteria met per program, as a bar chart out of 100.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let bars: Vec<Bar> = app
        .indicators
        .iter()
        .map(|indicator| {
            let pct = percent_met(indicator);
            Bar::default()
                .value(pct)
                .text_value(format!("{}%", pct))
                .label(Line::from(short_label(indicator)))
                .style(Style::default().fg(theme.status(overall(pct))))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(Span::styled(
                    "Indicadores Brasil 360 (% critérios atingidos)",
                    Style::default().fg(theme.primary),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(9)
        .bar_gap(2)
        .max(100);

    frame.render_widget(chart, area);
}

pub fn percent_met(indicator: &Indicator) -> u64 {
    let total = indicator.criteria.len() as u64;
    if total == 0 {
        return 0;
    }
    indicator.tally().green as u64 * 100 / total
}

fn overall(pct: u64) -> IndicatorStatus {
    match pct {
        75..=100 => IndicatorStatus::Green,
        40..=74 => IndicatorStatus::Yellow,
        _ => IndicatorStatus::Red,
    }
}

fn short_label(indicator: &Indicator) -> String {
    indicator.program.label().chars().take(9).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Criterion, Program};

    fn criterion(status: IndicatorStatus) -> Criterion {
        Criterion {
            code: "C".to_string(),
            description: String::new(),
            status,
        }
    }

    #[test]
    fn test_percent_met() {
        let indicator = Indicator {
            program: Program::Prenatal,
            patient_count: 12,
            criteria: vec![
                criterion(IndicatorStatus::Green),
                criterion(IndicatorStatus::Green),
                criterion(IndicatorStatus::Yellow),
                criterion(IndicatorStatus::Red),
            ],
        };
        assert_eq!(percent_met(&indicator), 50);
        assert_eq!(overall(50), IndicatorStatus::Yellow);

        let empty = Indicator { program: Program::Elderly, patient_count: 0, criteria: vec![] };
        assert_eq!(percent_met(&empty), 0);
    }
}
