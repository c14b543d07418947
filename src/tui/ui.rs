use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io::{self, Stdout};
use tracing::info;

use crate::{
    context::AppContext,
    error::Result,
    tui::{
        app::{App, InputMode, Screen},
        components,
        event::{Event, EventHandler},
        screens,
    },
};

pub async fn run_tui(ctx: AppContext) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut app = App::new(ctx);
    let result = run_app(&mut terminal, &mut app).await;

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("TUI closed");
    result
}

async fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new(app.ctx.config.tick_rate());
    app.start().await;

    while !app.should_quit {
        terminal.draw(|frame| render_ui(frame, app))?;

        match events.next().await {
            Some(Event::Tick) => app.on_tick(),
            Some(Event::Key(key)) => app.handle_key(key).await,
            Some(Event::Mouse(_)) | Some(Event::Resize(_, _)) => {}
            None => break,
        }
    }
    Ok(())
}

pub fn render_ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Status bar
        ])
        .split(frame.size());

    components::header::render(frame, chunks[0], app);

    match app.current_screen {
        Screen::Login => screens::login::render(frame, chunks[1], app),
        Screen::Dashboard => screens::dashboard::render(frame, chunks[1], app),
        Screen::Patients => screens::patients::render(frame, chunks[1], app),
        Screen::Indicators => screens::indicators::render(frame, chunks[1], app),
        Screen::Notifications => screens::notifications::render(frame, chunks[1], app),
        Screen::Settings => screens::settings::render(frame, chunks[1], app),
    }

    if app.show_help {
        components::help::render(frame, popup(chunks[1], 60, 16), app);
    }

    render_status_bar(frame, chunks[2], app);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let status_text = app.status_message.clone().unwrap_or_else(|| "Pronto".to_string());

    let mut text = vec![
        Span::styled(
            format!(" {} ", app.current_screen.title()),
            Style::default()
                .fg(ratatui::style::Color::Black)
                .bg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(status_text, Style::default().fg(theme.muted)),
    ];

    if app.input_mode == InputMode::Normal {
        text.extend([
            Span::raw(" | "),
            Span::styled("Tab: próxima tela", Style::default().fg(theme.warning)),
            Span::raw(" | "),
            Span::styled("?: ajuda", Style::default().fg(theme.info)),
            Span::raw(" | "),
            Span::styled("q: sair", Style::default().fg(theme.error)),
        ]);
    }

    let paragraph = Paragraph::new(Line::from(text)).block(Block::default().borders(Borders::ALL));

    frame.render_widget(paragraph, area);
}

fn popup(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
