use chrono::{DateTime, Utc};
use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers};
use tracing::{info, warn};
use tui_input::{backend::crossterm::EventHandler as InputEventHandler, Input};

use crate::{
    config::ThemeName,
    context::AppContext,
    error::{AppError, Result},
    models::{DashboardSummary, Indicator, Notification, Patient, PatientQuery, User},
    notifications::NotificationPoller,
    routing::{check_access, GateDecision, RoleGate, Route},
    toast::ToastLevel,
    tui::theme::Theme,
};

const MAX_LOGS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Dashboard,
    Patients,
    Indicators,
    Notifications,
    Settings,
}

impl Screen {
    /// Screens reachable with Tab, in order.
    pub const NAV: [Screen; 5] = [
        Screen::Dashboard,
        Screen::Patients,
        Screen::Indicators,
        Screen::Notifications,
        Screen::Settings,
    ];

    pub fn route(&self) -> Route {
        match self {
            Screen::Login => Route::Login,
            Screen::Dashboard => Route::Home,
            Screen::Patients => Route::Patients,
            Screen::Indicators => Route::Indicators,
            Screen::Notifications => Route::Notifications,
            Screen::Settings => Route::Settings,
        }
    }

    pub fn title(&self) -> &'static str {
        self.route().title()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Email,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl From<ToastLevel> for LogLevel {
    fn from(level: ToastLevel) -> Self {
        match level {
            ToastLevel::Info => LogLevel::Info,
            ToastLevel::Success => LogLevel::Success,
            ToastLevel::Warning => LogLevel::Warning,
            ToastLevel::Error => LogLevel::Error,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

pub struct App {
    // UI State
    pub current_screen: Screen,
    pub should_quit: bool,
    pub show_help: bool,
    pub selected_index: usize,
    pub status_message: Option<String>,
    pub is_loading: bool,
    pub input_mode: InputMode,
    pub search: Input,
    pub email: Input,
    pub password: Input,

    // Data
    pub user: Option<User>,
    pub summary: Option<DashboardSummary>,
    pub patients: Vec<Patient>,
    pub patient_total: u64,
    pub patient_page: u32,
    pub patient_pages: u32,
    pub indicators: Vec<Indicator>,
    pub notifications: Vec<Notification>,
    pub unread: Option<u64>,
    pub logs: Vec<LogEntry>,
    pub theme_name: ThemeName,
    pub theme: Theme,

    // Backend
    pub ctx: AppContext,
    gate: RoleGate,
    poller: Option<NotificationPoller>,
}

impl App {
    pub fn new(ctx: AppContext) -> Self {
        let user = ctx.current_user();
        let theme_name = ctx.theme();
        let (current_screen, input_mode) = match user {
            Some(_) => (Screen::Dashboard, InputMode::Normal),
            None => (Screen::Login, InputMode::Email),
        };

        Self {
            current_screen,
            should_quit: false,
            show_help: false,
            selected_index: 0,
            status_message: None,
            is_loading: false,
            input_mode,
            search: Input::default(),
            email: Input::default(),
            password: Input::default(),
            user,
            summary: None,
            patients: Vec::new(),
            patient_total: 0,
            patient_page: 1,
            patient_pages: 1,
            indicators: Vec::new(),
            notifications: Vec::new(),
            unread: None,
            logs: Vec::new(),
            theme_name,
            theme: Theme::from_name(theme_name),
            ctx,
            gate: RoleGate::new(),
            poller: None,
        }
    }

    /// Kick off background work for a session restored from storage.
    pub async fn start(&mut self) {
        if self.user.is_some() {
            self.start_poller();
            self.refresh().await;
        }
    }

    fn start_poller(&mut self) {
        self.poller = Some(NotificationPoller::spawn(
            self.ctx.clone(),
            self.ctx.config.poll_interval(),
        ));
    }

    pub fn can_view(&self, screen: Screen) -> bool {
        check_access(self.user.as_ref().map(|u| u.role), screen.route().allowed_roles())
            == GateDecision::Render
    }

    // Navigation

    /// Show `screen` if the gate allows it. Returns whether it is now shown.
    pub fn navigate(&mut self, screen: Screen) -> bool {
        match self.gate.evaluate(self.user.as_ref(), &screen.route(), &self.ctx.toasts) {
            GateDecision::Render => {
                self.current_screen = screen;
                self.selected_index = 0;
                true
            }
            GateDecision::RedirectLogin => {
                self.show_login();
                false
            }
            GateDecision::RedirectHome => {
                self.current_screen = Screen::Dashboard;
                self.selected_index = 0;
                false
            }
        }
    }

    pub fn next_screen(&mut self) {
        self.cycle_screen(true);
    }

    pub fn previous_screen(&mut self) {
        self.cycle_screen(false);
    }

    /// Denied screens are skipped; the gate still warns about them once.
    fn cycle_screen(&mut self, forward: bool) {
        if self.current_screen == Screen::Login {
            return;
        }
        let len = Screen::NAV.len();
        let start = Screen::NAV
            .iter()
            .position(|s| *s == self.current_screen)
            .unwrap_or(0);

        for step in 1..len {
            let idx = if forward { (start + step) % len } else { (start + len - step) % len };
            let candidate = Screen::NAV[idx];
            match self.gate.evaluate(self.user.as_ref(), &candidate.route(), &self.ctx.toasts) {
                GateDecision::Render => {
                    self.current_screen = candidate;
                    self.selected_index = 0;
                    return;
                }
                GateDecision::RedirectLogin => {
                    self.show_login();
                    return;
                }
                GateDecision::RedirectHome => continue,
            }
        }
    }

    fn list_len(&self) -> usize {
        match self.current_screen {
            Screen::Patients => self.patients.len(),
            Screen::Indicators => self.indicators.len(),
            Screen::Notifications => self.notifications.len(),
            _ => 0,
        }
    }

    pub fn next_item(&mut self) {
        let len = self.list_len();
        if len > 0 {
            self.selected_index = (self.selected_index + 1) % len;
        }
    }

    pub fn previous_item(&mut self) {
        let len = self.list_len();
        if len > 0 {
            if self.selected_index == 0 {
                self.selected_index = len - 1;
            } else {
                self.selected_index -= 1;
            }
        }
    }

    pub fn selected_indicator(&self) -> Option<&Indicator> {
        self.indicators.get(self.selected_index)
    }

    pub fn selected_patient(&self) -> Option<&Patient> {
        self.patients.get(self.selected_index)
    }

    // Data

    pub async fn refresh(&mut self) {
        if self.user.is_none() {
            return;
        }
        self.is_loading = true;
        let result = self.load_current().await;
        self.is_loading = false;

        match result {
            Ok(()) => {
                self.status_message = Some(format!("{} atualizado", self.current_screen.title()));
            }
            Err(e) => self.handle_error(e),
        }
    }

    async fn load_current(&mut self) -> Result<()> {
        match self.current_screen {
            Screen::Login | Screen::Settings => {}
            Screen::Dashboard => {
                self.summary = Some(self.ctx.dashboard().await?);
                if self.can_view(Screen::Indicators) {
                    self.indicators = self.ctx.indicators().await?;
                }
            }
            Screen::Patients => {
                let query = PatientQuery {
                    page: self.patient_page,
                    search: Some(self.search.value().to_string()),
                    ..PatientQuery::default()
                };
                let page = self.ctx.patients(&query).await?;
                self.patient_total = page.total;
                self.patient_pages = page.total_pages();
                self.patients = page.data;
            }
            Screen::Indicators => {
                self.indicators = self.ctx.indicators().await?;
            }
            Screen::Notifications => {
                self.notifications = self.ctx.notifications().await?;
                self.unread = Some(self.ctx.unread_count().await?);
            }
        }

        let len = self.list_len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
        Ok(())
    }

    fn handle_error(&mut self, error: AppError) {
        match error {
            AppError::Unauthorized => {
                self.add_log(LogLevel::Warning, "Sessão expirada");
                self.end_session();
            }
            // The request layer has already queued a toast
            AppError::Forbidden(_) => {}
            other => {
                let message = other.user_message();
                warn!("{}", other);
                self.add_log(LogLevel::Error, &message);
                self.status_message = Some(message);
            }
        }
    }

    // Session

    pub async fn submit_login(&mut self) {
        let email = self.email.value().trim().to_string();
        let password = self.password.value().to_string();
        if email.is_empty() || password.is_empty() {
            self.status_message = Some("Informe email e senha".to_string());
            return;
        }

        self.is_loading = true;
        let result = self.ctx.login(&email, &password).await;
        self.is_loading = false;
        self.password.reset();

        match result {
            Ok(session) => {
                self.add_log(LogLevel::Success, &format!("Bem-vindo, {}", session.user.name));
                self.user = Some(session.user);
                self.gate.reset();
                self.input_mode = InputMode::Normal;
                self.current_screen = Screen::Dashboard;
                self.start_poller();
                self.refresh().await;
            }
            Err(e) => {
                let message = e.user_message();
                self.add_log(LogLevel::Error, &message);
                self.status_message = Some(message);
            }
        }
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.ctx.logout() {
            self.add_log(LogLevel::Error, &format!("Falha ao encerrar sessão: {}", e));
        }
        self.end_session();
        self.add_log(LogLevel::Info, "Sessão encerrada");
    }

    fn end_session(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
        self.user = None;
        self.summary = None;
        self.patients.clear();
        self.indicators.clear();
        self.notifications.clear();
        self.unread = None;
        self.show_login();
    }

    fn show_login(&mut self) {
        self.current_screen = Screen::Login;
        self.input_mode = InputMode::Email;
        self.selected_index = 0;
        self.password.reset();
    }

    // Periodic

    pub fn on_tick(&mut self) {
        // A 401 anywhere clears the stored session
        if self.user.is_some() && self.ctx.current_session().is_none() {
            self.add_log(LogLevel::Warning, "Sessão expirada");
            self.end_session();
        }

        if let Some(count) = self.poller.as_ref().and_then(|p| p.latest()) {
            self.unread = Some(count);
        }

        for toast in self.ctx.toasts.drain() {
            self.add_log(toast.level.into(), &toast.message);
            self.status_message = Some(toast.message);
        }
    }

    // Actions

    pub async fn mark_selected_read(&mut self) {
        let Some(id) = self
            .notifications
            .get(self.selected_index)
            .filter(|n| !n.read)
            .map(|n| n.id.clone())
        else {
            return;
        };
        match self.ctx.mark_notification_read(&id).await {
            Ok(()) => self.refresh().await,
            Err(e) => self.handle_error(e),
        }
    }

    pub async fn mark_all_read(&mut self) {
        match self.ctx.mark_all_notifications_read().await {
            Ok(()) => self.refresh().await,
            Err(e) => self.handle_error(e),
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme_name = match self.theme_name {
            ThemeName::Default => ThemeName::Dark,
            ThemeName::Dark => ThemeName::Default,
        };
        self.theme = Theme::from_name(self.theme_name);
        match self.ctx.set_theme(self.theme_name) {
            Ok(()) => info!("Theme set to {:?}", self.theme_name),
            Err(e) => self.add_log(LogLevel::Error, &format!("Falha ao salvar tema: {}", e)),
        }
    }

    // Input

    pub async fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.input_mode {
            InputMode::Email | InputMode::Password => self.handle_login_key(key).await,
            InputMode::Search => self.handle_search_key(key).await,
            InputMode::Normal => self.handle_normal_key(key).await,
        }
    }

    async fn handle_login_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.input_mode = match self.input_mode {
                    InputMode::Email => InputMode::Password,
                    _ => InputMode::Email,
                };
            }
            KeyCode::Enter if self.input_mode == InputMode::Email => {
                self.input_mode = InputMode::Password;
            }
            KeyCode::Enter => self.submit_login().await,
            _ => {
                let input = match self.input_mode {
                    InputMode::Email => &mut self.email,
                    _ => &mut self.password,
                };
                input.handle_event(&CrosstermEvent::Key(key));
            }
        }
    }

    async fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                self.patient_page = 1;
                self.selected_index = 0;
                self.refresh().await;
            }
            _ => {
                self.search.handle_event(&CrosstermEvent::Key(key));
            }
        }
    }

    async fn handle_normal_key(&mut self, key: KeyEvent) {
        if self.show_help {
            self.show_help = false;
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('?') | KeyCode::Char('h') => self.show_help = true,
            KeyCode::Tab => {
                self.next_screen();
                self.refresh().await;
            }
            KeyCode::BackTab => {
                self.previous_screen();
                self.refresh().await;
            }
            KeyCode::Char(c @ '1'..='5') => {
                let idx = (c as usize) - ('1' as usize);
                self.navigate(Screen::NAV[idx]);
                self.refresh().await;
            }
            KeyCode::Down | KeyCode::Char('j') => self.next_item(),
            KeyCode::Up | KeyCode::Char('k') => self.previous_item(),
            KeyCode::Char('r') => {
                self.ctx.cache.clear();
                self.refresh().await;
            }
            KeyCode::Char('L') => self.logout(),
            KeyCode::Char('/') if self.current_screen == Screen::Patients => {
                self.input_mode = InputMode::Search;
            }
            KeyCode::Right | KeyCode::Char('n') if self.current_screen == Screen::Patients => {
                if self.patient_page < self.patient_pages {
                    self.patient_page += 1;
                    self.refresh().await;
                }
            }
            KeyCode::Left | KeyCode::Char('p') if self.current_screen == Screen::Patients => {
                if self.patient_page > 1 {
                    self.patient_page -= 1;
                    self.refresh().await;
                }
            }
            KeyCode::Enter if self.current_screen == Screen::Notifications => {
                self.mark_selected_read().await;
            }
            KeyCode::Char('a') if self.current_screen == Screen::Notifications => {
                self.mark_all_read().await;
            }
            KeyCode::Char('t') if self.current_screen == Screen::Settings => self.toggle_theme(),
            _ => {}
        }
    }

    pub fn add_log(&mut self, level: LogLevel, message: &str) {
        self.logs.push(LogEntry {
            timestamp: Utc::now(),
            level,
            message: message.to_string(),
        });
        if self.logs.len() > MAX_LOGS {
            self.logs.remove(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        models::Role,
        storage::{MemoryStore, SessionState},
    };
    use std::sync::Arc;

    fn context(role: Option<Role>) -> AppContext {
        let ctx = AppContext::new(Config::default(), Arc::new(MemoryStore::new())).unwrap();
        if let Some(role) = role {
            ctx.session
                .save(&SessionState {
                    token: "tok".to_string(),
                    user: User {
                        id: "u1".to_string(),
                        name: "Joana".to_string(),
                        email: "joana@ubs.gov.br".to_string(),
                        role,
                        micro_area_id: None,
                    },
                })
                .unwrap();
        }
        ctx
    }

    #[test]
    fn test_starts_at_login_without_session() {
        let app = App::new(context(None));
        assert_eq!(app.current_screen, Screen::Login);
        assert_eq!(app.input_mode, InputMode::Email);
    }

    #[test]
    fn test_restored_session_opens_dashboard() {
        let app = App::new(context(Some(Role::Nurse)));
        assert_eq!(app.current_screen, Screen::Dashboard);
        assert_eq!(app.user.as_ref().map(|u| u.role), Some(Role::Nurse));
    }

    #[test]
    fn test_tab_skips_denied_screen_and_warns_once() {
        let mut app = App::new(context(Some(Role::Acs)));

        app.next_screen();
        assert_eq!(app.current_screen, Screen::Patients);
        app.next_screen();
        assert_eq!(app.current_screen, Screen::Notifications);

        // Full cycle back past the denied screen
        for _ in 0..4 {
            app.next_screen();
        }
        assert_eq!(app.current_screen, Screen::Notifications);

        let toasts = app.ctx.toasts.drain();
        assert_eq!(toasts.len(), 1);
        assert!(toasts[0].message.contains("/indicators"));
    }

    #[test]
    fn test_direct_navigation_to_denied_screen_falls_back_home() {
        let mut app = App::new(context(Some(Role::Acs)));
        app.current_screen = Screen::Settings;

        assert!(!app.navigate(Screen::Indicators));
        assert_eq!(app.current_screen, Screen::Dashboard);

        let mut manager = App::new(context(Some(Role::Manager)));
        assert!(manager.navigate(Screen::Indicators));
        assert_eq!(manager.current_screen, Screen::Indicators);
    }

    #[test]
    fn test_tick_moves_toasts_into_logs() {
        let mut app = App::new(context(Some(Role::Doctor)));
        app.ctx.toasts.success("Paciente cadastrado");

        app.on_tick();

        assert_eq!(app.status_message.as_deref(), Some("Paciente cadastrado"));
        assert_eq!(app.logs.last().map(|l| l.level), Some(LogLevel::Success));
        assert!(app.ctx.toasts.is_empty());
    }

    #[test]
    fn test_tick_notices_cleared_session() {
        let mut app = App::new(context(Some(Role::Doctor)));
        app.ctx.session.clear().unwrap();

        app.on_tick();

        assert_eq!(app.current_screen, Screen::Login);
        assert!(app.user.is_none());
    }

    #[test]
    fn test_logs_are_capped() {
        let mut app = App::new(context(None));
        for i in 0..(MAX_LOGS + 10) {
            app.add_log(LogLevel::Info, &format!("linha {}", i));
        }
        assert_eq!(app.logs.len(), MAX_LOGS);
        assert_eq!(app.logs[0].message, "linha 10");
    }
}
