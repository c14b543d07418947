use crate::models::Role;

const MANAGEMENT: &[Role] = &[Role::Admin, Role::Manager];

const CLINICAL_STAFF: &[Role] = &[
    Role::Admin,
    Role::Manager,
    Role::Doctor,
    Role::Nurse,
    Role::Dentist,
    Role::Technician,
];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Home,
    Patients,
    PatientDetail(String),
    Appointments,
    HomeVisits,
    Indicators,
    Notifications,
    Users,
    MicroAreas,
    Settings,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Home => "/".to_string(),
            Route::Patients => "/patients".to_string(),
            Route::PatientDetail(id) => format!("/patients/{}", id),
            Route::Appointments => "/appointments".to_string(),
            Route::HomeVisits => "/home-visits".to_string(),
            Route::Indicators => "/indicators".to_string(),
            Route::Notifications => "/notifications".to_string(),
            Route::Users => "/users".to_string(),
            Route::MicroAreas => "/micro-areas".to_string(),
            Route::Settings => "/settings".to_string(),
        }
    }

    pub fn parse(path: &str) -> Option<Route> {
        let trimmed = path.trim().trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Some(Route::Home),
            ["login"] => Some(Route::Login),
            ["patients"] => Some(Route::Patients),
            ["patients", id] => Some(Route::PatientDetail(id.to_string())),
            ["appointments"] => Some(Route::Appointments),
            ["home-visits"] => Some(Route::HomeVisits),
            ["indicators"] => Some(Route::Indicators),
            ["notifications"] => Some(Route::Notifications),
            ["users"] => Some(Route::Users),
            ["micro-areas"] => Some(Route::MicroAreas),
            ["settings"] => Some(Route::Settings),
            _ => None,
        }
    }

    /// Reachable without a session.
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login)
    }

    /// `None` means any authenticated user.
    pub fn allowed_roles(&self) -> Option<&'static [Role]> {
        match self {
            Route::Users | Route::MicroAreas => Some(MANAGEMENT),
            Route::Indicators => Some(CLINICAL_STAFF),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Home => "Painel",
            Route::Patients => "Pacientes",
            Route::PatientDetail(_) => "Paciente",
            Route::Appointments => "Agendamentos",
            Route::HomeVisits => "Visitas domiciliares",
            Route::Indicators => "Indicadores",
            Route::Notifications => "Notificações",
            Route::Users => "Usuários",
            Route::MicroAreas => "Microáreas",
            Route::Settings => "Configurações",
        }
    }
}
