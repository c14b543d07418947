//! Application context handed to the front-ends at startup.
//!
//! Owns the API client, session, query cache and mutation coordinator. Reads go
//! through the cache; writes go through the coordinator so the invalidation
//! table is always applied.

use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    api::ApiClient,
    cache::{Bucket, Mutation, MutationCoordinator, QueryCache, QueryKey},
    config::{Config, ThemeName},
    error::{AppError, Result},
    forms::{ChronicForm, HomeVisitForm},
    models::{
        Appointment, AppointmentStatus, ChronicProgram, Credentials, DashboardSummary, Exam,
        HomeVisit, Indicator, MicroArea, NewAppointment, NewExam, NewVaccineRecord, Notification,
        Paginated, Patient, PatientPayload, PatientQuery, TimelineEntry, User, UserPayload,
        VaccineRecord,
    },
    storage::{Database, KeyValueStore, SessionState, SessionStore},
    toast::Toasts,
};

#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub session: SessionStore,
    pub api: ApiClient,
    pub cache: QueryCache,
    pub mutations: MutationCoordinator,
    pub toasts: Arc<Toasts>,
}

impl AppContext {
    pub fn new(config: Config, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let session = SessionStore::new(store);
        let toasts = Arc::new(Toasts::new());
        let api = ApiClient::new(&config, session.clone(), toasts.clone())?;
        let cache = QueryCache::new();
        let mutations = MutationCoordinator::new(cache.clone(), toasts.clone());

        Ok(Self { config, session, api, cache, mutations, toasts })
    }

    /// Context backed by the configured SQLite file.
    pub fn open(config: Config) -> Result<Self> {
        let db = Database::new(&config.storage.path)?;
        Self::new(config, Arc::new(db))
    }

    pub fn current_session(&self) -> Option<SessionState> {
        self.session.load()
    }

    pub fn current_user(&self) -> Option<User> {
        self.current_session().map(|s| s.user)
    }

    pub fn theme(&self) -> ThemeName {
        self.session.theme().unwrap_or(self.config.ui.theme)
    }

    pub fn set_theme(&self, theme: ThemeName) -> Result<()> {
        self.session.save_theme(theme)
    }

    // Session

    pub async fn login(&self, email: &str, password: &str) -> Result<SessionState> {
        let credentials = Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let session = self.api.login(&credentials).await?;
        self.cache.clear();
        Ok(session)
    }

    pub fn logout(&self) -> Result<()> {
        self.cache.clear();
        self.api.logout()
    }

    // Reads

    pub async fn refresh_current_user(&self) -> Result<User> {
        self.cache
            .fetch(QueryKey::new(Bucket::CurrentUser), || self.api.current_user())
            .await
    }

    pub async fn dashboard(&self) -> Result<DashboardSummary> {
        self.cache
            .fetch(QueryKey::new(Bucket::Dashboard), || self.api.dashboard_summary())
            .await
    }

    pub async fn patients(&self, query: &PatientQuery) -> Result<Paginated<Patient>> {
        let params = query
            .to_params()
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        self.cache
            .fetch(QueryKey::with_params(Bucket::PatientList, params), || {
                self.api.list_patients(query)
            })
            .await
    }

    pub async fn patient(&self, id: &str) -> Result<Patient> {
        self.cache
            .fetch(QueryKey::new(Bucket::Patient(id.to_string())), || self.api.get_patient(id))
            .await
    }

    pub async fn timeline(&self, id: &str) -> Result<Vec<TimelineEntry>> {
        self.cache
            .fetch(QueryKey::new(Bucket::PatientTimeline(id.to_string())), || {
                self.api.patient_timeline(id)
            })
            .await
    }

    pub async fn vaccines(&self, patient_id: &str) -> Result<Vec<VaccineRecord>> {
        self.cache
            .fetch(QueryKey::new(Bucket::PatientVaccines(patient_id.to_string())), || {
                self.api.patient_vaccines(patient_id)
            })
            .await
    }

    pub async fn exams(&self, patient_id: &str) -> Result<Vec<Exam>> {
        self.cache
            .fetch(QueryKey::new(Bucket::PatientExams(patient_id.to_string())), || {
                self.api.patient_exams(patient_id)
            })
            .await
    }

    pub async fn appointments(&self, patient_id: Option<&str>, page: u32) -> Result<Paginated<Appointment>> {
        let params = format!("patient={}&page={}", patient_id.unwrap_or("*"), page);
        self.cache
            .fetch(QueryKey::with_params(Bucket::Appointments, params), || {
                self.api.list_appointments(patient_id, page)
            })
            .await
    }

    pub async fn home_visits(&self, patient_id: Option<&str>) -> Result<Paginated<HomeVisit>> {
        let params = format!("patient={}", patient_id.unwrap_or("*"));
        self.cache
            .fetch(QueryKey::with_params(Bucket::HomeVisits, params), || {
                self.api.list_home_visits(patient_id)
            })
            .await
    }

    pub async fn indicators(&self) -> Result<Vec<Indicator>> {
        self.cache
            .fetch(QueryKey::new(Bucket::Indicators), || self.api.list_indicators())
            .await
    }

    pub async fn notifications(&self) -> Result<Vec<Notification>> {
        self.cache
            .fetch(QueryKey::new(Bucket::Notifications), || self.api.list_notifications())
            .await
    }

    pub async fn unread_count(&self) -> Result<u64> {
        self.cache
            .fetch(QueryKey::new(Bucket::UnreadCount), || self.api.unread_count())
            .await
    }

    pub async fn users(&self) -> Result<Vec<User>> {
        self.cache
            .fetch(QueryKey::new(Bucket::UserList), || self.api.list_users())
            .await
    }

    pub async fn micro_areas(&self) -> Result<Vec<MicroArea>> {
        self.cache
            .fetch(QueryKey::new(Bucket::MicroAreas), || self.api.list_micro_areas())
            .await
    }

    // Writes

    pub async fn register_patient(&self, payload: &PatientPayload) -> Result<Patient> {
        let patient = self
            .mutations
            .run_with_feedback(
                Mutation::CreatePatient,
                "Paciente cadastrado",
                self.api.create_patient(payload),
            )
            .await?;
        info!("Registered patient {}", patient.id);
        Ok(patient)
    }

    pub async fn update_patient(&self, id: &str, payload: &PatientPayload) -> Result<Patient> {
        self.mutations
            .run_with_feedback(
                Mutation::UpdatePatient(id.to_string()),
                "Paciente atualizado",
                self.api.update_patient(id, payload),
            )
            .await
    }

    pub async fn inactivate_patient(&self, id: &str) -> Result<()> {
        self.mutations
            .run_with_feedback(
                Mutation::InactivatePatient(id.to_string()),
                "Paciente inativado",
                self.api.inactivate_patient(id),
            )
            .await
    }

    pub async fn create_appointment(&self, appointment: &NewAppointment) -> Result<Appointment> {
        self.mutations
            .run_with_feedback(
                Mutation::CreateAppointment(appointment.patient_id.clone()),
                "Agendamento criado",
                self.api.create_appointment(appointment),
            )
            .await
    }

    pub async fn set_appointment_status(
        &self,
        appointment_id: &str,
        patient_id: &str,
        status: AppointmentStatus,
    ) -> Result<()> {
        self.mutations
            .run_with_feedback(
                Mutation::UpdateAppointmentStatus(patient_id.to_string()),
                "Status do agendamento atualizado",
                self.api.update_appointment_status(appointment_id, status),
            )
            .await
    }

    /// Records the visit, then its vitals.
    ///
    /// The visit is committed and the cache invalidated as soon as the backend
    /// accepts it. A failure posting the vitals afterwards only raises a warning.
    pub async fn create_home_visit(&self, form: &HomeVisitForm) -> Result<HomeVisit> {
        let visit = form.to_payload()?;
        let created = self
            .mutations
            .run_with_feedback(
                Mutation::CreateHomeVisit(visit.patient_id.clone()),
                "Visita registrada",
                self.api.create_home_visit(&visit),
            )
            .await?;

        match self.api.post_visit_vitals(&visit).await {
            Ok(_) => {}
            Err(AppError::Unauthorized) => return Err(AppError::Unauthorized),
            // Already announced by the request layer
            Err(AppError::Forbidden(_)) => {}
            Err(e) => {
                warn!("Vitals for visit {} were not saved: {}", created.id, e);
                self.toasts.warning(format!(
                    "Visita registrada, mas os sinais vitais não foram salvos: {}",
                    e.user_message()
                ));
            }
        }
        Ok(created)
    }

    pub async fn record_chronic_consultation(
        &self,
        program: ChronicProgram,
        form: &ChronicForm,
    ) -> Result<()> {
        let consultation = form.to_payload(program)?;
        self.mutations
            .run_with_feedback(
                Mutation::ChronicConsultation(consultation.patient_id.clone()),
                "Consulta registrada",
                self.api.record_chronic_consultation(program, &consultation),
            )
            .await
            .map(|_| ())
    }

    pub async fn record_vaccine(&self, record: &NewVaccineRecord) -> Result<VaccineRecord> {
        self.mutations
            .run_with_feedback(
                Mutation::RecordVaccine(record.patient_id.clone()),
                "Vacina registrada",
                self.api.record_vaccine(record),
            )
            .await
    }

    pub async fn record_exam(&self, exam: &NewExam) -> Result<Exam> {
        self.mutations
            .run_with_feedback(
                Mutation::RecordExam(exam.patient_id.clone()),
                "Exame registrado",
                self.api.record_exam(exam),
            )
            .await
    }

    pub async fn create_user(&self, payload: &UserPayload) -> Result<User> {
        self.mutations
            .run_with_feedback(Mutation::CreateUser, "Usuário criado", self.api.create_user(payload))
            .await
    }

    pub async fn update_user(&self, id: &str, payload: &UserPayload) -> Result<User> {
        self.mutations
            .run_with_feedback(
                Mutation::UpdateUser,
                "Usuário atualizado",
                self.api.update_user(id, payload),
            )
            .await
    }

    pub async fn mark_notification_read(&self, id: &str) -> Result<()> {
        self.mutations
            .run(Mutation::MarkNotificationRead, self.api.mark_notification_read(id))
            .await
    }

    pub async fn mark_all_notifications_read(&self) -> Result<()> {
        self.mutations
            .run_with_feedback(
                Mutation::MarkAllNotificationsRead,
                "Todas as notificações marcadas como lidas",
                self.api.mark_all_notifications_read(),
            )
            .await
    }
}
