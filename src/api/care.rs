use futures::future::{try_join_all, BoxFuture, FutureExt};
use serde_json::{json, Value};
use tracing::debug;

use crate::{
    api::client::ApiClient,
    error::Result,
    models::{
        AnthropometryAction, Appointment, AppointmentStatus, BloodPressureAction,
        ChronicConsultation, ChronicProgram, Exam, HomeVisit, NewAppointment, NewExam,
        NewHomeVisit, NewVaccineRecord, Paginated, VaccineRecord,
    },
};

impl ApiClient {
    /// GET /appointments
    pub async fn list_appointments(
        &self,
        patient_id: Option<&str>,
        page: u32,
    ) -> Result<Paginated<Appointment>> {
        let mut query = vec![("page", page.to_string())];
        if let Some(id) = patient_id {
            query.push(("patientId", id.to_string()));
        }
        self.get_with_query("/appointments", &query).await
    }

    /// POST /appointments
    pub async fn create_appointment(&self, appointment: &NewAppointment) -> Result<Appointment> {
        self.post("/appointments", appointment).await
    }

    /// PATCH /appointments/:id/status
    pub async fn update_appointment_status(&self, id: &str, status: AppointmentStatus) -> Result<()> {
        self.patch(&format!("/appointments/{}/status", id), &json!({ "status": status }))
            .await
    }

    /// GET /home-visits
    pub async fn list_home_visits(&self, patient_id: Option<&str>) -> Result<Paginated<HomeVisit>> {
        let query: Vec<(&str, String)> = patient_id
            .map(|id| vec![("patientId", id.to_string())])
            .unwrap_or_default();
        self.get_with_query("/home-visits", &query).await
    }

    /// POST /home-visits
    pub async fn create_home_visit(&self, visit: &NewHomeVisit) -> Result<HomeVisit> {
        self.post("/home-visits", visit).await
    }

    /// POST /shared-actions/anthropometry and /shared-actions/blood-pressure for
    /// whatever vitals were measured during `visit`. Returns how many were posted.
    pub async fn post_visit_vitals(&self, visit: &NewHomeVisit) -> Result<usize> {
        let mut actions: Vec<BoxFuture<'_, Result<Value>>> = Vec::new();

        if visit.vitals.has_anthropometry() {
            let body = AnthropometryAction {
                patient_id: visit.patient_id.clone(),
                date: visit.visit_date,
                weight: visit.vitals.weight,
                height: visit.vitals.height,
            };
            actions.push(
                async move { self.post::<_, Value>("/shared-actions/anthropometry", &body).await }.boxed(),
            );
        }

        if let (Some(systolic), Some(diastolic)) = (visit.vitals.systolic, visit.vitals.diastolic) {
            let body = BloodPressureAction {
                patient_id: visit.patient_id.clone(),
                date: visit.visit_date,
                systolic,
                diastolic,
            };
            actions.push(
                async move { self.post::<_, Value>("/shared-actions/blood-pressure", &body).await }.boxed(),
            );
        }

        let posted = actions.len();
        if posted > 0 {
            debug!("Posting {} shared action(s) for patient {}", posted, visit.patient_id);
            try_join_all(actions).await?;
        }
        Ok(posted)
    }

    /// POST /hypertension or /diabetes
    pub async fn record_chronic_consultation(
        &self,
        program: ChronicProgram,
        consultation: &ChronicConsultation,
    ) -> Result<Value> {
        self.post(program.path(), consultation).await
    }

    /// GET /patients/:id/vaccines
    pub async fn patient_vaccines(&self, patient_id: &str) -> Result<Vec<VaccineRecord>> {
        self.get(&format!("/patients/{}/vaccines", patient_id)).await
    }

    /// POST /vaccines
    pub async fn record_vaccine(&self, record: &NewVaccineRecord) -> Result<VaccineRecord> {
        self.post("/vaccines", record).await
    }

    /// GET /patients/:id/exams
    pub async fn patient_exams(&self, patient_id: &str) -> Result<Vec<Exam>> {
        self.get(&format!("/patients/{}/exams", patient_id)).await
    }

    /// POST /exams
    pub async fn record_exam(&self, exam: &NewExam) -> Result<Exam> {
        self.post("/exams", exam).await
    }
}
