use crate::{
    api::client::ApiClient,
    error::Result,
    models::{Paginated, Patient, PatientPayload, PatientQuery, TimelineEntry},
};

impl ApiClient {
    /// GET /patients
    pub async fn list_patients(&self, query: &PatientQuery) -> Result<Paginated<Patient>> {
        self.get_with_query("/patients", &query.to_params()).await
    }

    /// GET /patients/:id
    pub async fn get_patient(&self, id: &str) -> Result<Patient> {
        self.get(&format!("/patients/{}", id)).await
    }

    /// POST /patients
    pub async fn create_patient(&self, payload: &PatientPayload) -> Result<Patient> {
        self.post("/patients", payload).await
    }

    /// PUT /patients/:id
    pub async fn update_patient(&self, id: &str, payload: &PatientPayload) -> Result<Patient> {
        self.put(&format!("/patients/{}", id), payload).await
    }

    /// DELETE /patients/:id, a soft delete on the backend.
    pub async fn inactivate_patient(&self, id: &str) -> Result<()> {
        self.delete(&format!("/patients/{}", id)).await
    }

    /// GET /patients/:id/timeline
    pub async fn patient_timeline(&self, id: &str) -> Result<Vec<TimelineEntry>> {
        self.get(&format!("/patients/{}/timeline", id)).await
    }
}
