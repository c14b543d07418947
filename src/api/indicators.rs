use crate::{
    api::client::ApiClient,
    error::Result,
    models::{DashboardSummary, Indicator, Program},
};

impl ApiClient {
    /// GET /indicators
    pub async fn list_indicators(&self) -> Result<Vec<Indicator>> {
        self.get("/indicators").await
    }

    /// GET /indicators/:program
    pub async fn program_indicator(&self, program: Program) -> Result<Indicator> {
        self.get(&format!("/indicators/{}", program.slug())).await
    }

    /// GET /dashboard/summary
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        self.get("/dashboard/summary").await
    }
}
