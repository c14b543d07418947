use serde_json::json;

use crate::{
    api::client::ApiClient,
    error::Result,
    models::{Notification, UnreadCount},
};

impl ApiClient {
    /// GET /notifications
    pub async fn list_notifications(&self) -> Result<Vec<Notification>> {
        self.get("/notifications").await
    }

    /// GET /notifications/unread-count
    pub async fn unread_count(&self) -> Result<u64> {
        let count: UnreadCount = self.get("/notifications/unread-count").await?;
        Ok(count.count)
    }

    /// PATCH /notifications/:id/read
    pub async fn mark_notification_read(&self, id: &str) -> Result<()> {
        self.patch(&format!("/notifications/{}/read", id), &json!({})).await
    }

    /// PATCH /notifications/read-all
    pub async fn mark_all_notifications_read(&self) -> Result<()> {
        self.patch("/notifications/read-all", &json!({})).await
    }
}
