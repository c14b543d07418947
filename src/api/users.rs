use crate::{
    api::client::ApiClient,
    error::Result,
    models::{MicroArea, User, UserPayload},
};

impl ApiClient {
    /// GET /users
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.get("/users").await
    }

    /// POST /users
    pub async fn create_user(&self, payload: &UserPayload) -> Result<User> {
        self.post("/users", payload).await
    }

    /// PUT /users/:id
    pub async fn update_user(&self, id: &str, payload: &UserPayload) -> Result<User> {
        self.put(&format!("/users/{}", id), payload).await
    }

    /// GET /micro-areas
    pub async fn list_micro_areas(&self) -> Result<Vec<MicroArea>> {
        self.get("/micro-areas").await
    }
}
