use tracing::info;

use crate::{
    api::client::ApiClient,
    error::{AppError, Result},
    models::{Credentials, LoginResponse, User},
    storage::SessionState,
};

impl ApiClient {
    /// POST /auth/login, persisting the returned session.
    pub async fn login(&self, credentials: &Credentials) -> Result<SessionState> {
        let response: LoginResponse = match self.post_public("/auth/login", credentials).await {
            Ok(response) => response,
            Err(AppError::Api { status: 401, message }) => {
                return Err(AppError::InvalidInput(message));
            }
            Err(e) => return Err(e),
        };

        let session = SessionState {
            token: response.token,
            user: response.user,
        };
        self.session().save(&session)?;
        info!("Logged in as {} ({})", session.user.email, session.user.role);
        Ok(session)
    }

    /// GET /auth/me
    pub async fn current_user(&self) -> Result<User> {
        self.get("/auth/me").await
    }

    pub fn logout(&self) -> Result<()> {
        self.session().clear()?;
        info!("Session cleared");
        Ok(())
    }
}
