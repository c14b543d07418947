use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    api::envelope::ErrorEnvelope,
    config::Config,
    error::{AppError, Result},
    storage::SessionStore,
    toast::{ToastLevel, Toasts},
};

pub const FORBIDDEN_TOAST_KEY: &str = "forbidden";
const FORBIDDEN_MESSAGE: &str = "Você não tem permissão para realizar esta ação.";

/// Typed client for the health unit backend.
///
/// Every request reads the persisted session and sends its token as a bearer
/// header. A 401 clears the session; a 403 raises a de-duplicated warning toast.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
    toasts: Arc<Toasts>,
}

impl ApiClient {
    pub fn new(config: &Config, session: SessionStore, toasts: Arc<Toasts>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            session,
            toasts,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(self.request(Method::GET, path)).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.execute(self.request(Method::GET, path).query(query)).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.execute(self.request(Method::POST, path).json(body)).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.execute(self.request(Method::PUT, path).json(body)).await
    }

    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        self.execute_empty(self.request(Method::PATCH, path).json(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.execute_empty(self.request(Method::DELETE, path)).await
    }

    /// POST without the 401 session interception, for the login call itself.
    pub(crate) async fn post_public<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        let response = self.check(response, false).await?;
        Ok(response.json().await?)
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.check(builder.send().await?, true).await?;
        Ok(response.json().await?)
    }

    async fn execute_empty(&self, builder: RequestBuilder) -> Result<()> {
        self.check(builder.send().await?, true).await?;
        Ok(())
    }

    async fn check(&self, response: Response, intercept_auth: bool) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().path().to_string();
        let body = response.text().await.unwrap_or_default();
        let envelope = ErrorEnvelope::parse(&body);
        debug!("{} {} failed: {:?}", status, url, envelope);

        match status {
            StatusCode::UNAUTHORIZED if intercept_auth => {
                warn!("Received 401 from {}, clearing session", url);
                if let Err(e) = self.session.clear() {
                    warn!("Failed to clear session: {}", e);
                }
                Err(AppError::Unauthorized)
            }
            StatusCode::FORBIDDEN => {
                let message = envelope.message.clone().unwrap_or_else(|| FORBIDDEN_MESSAGE.to_string());
                self.toasts.push_keyed(FORBIDDEN_TOAST_KEY, ToastLevel::Warning, message.clone());
                Err(AppError::Forbidden(message))
            }
            StatusCode::NOT_FOUND => Err(AppError::NotFound(envelope.user_message())),
            _ if envelope.is_validation() => Err(AppError::Validation(envelope.user_message())),
            _ => Err(AppError::Api {
                status: status.as_u16(),
                message: envelope.user_message(),
            }),
        }
    }
}
