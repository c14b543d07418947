//! Session and preference persistence.
//!
//! All reads and writes of the persisted auth blob go through [`SessionStore`];
//! nothing else touches the underlying keys.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    config::ThemeName,
    error::Result,
    models::User,
    storage::db::KeyValueStore,
};

pub const AUTH_STORAGE_KEY: &str = "auth-storage";
pub const THEME_STORAGE_KEY: &str = "theme-storage";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionState {
    pub token: String,
    pub user: User,
}

/// On-disk shape: `{"state": {...}}`.
#[derive(Serialize, Deserialize)]
struct Persisted<T> {
    state: T,
}

#[derive(Serialize, Deserialize)]
struct ThemeState {
    theme: ThemeName,
}

#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current session, if one is persisted and well-formed.
    ///
    /// A blob that does not decode is treated as logged out.
    pub fn load(&self) -> Option<SessionState> {
        let raw = match self.store.get(AUTH_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read session: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<Persisted<SessionState>>(&raw) {
            Ok(persisted) if !persisted.state.token.is_empty() => Some(persisted.state),
            Ok(_) => None,
            Err(e) => {
                debug!("Ignoring malformed session blob: {}", e);
                None
            }
        }
    }

    pub fn token(&self) -> Option<String> {
        self.load().map(|s| s.token)
    }

    pub fn save(&self, session: &SessionState) -> Result<()> {
        let raw = serde_json::to_string(&Persisted { state: session })?;
        self.store.set(AUTH_STORAGE_KEY, &raw)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(AUTH_STORAGE_KEY)
    }

    pub fn theme(&self) -> Option<ThemeName> {
        let raw = self.store.get(THEME_STORAGE_KEY).ok().flatten()?;
        serde_json::from_str::<Persisted<ThemeState>>(&raw)
            .ok()
            .map(|p| p.state.theme)
    }

    pub fn save_theme(&self, theme: ThemeName) -> Result<()> {
        let raw = serde_json::to_string(&Persisted { state: ThemeState { theme } })?;
        self.store.set(THEME_STORAGE_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::Role, storage::db::{MemoryStore, MockKeyValueStore}};

    fn session() -> SessionState {
        SessionState {
            token: "jwt-token".to_string(),
            user: User {
                id: "u1".to_string(),
                name: "Ana".to_string(),
                email: "ana@ubs.gov.br".to_string(),
                role: Role::Nurse,
                micro_area_id: None,
            },
        }
    }

    #[test]
    fn test_save_uses_state_envelope() {
        let store = Arc::new(MemoryStore::new());
        let sessions = SessionStore::new(store.clone());
        sessions.save(&session()).unwrap();

        let raw = store.get(AUTH_STORAGE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["state"]["token"], "jwt-token");
        assert_eq!(value["state"]["user"]["role"], "NURSE");

        assert_eq!(sessions.load(), Some(session()));
        sessions.clear().unwrap();
        assert_eq!(sessions.load(), None);
    }

    #[test]
    fn test_malformed_blob_reads_as_logged_out() {
        let store = Arc::new(MemoryStore::new());
        store.set(AUTH_STORAGE_KEY, "{\"token\":\"flat-shape\"}").unwrap();
        assert_eq!(SessionStore::new(store.clone()).load(), None);

        store.set(AUTH_STORAGE_KEY, "not json").unwrap();
        assert_eq!(SessionStore::new(store).token(), None);
    }

    #[test]
    fn test_storage_failure_reads_as_logged_out() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_get()
            .returning(|_| Err(crate::error::AppError::Config("disk gone".to_string())));
        assert_eq!(SessionStore::new(Arc::new(mock)).load(), None);
    }

    #[test]
    fn test_theme_roundtrip() {
        let sessions = SessionStore::new(Arc::new(MemoryStore::new()));
        assert_eq!(sessions.theme(), None);
        sessions.save_theme(ThemeName::Dark).unwrap();
        assert_eq!(sessions.theme(), Some(ThemeName::Dark));
    }
}
