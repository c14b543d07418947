use thiserror::Error;

/// Fallback text shown when a failure carries no usable message.
pub const DEFAULT_ERROR_MESSAGE: &str = "Erro inesperado. Tente novamente.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Session expired, please log in again")]
    Unauthorized,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Validation failed:\n{0}")]
    Validation(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Text suitable for a toast or inline error banner.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthorized => "Sessão expirada. Faça login novamente.".to_string(),
            AppError::Forbidden(msg)
            | AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::InvalidInput(msg) => msg.clone(),
            AppError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            AppError::Http(e) if e.is_timeout() || e.is_connect() => {
                "Não foi possível conectar ao servidor.".to_string()
            }
            _ => DEFAULT_ERROR_MESSAGE.to_string(),
        }
    }

    /// Whether this failure ends the current session.
    pub fn is_session_fatal(&self) -> bool {
        matches!(self, AppError::Unauthorized)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_domain_text() {
        let err = AppError::Validation("cpf: invalid".to_string());
        assert_eq!(err.user_message(), "cpf: invalid");

        let err = AppError::Api { status: 500, message: "  ".to_string() };
        assert_eq!(err.user_message(), DEFAULT_ERROR_MESSAGE);

        let err = AppError::Config("missing api.base_url".to_string());
        assert_eq!(err.user_message(), DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn test_only_unauthorized_is_fatal() {
        assert!(AppError::Unauthorized.is_session_fatal());
        assert!(!AppError::Forbidden("no".to_string()).is_session_fatal());
    }
}
