//! Backend error envelopes.
//!
//! The backend has shipped three shapes over time:
//! `{"error": {"code", "message", "details"}}`, `{"message": "..."}` and the
//! legacy `{"error": "..."}`. Message extraction tries them in that order and
//! falls back to [`DEFAULT_ERROR_MESSAGE`].

use serde::Deserialize;
use serde_json::Value;

use crate::error::DEFAULT_ERROR_MESSAGE;

pub const VALIDATION_ERROR_CODE: &str = "VALIDATION_ERROR";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FieldError {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorEnvelope {
    pub code: Option<String>,
    pub message: Option<String>,
    pub details: Vec<FieldError>,
}

impl ErrorEnvelope {
    /// Decode whatever the backend sent; non-JSON bodies give an empty envelope.
    pub fn parse(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::from_value(&value),
            Err(_) => Self::default(),
        }
    }

    pub fn from_value(value: &Value) -> Self {
        let nested = value.get("error").filter(|e| e.is_object());

        let code = nested
            .and_then(|e| e.get("code"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let details = nested
            .and_then(|e| e.get("details"))
            .and_then(|d| serde_json::from_value::<Vec<FieldError>>(d.clone()).ok())
            .unwrap_or_default();

        let message = non_blank(nested.and_then(|e| e.get("message")))
            .or_else(|| non_blank(value.get("message")))
            .or_else(|| non_blank(value.get("error")));

        Self { code, message, details }
    }

    pub fn is_validation(&self) -> bool {
        self.code.as_deref() == Some(VALIDATION_ERROR_CODE) || !self.details.is_empty()
    }

    /// One `field: message` line per detail.
    pub fn validation_text(&self) -> Option<String> {
        if self.details.is_empty() {
            return None;
        }
        let lines: Vec<String> = self
            .details
            .iter()
            .map(|d| {
                if d.field.is_empty() {
                    d.message.clone()
                } else {
                    format!("{}: {}", d.field, d.message)
                }
            })
            .collect();
        Some(lines.join("\n"))
    }

    /// The text a user should see for this envelope.
    pub fn user_message(&self) -> String {
        if self.is_validation() {
            if let Some(text) = self.validation_text() {
                return text;
            }
        }
        self.message
            .clone()
            .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string())
    }
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
