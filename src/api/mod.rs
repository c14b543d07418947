pub mod auth;
pub mod care;
pub mod client;
pub mod envelope;
pub mod indicators;
pub mod notifications;
pub mod patients;
pub mod users;

pub use client::{ApiClient, FORBIDDEN_TOAST_KEY};
pub use envelope::{ErrorEnvelope, FieldError};
