pub mod dashboard;
pub mod indicators;
pub mod login;
pub mod notifications;
pub mod patients;
pub mod settings;
