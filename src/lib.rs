pub mod api;
pub mod cache;
pub mod config;
pub mod context;
pub mod eligibility;
pub mod error;
pub mod forms;
pub mod models;
pub mod notifications;
pub mod routing;
pub mod storage;
pub mod toast;
pub mod utils;

#[cfg(feature = "tui")]
pub mod tui;

pub use config::Config;
pub use context::AppContext;
pub use error::{AppError, Result};
