pub mod db;
pub mod session;

pub use db::{Database, KeyValueStore, MemoryStore};
pub use session::{SessionState, SessionStore, AUTH_STORAGE_KEY, THEME_STORAGE_KEY};
