use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;

const MAX_PENDING: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    /// Set when the toast was raised through [`Toasts::push_keyed`]
    pub key: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Queue of user-facing messages shared by the request layer and the views.
#[derive(Default)]
pub struct Toasts {
    pending: Mutex<VecDeque<Toast>>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, level: ToastLevel, message: impl Into<String>) {
        self.enqueue(Toast {
            level,
            message: message.into(),
            key: None,
            created_at: Utc::now(),
        });
    }

    /// Push unless a toast with the same key is still pending.
    ///
    /// Returns whether the toast was queued.
    pub fn push_keyed(&self, key: &str, level: ToastLevel, message: impl Into<String>) -> bool {
        let Ok(mut pending) = self.pending.lock() else {
            return false;
        };
        if pending.iter().any(|t| t.key.as_deref() == Some(key)) {
            return false;
        }
        pending.push_back(Toast {
            level,
            message: message.into(),
            key: Some(key.to_string()),
            created_at: Utc::now(),
        });
        trim(&mut pending);
        true
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(ToastLevel::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastLevel::Success, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.push(ToastLevel::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message);
    }

    /// Take every pending toast, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        self.pending
            .lock()
            .map(|mut pending| pending.drain(..).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn enqueue(&self, toast: Toast) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.push_back(toast);
            trim(&mut pending);
        }
    }
}

fn trim(pending: &mut VecDeque<Toast>) {
    while pending.len() > MAX_PENDING {
        pending.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyed_toasts_dedupe_while_pending() {
        let toasts = Toasts::new();
        assert!(toasts.push_keyed("forbidden", ToastLevel::Warning, "Sem permissão"));
        assert!(!toasts.push_keyed("forbidden", ToastLevel::Warning, "Sem permissão"));
        toasts.info("unrelated");
        assert_eq!(toasts.len(), 2);

        let drained = toasts.drain();
        assert_eq!(drained[0].key.as_deref(), Some("forbidden"));
        assert!(toasts.is_empty());

        assert!(toasts.push_keyed("forbidden", ToastLevel::Warning, "Sem permissão"));
    }

    #[test]
    fn test_queue_is_bounded() {
        let toasts = Toasts::new();
        for i in 0..(MAX_PENDING + 10) {
            toasts.info(format!("message {}", i));
        }
        let drained = toasts.drain();
        assert_eq!(drained.len(), MAX_PENDING);
        assert_eq!(drained[0].message, "message 10");
    }
}
