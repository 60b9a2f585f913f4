use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

pub const DEFAULT_DURATION: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    #[default]
    Default,
    Success,
    Info,
    Danger,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToastPosition {
    TopLeft,
    TopRight,
    #[default]
    BottomLeft,
    BottomRight,
    TopCenter,
    BottomCenter,
}

pub type ToastId = Uuid;

#[derive(Debug, Clone)]
pub struct ToastOptions {
    pub message: String,
    pub variant: ToastVariant,
    pub duration: Duration,
    pub position: ToastPosition,
}

impl ToastOptions {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            variant: ToastVariant::default(),
            duration: DEFAULT_DURATION,
            position: ToastPosition::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub variant: ToastVariant,
    pub position: ToastPosition,
    pub expires_at: Instant,
}

/// Notification list owned by the root of the UI tree; clones share it.
#[derive(Clone, Default)]
pub struct ToastService {
    toasts: Arc<Mutex<Vec<Toast>>>,
}

impl ToastService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&self, message: impl Into<String>, variant: ToastVariant, duration_ms: u64) -> ToastId {
        self.notify_with(ToastOptions {
            variant,
            duration: Duration::from_millis(duration_ms),
            ..ToastOptions::new(message)
        })
    }

    pub fn error(&self, message: impl Into<String>) -> ToastId {
        self.notify_with(ToastOptions {
            variant: ToastVariant::Danger,
            ..ToastOptions::new(message)
        })
    }

    pub fn notify_with(&self, options: ToastOptions) -> ToastId {
        let toast = Toast {
            id: Uuid::new_v4(),
            message: options.message,
            variant: options.variant,
            position: options.position,
            expires_at: Instant::now() + options.duration,
        };
        let id = toast.id;

        if let Ok(mut toasts) = self.toasts.lock() {
            toasts.push(toast);
        }
        id
    }

    pub fn dismiss(&self, id: ToastId) -> bool {
        match self.toasts.lock() {
            Ok(mut toasts) => {
                let before = toasts.len();
                toasts.retain(|toast| toast.id != id);
                toasts.len() != before
            }
            Err(_) => false,
        }
    }

    /// Visible toasts in the order they were raised; expired ones are dropped.
    pub fn active(&self) -> Vec<Toast> {
        let now = Instant::now();
        match self.toasts.lock() {
            Ok(mut toasts) => {
                toasts.retain(|toast| toast.expires_at > now);
                toasts.clone()
            }
            Err(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_notify_uses_defaults() {
        let service = ToastService::new();
        service.notify_with(ToastOptions::new("Saved"));

        let active = service.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "Saved");
        assert_eq!(active[0].variant, ToastVariant::Default);
        assert_eq!(active[0].position, ToastPosition::BottomLeft);
        assert_eq!(active[0].expires_at, Instant::now() + DEFAULT_DURATION);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toasts_expire_after_duration() {
        let service = ToastService::new();
        service.notify("short", ToastVariant::Info, 1000);
        service.notify("long", ToastVariant::Warning, 3000);

        tokio::time::advance(Duration::from_millis(1500)).await;
        let remaining: Vec<String> = service.active().into_iter().map(|t| t.message).collect();
        assert_eq!(remaining, vec!["long"]);

        tokio::time::advance(Duration::from_millis(2000)).await;
        assert!(service.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_by_id_shared_between_clones() {
        let service = ToastService::new();
        let handle = service.clone();

        let first = service.error("Failed to load images. Please try again.");
        let second = handle.notify("ok", ToastVariant::Success, 5000);

        assert!(handle.dismiss(first));
        assert!(!service.dismiss(first));

        let active = service.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second);
    }
}
