//! Player-facing notifications
//!
//! Every tracked operation produces one loading notification followed by
//! exactly one terminal notification (success or error) sharing its ticket.

use crate::utils::error::Result;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{error, info};

/// Notification lifecycle stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Loading,
    Success,
    Error,
}

impl NotificationKind {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, NotificationKind::Loading)
    }
}

/// One notification event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Shared by the loading and terminal events of one operation
    pub ticket: u64,
    pub kind: NotificationKind,
    pub message: String,
    /// Error text for failed operations
    pub detail: Option<String>,
}

/// Messages bound to one pending operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessages {
    pub loading: String,
    pub success: String,
    pub error: String,
}

impl NotificationMessages {
    /// Loading text with the default "Success" / "Failed" outcomes
    pub fn new(loading: impl Into<String>) -> Self {
        Self {
            loading: loading.into(),
            success: "Success".to_string(),
            error: "Failed".to_string(),
        }
    }
}

/// Where notifications are displayed
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Issues tickets and binds message triples to futures
#[derive(Clone)]
pub struct Notifier {
    sink: Arc<dyn NotificationSink>,
    next_ticket: Arc<AtomicU64>,
}

impl Notifier {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            sink,
            next_ticket: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Show `messages.loading` while `operation` runs, then its outcome
    pub async fn track<T, F>(&self, messages: NotificationMessages, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        self.sink.notify(Notification {
            ticket,
            kind: NotificationKind::Loading,
            message: messages.loading,
            detail: None,
        });

        let result = operation.await;
        let terminal = match &result {
            Ok(_) => Notification {
                ticket,
                kind: NotificationKind::Success,
                message: messages.success,
                detail: None,
            },
            Err(e) => Notification {
                ticket,
                kind: NotificationKind::Error,
                message: messages.error,
                detail: Some(e.to_string()),
            },
        };
        self.sink.notify(terminal);
        result
    }

    /// Report a failure that never reached a pending state
    pub fn fail(&self, message: impl Into<String>, detail: impl Into<String>) {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        self.sink.notify(Notification {
            ticket,
            kind: NotificationKind::Error,
            message: message.into(),
            detail: Some(detail.into()),
        });
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("next_ticket", &self.next_ticket.load(Ordering::Relaxed))
            .finish()
    }
}

/// Sink that writes notifications to the tracing subscriber
#[derive(Debug, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Error => error!(
                ticket = notification.ticket,
                detail = notification.detail.as_deref().unwrap_or_default(),
                "{}",
                notification.message
            ),
            _ => info!(
                ticket = notification.ticket,
                kind = ?notification.kind,
                "{}",
                notification.message
            ),
        }
    }
}

/// Sink that keeps every notification in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Notification> {
        self.events.lock().clone()
    }

    /// Terminal notifications only
    pub fn outcomes(&self) -> Vec<Notification> {
        self.events
            .lock()
            .iter()
            .filter(|n| n.kind.is_terminal())
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        self.events.lock().push(notification);
    }
}
