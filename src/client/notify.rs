use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub variant: ToastVariant,
    pub title: String,
    pub description: String,
}

impl Toast {
    pub fn error(description: impl Into<String>) -> Self {
        Self {
            variant: ToastVariant::Destructive,
            title: "Error".to_string(),
            description: description.into(),
        }
    }
}

/// Where user-facing request failures end up.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Collects toasts for a UI layer to drain on its next frame.
#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    toasts: Arc<Mutex<Vec<Toast>>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.toasts.lock())
    }

    pub fn len(&self) -> usize {
        self.toasts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, toast: Toast) {
        self.toasts.lock().push(toast);
    }
}

/// Headless notifier: toasts become log lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, toast: Toast) {
        match toast.variant {
            ToastVariant::Destructive => {
                warn!(title = %toast.title, description = %toast.description, "toast")
            }
            ToastVariant::Default => {
                info!(title = %toast.title, description = %toast.description, "toast")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_drains_in_order() {
        let q = ToastQueue::new();
        q.notify(Toast::error("first"));
        q.notify(Toast::error("second"));
        assert_eq!(q.len(), 2);
        let drained = q.drain();
        assert_eq!(drained[0].description, "first");
        assert_eq!(drained[1].variant, ToastVariant::Destructive);
        assert!(q.is_empty());
    }

    #[test]
    fn tracing_notifier_accepts_both_variants() {
        let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);
        notifier.notify(Toast::error("upstream down"));
        notifier.notify(Toast {
            variant: ToastVariant::Default,
            title: "Saved".to_string(),
            description: "Draft stored".to_string(),
        });
    }
}
