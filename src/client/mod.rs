mod hook;
mod notify;

pub use hook::{HookError, WebhookClient, WebhookHook};
pub use notify::{Notifier, Toast, ToastQueue, ToastVariant, TracingNotifier};
