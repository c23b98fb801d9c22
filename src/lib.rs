//! Webhook gateway and client request layer for the teacher/parent portal.
//!
//! Every feature call is one JSON envelope posted to `/api/webhook`. The
//! gateway forwards it to an automation backend, or answers it from an
//! in-memory mock when running in mock mode.

pub mod client;
pub mod config;
pub mod devlog;
pub mod mock;
pub mod session;
pub mod webhook;

pub use client::{HookError, WebhookClient, WebhookHook};
pub use config::{Cli, GatewayConfig};
pub use devlog::{DevLog, LogEntry};
pub use session::Session;
pub use webhook::{build_router, GatewayError, GatewayState, WebhookRequest, WebhookResponse};
