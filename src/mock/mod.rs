//! Development stand-in for the automation webhook.
//!
//! State lives in memory for the life of the process and is never persisted.

mod handlers;
mod helpers;
mod router;
pub mod state;

pub use router::dispatch;
pub use state::MockState;
