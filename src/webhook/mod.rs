pub mod error;
pub mod events;
mod router;
pub mod types;
mod upstream;

pub use error::GatewayError;
pub use router::{build_router, GatewayState};
pub use types::{Actor, ErrorBody, UserRole, WebhookRequest, WebhookResponse};
pub use upstream::UpstreamClient;
