pub mod auth;
pub mod experiments;
pub mod exports;
pub mod jobs;
pub mod org;
pub mod products;
pub mod rate_limits;
pub mod webhooks;

pub use auth::AuthCommands;
pub use experiments::ExperimentCommands;
pub use exports::ExportCommands;
pub use jobs::{BatchCommands, JobCommands};
pub use org::OrgCommands;
pub use products::ProductCommands;
pub use rate_limits::RateLimitCommands;
pub use webhooks::WebhookCommands;
