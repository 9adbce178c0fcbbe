pub mod analysis;
pub mod auth;
pub mod batch;
pub mod dashboard;
pub mod dispatch;
pub mod experiments;
pub mod exports;
pub mod jobs;
pub mod open;
pub mod org;
pub mod products;
pub mod rate_limits;
pub mod shared;
pub mod upload;
pub mod webhooks;
