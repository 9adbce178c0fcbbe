//! # imagine-client
//!
//! Client for the ImagineAI REST and WebSocket APIs.
//!
//! Every REST call goes through one request pipeline (see [`pipeline`]):
//! bearer and organization headers, one refresh-and-retry on 401, and
//! user-facing notifications for connectivity, server, validation and
//! rate-limit failures. Resource families:
//! - auth and session bootstrap
//! - organizations and members
//! - products, uploads, analysis
//! - batches and processing jobs
//! - dashboard aggregates
//! - webhooks, exports
//! - admin A/B experiments and rate limits
//!
//! Job progress streams over [`LiveChannel`].

pub mod analysis;
pub mod auth;
pub mod dashboard;
pub mod experiments;
pub mod exports;
pub mod jobs;
pub mod live;
pub mod notify;
pub mod organizations;
pub mod pipeline;
pub mod products;
pub mod rate_limits;
pub mod request;
pub mod uploads;
pub mod webhooks;

mod client;
mod error;
mod http;

pub use client::ApiClient;
pub use error::{ClientError, LiveError};
pub use http::DEFAULT_RETRY_AFTER_SECS;
pub use live::{JobStream, LiveChannel, ws_base_url};
pub use notify::{MemoryNotifier, Notification, NotificationLevel, Notifier, TracingNotifier};
pub use pipeline::{NETWORK_ERROR_MESSAGE, ORGANIZATION_HEADER, SERVER_ERROR_MESSAGE};
