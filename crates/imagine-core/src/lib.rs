//! # imagine-core
//!
//! Wire types shared by every ImagineAI client crate.
//!
//! Everything here mirrors a record owned by the backend. The client only
//! serializes and deserializes these shapes; it never transitions a status on
//! its own.
//! - Entity structs for products, analyses, jobs, webhooks, exports, experiments
//! - Request payloads for create/update calls
//! - Status enums with wire names and terminal-state helpers
//! - The `{items, total, page, page_size, pages}` pagination envelope
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod pagination;

pub use errors::CoreError;
pub use pagination::Page;
