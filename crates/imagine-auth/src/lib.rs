//! # imagine-auth
//!
//! Session state for the ImagineAI client.
//!
//! - [`CredentialStore`]: durable key/value storage for tokens and the
//!   selected organization (OS keychain, files, or memory).
//! - [`SessionStore`]: current token pair and user, replaced atomically.
//! - [`OrganizationContext`]: the loaded organizations and the active one.

pub mod credential_store;
pub mod error;
pub mod jwt;
pub mod organization;
pub mod session;

pub use credential_store::{
    ACCESS_TOKEN_KEY, CredentialStore, FileStore, KeyringStore, MemoryStore, ORGANIZATION_KEY,
    REFRESH_TOKEN_KEY, open_store,
};
pub use error::AuthError;
pub use organization::OrganizationContext;
pub use session::{Credential, SessionStore};
