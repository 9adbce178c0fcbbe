//! The authenticated session.
//!
//! Holds the current access/refresh tokens and user. Tokens are written to
//! the credential store and replaced as a unit; `generation` advances on
//! every replacement so concurrent callers can tell whether the token they
//! used is stale.

use std::sync::{Arc, PoisonError, RwLock};

use imagine_core::entities::{TokenPair, User};

use crate::credential_store::{
    ACCESS_TOKEN_KEY, ALL_KEYS, CredentialStore, REFRESH_TOKEN_KEY,
};
use crate::error::AuthError;
use crate::jwt;

/// An access token together with the session generation it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub generation: u64,
}

#[derive(Debug, Default)]
struct SessionState {
    access_token: Option<String>,
    refresh_token: Option<String>,
    user: Option<User>,
    generation: u64,
    login_required: bool,
}

pub struct SessionStore {
    store: Arc<dyn CredentialStore>,
    state: RwLock<SessionState>,
}

impl SessionStore {
    /// Empty session backed by `store`. Nothing is read from storage.
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            store,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Session seeded from whatever tokens the store already holds.
    #[must_use]
    pub fn restore(store: Arc<dyn CredentialStore>) -> Self {
        let access_token = store.get(ACCESS_TOKEN_KEY);
        let refresh_token = store.get(REFRESH_TOKEN_KEY);
        tracing::debug!(
            backend = store.backend_name(),
            has_access = access_token.is_some(),
            has_refresh = refresh_token.is_some(),
            "session restored"
        );
        Self {
            store,
            state: RwLock::new(SessionState {
                access_token,
                refresh_token,
                ..SessionState::default()
            }),
        }
    }

    /// Install a freshly issued token pair.
    ///
    /// Both tokens are persisted before the in-memory state changes, and the
    /// in-memory swap happens under one write lock, so readers never observe
    /// a new access token paired with an old refresh token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::CredentialStore` if either token cannot be persisted.
    pub fn establish(&self, pair: &TokenPair) -> Result<u64, AuthError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        self.store.set(ACCESS_TOKEN_KEY, &pair.access_token)?;
        self.store.set(REFRESH_TOKEN_KEY, &pair.refresh_token)?;
        state.access_token = Some(pair.access_token.clone());
        state.refresh_token = Some(pair.refresh_token.clone());
        state.generation += 1;
        state.login_required = false;
        tracing::debug!(generation = state.generation, "session established");
        Ok(state.generation)
    }

    pub fn set_user(&self, user: User) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .user = Some(user);
    }

    /// Drop the session: clear every persisted key, forget the user, and
    /// flag that the user must log in again.
    pub fn invalidate(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        for key in ALL_KEYS {
            if let Err(error) = self.store.remove(key) {
                tracing::warn!(%error, key, "failed to clear stored credential");
            }
        }
        state.access_token = None;
        state.refresh_token = None;
        state.user = None;
        state.generation += 1;
        state.login_required = true;
        tracing::info!(generation = state.generation, "session invalidated");
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.read(|s| s.access_token.clone())
    }

    #[must_use]
    pub fn credential(&self) -> Option<Credential> {
        self.read(|s| {
            s.access_token.clone().map(|token| Credential {
                token,
                generation: s.generation,
            })
        })
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.read(|s| s.refresh_token.clone())
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.read(|s| s.user.clone())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read(|s| s.access_token.is_some())
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.read(|s| s.generation)
    }

    /// True after the session was invalidated and before the next login.
    #[must_use]
    pub fn login_required(&self) -> bool {
        self.read(|s| s.login_required)
    }

    /// Expiry of the current access token, if it is a JWT carrying `exp`.
    #[must_use]
    pub fn token_expiry(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        let token = self.access_token()?;
        match jwt::decode_expiry(&token) {
            Ok(exp) => Some(exp),
            Err(error) => {
                tracing::debug!(%error, "access token expiry unavailable");
                None
            }
        }
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    fn read<T>(&self, f: impl FnOnce(&SessionState) -> T) -> T {
        f(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("backend", &self.store.backend_name())
            .field("authenticated", &self.is_authenticated())
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}
