use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not authenticated — run `imagine auth login`")]
    NotAuthenticated,

    #[error("no refresh token stored — run `imagine auth login`")]
    NoRefreshToken,

    #[error("credential store error: {0}")]
    CredentialStore(String),

    #[error("unknown organization '{0}' — run `imagine org list`")]
    UnknownOrganization(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),
}
