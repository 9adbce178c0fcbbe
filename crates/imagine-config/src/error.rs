//! Errors raised while loading client configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file or environment source could not be parsed into the config shape.
    #[error("could not load settings: {0}")]
    Load(#[from] figment::Error),

    /// A setting the client cannot run without is blank.
    #[error("'{field}' is empty; set it in config.toml or via {env}")]
    Missing { field: &'static str, env: &'static str },

    #[error("'{field}' is invalid: {reason}")]
    InvalidValue { field: String, reason: String },
}
