//! Authentication for remote operations
//!
//! The pipeline only sees [`AuthStrategy`]; the concrete strategies here
//! are what the CLI wires in from configuration.

mod ssh;
mod token;

pub use ssh::SshKeyAuth;
pub use token::{DEFAULT_TOKEN_ENV, DEFAULT_USERNAME, TokenAuth, token_from_lookup};

use crate::config::{AuthConfig, AuthMethod};
use crate::error::Result;
use std::fmt;
use std::path::PathBuf;

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from CLI tool (gh)
    Cli,
    /// Token from environment variable
    EnvVar,
}

/// Credential material handed to push and remote-delete operations
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Let git use whatever it is configured with (helpers, agent, prompt)
    Ambient,
    /// HTTP basic credentials
    Token {
        /// User name sent with the token
        username: String,
        /// Secret token
        token: String,
    },
    /// SSH private key file
    SshKey {
        /// Path to the private key
        private_key: PathBuf,
    },
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ambient => write!(f, "Ambient"),
            Self::Token { username, .. } => f
                .debug_struct("Token")
                .field("username", username)
                .field("token", &"<redacted>")
                .finish(),
            Self::SshKey { private_key } => f
                .debug_struct("SshKey")
                .field("private_key", private_key)
                .finish(),
        }
    }
}

/// Produces credentials on demand
pub trait AuthStrategy {
    /// Human-readable description for logs (never includes secrets)
    fn describe(&self) -> String;

    /// Produce the credential for the next remote operation
    fn credential(&self) -> Result<Credential>;
}

/// Defer to git's own configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct AmbientAuth;

impl AuthStrategy for AmbientAuth {
    fn describe(&self) -> String {
        "git credential helpers".to_string()
    }

    fn credential(&self) -> Result<Credential> {
        Ok(Credential::Ambient)
    }
}

/// Build the strategy selected by configuration
pub fn auth_strategy_from_config(config: &AuthConfig) -> Box<dyn AuthStrategy> {
    match config.method {
        AuthMethod::Ambient => Box::new(AmbientAuth),
        AuthMethod::Token => Box::new(TokenAuth::new(
            config.username.clone(),
            config.token_env.clone(),
        )),
        AuthMethod::Ssh => Box::new(SshKeyAuth::new(config.ssh_key.clone())),
    }
}
