//! SSH key-pair authentication

use super::{AuthStrategy, Credential};
use crate::error::{Error, Result};
use std::path::PathBuf;

/// Use a specific private key for SSH remotes
#[derive(Debug, Clone)]
pub struct SshKeyAuth {
    private_key: Option<PathBuf>,
}

impl SshKeyAuth {
    /// Create a key strategy; the key path is checked when a credential is requested
    pub const fn new(private_key: Option<PathBuf>) -> Self {
        Self { private_key }
    }
}

impl AuthStrategy for SshKeyAuth {
    fn describe(&self) -> String {
        match self.private_key {
            Some(ref path) => format!("ssh key {}", path.display()),
            None => "ssh key (not configured)".to_string(),
        }
    }

    fn credential(&self) -> Result<Credential> {
        let Some(ref path) = self.private_key else {
            return Err(Error::Auth(
                "ssh authentication selected but no ssh_key configured".to_string(),
            ));
        };
        if !path.is_file() {
            return Err(Error::Auth(format!(
                "ssh key {} does not exist",
                path.display()
            )));
        }
        Ok(Credential::SshKey {
            private_key: path.clone(),
        })
    }
}
