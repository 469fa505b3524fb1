//! Token authentication from the environment or the `gh` CLI

use super::{AuthSource, AuthStrategy, Credential};
use crate::error::{Error, Result};
use std::process::Command;
use tracing::debug;

/// Environment variable checked first when none is configured
pub const DEFAULT_TOKEN_ENV: &str = "GITMERGE_TOKEN";

/// User name sent alongside a token when none is configured
pub const DEFAULT_USERNAME: &str = "x-access-token";

/// Variables tried after [`DEFAULT_TOKEN_ENV`]
const FALLBACK_TOKEN_ENVS: &[&str] = &["GH_TOKEN", "GITHUB_TOKEN"];

/// Token credentials for HTTPS remotes
#[derive(Debug, Clone)]
pub struct TokenAuth {
    username: String,
    token_env: Option<String>,
}

impl TokenAuth {
    /// Create a token strategy
    ///
    /// With `token_env` set, only that variable is read. Otherwise
    /// `GITMERGE_TOKEN`, `GH_TOKEN` and `GITHUB_TOKEN` are tried, then `gh auth token`.
    pub fn new(username: Option<String>, token_env: Option<String>) -> Self {
        Self {
            username: username.unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            token_env,
        }
    }

    fn resolve_token(&self) -> Result<(String, AuthSource)> {
        if let Some(ref name) = self.token_env {
            return token_from_lookup(&[name.as_str()], |key| std::env::var(key).ok())
                .map(|token| (token, AuthSource::EnvVar))
                .ok_or_else(|| Error::Auth(format!("environment variable {name} is not set")));
        }

        let mut names = vec![DEFAULT_TOKEN_ENV];
        names.extend_from_slice(FALLBACK_TOKEN_ENVS);
        if let Some(token) = token_from_lookup(&names, |key| std::env::var(key).ok()) {
            return Ok((token, AuthSource::EnvVar));
        }

        token_from_gh_cli().map(|token| (token, AuthSource::Cli))
    }
}

impl AuthStrategy for TokenAuth {
    fn describe(&self) -> String {
        match self.token_env {
            Some(ref name) => format!("token from ${name}"),
            None => "token from environment or gh".to_string(),
        }
    }

    fn credential(&self) -> Result<Credential> {
        let (token, source) = self.resolve_token()?;
        debug!(?source, username = %self.username, "resolved token credential");
        Ok(Credential::Token {
            username: self.username.clone(),
            token,
        })
    }
}

/// First non-blank value among `names`, trimmed
pub fn token_from_lookup<F>(names: &[&str], lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    names
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

fn token_from_gh_cli() -> Result<String> {
    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .map_err(|e| Error::Auth(format!("no token in environment and gh is unavailable: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Auth(format!(
            "no token in environment and `gh auth token` failed: {}",
            stderr.trim()
        )));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(Error::Auth("`gh auth token` returned an empty token".to_string()));
    }
    Ok(token)
}
