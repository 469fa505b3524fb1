//! Configuration loading
//!
//! Layers, lowest precedence first: built-in defaults, the user config
//! file, `.gitmerge.toml` at the worktree root, `GITMERGE_*` environment
//! variables, and command-line flags.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Trunk branch used when nothing else is configured
pub const DEFAULT_TRUNK: &str = "main";

/// Remote used when nothing else is configured
pub const DEFAULT_REMOTE: &str = "origin";

/// Directory name under the platform config dir
const CONFIG_DIR: &str = "gitmerge";

/// Filename of the user config
const CONFIG_FILE: &str = "config.toml";

/// Filename of the per-repository config at the worktree root
pub const REPO_CONFIG_FILE: &str = ".gitmerge.toml";

/// Environment variable overriding the trunk branch
pub const ENV_TRUNK: &str = "GITMERGE_TRUNK";

/// Environment variable overriding the remote
pub const ENV_REMOTE: &str = "GITMERGE_REMOTE";

/// Environment variable overriding the auth method
pub const ENV_AUTH: &str = "GITMERGE_AUTH";

/// How remote operations authenticate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    /// git's own credential helpers, ssh agent, or prompt
    #[default]
    Ambient,
    /// HTTPS token
    Token,
    /// SSH private key
    Ssh,
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ambient => write!(f, "ambient"),
            Self::Token => write!(f, "token"),
            Self::Ssh => write!(f, "ssh"),
        }
    }
}

impl FromStr for AuthMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ambient" => Ok(Self::Ambient),
            "token" => Ok(Self::Token),
            "ssh" => Ok(Self::Ssh),
            other => Err(Error::Config(format!(
                "unknown auth method '{other}' (expected ambient, token, or ssh)"
            ))),
        }
    }
}

/// Authentication settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthConfig {
    /// Selected mechanism
    pub method: AuthMethod,
    /// Environment variable holding the token (token method)
    pub token_env: Option<String>,
    /// User name sent with the token (token method)
    pub username: Option<String>,
    /// Private key path (ssh method)
    pub ssh_key: Option<PathBuf>,
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Branch the feature branch is merged into
    pub trunk: String,
    /// Remote trunk is pushed to
    pub remote: String,
    /// Authentication settings
    pub auth: AuthConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trunk: DEFAULT_TRUNK.to_string(),
            remote: DEFAULT_REMOTE.to_string(),
            auth: AuthConfig::default(),
        }
    }
}

/// On-disk shape: every key optional so files only override what they set
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    trunk: Option<String>,
    remote: Option<String>,
    auth: Option<AuthFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AuthFile {
    method: Option<AuthMethod>,
    token_env: Option<String>,
    username: Option<String>,
    ssh_key: Option<PathBuf>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// `--trunk`
    pub trunk: Option<String>,
    /// `--remote`
    pub remote: Option<String>,
    /// `--auth`
    pub auth: Option<AuthMethod>,
}

impl Config {
    /// Load all layers
    ///
    /// `workdir` is the worktree root used to find `.gitmerge.toml`.
    pub fn load(workdir: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = user_config_path() {
            config.merge_file(&path)?;
        }
        if let Some(dir) = workdir {
            config.merge_file(&dir.join(REPO_CONFIG_FILE))?;
        }
        config.apply_env(|key| std::env::var(key).ok())?;
        config.apply_overrides(overrides);
        config.validate()?;

        debug!(trunk = %config.trunk, remote = %config.remote, auth = %config.auth.method, "loaded configuration");
        Ok(config)
    }

    /// Merge a TOML file into this config
    ///
    /// Returns `false` without changes if the file doesn't exist.
    pub fn merge_file(&mut self, path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        self.merge_toml(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;

        debug!(path = %path.display(), "merged config file");
        Ok(true)
    }

    /// Merge TOML text into this config
    pub fn merge_toml(&mut self, content: &str) -> std::result::Result<(), toml::de::Error> {
        let file: ConfigFile = toml::from_str(content)?;

        if let Some(trunk) = file.trunk {
            self.trunk = trunk;
        }
        if let Some(remote) = file.remote {
            self.remote = remote;
        }
        if let Some(auth) = file.auth {
            if let Some(method) = auth.method {
                self.auth.method = method;
            }
            if auth.token_env.is_some() {
                self.auth.token_env = auth.token_env;
            }
            if auth.username.is_some() {
                self.auth.username = auth.username;
            }
            if auth.ssh_key.is_some() {
                self.auth.ssh_key = auth.ssh_key;
            }
        }
        Ok(())
    }

    /// Apply `GITMERGE_*` variables read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(trunk) = non_empty(ENV_TRUNK) {
            self.trunk = trunk.trim().to_string();
        }
        if let Some(remote) = non_empty(ENV_REMOTE) {
            self.remote = remote.trim().to_string();
        }
        if let Some(method) = non_empty(ENV_AUTH) {
            self.auth.method = method.parse()?;
        }
        Ok(())
    }

    /// Apply command-line values
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref trunk) = overrides.trunk {
            self.trunk.clone_from(trunk);
        }
        if let Some(ref remote) = overrides.remote {
            self.remote.clone_from(remote);
        }
        if let Some(method) = overrides.auth {
            self.auth.method = method;
        }
    }

    /// Reject names git would not accept as a plain branch or remote name
    pub fn validate(&self) -> Result<()> {
        validate_name("trunk", &self.trunk)?;
        validate_name("remote", &self.remote)?;
        if self.trunk.starts_with("refs/") {
            return Err(Error::Config(format!(
                "trunk must be a short branch name, not '{}'",
                self.trunk
            )));
        }
        if self.remote.contains('/') {
            return Err(Error::Config(format!(
                "remote must be a remote name, not '{}'",
                self.remote
            )));
        }
        Ok(())
    }
}

fn validate_name(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::Config(format!("{what} must not be empty")));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(Error::Config(format!(
            "{what} '{value}' must not contain whitespace"
        )));
    }
    Ok(())
}

/// Path of the user config file, if the platform has a config dir
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}
