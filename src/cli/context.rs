//! Shared command context
//!
//! Opens the repository, then loads configuration relative to its worktree
//! and builds the authentication strategy.

use gitmerge::auth::{AuthStrategy, auth_strategy_from_config};
use gitmerge::config::{Config, ConfigOverrides};
use gitmerge::error::Result;
use gitmerge::repo::GitRepository;
use std::path::Path;
use tracing::debug;

/// Everything a run needs before it talks to the operator
pub struct CommandContext {
    /// The opened repository
    pub repo: GitRepository,
    /// Resolved configuration
    pub config: Config,
    /// Strategy for push and remote deletion
    pub auth: Box<dyn AuthStrategy>,
}

impl CommandContext {
    /// Open the repository at or above `path` and load its configuration
    pub fn new(path: &Path, overrides: &ConfigOverrides) -> Result<Self> {
        let repo = GitRepository::open(path)?;
        let config = Config::load(Some(repo.workdir()), overrides)?;
        let auth = auth_strategy_from_config(&config.auth);

        debug!(
            workdir = %repo.workdir().display(),
            trunk = %config.trunk,
            remote = %config.remote,
            auth = %auth.describe(),
            "command context ready"
        );

        Ok(Self { repo, config, auth })
    }
}
