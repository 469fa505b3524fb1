//! The ship pipeline
//!
//! Resolve the current branch, ask, check out trunk, fast-forward, publish,
//! then delete the feature branch on the remote and locally. The first
//! failure stops the run.

use crate::auth::AuthStrategy;
use crate::cleanup::cleanup_feature_branch;
use crate::config::Config;
use crate::confirm::ConfirmationGate;
use crate::error::Result;
use crate::merge::{Integration, integrate};
use crate::progress::ProgressCallback;
use crate::publish::publish;
use crate::repo::RepositoryHandle;
use crate::resolve::{resolve_branch, resolve_head};
use crate::types::{BranchKind, ShipOutcome};
use tracing::info;

/// Names the pipeline works with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipOptions {
    /// Local trunk branch name
    pub trunk: String,
    /// Remote name
    pub remote: String,
}

impl From<&Config> for ShipOptions {
    fn from(config: &Config) -> Self {
        Self {
            trunk: config.trunk.clone(),
            remote: config.remote.clone(),
        }
    }
}

/// Ship the checked-out branch into trunk
///
/// Returns the outcome for the normal stops and success; every failure is
/// an [`Error`](crate::error::Error) tagged with its stage.
pub fn ship(
    repo: &dyn RepositoryHandle,
    gate: &mut dyn ConfirmationGate,
    auth: &dyn AuthStrategy,
    progress: &dyn ProgressCallback,
    options: &ShipOptions,
) -> Result<ShipOutcome> {
    let feature = resolve_head(repo)?;

    if !gate.confirm(&feature.name)? {
        info!(branch = %feature.name, "merge cancelled");
        return Ok(ShipOutcome::Cancelled {
            branch: feature.name,
        });
    }

    let trunk = resolve_branch(repo, &options.trunk, &BranchKind::Local)?;
    progress.on_message(&format!(
        "Merging {feature} ({}) into {trunk} ({})",
        feature.head.short(),
        trunk.head.short()
    ));

    let merged = match integrate(repo, &trunk, &feature, progress)? {
        Integration::UpToDate => {
            return Ok(ShipOutcome::UpToDate {
                branch: feature.name,
                trunk: trunk.name,
            });
        }
        Integration::Diverged => {
            return Ok(ShipOutcome::Diverged {
                branch: feature.name,
                trunk: trunk.name,
            });
        }
        Integration::FastForwarded(merged) => merged,
    };

    let published = publish(repo, merged, &options.remote, auth, progress)?;
    cleanup_feature_branch(repo, &published, progress)?;

    info!(
        branch = %published.feature().name,
        trunk = %published.trunk().name,
        remote = published.remote(),
        "shipped"
    );

    Ok(ShipOutcome::Shipped {
        branch: published.feature().name.clone(),
        trunk: published.trunk().name.clone(),
        remote: published.remote().to_string(),
        head: published.trunk().head.clone(),
    })
}
