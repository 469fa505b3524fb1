//! Merge execution - effectful operations
//!
//! Checks out trunk, analyzes, and advances trunk when the analysis allows
//! a fast-forward. Never creates commits.

use super::analysis::analyze_merge;
use crate::error::{Error, Result};
use crate::progress::ProgressCallback;
use crate::repo::RepositoryHandle;
use crate::types::{Branch, CommitId, MergeAnalysis, Stage};
use tracing::{debug, warn};

/// Proof that trunk was fast-forwarded to the feature head
///
/// Only [`integrate`] creates this; [`publish`](crate::publish::publish)
/// consumes it.
#[derive(Debug)]
pub struct FastForward {
    trunk: Branch,
    feature: Branch,
    previous_head: CommitId,
}

impl FastForward {
    /// Trunk after the fast-forward (its head is the feature head)
    pub const fn trunk(&self) -> &Branch {
        &self.trunk
    }

    /// The feature branch that was merged
    pub const fn feature(&self) -> &Branch {
        &self.feature
    }

    /// Trunk head before the fast-forward
    pub const fn previous_head(&self) -> &CommitId {
        &self.previous_head
    }

    pub(crate) fn into_parts(self) -> (Branch, Branch) {
        (self.trunk, self.feature)
    }
}

/// What the merge engine did
#[derive(Debug)]
pub enum Integration {
    /// Trunk already contains the feature; nothing changed
    UpToDate,
    /// Trunk has commits the feature lacks; nothing changed
    Diverged,
    /// Trunk now points at the feature head
    FastForwarded(FastForward),
}

impl Integration {
    /// The analysis this outcome came from
    pub const fn analysis(&self) -> MergeAnalysis {
        match self {
            Self::UpToDate => MergeAnalysis::UpToDate,
            Self::Diverged => MergeAnalysis::Diverged,
            Self::FastForwarded(_) => MergeAnalysis::FastForward,
        }
    }
}

/// Check out `trunk`, then fast-forward it to `feature` if possible
///
/// A dirty working tree or failed checkout aborts before analysis.
pub fn integrate(
    repo: &dyn RepositoryHandle,
    trunk: &Branch,
    feature: &Branch,
    progress: &dyn ProgressCallback,
) -> Result<Integration> {
    progress.on_stage(Stage::Checkout, &format!("Checking out {}", trunk.name));
    if let Err(e) = checkout_trunk(repo, trunk) {
        progress.on_stage_failed(Stage::Checkout, &e.to_string());
        return Err(e);
    }
    progress.on_stage_done(Stage::Checkout, &format!("Checked out {}", trunk.name));

    let analysis = analyze_merge(repo, trunk, feature)?;
    match analysis {
        MergeAnalysis::UpToDate => return Ok(Integration::UpToDate),
        MergeAnalysis::Diverged => return Ok(Integration::Diverged),
        MergeAnalysis::FastForward => {}
    }

    progress.on_stage(
        Stage::Merge,
        &format!("Fast-forwarding {} to {}", trunk.name, feature.head.short()),
    );
    if let Err(e) = repo.update_branch(&trunk.name, &trunk.head, &feature.head) {
        warn!(branch = %trunk.name, error = %e, "fast-forward failed");
        let err = match e {
            // Refused before the ref moved
            Error::Checkout { .. } => e,
            other => Error::FastForward {
                branch: trunk.name.clone(),
                message: other.to_string(),
            },
        };
        progress.on_stage_failed(Stage::Merge, &err.to_string());
        return Err(err);
    }
    progress.on_stage_done(
        Stage::Merge,
        &format!(
            "Fast-forwarded {}: {} → {}",
            trunk.name,
            trunk.head.short(),
            feature.head.short()
        ),
    );

    debug!(trunk = %trunk.name, head = %feature.head, "trunk fast-forwarded");
    Ok(Integration::FastForwarded(FastForward {
        trunk: Branch {
            head: feature.head.clone(),
            ..trunk.clone()
        },
        feature: feature.clone(),
        previous_head: trunk.head.clone(),
    }))
}

fn checkout_trunk(repo: &dyn RepositoryHandle, trunk: &Branch) -> Result<()> {
    if repo.is_dirty()? {
        return Err(Error::DirtyWorktree);
    }

    repo.checkout_branch(&trunk.name).map_err(|e| match e {
        Error::ReferenceNotFound(_) | Error::Checkout { .. } => e,
        other => Error::Checkout {
            branch: trunk.name.clone(),
            message: other.to_string(),
        },
    })
}
