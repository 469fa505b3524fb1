//! Feature branch cleanup
//!
//! Remote first, then local. The local copy is only removed once the
//! remote copy is gone, so a failure never leaves the branch's commits
//! without a name.

use crate::error::{Error, Result};
use crate::progress::ProgressCallback;
use crate::publish::Published;
use crate::repo::RepositoryHandle;
use crate::types::{Branch, Stage};
use tracing::warn;

/// Proof that the feature branch is gone from the remote
#[derive(Debug)]
pub struct RemoteBranchDeleted {
    remote: String,
    feature: Branch,
}

impl RemoteBranchDeleted {
    /// Remote the branch was deleted from
    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// The deleted branch
    pub const fn feature(&self) -> &Branch {
        &self.feature
    }
}

/// Delete the feature branch on the remote trunk was published to
pub fn delete_remote(
    repo: &dyn RepositoryHandle,
    published: &Published,
    progress: &dyn ProgressCallback,
) -> Result<RemoteBranchDeleted> {
    let remote = published.remote();
    let feature = published.feature();

    progress.on_stage(
        Stage::RemoteDelete,
        &format!("Deleting {feature} on {remote}"),
    );
    if let Err(e) = repo.delete_remote_branch(remote, &feature.name, published.credential()) {
        warn!(remote, branch = %feature.name, error = %e, "remote deletion failed");
        let err = Error::RemoteDeletionFailed {
            remote: remote.to_string(),
            branch: feature.name.clone(),
            message: e.to_string(),
        };
        progress.on_stage_failed(Stage::RemoteDelete, &err.to_string());
        return Err(err);
    }
    progress.on_stage_done(
        Stage::RemoteDelete,
        &format!("Deleted {feature} on {remote}"),
    );

    Ok(RemoteBranchDeleted {
        remote: remote.to_string(),
        feature: feature.clone(),
    })
}

/// Delete the local feature branch
pub fn delete_local(
    repo: &dyn RepositoryHandle,
    deleted: RemoteBranchDeleted,
    progress: &dyn ProgressCallback,
) -> Result<()> {
    let name = deleted.feature.name;

    progress.on_stage(Stage::LocalDelete, &format!("Deleting local branch {name}"));
    if let Err(e) = repo.delete_local_branch(&name) {
        warn!(branch = %name, error = %e, "local deletion failed");
        let err = Error::LocalDeletionFailed {
            branch: name,
            message: e.to_string(),
        };
        progress.on_stage_failed(Stage::LocalDelete, &err.to_string());
        return Err(err);
    }
    progress.on_stage_done(Stage::LocalDelete, &format!("Deleted local branch {name}"));
    Ok(())
}

/// Remote deletion followed by local deletion
pub fn cleanup_feature_branch(
    repo: &dyn RepositoryHandle,
    published: &Published,
    progress: &dyn ProgressCallback,
) -> Result<()> {
    let deleted = delete_remote(repo, published, progress)?;
    delete_local(repo, deleted, progress)
}
