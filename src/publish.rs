//! Publishing trunk to the remote
//!
//! Takes the [`FastForward`] proof from the merge engine, so a push can
//! only happen after trunk has actually moved.

use crate::auth::{AuthStrategy, Credential};
use crate::error::{Error, Result};
use crate::merge::FastForward;
use crate::progress::ProgressCallback;
use crate::repo::RepositoryHandle;
use crate::types::{Branch, Stage};
use tracing::{debug, warn};

/// Proof that trunk reached the remote
///
/// Required by [`delete_remote`](crate::cleanup::delete_remote).
#[derive(Debug)]
pub struct Published {
    remote: String,
    trunk: Branch,
    feature: Branch,
    credential: Credential,
}

impl Published {
    /// Remote that received trunk
    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Trunk as pushed
    pub const fn trunk(&self) -> &Branch {
        &self.trunk
    }

    /// The merged feature branch
    pub const fn feature(&self) -> &Branch {
        &self.feature
    }

    pub(crate) const fn credential(&self) -> &Credential {
        &self.credential
    }
}

/// Push the fast-forwarded trunk to `remote`
///
/// The credential obtained here is reused for remote cleanup.
pub fn publish(
    repo: &dyn RepositoryHandle,
    merged: FastForward,
    remote: &str,
    auth: &dyn AuthStrategy,
    progress: &dyn ProgressCallback,
) -> Result<Published> {
    let (trunk, feature) = merged.into_parts();

    progress.on_stage(Stage::Publish, &format!("Pushing {trunk} to {remote}"));
    debug!(strategy = %auth.describe(), "obtaining credential");

    let result = auth.credential().and_then(|credential| {
        repo.push_branch(remote, &trunk.name, &credential)
            .map_err(|e| Error::PushRejected {
                remote: remote.to_string(),
                branch: trunk.name.clone(),
                message: e.to_string(),
            })?;
        Ok(credential)
    });

    match result {
        Ok(credential) => {
            progress.on_stage_done(Stage::Publish, &format!("Pushed {trunk} to {remote}"));
            Ok(Published {
                remote: remote.to_string(),
                trunk,
                feature,
                credential,
            })
        }
        Err(e) => {
            warn!(remote, branch = %trunk.name, error = %e, "publish failed");
            progress.on_stage_failed(Stage::Publish, &e.to_string());
            Err(e)
        }
    }
}
