//! Branch resolution
//!
//! Turns branch names into [`Branch`] values. The branch checked out when
//! the run starts is the feature branch; it has to be captured before
//! anything checks out trunk.

use crate::error::{Error, Result};
use crate::repo::RepositoryHandle;
use crate::types::{Branch, BranchKind};
use tracing::debug;

/// Resolve the checked-out branch
pub fn resolve_head(repo: &dyn RepositoryHandle) -> Result<Branch> {
    let name = repo
        .current_branch()?
        .ok_or_else(|| Error::DetachedHead("check out the branch to merge first".to_string()))?;

    let head = repo
        .find_branch(&name, &BranchKind::Local)?
        .ok_or_else(|| Error::ReferenceNotFound(name.clone()))?;

    debug!(branch = %name, head = %head.short(), "resolved current branch");
    Ok(Branch::local(name, head))
}

/// Resolve a named branch of the given kind
pub fn resolve_branch(repo: &dyn RepositoryHandle, name: &str, kind: &BranchKind) -> Result<Branch> {
    let head = repo.find_branch(name, kind)?.ok_or_else(|| match kind {
        BranchKind::Local => Error::ReferenceNotFound(name.to_string()),
        BranchKind::Remote { remote } => Error::ReferenceNotFound(format!("{remote}/{name}")),
    })?;

    debug!(branch = name, ?kind, head = %head.short(), "resolved branch");
    Ok(Branch {
        name: name.to_string(),
        kind: kind.clone(),
        head,
    })
}
