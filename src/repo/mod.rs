//! Repository access
//!
//! [`RepositoryHandle`] is everything the pipeline needs from a repository.
//! [`GitRepository`] implements it with gix for local state and the git
//! CLI for network operations.

mod git;
mod remote;

pub use git::GitRepository;
pub use remote::configure_credential;

use crate::auth::Credential;
use crate::error::Result;
use crate::types::{BranchKind, CommitId};

/// Repository operations used by the ship pipeline
///
/// Branch names are short names (`feat-auth`, never `refs/heads/feat-auth`).
/// Implementations translate them to full refs.
pub trait RepositoryHandle {
    /// Short name of the checked-out branch, or `None` if HEAD is detached
    fn current_branch(&self) -> Result<Option<String>>;

    /// Head commit of a branch, or `None` if it does not exist
    fn find_branch(&self, name: &str, kind: &BranchKind) -> Result<Option<CommitId>>;

    /// Whether `ancestor` is reachable from `descendant` (a commit is its own ancestor)
    fn is_ancestor(&self, ancestor: &CommitId, descendant: &CommitId) -> Result<bool>;

    /// Whether tracked files differ from HEAD or the index
    fn is_dirty(&self) -> Result<bool>;

    /// Make `name` the checked-out branch and materialize its tree
    fn checkout_branch(&self, name: &str) -> Result<()>;

    /// Move a local branch from `expected` to `new`
    ///
    /// Fails without changes if the branch no longer points at `expected`.
    /// If the branch is checked out, the working tree follows.
    fn update_branch(&self, name: &str, expected: &CommitId, new: &CommitId) -> Result<()>;

    /// Push a local branch to the same name on `remote`
    fn push_branch(&self, remote: &str, name: &str, credential: &Credential) -> Result<()>;

    /// Delete a branch on `remote`
    fn delete_remote_branch(&self, remote: &str, name: &str, credential: &Credential)
    -> Result<()>;

    /// Delete a local branch (must not be checked out)
    fn delete_local_branch(&self, name: &str) -> Result<()>;
}
