//! Error types for gitmerge
//!
//! Every variant is fatal for the run. The normal stops (cancelled,
//! already up-to-date, not a fast-forward) are not errors; they are
//! reported through [`ShipOutcome`](crate::types::ShipOutcome).

use crate::types::Stage;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while shipping a branch
#[derive(Debug, Error)]
pub enum Error {
    /// No repository could be opened at or above the given path
    #[error("failed to open repository at {}: {message}", path.display())]
    OpenRepository {
        /// Path the lookup started from
        path: PathBuf,
        /// Backend message
        message: String,
    },

    /// HEAD does not point at a local branch
    #[error("HEAD is not on a branch: {0}")]
    DetachedHead(String),

    /// A branch name does not resolve to a commit
    #[error("branch '{0}' not found")]
    ReferenceNotFound(String),

    /// The working tree has uncommitted changes to tracked files
    #[error("working tree has uncommitted changes")]
    DirtyWorktree,

    /// Materializing a branch into the working tree failed
    #[error("checkout of '{branch}' failed: {message}")]
    Checkout {
        /// Branch being checked out
        branch: String,
        /// Backend message
        message: String,
    },

    /// Advancing the trunk ref failed
    #[error("fast-forward of '{branch}' failed: {message}")]
    FastForward {
        /// Branch whose ref could not be advanced
        branch: String,
        /// Backend message
        message: String,
    },

    /// Pushing trunk to the remote failed
    #[error("push of '{branch}' to '{remote}' rejected: {message}")]
    PushRejected {
        /// Remote name
        remote: String,
        /// Branch that was pushed
        branch: String,
        /// Message from git
        message: String,
    },

    /// The authentication strategy could not produce a credential
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Deleting the feature branch on the remote failed
    #[error("deleting '{branch}' on '{remote}' failed: {message}")]
    RemoteDeletionFailed {
        /// Remote name
        remote: String,
        /// Feature branch name
        branch: String,
        /// Message from git
        message: String,
    },

    /// Deleting the local feature branch failed
    #[error("deleting local branch '{branch}' failed: {message}")]
    LocalDeletionFailed {
        /// Feature branch name
        branch: String,
        /// Backend message
        message: String,
    },

    /// Reading the operator's answer failed
    #[error("failed to read confirmation: {0}")]
    Confirmation(#[source] std::io::Error),

    /// Invalid or unreadable configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Unclassified repository backend error
    #[error("git error: {0}")]
    Git(String),
}

impl Error {
    /// The pipeline stage this error belongs to
    pub const fn stage(&self) -> Stage {
        match self {
            Self::OpenRepository { .. } => Stage::Open,
            Self::DetachedHead(_) | Self::ReferenceNotFound(_) => Stage::Resolve,
            Self::Confirmation(_) => Stage::Confirm,
            Self::DirtyWorktree | Self::Checkout { .. } => Stage::Checkout,
            Self::FastForward { .. } => Stage::Merge,
            Self::PushRejected { .. } | Self::Auth(_) => Stage::Publish,
            Self::RemoteDeletionFailed { .. } => Stage::RemoteDelete,
            Self::LocalDeletionFailed { .. } => Stage::LocalDelete,
            Self::Config(_) => Stage::Config,
            Self::Git(_) => Stage::Repository,
        }
    }

    /// Short operator-facing headline for the failure class
    pub const fn headline(&self) -> &'static str {
        match self {
            Self::PushRejected { .. } => "Push failed",
            Self::Auth(_) => "Authentication failed",
            Self::RemoteDeletionFailed { .. } => "Remote deletion failed",
            Self::LocalDeletionFailed { .. } => "Local deletion failed",
            Self::DirtyWorktree | Self::Checkout { .. } => "Checkout failed",
            Self::FastForward { .. } => "Fast-forward failed",
            Self::Config(_) => "Invalid configuration",
            _ => "Error",
        }
    }

    /// What the operator still has to fix by hand, if anything
    pub fn recovery_hint(&self) -> Option<String> {
        match self {
            Self::PushRejected { remote, branch, .. } => Some(format!(
                "'{branch}' was fast-forwarded locally but not published to '{remote}'; no branches were deleted"
            )),
            Self::Auth(_) => Some("nothing was pushed; no branches were deleted".to_string()),
            Self::RemoteDeletionFailed { remote, branch, .. } => Some(format!(
                "local branch '{branch}' was kept; delete '{branch}' on '{remote}' manually, then run `git branch -D {branch}`"
            )),
            Self::LocalDeletionFailed { branch, .. } => Some(format!(
                "the remote copy is already gone; run `git branch -D {branch}` to finish"
            )),
            Self::FastForward { branch, .. } => Some(format!(
                "check that '{branch}' was not changed concurrently and retry"
            )),
            Self::DirtyWorktree => Some("commit or stash your changes and try again".to_string()),
            _ => None,
        }
    }
}

/// Result type alias for gitmerge operations
pub type Result<T> = std::result::Result<T, Error>;
