//! Core types for gitmerge

use std::fmt;

/// Prefix of local branch refs
pub const LOCAL_BRANCH_PREFIX: &str = "refs/heads/";

/// Prefix of remote-tracking branch refs
pub const REMOTE_BRANCH_PREFIX: &str = "refs/remotes/";

/// Content-addressed id of a commit (full hex)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitId(String);

impl CommitId {
    /// Wrap a hex commit id
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Full hex form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for display
    pub fn short(&self) -> &str {
        self.0.get(..7).unwrap_or(&self.0)
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a branch lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchKind {
    /// A local branch (`refs/heads/<name>`)
    Local,
    /// A remote-tracking branch (`refs/remotes/<remote>/<name>`)
    Remote {
        /// Remote name (e.g., "origin")
        remote: String,
    },
}

/// A branch resolved to its head commit
///
/// `name` is always the short name; ref prefixes stay inside the
/// repository backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// Short branch name (e.g., "feat-auth")
    pub name: String,
    /// Local or remote-tracking
    pub kind: BranchKind,
    /// Commit the branch points at
    pub head: CommitId,
}

impl Branch {
    /// Create a local branch value
    pub fn local(name: impl Into<String>, head: CommitId) -> Self {
        Self {
            name: name.into(),
            kind: BranchKind::Local,
            head,
        }
    }

    /// Full ref name used to address this branch in the repository
    pub fn full_ref_name(&self) -> String {
        full_ref_name(&self.name, &self.kind)
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            BranchKind::Local => f.write_str(&self.name),
            BranchKind::Remote { remote } => write!(f, "{remote}/{}", self.name),
        }
    }
}

/// Full ref name for a short branch name of the given kind
pub fn full_ref_name(name: &str, kind: &BranchKind) -> String {
    match kind {
        BranchKind::Local => format!("{LOCAL_BRANCH_PREFIX}{name}"),
        BranchKind::Remote { remote } => format!("{REMOTE_BRANCH_PREFIX}{remote}/{name}"),
    }
}

/// How the feature branch relates to trunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAnalysis {
    /// Trunk already contains the feature's history
    UpToDate,
    /// Trunk can move straight to the feature's head
    FastForward,
    /// Both sides have commits the other lacks
    Diverged,
}

impl MergeAnalysis {
    /// Classify from the two ancestry answers
    ///
    /// `trunk_contains_feature` takes precedence, so identical heads are
    /// `UpToDate`.
    pub const fn from_ancestry(trunk_contains_feature: bool, feature_contains_trunk: bool) -> Self {
        if trunk_contains_feature {
            Self::UpToDate
        } else if feature_contains_trunk {
            Self::FastForward
        } else {
            Self::Diverged
        }
    }
}

impl fmt::Display for MergeAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpToDate => write!(f, "up-to-date"),
            Self::FastForward => write!(f, "fast-forward"),
            Self::Diverged => write!(f, "diverged"),
        }
    }
}

/// Pipeline stage identifier, used to tag progress and failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Loading configuration
    Config,
    /// Opening the repository
    Open,
    /// Resolving branch names to commits
    Resolve,
    /// Asking the operator
    Confirm,
    /// Checking out trunk
    Checkout,
    /// Analyzing and fast-forwarding
    Merge,
    /// Pushing trunk to the remote
    Publish,
    /// Deleting the feature branch on the remote
    RemoteDelete,
    /// Deleting the local feature branch
    LocalDelete,
    /// Unclassified repository access
    Repository,
}

impl Stage {
    /// Short tag printed next to status lines
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Open => "open",
            Self::Resolve => "resolve",
            Self::Confirm => "confirm",
            Self::Checkout => "checkout",
            Self::Merge => "merge",
            Self::Publish => "push",
            Self::RemoteDelete => "remote-delete",
            Self::LocalDelete => "local-delete",
            Self::Repository => "repository",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Terminal state of a run that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShipOutcome {
    /// The operator declined; nothing was touched
    Cancelled {
        /// Branch that was offered
        branch: String,
    },
    /// Trunk already contains the feature branch; nothing was pushed
    UpToDate {
        /// Feature branch name
        branch: String,
        /// Trunk branch name
        trunk: String,
    },
    /// Trunk has commits the feature branch lacks; nothing was pushed
    Diverged {
        /// Feature branch name
        branch: String,
        /// Trunk branch name
        trunk: String,
    },
    /// Trunk was fast-forwarded, published, and the feature branch removed
    Shipped {
        /// Feature branch name
        branch: String,
        /// Trunk branch name
        trunk: String,
        /// Remote that received trunk
        remote: String,
        /// New trunk head
        head: CommitId,
    },
}

impl ShipOutcome {
    /// Whether the repository or remote was changed
    pub const fn mutated(&self) -> bool {
        matches!(self, Self::Shipped { .. })
    }
}
