//! gix-backed [`RepositoryHandle`]

use super::RepositoryHandle;
use super::remote::{git_push, remote_has_branch};
use crate::auth::Credential;
use crate::error::{Error, Result};
use crate::types::{BranchKind, CommitId, LOCAL_BRANCH_PREFIX, full_ref_name};
use gix::bstr::ByteSlice;
use gix::refs::transaction::{Change, LogChange, PreviousValue, RefEdit, RefLog};
use gix::refs::{FullName, Target};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use tracing::{debug, warn};

/// A non-bare git repository with a working tree
pub struct GitRepository {
    repo: gix::Repository,
    workdir: PathBuf,
}

impl std::fmt::Debug for GitRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepository")
            .field("workdir", &self.workdir)
            .finish_non_exhaustive()
    }
}

impl GitRepository {
    /// Open the repository containing `path`
    pub fn open(path: &Path) -> Result<Self> {
        let repo = gix::discover(path).map_err(|e| Error::OpenRepository {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let workdir = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| Error::OpenRepository {
                path: path.to_path_buf(),
                message: "bare repositories have no working tree".to_string(),
            })?;

        debug!(workdir = %workdir.display(), "opened repository");
        Ok(Self { repo, workdir })
    }

    /// Root of the working tree
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Paths tracked by the current index
    fn tracked_paths(&self) -> std::result::Result<HashSet<String>, String> {
        let index = self
            .repo
            .index_or_empty()
            .map_err(|e| format!("failed to open index: {e}"))?;
        Ok(index_paths(&index))
    }

    /// Fresh index for `commit`'s tree
    fn index_for(&self, commit: gix::ObjectId) -> std::result::Result<gix::index::File, String> {
        let tree_id = self
            .repo
            .find_commit(commit)
            .map_err(|e| format!("commit {commit}: {e}"))?
            .tree_id()
            .map_err(|e| format!("failed to get tree from commit {commit}: {e}"))?
            .detach();

        self.repo
            .index_from_tree(&tree_id)
            .map_err(|e| format!("failed to create index from tree {tree_id}: {e}"))
    }

    /// Untracked paths on disk that checking out `commit` would overwrite
    ///
    /// A path is in the way if it is newly tracked by the target tree and
    /// something already exists there, or if one of its parent directories
    /// exists as a file.
    fn untracked_in_the_way(
        &self,
        commit: gix::ObjectId,
    ) -> std::result::Result<Vec<String>, String> {
        let previous = self.tracked_paths()?;
        let next = index_paths(&self.index_for(commit)?);

        let mut blocked: Vec<String> = next
            .difference(&previous)
            .filter(|path| self.occupied(path))
            .cloned()
            .collect();
        blocked.sort();
        Ok(blocked)
    }

    fn occupied(&self, relative: &str) -> bool {
        let path = self.workdir.join(relative);
        if path.symlink_metadata().is_ok() {
            return true;
        }
        path.ancestors()
            .skip(1)
            .take_while(|dir| *dir != self.workdir)
            .any(|dir| dir.symlink_metadata().is_ok_and(|meta| !meta.is_dir()))
    }

    /// Fail with [`Error::Checkout`] if `commit` would clobber untracked files
    fn ensure_untracked_safe(&self, branch: &str, commit: gix::ObjectId) -> Result<()> {
        const SHOWN: usize = 5;

        let blocked = self.untracked_in_the_way(commit).map_err(Error::Git)?;
        if blocked.is_empty() {
            return Ok(());
        }

        let mut list = blocked
            .iter()
            .take(SHOWN)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        if blocked.len() > SHOWN {
            list.push_str(&format!(" and {} more", blocked.len() - SHOWN));
        }
        Err(Error::Checkout {
            branch: branch.to_string(),
            message: format!("untracked working tree files would be overwritten: {list}"),
        })
    }

    /// Write `commit`'s tree into the working tree and index
    ///
    /// Files tracked by the old index but absent from the new tree are
    /// removed. Callers check [`Self::ensure_untracked_safe`] first.
    fn materialize(&self, commit: gix::ObjectId) -> std::result::Result<(), String> {
        let previous = self.tracked_paths()?;
        let mut index_file = self.index_for(commit)?;
        let next = index_paths(&index_file);

        let mut opts = self
            .repo
            .checkout_options(gix::worktree::stack::state::attributes::Source::IdMapping)
            .map_err(|e| format!("failed to get checkout options: {e}"))?;
        // Only paths that were tracked before or checked clear are written
        opts.overwrite_existing = true;
        opts.destination_is_initially_empty = false;

        let objects = self
            .repo
            .objects
            .clone()
            .into_arc()
            .map_err(|e| format!("failed to share object store: {e}"))?;

        let outcome = gix::worktree::state::checkout(
            &mut index_file,
            &self.workdir,
            objects,
            &gix::progress::Discard,
            &gix::progress::Discard,
            &AtomicBool::new(false),
            opts,
        )
        .map_err(|e| format!("checkout failed: {e}"))?;

        if let Some(first) = outcome.errors.first() {
            return Err(format!(
                "checkout had {} error(s), first: {}: {}",
                outcome.errors.len(),
                first.path,
                first.error,
            ));
        }

        index_file
            .write(gix::index::write::Options::default())
            .map_err(|e| format!("failed to write index: {e}"))?;

        for stale in previous.difference(&next) {
            self.remove_tracked_file(stale)?;
        }

        debug!(%commit, files = next.len(), "materialized commit");
        Ok(())
    }

    fn remove_tracked_file(&self, relative: &str) -> std::result::Result<(), String> {
        let path = self.workdir.join(relative);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(format!("failed to remove {}: {e}", path.display())),
        }

        // Drop directories the removal left empty
        let mut dir = path.parent();
        while let Some(d) = dir {
            if d == self.workdir || fs::remove_dir(d).is_err() {
                break;
            }
            dir = d.parent();
        }
        Ok(())
    }

    fn point_head_at(&self, name: &str) -> std::result::Result<(), String> {
        let target: FullName = full_ref_name(name, &BranchKind::Local)
            .as_str()
            .try_into()
            .map_err(|e| format!("invalid branch name '{name}': {e}"))?;
        let head: FullName = "HEAD"
            .try_into()
            .map_err(|e| format!("invalid ref name HEAD: {e}"))?;

        self.repo
            .edit_references(vec![RefEdit {
                change: Change::Update {
                    log: LogChange {
                        mode: RefLog::AndReference,
                        force_create_reflog: false,
                        message: format!("checkout: moving to {name}").into(),
                    },
                    expected: PreviousValue::Any,
                    new: Target::Symbolic(target),
                },
                name: head,
                deref: false,
            }])
            .map_err(|e| format!("failed to update HEAD: {e}"))?;
        Ok(())
    }
}

fn index_paths(index: &gix::index::File) -> HashSet<String> {
    index
        .entries()
        .iter()
        .filter_map(|entry| entry.path(index).to_str().ok().map(str::to_owned))
        .collect()
}

fn git_err(e: impl std::fmt::Display) -> Error {
    Error::Git(e.to_string())
}

fn to_object_id(id: &CommitId) -> Result<gix::ObjectId> {
    gix::ObjectId::from_hex(id.as_str().as_bytes())
        .map_err(|e| Error::Git(format!("invalid commit id '{id}': {e}")))
}

impl RepositoryHandle for GitRepository {
    fn current_branch(&self) -> Result<Option<String>> {
        let head_name = self.repo.head_name().map_err(git_err)?;
        Ok(head_name.and_then(|name| {
            name.as_bstr()
                .to_str()
                .ok()
                .and_then(|full| full.strip_prefix(LOCAL_BRANCH_PREFIX))
                .map(str::to_string)
        }))
    }

    fn find_branch(&self, name: &str, kind: &BranchKind) -> Result<Option<CommitId>> {
        let full = full_ref_name(name, kind);
        match self.repo.try_find_reference(full.as_str()) {
            Ok(Some(mut reference)) => {
                let id = reference.peel_to_id_in_place().map_err(git_err)?;
                Ok(Some(CommitId::new(id.to_string())))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(git_err(e)),
        }
    }

    fn is_ancestor(&self, ancestor: &CommitId, descendant: &CommitId) -> Result<bool> {
        if ancestor == descendant {
            return Ok(true);
        }

        let ancestor = to_object_id(ancestor)?;
        let descendant = to_object_id(descendant)?;

        let walk = self.repo.rev_walk([descendant]).all().map_err(git_err)?;
        for info in walk {
            if info.map_err(git_err)?.id == ancestor {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn is_dirty(&self) -> Result<bool> {
        self.repo.is_dirty().map_err(git_err)
    }

    fn checkout_branch(&self, name: &str) -> Result<()> {
        let head = self
            .find_branch(name, &BranchKind::Local)?
            .ok_or_else(|| Error::ReferenceNotFound(name.to_string()))?;
        let target = to_object_id(&head)?;
        let previous = self.repo.head_id().ok().map(gix::Id::detach);

        self.ensure_untracked_safe(name, target)?;
        self.materialize(target).map_err(Error::Git)?;

        if let Err(e) = self.point_head_at(name) {
            // HEAD still names the old branch; put its tree back
            if let Some(previous) = previous
                && let Err(restore) = self.materialize(previous)
            {
                warn!(error = %restore, "failed to restore working tree");
            }
            return Err(Error::Git(e));
        }

        debug!(branch = name, head = %head.short(), "checked out branch");
        Ok(())
    }

    fn update_branch(&self, name: &str, expected: &CommitId, new: &CommitId) -> Result<()> {
        let full: FullName = full_ref_name(name, &BranchKind::Local)
            .as_str()
            .try_into()
            .map_err(|e| Error::Git(format!("invalid branch name '{name}': {e}")))?;
        let old_id = to_object_id(expected)?;
        let new_id = to_object_id(new)?;
        let checked_out = self.current_branch()?.as_deref() == Some(name);

        if checked_out {
            self.ensure_untracked_safe(name, new_id)?;
        }

        self.repo
            .edit_references(vec![RefEdit {
                change: Change::Update {
                    log: LogChange {
                        mode: RefLog::AndReference,
                        force_create_reflog: false,
                        message: format!("gitmerge: fast-forward to {}", new.short()).into(),
                    },
                    expected: PreviousValue::MustExistAndMatch(Target::Object(old_id)),
                    new: Target::Object(new_id),
                },
                name: full,
                deref: false,
            }])
            .map_err(git_err)?;

        if checked_out {
            self.materialize(new_id).map_err(Error::Git)?;
        }

        debug!(branch = name, from = %expected.short(), to = %new.short(), "updated branch");
        Ok(())
    }

    fn push_branch(&self, remote: &str, name: &str, credential: &Credential) -> Result<()> {
        let refspec = format!("{LOCAL_BRANCH_PREFIX}{name}:{LOCAL_BRANCH_PREFIX}{name}");
        git_push(&self.workdir, remote, &[refspec.as_str()], credential).map_err(Error::Git)
    }

    fn delete_remote_branch(
        &self,
        remote: &str,
        name: &str,
        credential: &Credential,
    ) -> Result<()> {
        if !remote_has_branch(&self.workdir, remote, name, credential).map_err(Error::Git)? {
            return Err(Error::Git(format!(
                "remote ref does not exist: '{name}' on '{remote}'"
            )));
        }

        let target = format!("{LOCAL_BRANCH_PREFIX}{name}");
        git_push(&self.workdir, remote, &["--delete", target.as_str()], credential)
            .map_err(Error::Git)
    }

    fn delete_local_branch(&self, name: &str) -> Result<()> {
        if self.current_branch()?.as_deref() == Some(name) {
            return Err(Error::Git(format!("'{name}' is the checked-out branch")));
        }

        let full = full_ref_name(name, &BranchKind::Local);
        let reference = self
            .repo
            .try_find_reference(full.as_str())
            .map_err(git_err)?
            .ok_or_else(|| Error::ReferenceNotFound(name.to_string()))?;
        reference.delete().map_err(git_err)?;

        debug!(branch = name, "deleted local branch");
        Ok(())
    }
}
