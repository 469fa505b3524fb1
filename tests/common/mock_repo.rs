//! Mock repository, gate, and auth strategy for pipeline tests
//!
//! Not every helper is used by every test binary.

#![allow(dead_code)]

use gitmerge::auth::{AuthStrategy, Credential};
use gitmerge::confirm::ConfirmationGate;
use gitmerge::error::{Error, Result};
use gitmerge::repo::RepositoryHandle;
use gitmerge::types::{BranchKind, CommitId};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// One recorded repository call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CurrentBranch,
    FindBranch(String),
    IsAncestor(String, String),
    IsDirty,
    Checkout(String),
    UpdateBranch {
        name: String,
        expected: String,
        new: String,
    },
    Push {
        remote: String,
        name: String,
        credential: Credential,
    },
    DeleteRemote {
        remote: String,
        name: String,
    },
    DeleteLocal(String),
}

impl Call {
    /// Whether the call changes the repository or the remote
    pub const fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::Checkout(_)
                | Self::UpdateBranch { .. }
                | Self::Push { .. }
                | Self::DeleteRemote { .. }
                | Self::DeleteLocal(_)
        )
    }
}

#[derive(Debug, Default)]
struct State {
    parents: HashMap<String, Vec<String>>,
    local: HashMap<String, String>,
    remote: HashMap<(String, String), String>,
    head: Option<String>,
    dirty: bool,
}

/// In-memory commit graph with branches, HEAD, and one or more remotes
///
/// Tests can inspect final state as well as the call log.
pub struct MockRepository {
    state: Mutex<State>,
    calls: Mutex<Vec<Call>>,
    // Error injection
    error_on_checkout: Mutex<Option<String>>,
    error_on_update: Mutex<Option<String>>,
    untracked_on_update: Mutex<Option<String>>,
    error_on_push: Mutex<Option<String>>,
    error_on_delete_remote: Mutex<Option<String>>,
    error_on_delete_local: Mutex<Option<String>>,
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRepository {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            calls: Mutex::new(Vec::new()),
            error_on_checkout: Mutex::new(None),
            error_on_update: Mutex::new(None),
            untracked_on_update: Mutex::new(None),
            error_on_push: Mutex::new(None),
            error_on_delete_remote: Mutex::new(None),
            error_on_delete_local: Mutex::new(None),
        }
    }

    // === Setup ===

    /// Add a commit with the given parents
    pub fn commit(&self, id: &str, parents: &[&str]) {
        self.state.lock().unwrap().parents.insert(
            id.to_string(),
            parents.iter().map(ToString::to_string).collect(),
        );
    }

    /// Create or move a local branch
    pub fn set_branch(&self, name: &str, id: &str) {
        self.state
            .lock()
            .unwrap()
            .local
            .insert(name.to_string(), id.to_string());
    }

    /// Create or move a branch on a remote
    pub fn set_remote_branch(&self, remote: &str, name: &str, id: &str) {
        self.state
            .lock()
            .unwrap()
            .remote
            .insert((remote.to_string(), name.to_string()), id.to_string());
    }

    /// Make `name` the checked-out branch
    pub fn set_head(&self, name: &str) {
        self.state.lock().unwrap().head = Some(name.to_string());
    }

    /// Detach HEAD
    pub fn detach_head(&self) {
        self.state.lock().unwrap().head = None;
    }

    /// Mark tracked files as modified
    pub fn set_dirty(&self, dirty: bool) {
        self.state.lock().unwrap().dirty = dirty;
    }

    // === Error injection ===

    pub fn fail_checkout(&self, msg: &str) {
        *self.error_on_checkout.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_update(&self, msg: &str) {
        *self.error_on_update.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `update_branch` refuse because an untracked file is in the way
    pub fn block_update_with_untracked(&self, path: &str) {
        *self.untracked_on_update.lock().unwrap() = Some(path.to_string());
    }

    pub fn fail_push(&self, msg: &str) {
        *self.error_on_push.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_delete_remote(&self, msg: &str) {
        *self.error_on_delete_remote.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_delete_local(&self, msg: &str) {
        *self.error_on_delete_local.lock().unwrap() = Some(msg.to_string());
    }

    // === Inspection ===

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn local_branch(&self, name: &str) -> Option<String> {
        self.state.lock().unwrap().local.get(name).cloned()
    }

    pub fn remote_branch(&self, remote: &str, name: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .remote
            .get(&(remote.to_string(), name.to_string()))
            .cloned()
    }

    pub fn head(&self) -> Option<String> {
        self.state.lock().unwrap().head.clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn injected(slot: &Mutex<Option<String>>) -> Result<()> {
        slot.lock()
            .unwrap()
            .as_ref()
            .map_or(Ok(()), |msg| Err(Error::Git(msg.clone())))
    }
}

impl RepositoryHandle for MockRepository {
    fn current_branch(&self) -> Result<Option<String>> {
        self.record(Call::CurrentBranch);
        Ok(self.head())
    }

    fn find_branch(&self, name: &str, kind: &BranchKind) -> Result<Option<CommitId>> {
        self.record(Call::FindBranch(name.to_string()));
        let found = match kind {
            BranchKind::Local => self.local_branch(name),
            BranchKind::Remote { remote } => self.remote_branch(remote, name),
        };
        Ok(found.map(CommitId::new))
    }

    fn is_ancestor(&self, ancestor: &CommitId, descendant: &CommitId) -> Result<bool> {
        self.record(Call::IsAncestor(
            ancestor.to_string(),
            descendant.to_string(),
        ));
        let state = self.state.lock().unwrap();
        let mut seen = HashSet::new();
        let mut queue = vec![descendant.as_str().to_string()];
        while let Some(id) = queue.pop() {
            if id == ancestor.as_str() {
                return Ok(true);
            }
            if seen.insert(id.clone()) {
                queue.extend(state.parents.get(&id).cloned().unwrap_or_default());
            }
        }
        Ok(false)
    }

    fn is_dirty(&self) -> Result<bool> {
        self.record(Call::IsDirty);
        Ok(self.state.lock().unwrap().dirty)
    }

    fn checkout_branch(&self, name: &str) -> Result<()> {
        self.record(Call::Checkout(name.to_string()));
        Self::injected(&self.error_on_checkout)?;
        if self.local_branch(name).is_none() {
            return Err(Error::ReferenceNotFound(name.to_string()));
        }
        self.set_head(name);
        Ok(())
    }

    fn update_branch(&self, name: &str, expected: &CommitId, new: &CommitId) -> Result<()> {
        self.record(Call::UpdateBranch {
            name: name.to_string(),
            expected: expected.to_string(),
            new: new.to_string(),
        });
        Self::injected(&self.error_on_update)?;
        if let Some(path) = self.untracked_on_update.lock().unwrap().clone() {
            return Err(Error::Checkout {
                branch: name.to_string(),
                message: format!("untracked working tree files would be overwritten: {path}"),
            });
        }
        if self.local_branch(name).as_deref() != Some(expected.as_str()) {
            return Err(Error::Git(format!("'{name}' moved")));
        }
        self.set_branch(name, new.as_str());
        Ok(())
    }

    fn push_branch(&self, remote: &str, name: &str, credential: &Credential) -> Result<()> {
        self.record(Call::Push {
            remote: remote.to_string(),
            name: name.to_string(),
            credential: credential.clone(),
        });
        Self::injected(&self.error_on_push)?;
        let head = self
            .local_branch(name)
            .ok_or_else(|| Error::ReferenceNotFound(name.to_string()))?;
        self.set_remote_branch(remote, name, &head);
        Ok(())
    }

    fn delete_remote_branch(
        &self,
        remote: &str,
        name: &str,
        _credential: &Credential,
    ) -> Result<()> {
        self.record(Call::DeleteRemote {
            remote: remote.to_string(),
            name: name.to_string(),
        });
        Self::injected(&self.error_on_delete_remote)?;
        self.state
            .lock()
            .unwrap()
            .remote
            .remove(&(remote.to_string(), name.to_string()))
            .map(|_| ())
            .ok_or_else(|| Error::Git(format!("remote ref does not exist: {name}")))
    }

    fn delete_local_branch(&self, name: &str) -> Result<()> {
        self.record(Call::DeleteLocal(name.to_string()));
        Self::injected(&self.error_on_delete_local)?;
        let mut state = self.state.lock().unwrap();
        if state.head.as_deref() == Some(name) {
            return Err(Error::Git(format!("'{name}' is the checked-out branch")));
        }
        state
            .local
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::ReferenceNotFound(name.to_string()))
    }
}

/// Gate that answers from a fixed script and records what it was asked
pub struct ScriptedGate {
    answer: bool,
    pub asked: Vec<String>,
}

impl ScriptedGate {
    pub const fn approve() -> Self {
        Self {
            answer: true,
            asked: Vec::new(),
        }
    }

    pub const fn decline() -> Self {
        Self {
            answer: false,
            asked: Vec::new(),
        }
    }
}

impl ConfirmationGate for ScriptedGate {
    fn confirm(&mut self, branch: &str) -> Result<bool> {
        self.asked.push(branch.to_string());
        Ok(self.answer)
    }
}

/// Auth strategy that counts requests and can be made to fail
pub struct RecordingAuth {
    credential: Credential,
    failure: Option<String>,
    requests: Mutex<usize>,
}

impl RecordingAuth {
    pub const fn new(credential: Credential) -> Self {
        Self {
            credential,
            failure: None,
            requests: Mutex::new(0),
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            credential: Credential::Ambient,
            failure: Some(msg.to_string()),
            requests: Mutex::new(0),
        }
    }

    pub fn requests(&self) -> usize {
        *self.requests.lock().unwrap()
    }
}

impl AuthStrategy for RecordingAuth {
    fn describe(&self) -> String {
        "recording".to_string()
    }

    fn credential(&self) -> Result<Credential> {
        *self.requests.lock().unwrap() += 1;
        match &self.failure {
            Some(msg) => Err(Error::Auth(msg.clone())),
            None => Ok(self.credential.clone()),
        }
    }
}

/// Trunk `t1 <- t2`, feature `t2 <- f1 <- f2 <- f3`, feature checked out,
/// both branches present on `origin`
pub fn feature_ahead() -> MockRepository {
    let repo = MockRepository::new();
    repo.commit("t1", &[]);
    repo.commit("t2", &["t1"]);
    repo.commit("f1", &["t2"]);
    repo.commit("f2", &["f1"]);
    repo.commit("f3", &["f2"]);
    repo.set_branch("main", "t2");
    repo.set_branch("feat", "f3");
    repo.set_remote_branch("origin", "main", "t2");
    repo.set_remote_branch("origin", "feat", "f3");
    repo.set_head("feat");
    repo
}

/// Trunk and feature on the same commit
pub fn identical_heads() -> MockRepository {
    let repo = MockRepository::new();
    repo.commit("t1", &[]);
    repo.set_branch("main", "t1");
    repo.set_branch("feat", "t1");
    repo.set_remote_branch("origin", "feat", "t1");
    repo.set_head("feat");
    repo
}

/// Trunk has `t3` that the feature (`t2 <- f1`) lacks
pub fn diverged() -> MockRepository {
    let repo = MockRepository::new();
    repo.commit("t1", &[]);
    repo.commit("t2", &["t1"]);
    repo.commit("t3", &["t2"]);
    repo.commit("f1", &["t2"]);
    repo.set_branch("main", "t3");
    repo.set_branch("feat", "f1");
    repo.set_remote_branch("origin", "feat", "f1");
    repo.set_head("feat");
    repo
}
