//! Temporary git repositories for end-to-end tests
//!
//! Built with the `git` CLI so the binary is tested against repositories it
//! did not create itself.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A working clone plus a bare `origin`, both in one temp directory
pub struct TempGitRepo {
    dir: TempDir,
    work: PathBuf,
    origin: PathBuf,
}

impl TempGitRepo {
    /// Repository on `main` with one commit, pushed to `origin`
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let origin = dir.path().join("origin.git");
        let work = dir.path().join("work");
        fs::create_dir_all(dir.path().join("config")).expect("create config dir");

        run_git(dir.path(), &["init", "--bare", "-b", "main", "origin.git"]);
        run_git(dir.path(), &["init", "-b", "main", "work"]);

        let repo = Self { dir, work, origin };
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo.git(&["remote", "add", "origin", "../origin.git"]);
        repo.commit_file("README.md", "hello\n", "Initial commit");
        repo.git(&["push", "origin", "main"]);
        repo
    }

    /// Working tree path
    pub fn path(&self) -> &Path {
        &self.work
    }

    /// Bare remote path
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// Empty directory to use as `XDG_CONFIG_HOME`
    pub fn config_home(&self) -> PathBuf {
        self.dir.path().join("config")
    }

    /// Run git in the working tree and return trimmed stdout
    pub fn git(&self, args: &[&str]) -> String {
        run_git(&self.work, args)
    }

    /// Write a file and commit it on the current branch
    pub fn commit_file(&self, name: &str, content: &str, message: &str) {
        fs::write(self.work.join(name), content).expect("write file");
        self.git(&["add", name]);
        self.git(&["commit", "-m", message]);
    }

    /// Create and check out a new branch
    pub fn branch(&self, name: &str) {
        self.git(&["checkout", "-b", name]);
    }

    /// Create a feature branch with `count` commits and push it
    pub fn feature_branch(&self, name: &str, count: usize) {
        self.branch(name);
        for i in 1..=count {
            self.commit_file(
                &format!("{name}-{i}.txt"),
                &format!("change {i}\n"),
                &format!("{name}: change {i}"),
            );
        }
        self.git(&["push", "origin", name]);
    }

    /// Commit id of a revision in the working repository
    pub fn rev(&self, rev: &str) -> String {
        self.git(&["rev-parse", rev])
    }

    /// Name of the checked-out branch
    pub fn current_branch(&self) -> String {
        self.git(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    /// Whether a local branch exists
    pub fn has_local_branch(&self, name: &str) -> bool {
        !self
            .git(&["branch", "--list", name])
            .trim()
            .is_empty()
    }

    /// Commit id of a branch on `origin`, if it exists
    pub fn remote_branch(&self, name: &str) -> Option<String> {
        let refname = format!("refs/heads/{name}");
        let output = Command::new("git")
            .args(["rev-parse", "--verify", "--quiet", &refname])
            .current_dir(&self.origin)
            .output()
            .expect("run git");
        output
            .status
            .success()
            .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Make `origin` refuse every branch deletion
    #[cfg(unix)]
    pub fn reject_remote_deletions(&self) {
        use std::os::unix::fs::PermissionsExt;

        let hook = self.origin.join("hooks").join("pre-receive");
        fs::create_dir_all(hook.parent().expect("hook dir")).expect("create hooks dir");
        fs::write(
            &hook,
            "#!/bin/sh\n\
             while read old new ref; do\n\
             case \"$new\" in 0000000000000000000000000000000000000000) echo \"deletion of $ref refused\" >&2; exit 1;; esac\n\
             done\n\
             exit 0\n",
        )
        .expect("write hook");
        fs::set_permissions(&hook, fs::Permissions::from_mode(0o755)).expect("chmod hook");
    }
}

fn run_git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .expect("run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
