//! Network operations via the git CLI
//!
//! Push is kept as a subprocess because gix does not provide a push API.
//! Credentials reach git through the environment, never the argument list.

use crate::auth::Credential;
use crate::types::LOCAL_BRANCH_PREFIX;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tracing::debug;

/// Run `git push` with the given arguments from `workdir`
///
/// Returns git's stderr (trimmed) as the error message on failure.
pub(super) fn git_push(
    workdir: &Path,
    remote: &str,
    args: &[&str],
    credential: &Credential,
) -> Result<(), String> {
    let mut full = vec!["push", remote];
    full.extend_from_slice(args);

    let output = run_git(workdir, &full, credential)?;
    if output.status.success() {
        return Ok(());
    }
    Err(failure_message(&output))
}

/// Whether `remote` has a branch called `name`
///
/// `git push --delete` of a missing fully qualified ref only warns, so
/// deletion asks first.
pub(super) fn remote_has_branch(
    workdir: &Path,
    remote: &str,
    name: &str,
    credential: &Credential,
) -> Result<bool, String> {
    let refname = format!("{LOCAL_BRANCH_PREFIX}{name}");
    let output = run_git(
        workdir,
        &["ls-remote", "--exit-code", remote, refname.as_str()],
        credential,
    )?;

    match output.status.code() {
        Some(0) => Ok(true),
        // --exit-code: no matching refs
        Some(2) => Ok(false),
        _ => Err(failure_message(&output)),
    }
}

fn run_git(workdir: &Path, args: &[&str], credential: &Credential) -> Result<Output, String> {
    let mut cmd = Command::new("git");
    cmd.current_dir(workdir).args(args);
    configure_credential(&mut cmd, credential);

    if !matches!(credential, Credential::Ambient) {
        cmd.stdin(Stdio::null());
    }

    debug!(?args, ?credential, "running git");
    cmd.output().map_err(|e| format!("failed to run git: {e}"))
}

fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let message = stderr.trim();
    if message.is_empty() {
        format!("git exited with {}", output.status)
    } else {
        message.to_string()
    }
}

/// Attach credential material to a git subprocess
///
/// Tokens become an `http.extraHeader` set through `GIT_CONFIG_*`
/// variables; keys become `GIT_SSH_COMMAND`. Both disable git's
/// terminal prompt. `Ambient` leaves the command untouched.
pub fn configure_credential(cmd: &mut Command, credential: &Credential) {
    match credential {
        Credential::Ambient => {}
        Credential::Token { username, token } => {
            let basic = STANDARD.encode(format!("{username}:{token}"));
            cmd.env("GIT_CONFIG_COUNT", "1")
                .env("GIT_CONFIG_KEY_0", "http.extraHeader")
                .env("GIT_CONFIG_VALUE_0", format!("Authorization: Basic {basic}"))
                .env("GIT_TERMINAL_PROMPT", "0");
        }
        Credential::SshKey { private_key } => {
            let key = shell_quote(&private_key.to_string_lossy());
            cmd.env(
                "GIT_SSH_COMMAND",
                format!("ssh -i {key} -o IdentitiesOnly=yes"),
            )
            .env("GIT_TERMINAL_PROMPT", "0");
        }
    }
}

/// Single-quote for `sh`, which git uses to run `GIT_SSH_COMMAND`
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
