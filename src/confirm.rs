//! Operator confirmation

use crate::error::{Error, Result};
use std::io::{self, BufRead, Write};

/// The only answer that approves a merge
pub const AFFIRMATIVE: &str = "y";

/// Asks the operator whether to ship a branch
pub trait ConfirmationGate {
    /// `true` only on explicit approval
    fn confirm(&mut self, branch: &str) -> Result<bool>;
}

/// Prompt text for `branch`
pub fn prompt_text(branch: &str) -> String {
    format!("Are you sure you want to merge branch {branch}? [y/n] ")
}

/// Whether a raw answer line approves
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim() == AFFIRMATIVE
}

/// Line-based prompt over any reader and writer
#[derive(Debug)]
pub struct PromptGate<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptGate<R, W> {
    /// Create a gate reading from `input` and prompting on `output`
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the reader and writer
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl PromptGate<io::StdinLock<'static>, io::Stdout> {
    /// Gate on the process's stdin and stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConfirmationGate for PromptGate<R, W> {
    fn confirm(&mut self, branch: &str) -> Result<bool> {
        self.output
            .write_all(prompt_text(branch).as_bytes())
            .and_then(|()| self.output.flush())
            .map_err(Error::Confirmation)?;

        // End of input reads as an empty answer
        let mut answer = String::new();
        self.input
            .read_line(&mut answer)
            .map_err(Error::Confirmation)?;

        Ok(is_affirmative(&answer))
    }
}
