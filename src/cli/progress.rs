//! Terminal progress reporting

use crate::cli::style::{Stylize, check, spinner_style};
use anstream::{eprintln, println};
use gitmerge::progress::ProgressCallback;
use gitmerge::types::Stage;
use indicatif::ProgressBar;
use std::cell::RefCell;
use std::time::Duration;

/// Prints stage transitions; network stages get a spinner on stderr
#[derive(Default)]
pub struct CliProgress {
    spinner: RefCell<Option<ProgressBar>>,
    verbose: bool,
}

impl CliProgress {
    /// Only network stages and their results are shown
    pub fn compact() -> Self {
        Self::default()
    }

    /// Every stage and message is shown
    pub fn verbose() -> Self {
        Self {
            spinner: RefCell::new(None),
            verbose: true,
        }
    }

    const fn is_network(stage: Stage) -> bool {
        matches!(stage, Stage::Publish | Stage::RemoteDelete)
    }

    fn take_spinner(&self) -> Option<ProgressBar> {
        self.spinner.borrow_mut().take()
    }
}

impl ProgressCallback for CliProgress {
    fn on_stage(&self, stage: Stage, message: &str) {
        if Self::is_network(stage) {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(spinner_style());
            spinner.set_message(format!("{message}..."));
            spinner.enable_steady_tick(Duration::from_millis(80));
            *self.spinner.borrow_mut() = Some(spinner);
        } else if self.verbose {
            eprintln!("{}", format!("{message}...").muted());
        }
    }

    fn on_stage_done(&self, stage: Stage, message: &str) {
        if let Some(spinner) = self.take_spinner() {
            spinner.finish_and_clear();
        }
        if self.verbose || Self::is_network(stage) || stage == Stage::LocalDelete {
            println!("{} {message}", check());
        }
    }

    fn on_stage_failed(&self, _stage: Stage, _message: &str) {
        // The error itself is printed once by the caller
        if let Some(spinner) = self.take_spinner() {
            spinner.finish_and_clear();
        }
    }

    fn on_message(&self, message: &str) {
        println!("{}", message.muted());
    }
}
