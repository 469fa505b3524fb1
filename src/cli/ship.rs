//! Ship command - merge the current branch into trunk and clean up

use crate::cli::CliProgress;
use crate::cli::context::CommandContext;
use crate::cli::style::Stylize;
use anstream::{eprintln, println};
use gitmerge::config::ConfigOverrides;
use gitmerge::confirm::PromptGate;
use gitmerge::error::{Error, Result};
use gitmerge::ship::{ShipOptions, ship};
use gitmerge::types::ShipOutcome;
use std::path::Path;

/// Options for the ship command
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Values from command-line flags
    pub overrides: ConfigOverrides,
    /// Show every stage, not only network ones
    pub verbose: bool,
}

/// Run the ship command
pub fn run_ship(path: &Path, options: &RunOptions) -> Result<ShipOutcome> {
    let ctx = CommandContext::new(path, &options.overrides)?;
    let ship_options = ShipOptions::from(&ctx.config);

    let progress = if options.verbose {
        CliProgress::verbose()
    } else {
        CliProgress::compact()
    };
    let mut gate = PromptGate::stdio();

    let outcome = ship(
        &ctx.repo,
        &mut gate,
        ctx.auth.as_ref(),
        &progress,
        &ship_options,
    )?;
    print_outcome(&outcome);
    Ok(outcome)
}

/// Print the status line for a run that did not fail
pub fn print_outcome(outcome: &ShipOutcome) {
    match outcome {
        ShipOutcome::Cancelled { .. } => {
            println!("🚫 {}", "Merge cancelled".muted());
        }
        ShipOutcome::UpToDate { branch, trunk } => {
            println!(
                "👍 Branch {} is already up-to-date with {}",
                branch.accent(),
                trunk.accent()
            );
            println!("   {}", format!("{trunk} is now checked out").muted());
        }
        ShipOutcome::Diverged { branch, trunk } => {
            println!(
                "🔀 {} {} has commits that {} does not; rebase {} onto {} and try again",
                "Merge is not a fast-forward:".warn(),
                trunk.accent(),
                branch.accent(),
                branch.accent(),
                trunk.accent()
            );
            println!(
                "   {}",
                format!("{trunk} is now checked out; run `git checkout {branch}` to go back").muted()
            );
        }
        ShipOutcome::Shipped {
            branch,
            trunk,
            remote,
            head,
        } => {
            println!(
                "✅ {} {} merged into {} at {}, pushed to {}, and deleted",
                "Merge successful:".success(),
                branch.accent(),
                trunk.accent(),
                head.short(),
                remote.accent()
            );
        }
    }
}

/// Print a fatal error with its stage tag and recovery hint
pub fn print_error(err: &Error) {
    eprintln!(
        "❌ [{}] {}: {err}",
        err.stage().tag(),
        err.headline().failure()
    );
    if let Some(hint) = err.recovery_hint() {
        eprintln!("   {}", hint.muted());
    }
}
