//! gitmerge - fast-forward the current branch into trunk, push, and clean up

mod cli;

use clap::Parser;
use cli::ship::{RunOptions, print_error, run_ship};
use gitmerge::config::{AuthMethod, ConfigOverrides};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gitmerge")]
#[command(about = "Fast-forward the current branch into trunk, push it, and delete the branch")]
#[command(version)]
struct Cli {
    /// Path to the repository (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    path: PathBuf,

    /// Trunk branch to merge into
    #[arg(long)]
    trunk: Option<String>,

    /// Remote to push trunk to
    #[arg(long)]
    remote: Option<String>,

    /// How to authenticate against the remote
    #[arg(long, value_parser = parse_auth)]
    auth: Option<AuthMethod>,

    /// More output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_auth(value: &str) -> Result<AuthMethod, String> {
    value.parse().map_err(|e: gitmerge::Error| e.to_string())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gitmerge={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = RunOptions {
        overrides: ConfigOverrides {
            trunk: cli.trunk,
            remote: cli.remote,
            auth: cli.auth,
        },
        verbose: cli.verbose > 0,
    };

    match run_ship(&cli.path, &options) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::FAILURE
        }
    }
}
