//! gitmerge - ship the current branch into trunk
//!
//! One run takes the checked-out feature branch and:
//! 1. asks the operator to confirm
//! 2. checks out trunk and fast-forwards it to the feature head
//! 3. pushes trunk to the remote
//! 4. deletes the feature branch on the remote, then locally
//!
//! Anything other than a clean fast-forward stops before the remote is
//! touched. Each stage hands a proof value to the next, so a push cannot
//! happen without a fast-forward and a local deletion cannot happen
//! without a remote deletion.

pub mod auth;
pub mod cleanup;
pub mod config;
pub mod confirm;
pub mod error;
pub mod merge;
pub mod progress;
pub mod publish;
pub mod repo;
pub mod resolve;
pub mod ship;
pub mod types;

pub use error::{Error, Result};
