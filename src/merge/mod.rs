//! Merge engine
//!
//! Two steps, mirroring the rest of the pipeline:
//! 1. Analyze - compare trunk and feature ancestry (read-only)
//! 2. Execute - check out trunk and fast-forward it (effectful)
//!
//! Only a fast-forward produces a [`FastForward`] value, and only that
//! value lets the publisher run.

mod analysis;
mod execute;

pub use analysis::analyze_merge;
pub use execute::{FastForward, Integration, integrate};
