//! Progress reporting for the ship pipeline

use crate::types::Stage;

/// Receives stage transitions while a branch is shipped
///
/// Calls are made synchronously from the pipeline, in order.
pub trait ProgressCallback {
    /// A stage is starting
    fn on_stage(&self, stage: Stage, message: &str);

    /// A stage finished successfully
    fn on_stage_done(&self, stage: Stage, message: &str);

    /// A stage failed; the pipeline stops after this call
    fn on_stage_failed(&self, stage: Stage, message: &str);

    /// Free-form informational message
    fn on_message(&self, message: &str);
}

/// Progress callback that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_stage(&self, _stage: Stage, _message: &str) {}
    fn on_stage_done(&self, _stage: Stage, _message: &str) {}
    fn on_stage_failed(&self, _stage: Stage, _message: &str) {}
    fn on_message(&self, _message: &str) {}
}
