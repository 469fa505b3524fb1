//! Shared test utilities

pub mod mock_repo;
pub mod temp_repo;

#[allow(unused_imports)]
pub use mock_repo::{
    Call, MockRepository, RecordingAuth, ScriptedGate, diverged, feature_ahead, identical_heads,
};
#[allow(unused_imports)]
pub use temp_repo::TempGitRepo;
