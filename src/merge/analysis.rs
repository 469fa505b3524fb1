//! Merge analysis - ancestry checks only, no mutation

use crate::error::Result;
use crate::repo::RepositoryHandle;
use crate::types::{Branch, MergeAnalysis};
use tracing::debug;

/// Classify how `feature` relates to `trunk`
///
/// Trunk reaching the feature head wins, so identical heads are
/// [`MergeAnalysis::UpToDate`] and the second walk is skipped.
pub fn analyze_merge(
    repo: &dyn RepositoryHandle,
    trunk: &Branch,
    feature: &Branch,
) -> Result<MergeAnalysis> {
    let trunk_contains_feature = repo.is_ancestor(&feature.head, &trunk.head)?;
    let feature_contains_trunk =
        !trunk_contains_feature && repo.is_ancestor(&trunk.head, &feature.head)?;

    let analysis = MergeAnalysis::from_ancestry(trunk_contains_feature, feature_contains_trunk);
    debug!(
        trunk = %trunk.name,
        feature = %feature.name,
        %analysis,
        "analyzed merge"
    );
    Ok(analysis)
}
