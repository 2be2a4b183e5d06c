use crate::contract::ValidationError;

/// Mutable alias the platform assigns to the unpublished head of a function.
/// It is never counted against retention and never deleted.
pub const LATEST_VERSION_SENTINEL: &str = "$LATEST";

/// Parse the numbered versions out of a raw label list, dropping the
/// `$LATEST` sentinel. Published versions carry positive integer labels.
pub fn parse_numbered_versions(labels: &[String]) -> Result<Vec<u64>, ValidationError> {
    let mut versions = Vec::with_capacity(labels.len());
    for label in labels {
        if label == LATEST_VERSION_SENTINEL {
            continue;
        }
        let parsed = label.parse::<u64>().map_err(|_| {
            ValidationError::new(format!("Unexpected non-numeric version label '{label}'"))
        })?;
        versions.push(parsed);
    }

    Ok(versions)
}

/// Select the versions eligible for deletion under the retention policy.
///
/// The `keep` newest numbered versions are retained; everything older is
/// returned, in descending order (the order deletions are issued). A
/// function at or below the threshold yields an empty set.
pub fn prunable_versions(numbered: &[u64], keep: usize) -> Vec<u64> {
    if numbered.len() <= keep {
        return Vec::new();
    }

    let mut sorted = numbered.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.split_off(keep)
}
