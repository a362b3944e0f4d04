use chrono::{DateTime, Utc};

/// True iff the half-open intervals `[a_start, a_end)` and
/// `[b_start, b_end)` intersect. Touching endpoints do not overlap and
/// zero-length intervals overlap nothing. Every higher-level conflict
/// check in the codebase goes through this one predicate.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < a_end && b_start < b_end && a_start < b_end && b_start < a_end
}
