//! Row-level input checks shared by the aggregators.

use scorebook_core::error::{Result, StatsError};
use scorebook_core::models::{FixtureId, MemberId};

/// Convert a recorded count to `u32`, rejecting negatives.
pub(crate) fn non_negative(
    field: &str,
    value: i32,
    member_id: MemberId,
    fixture_id: FixtureId,
) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        StatsError::invalid(format!(
            "{field} must be >= 0, got {value} (member {member_id}, fixture {fixture_id})"
        ))
    })
}

/// Add `value` to a running `total`, failing instead of overflowing.
pub(crate) fn accumulate(
    field: &str,
    total: &mut u32,
    value: u32,
    member_id: MemberId,
    fixture_id: FixtureId,
) -> Result<()> {
    *total = total.checked_add(value).ok_or_else(|| {
        StatsError::invalid(format!(
            "{field} total overflows for member {member_id} (fixture {fixture_id})"
        ))
    })?;
    Ok(())
}

/// Reject a row whose member differs from the one being aggregated.
pub(crate) fn same_member(expected: MemberId, actual: MemberId, fixture_id: FixtureId) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(StatsError::invalid(format!(
            "row for member {actual} (fixture {fixture_id}) passed to aggregation for member {expected}"
        )))
    }
}
