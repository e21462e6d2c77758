use rust_decimal::Decimal;

use crate::category::CategoryRegistry;
use crate::models::Transaction;

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Fold every category's direct+nested totals into its parent's nested
/// totals, year-to-date and for each of the 12 months independently.
///
/// The fold runs "inside out": all level-4 categories first, then level 3,
/// then level 2, so a node's nested figures are fully settled before they are
/// pushed up a level. Level-1 categories have no parent and are only sinks.
/// Category depth is capped at 4, so a fixed three-iteration loop covers the
/// whole tree with no recursion.
pub fn aggregate(registry: &mut CategoryRegistry) {
    for level in (2..=4u8).rev() {
        for idx in 0..registry.len() {
            if registry.node(idx).level != level {
                continue;
            }
            let child = registry.node(idx);
            let Some(parent_idx) = child.parent else { continue };
            let total = child.direct_total + child.nested_total;
            let mut monthly = [Decimal::ZERO; 12];
            for (m, bucket) in monthly.iter_mut().enumerate() {
                *bucket = child.direct_monthly[m] + child.nested_monthly[m];
            }
            let parent = registry.node_mut(parent_idx);
            parent.nested_total += total;
            for (m, bucket) in monthly.iter().enumerate() {
                parent.nested_monthly[m] += *bucket;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Report data
// ---------------------------------------------------------------------------

/// Months with any activity across all categories: direct+nested nonzero for
/// that month. Months with no transactions (like future months of the current
/// year) get no summary and do not dilute the monthly averages.
pub fn active_months(registry: &CategoryRegistry) -> [bool; 12] {
    let mut active = [false; 12];
    for node in registry.nodes() {
        for (m, flag) in active.iter_mut().enumerate() {
            if !node.combined_monthly(m).is_zero() {
                *flag = true;
            }
        }
    }
    active
}

pub fn active_month_count(registry: &CategoryRegistry) -> usize {
    active_months(registry).iter().filter(|&&a| a).count()
}

/// Transaction handles for one category sorted by date. The sort is stable,
/// so equal-date transactions keep their journal file order.
pub fn sorted_transactions(handles: &[usize], journal: &[Transaction]) -> Vec<usize> {
    let mut sorted = handles.to_vec();
    sorted.sort_by(|&a, &b| journal[a].date.cmp(&journal[b].date));
    sorted
}
