//! Set subtraction over named collections.
//!
//! Board columns are built from overlapping predicates. Subtracting one
//! column from another keeps a ticket from showing up twice, e.g.
//! "fixed without testing" is `fixed - testing - screen approved`.

use std::collections::HashSet;

use flightdeck_core::{Collection, TicketId};

/// Every ticket of `base` whose id is in none of `subtract`.
///
/// Membership is by id. The subtrahends act as one union, and `base` order
/// is preserved. With no subtrahends the result equals `base`.
#[must_use]
pub fn filtered_list<'a>(base: &Collection<'a>, subtract: &[&Collection<'_>]) -> Collection<'a> {
    if subtract.is_empty() {
        return base.clone();
    }
    let removed: HashSet<&TicketId> = subtract.iter().flat_map(|c| c.ids()).collect();
    base.filter(|t| !removed.contains(&t.id))
}
