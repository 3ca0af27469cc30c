//! Grouping and statistics over classified collections.

mod members;
pub mod stats;

pub use members::{
    MemberGroups, TeamGroup, TeamMembership, UNASSIGNED_TEAM, group_by_member, group_by_team,
};
pub use stats::{Stats, Tally};
