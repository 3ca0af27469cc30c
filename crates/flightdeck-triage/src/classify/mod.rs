//! Ticket classification.
//!
//! Predicates are non-exclusive: one ticket may sit in several named
//! collections at once. Exclusivity holds only inside the fixed-target,
//! themed/unthemed and mergeable/merged groups.

mod classifier;
mod fixed;
pub mod predicates;

pub use classifier::{Classifier, bugs_with_flag};
pub use fixed::FixTarget;
