#![forbid(unsafe_code)]
//! flightdeck-triage library.
//!
//! Classification, set algebra, grouping and statistics over a ticket
//! [`Snapshot`](flightdeck_core::Snapshot), assembled into the named values
//! a project dashboard renders.
//!
//! # Conventions
//!
//! - **Errors**: every pass is total over parsed tickets; only workflow
//!   validation returns a typed error.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod aggregate;
pub mod board;
pub mod classify;
pub mod setops;
pub mod workflow;

pub use board::{BoardColumns, BoardContext, BoardMode, Dashboard};
pub use classify::{Classifier, FixTarget};
pub use setops::filtered_list;
pub use workflow::{InvalidTransition, WorkflowState};
