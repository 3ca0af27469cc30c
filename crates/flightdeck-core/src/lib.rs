#![forbid(unsafe_code)]
//! flightdeck-core library.
//!
//! Ticket records as delivered by the upstream tracker, the immutable
//! [`Snapshot`](snapshot::Snapshot) a classification pass runs over, the
//! id-keyed [`Collection`](collection::Collection) every derived set is
//! expressed as, and project/user configuration.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums in library code, `anyhow::Result`
//!   at the configuration/IO edge.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod collection;
pub mod config;
pub mod error;
pub mod model;
pub mod snapshot;

pub use collection::Collection;
pub use error::{ErrorCode, ModelError};
pub use model::flag::{FlagKind, FlagSign, FlagState, Flags};
pub use model::history::{Change, Transition};
pub use model::ticket::{Kind, Priority, Ratings, Severity, Status, Ticket, TicketId};
pub use snapshot::Snapshot;
