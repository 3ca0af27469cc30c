#![forbid(unsafe_code)]
//! flightdeck-analytics library.
//!
//! Projects ticket metrics onto a 2-D scatter plot: per-field bounds with
//! asymmetric padding, one-level dependency propagation, inverted radius
//! mapping, palette colours, clamped scales and AND-combined filters.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums ([`BoundsError`], [`FieldError`],
//!   [`ProjectionError`]) carrying an [`ErrorCode`](flightdeck_core::ErrorCode).
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod bounds;
pub mod error;
pub mod field;
pub mod filter;
pub mod project;
pub mod record;
pub mod scale;
pub mod visual;

pub use bounds::{Bounds, unique_values};
pub use error::{BoundsError, FieldError, ProjectionError};
pub use field::{Comparator, Field};
pub use filter::{Filter, apply_filters};
pub use project::{PlotSettings, Point, Projection, project};
pub use record::{Record, WorkingSet};
pub use scale::{LinearScale, PowScale};
