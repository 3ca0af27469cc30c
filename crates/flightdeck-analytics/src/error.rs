use flightdeck_core::ErrorCode;

use crate::field::Field;

/// Errors raised while summarizing a metric.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoundsError {
    #[error("cannot compute bounds of empty set")]
    Empty,

    #[error("padding factor must be positive and finite, got {0}")]
    InvalidPadding(f64),
}

impl BoundsError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Empty => ErrorCode::EmptyBoundsSet,
            Self::InvalidPadding(_) => ErrorCode::InvalidPadding,
        }
    }
}

/// Errors raised while resolving field names and filter expressions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("unknown field '{0}'")]
    Unknown(String),

    #[error("field '{0}' is not numeric and cannot be plotted")]
    NotNumeric(Field),

    #[error("malformed filter '{0}'")]
    MalformedFilter(String),
}

impl FieldError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Unknown(_) | Self::NotNumeric(_) => ErrorCode::UnknownField,
            Self::MalformedFilter(_) => ErrorCode::InvalidFilter,
        }
    }
}

/// Any failure of a projection pass.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    #[error(transparent)]
    Bounds(#[from] BoundsError),

    #[error(transparent)]
    Field(#[from] FieldError),
}

impl ProjectionError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Bounds(err) => err.error_code(),
            Self::Field(err) => err.error_code(),
        }
    }
}
