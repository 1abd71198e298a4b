//! Error infrastructure for stat-core.
//!
//! Every failure in this crate is a caller contract violation detected at the
//! public method boundary, before any state is touched. Arithmetic overflow is
//! never an error: sums saturate instead (see [`crate::saturation`]).

use crate::value::BoxId;

/// Classification of a [`StatError`].
///
/// - **InvalidArgument**: an argument the operation cannot accept
/// - **UnsupportedOperation**: the operation is not available on this value
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    InvalidArgument,
    UnsupportedOperation,
}

/// Errors raised by value boxes, aggregates and controllers.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StatError {
    /// An aggregate was asked to contain itself.
    #[error("value box {id} cannot aggregate itself")]
    SelfAggregation { id: BoxId },

    /// A controller interval whose lower bound exceeds its upper bound.
    #[error("lower limit {lower} is greater than upper limit {upper}")]
    InvalidInterval { lower: i32, upper: i32 },

    /// A write was attempted on a derived value.
    #[error("value box {id} is derived and cannot be set")]
    DerivedValue { id: BoxId },
}

impl StatError {
    /// Returns the taxonomy bucket of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::SelfAggregation { .. } | Self::InvalidInterval { .. } => {
                ErrorKind::InvalidArgument
            }
            Self::DerivedValue { .. } => ErrorKind::UnsupportedOperation,
        }
    }

    /// Returns a stable identifier for this error variant.
    ///
    /// Useful for tests and log filtering.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::SelfAggregation { .. } => "SELF_AGGREGATION",
            Self::InvalidInterval { .. } => "INVALID_INTERVAL",
            Self::DerivedValue { .. } => "DERIVED_VALUE",
        }
    }
}

/// Result alias used across stat-core.
pub type StatResult<T> = Result<T, StatError>;
