//! Error types for spatial partitioning.

use kith_core::Axis;
use std::fmt;

/// Errors arising from partition construction.
#[derive(Debug, Clone, PartialEq)]
pub enum SpaceError {
    /// The cell radius is NaN, infinite, zero, or negative.
    InvalidRadius {
        /// The rejected radius.
        radius: f64,
    },
    /// The radius is so small relative to the box that the grid would
    /// exceed the cell budget.
    TooManyCells {
        /// Number of cells the radius would require.
        requested: f64,
        /// Maximum number of cells a grid may allocate.
        max: usize,
    },
    /// A periodic box length is not larger than twice the search radius,
    /// so a particle's own periodic images could appear as neighbours.
    BoxTooSmall {
        /// The offending axis.
        axis: Axis,
        /// Box length along that axis.
        length: f64,
        /// The search radius.
        radius: f64,
    },
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRadius { radius } => {
                write!(f, "cell radius must be finite and positive, got {radius}")
            }
            Self::TooManyCells { requested, max } => {
                write!(f, "grid would need {requested} cells, maximum is {max}")
            }
            Self::BoxTooSmall {
                axis,
                length,
                radius,
            } => {
                write!(
                    f,
                    "box length {length} along {axis} does not exceed twice the search radius {radius}"
                )
            }
        }
    }
}

impl std::error::Error for SpaceError {}
