//! Error types for particle-system geometry.

use std::error::Error;
use std::fmt;

use crate::periodic::Axis;

/// Errors arising from box or particle-store construction.
#[derive(Clone, Debug, PartialEq)]
pub enum GeometryError {
    /// A box length is NaN, infinite, zero, or negative.
    InvalidBoxLength {
        /// The offending axis.
        axis: Axis,
        /// The rejected length.
        value: f64,
    },
    /// A particle radius is NaN, infinite, or negative.
    InvalidRadius {
        /// Index of the particle being inserted.
        particle: usize,
        /// The rejected radius.
        value: f64,
    },
    /// Position and radius slices passed together have different lengths.
    LengthMismatch {
        /// Number of positions supplied.
        positions: usize,
        /// Number of radii supplied.
        radii: usize,
    },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBoxLength { axis, value } => {
                write!(f, "box length along {axis} must be finite and positive, got {value}")
            }
            Self::InvalidRadius { particle, value } => {
                write!(f, "particle {particle} radius must be finite and non-negative, got {value}")
            }
            Self::LengthMismatch { positions, radii } => {
                write!(f, "{positions} positions but {radii} radii")
            }
        }
    }
}

impl Error for GeometryError {}
