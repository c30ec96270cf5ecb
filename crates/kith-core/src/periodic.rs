//! The simulation box and the minimum-image convention.

use std::fmt;

use glam::DVec3;

use crate::error::GeometryError;

/// A Cartesian axis of the simulation box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The x axis (index 0).
    X,
    /// The y axis (index 1).
    Y,
    /// The z axis (index 2).
    Z,
}

impl Axis {
    /// All three axes in index order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index of this axis in a [`DVec3`].
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
            Self::Z => write!(f, "z"),
        }
    }
}

/// An axis-aligned simulation box with optional periodicity per axis.
///
/// The box spans `[lo, lo + lengths)` on each axis. On periodic axes,
/// displacements follow the minimum-image convention: each component is
/// replaced by its shortest periodic equivalent, so two particles near
/// opposite faces are close rather than a box length apart.
///
/// # Examples
///
/// ```
/// use kith_core::{DVec3, PeriodicBox};
///
/// let bx = PeriodicBox::new(DVec3::splat(10.0)).unwrap();
/// let a = DVec3::new(0.1, 0.0, 0.0);
/// let b = DVec3::new(9.9, 0.0, 0.0);
/// assert!((bx.distance(a, b) - 0.2).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeriodicBox {
    lo: DVec3,
    lengths: DVec3,
    periodic: [bool; 3],
}

impl PeriodicBox {
    /// Create a fully periodic box spanning `[0, lengths)`.
    ///
    /// Returns `Err(GeometryError::InvalidBoxLength)` if any length is not
    /// finite and positive.
    pub fn new(lengths: DVec3) -> Result<Self, GeometryError> {
        for axis in Axis::ALL {
            let value = lengths[axis.index()];
            if !value.is_finite() || value <= 0.0 {
                return Err(GeometryError::InvalidBoxLength { axis, value });
            }
        }
        Ok(Self {
            lo: DVec3::ZERO,
            lengths,
            periodic: [true; 3],
        })
    }

    /// Create a fully periodic box centred on the origin,
    /// spanning `[-lengths / 2, lengths / 2)`.
    pub fn centered(lengths: DVec3) -> Result<Self, GeometryError> {
        let mut bx = Self::new(lengths)?;
        bx.lo = -0.5 * lengths;
        Ok(bx)
    }

    /// Replace the per-axis periodicity flags.
    pub fn with_periodic(mut self, periodic: [bool; 3]) -> Self {
        self.periodic = periodic;
        self
    }

    /// Box edge lengths.
    pub fn lengths(&self) -> DVec3 {
        self.lengths
    }

    /// Lower corner of the box.
    pub fn lo(&self) -> DVec3 {
        self.lo
    }

    /// Whether displacements wrap along `axis`.
    pub fn is_periodic(&self, axis: Axis) -> bool {
        self.periodic[axis.index()]
    }

    /// Shortest box length over the periodic axes.
    ///
    /// Returns `f64::INFINITY` when no axis is periodic: an open box never
    /// produces spurious periodic images.
    pub fn min_periodic_length(&self) -> f64 {
        Axis::ALL
            .iter()
            .filter(|a| self.is_periodic(**a))
            .map(|a| self.lengths[a.index()])
            .fold(f64::INFINITY, f64::min)
    }

    /// Map a raw displacement to its shortest periodic equivalent.
    ///
    /// Each periodic component ends up in `[-L/2, L/2]`. Non-periodic
    /// components pass through unchanged, as do non-finite ones.
    pub fn minimum_image(&self, dr: DVec3) -> DVec3 {
        let mut out = dr;
        for axis in Axis::ALL {
            let i = axis.index();
            if self.periodic[i] {
                let l = self.lengths[i];
                out[i] = dr[i] - l * (dr[i] / l).round();
            }
        }
        out
    }

    /// Minimum-image displacement from `a` to `b`.
    pub fn displacement(&self, a: DVec3, b: DVec3) -> DVec3 {
        self.minimum_image(b - a)
    }

    /// Minimum-image distance between `a` and `b`.
    pub fn distance(&self, a: DVec3, b: DVec3) -> f64 {
        self.displacement(a, b).length()
    }

    /// Fold a position back into the box along periodic axes.
    ///
    /// Non-periodic components are returned unchanged.
    pub fn wrap(&self, position: DVec3) -> DVec3 {
        let mut out = position;
        for axis in Axis::ALL {
            let i = axis.index();
            if self.periodic[i] && position[i].is_finite() {
                let l = self.lengths[i];
                let mut offset = (position[i] - self.lo[i]).rem_euclid(l);
                // rem_euclid can round up to exactly `l` for tiny negatives.
                if offset >= l {
                    offset = 0.0;
                }
                out[i] = self.lo[i] + offset;
            }
        }
        out
    }
}
