//! Cell-grid edge (boundary) behavior.

use kith_core::{Axis, PeriodicBox};

/// How a cell grid treats neighbour cells past the edge of the box.
///
/// # Examples
///
/// ```
/// use kith_core::{DVec3, PeriodicBox};
/// use kith_space::EdgeBehavior;
///
/// let bx = PeriodicBox::new(DVec3::splat(4.0))
///     .unwrap()
///     .with_periodic([true, true, false]);
/// assert_eq!(
///     EdgeBehavior::for_box(&bx),
///     [EdgeBehavior::Wrap, EdgeBehavior::Wrap, EdgeBehavior::Absorb]
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeBehavior {
    /// Out-of-range neighbour cell wraps to the opposite side (periodic).
    Wrap,
    /// Out-of-range neighbour cell is omitted. Positions outside the box
    /// are clamped into the edge cell.
    Absorb,
}

impl EdgeBehavior {
    /// Edge behavior for each axis of `bx`, following its periodicity.
    pub fn for_box(bx: &PeriodicBox) -> [EdgeBehavior; 3] {
        Axis::ALL.map(|a| {
            if bx.is_periodic(a) {
                Self::Wrap
            } else {
                Self::Absorb
            }
        })
    }

    /// Resolve a cell index along one axis of `len` cells.
    ///
    /// Returns `None` for an absorbed out-of-range index.
    pub(crate) fn resolve(self, index: i64, len: usize) -> Option<usize> {
        let n = len as i64;
        if (0..n).contains(&index) {
            return Some(index as usize);
        }
        match self {
            Self::Wrap => Some(index.rem_euclid(n) as usize),
            Self::Absorb => None,
        }
    }
}
