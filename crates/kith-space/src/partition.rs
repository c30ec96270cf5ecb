//! The core `SpatialPartition` trait.

use kith_core::{DVec3, ParticleId};
use smallvec::SmallVec;

/// Candidate cell indices for one query.
///
/// 27 inline slots cover the full 3×3×3 stencil without allocating.
pub type CandidateCells = SmallVec<[usize; 27]>;

/// Bucketed spatial index over particle positions.
///
/// Implementations guarantee that for a query position `p`, every bucketed
/// particle within [`radius()`](Self::radius) of `p` (under the box's
/// minimum-image metric) lies in one of
/// [`candidate_cells(p)`](Self::candidate_cells). They make no promise about
/// particles further away: callers compute exact distances.
///
/// # Thread Safety
///
/// `Sync` is required so that a built partition can be queried from
/// several threads at once, e.g. when neighbour searches are sharded
/// across particles.
pub trait SpatialPartition: Send + Sync {
    /// The radius the cells were sized for.
    fn radius(&self) -> f64;

    /// Total number of cells.
    fn cell_count(&self) -> usize;

    /// Number of particles bucketed by the last [`rebuild`](Self::rebuild).
    fn particle_count(&self) -> usize;

    /// Re-bucket all particles. `positions[i]` belongs to `ParticleId(i)`.
    fn rebuild(&mut self, positions: &[DVec3]);

    /// The cell containing `position`.
    fn cell_of(&self, position: DVec3) -> usize;

    /// The containing cell and its neighbours, ascending and without
    /// duplicates.
    fn candidate_cells(&self, position: DVec3) -> CandidateCells;

    /// Particles bucketed into `cell`, in ascending ID order.
    fn members(&self, cell: usize) -> &[ParticleId];
}
