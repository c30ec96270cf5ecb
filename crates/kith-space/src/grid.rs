//! Uniform 3D bucket grid over a (possibly periodic) box.

use kith_core::{Axis, DVec3, ParticleId, PeriodicBox};
use smallvec::SmallVec;

use crate::edge::EdgeBehavior;
use crate::error::SpaceError;
use crate::partition::{CandidateCells, SpatialPartition};

/// A uniform cell grid sized so each cell is at least `radius` wide.
///
/// Each axis of length `L` is split into `max(1, floor(L / radius))` cells.
/// Members are stored compressed: one flat array of particle IDs sorted by
/// cell, plus per-cell start offsets. Within a cell, IDs are ascending, so
/// neighbour searches that walk candidate cells in order are deterministic.
///
/// # Examples
///
/// ```
/// use kith_core::{DVec3, PeriodicBox};
/// use kith_space::{CellGrid, SpatialPartition};
///
/// let bx = PeriodicBox::new(DVec3::splat(10.0)).unwrap();
/// let mut grid = CellGrid::new(&bx, 2.5).unwrap();
/// assert_eq!(grid.dims(), [4, 4, 4]);
///
/// grid.rebuild(&[DVec3::new(0.1, 0.1, 0.1), DVec3::new(9.9, 0.1, 0.1)]);
/// // Opposite faces are adjacent cells under periodic wrap.
/// let near = grid.candidate_cells(DVec3::new(0.1, 0.1, 0.1));
/// assert!(near.contains(&grid.cell_of(DVec3::new(9.9, 0.1, 0.1))));
/// ```
#[derive(Debug, Clone)]
pub struct CellGrid {
    bx: PeriodicBox,
    radius: f64,
    dims: [usize; 3],
    cell_size: DVec3,
    edges: [EdgeBehavior; 3],
    /// `cell_starts[c]..cell_starts[c + 1]` indexes `members` for cell `c`.
    cell_starts: Vec<usize>,
    members: Vec<ParticleId>,
}

impl CellGrid {
    /// Upper bound on the number of cells a grid may allocate.
    pub const MAX_CELLS: usize = 1 << 24;

    /// Create an empty grid for `bx` with cells at least `radius` wide.
    ///
    /// Returns `Err(SpaceError::InvalidRadius)` unless `radius` is finite
    /// and positive, or `Err(SpaceError::TooManyCells)` if the grid would
    /// exceed [`MAX_CELLS`](Self::MAX_CELLS).
    pub fn new(bx: &PeriodicBox, radius: f64) -> Result<Self, SpaceError> {
        let dims = grid_dims(bx, radius)?;
        let lengths = bx.lengths();
        let cell_size = DVec3::new(
            lengths.x / dims[0] as f64,
            lengths.y / dims[1] as f64,
            lengths.z / dims[2] as f64,
        );
        let cell_count = dims[0] * dims[1] * dims[2];
        Ok(Self {
            bx: *bx,
            radius,
            dims,
            cell_size,
            edges: EdgeBehavior::for_box(bx),
            cell_starts: vec![0; cell_count + 1],
            members: Vec::new(),
        })
    }

    /// Check that `bx` is large enough for cell-based search at `radius`.
    ///
    /// Every periodic length must exceed `2 * radius`; otherwise a particle
    /// could meet its own periodic image among the candidate cells.
    pub fn ensure_image_free(bx: &PeriodicBox, radius: f64) -> Result<(), SpaceError> {
        for axis in Axis::ALL {
            let length = bx.lengths()[axis.index()];
            if bx.is_periodic(axis) && length <= 2.0 * radius {
                return Err(SpaceError::BoxTooSmall {
                    axis,
                    length,
                    radius,
                });
            }
        }
        Ok(())
    }

    /// Cells per axis.
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// The box this grid partitions.
    pub fn periodic_box(&self) -> &PeriodicBox {
        &self.bx
    }

    /// Whether this grid was built for exactly `bx` and `radius`.
    pub fn matches(&self, bx: &PeriodicBox, radius: f64) -> bool {
        self.bx == *bx && self.radius == radius
    }

    /// Re-bucket `positions`, first resizing the grid if the box or radius
    /// changed since it was created.
    ///
    /// On error the grid is left unchanged.
    pub fn rebuild_for_radius(
        &mut self,
        bx: &PeriodicBox,
        radius: f64,
        positions: &[DVec3],
    ) -> Result<(), SpaceError> {
        if !self.matches(bx, radius) {
            *self = Self::new(bx, radius)?;
        }
        self.rebuild(positions);
        Ok(())
    }

    /// Cell coordinate along `axis` for a position component.
    fn axis_cell(&self, axis: usize, value: f64) -> usize {
        let n = self.dims[axis];
        let f = ((value - self.bx.lo()[axis]) / self.cell_size[axis]).floor();
        // Saturating cast: NaN maps to 0, overflow to the i64 bounds.
        let k = f as i64;
        match self.edges[axis] {
            EdgeBehavior::Wrap => k.rem_euclid(n as i64) as usize,
            EdgeBehavior::Absorb => k.clamp(0, n as i64 - 1) as usize,
        }
    }

    fn cell_coords(&self, position: DVec3) -> [usize; 3] {
        [
            self.axis_cell(0, position.x),
            self.axis_cell(1, position.y),
            self.axis_cell(2, position.z),
        ]
    }

    fn linear(&self, c: [usize; 3]) -> usize {
        c[0] + self.dims[0] * (c[1] + self.dims[1] * c[2])
    }
}

/// Cells per axis for `radius`, validated against the cell budget.
fn grid_dims(bx: &PeriodicBox, radius: f64) -> Result<[usize; 3], SpaceError> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(SpaceError::InvalidRadius { radius });
    }
    let lengths = bx.lengths();
    let per_axis = Axis::ALL.map(|a| (lengths[a.index()] / radius).floor().max(1.0));
    let requested = per_axis[0] * per_axis[1] * per_axis[2];
    if requested > CellGrid::MAX_CELLS as f64 {
        return Err(SpaceError::TooManyCells {
            requested,
            max: CellGrid::MAX_CELLS,
        });
    }
    Ok(per_axis.map(|n| n as usize))
}

impl SpatialPartition for CellGrid {
    fn radius(&self) -> f64 {
        self.radius
    }

    fn cell_count(&self) -> usize {
        self.cell_starts.len() - 1
    }

    fn particle_count(&self) -> usize {
        self.members.len()
    }

    fn rebuild(&mut self, positions: &[DVec3]) {
        let cell_count = self.cell_count();
        let cells: Vec<usize> = positions.iter().map(|p| self.linear(self.cell_coords(*p))).collect();

        // Counting sort: histogram, prefix sum, then scatter in ID order.
        self.cell_starts.clear();
        self.cell_starts.resize(cell_count + 1, 0);
        for &c in &cells {
            self.cell_starts[c + 1] += 1;
        }
        for c in 0..cell_count {
            self.cell_starts[c + 1] += self.cell_starts[c];
        }
        let mut cursor = self.cell_starts.clone();
        self.members.clear();
        self.members.resize(positions.len(), ParticleId(0));
        for (i, &c) in cells.iter().enumerate() {
            self.members[cursor[c]] = ParticleId(i as u32);
            cursor[c] += 1;
        }
    }

    fn cell_of(&self, position: DVec3) -> usize {
        self.linear(self.cell_coords(position))
    }

    fn candidate_cells(&self, position: DVec3) -> CandidateCells {
        let centre = self.cell_coords(position);
        let mut per_axis: [SmallVec<[usize; 3]>; 3] = Default::default();
        for axis in 0..3 {
            for offset in -1i64..=1 {
                let index = centre[axis] as i64 + offset;
                if let Some(c) = self.edges[axis].resolve(index, self.dims[axis]) {
                    per_axis[axis].push(c);
                }
            }
        }
        let mut out = CandidateCells::new();
        for &z in &per_axis[2] {
            for &y in &per_axis[1] {
                for &x in &per_axis[0] {
                    out.push(self.linear([x, y, z]));
                }
            }
        }
        // Axes with fewer than three cells wrap onto the same cell twice.
        out.sort_unstable();
        out.dedup();
        out
    }

    fn members(&self, cell: usize) -> &[ParticleId] {
        &self.members[self.cell_starts[cell]..self.cell_starts[cell + 1]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;
    use proptest::prelude::*;

    fn cube(l: f64) -> PeriodicBox {
        PeriodicBox::new(DVec3::splat(l)).unwrap()
    }

    fn lattice(l: f64, per_side: usize) -> Vec<DVec3> {
        let step = l / per_side as f64;
        let mut out = Vec::new();
        for i in 0..per_side {
            for j in 0..per_side {
                for k in 0..per_side {
                    out.push(DVec3::new(
                        (i as f64 + 0.3) * step,
                        (j as f64 + 0.6) * step,
                        (k as f64 + 0.1) * step,
                    ));
                }
            }
        }
        out
    }

    // ── Construction ────────────────────────────────────────────

    #[test]
    fn dims_floor_box_over_radius() {
        let bx = PeriodicBox::new(DVec3::new(10.0, 7.0, 1.0)).unwrap();
        let g = CellGrid::new(&bx, 2.0).unwrap();
        assert_eq!(g.dims(), [5, 3, 1]);
        assert_eq!(g.cell_count(), 15);
    }

    #[test]
    fn new_rejects_bad_radius() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                CellGrid::new(&cube(10.0), bad),
                Err(SpaceError::InvalidRadius { .. })
            ));
        }
    }

    #[test]
    fn new_rejects_excessive_cell_count() {
        assert!(matches!(
            CellGrid::new(&cube(1000.0), 1e-3),
            Err(SpaceError::TooManyCells { .. })
        ));
    }

    #[test]
    fn image_free_requires_twice_radius() {
        let bx = cube(10.0);
        assert!(CellGrid::ensure_image_free(&bx, 4.9).is_ok());
        assert!(matches!(
            CellGrid::ensure_image_free(&bx, 5.0),
            Err(SpaceError::BoxTooSmall { axis: Axis::X, .. })
        ));
        // Open axes never produce images.
        let open = bx.with_periodic([false; 3]);
        assert!(CellGrid::ensure_image_free(&open, 50.0).is_ok());
    }

    // ── Bucketing ───────────────────────────────────────────────

    #[test]
    fn rebuild_for_radius_resizes_only_on_change() {
        let bx = cube(10.0);
        let mut grid = CellGrid::new(&bx, 2.5).unwrap();
        let positions = lattice(10.0, 3);
        grid.rebuild_for_radius(&bx, 2.5, &positions).unwrap();
        assert_eq!(grid.dims(), [4, 4, 4]);
        assert_eq!(grid.particle_count(), 27);

        grid.rebuild_for_radius(&bx, 5.0, &positions).unwrap();
        assert_eq!(grid.dims(), [2, 2, 2]);
        assert_eq!(grid.radius(), 5.0);
        assert_eq!(grid.particle_count(), 27);

        assert!(grid.rebuild_for_radius(&bx, -1.0, &positions).is_err());
        assert_eq!(grid.dims(), [2, 2, 2]);
    }

    #[test]
    fn members_sorted_within_cell() {
        let mut g = CellGrid::new(&cube(10.0), 5.0).unwrap();
        g.rebuild(&[
            DVec3::new(1.0, 1.0, 1.0),
            DVec3::new(6.0, 1.0, 1.0),
            DVec3::new(2.0, 2.0, 2.0),
        ]);
        let c = g.cell_of(DVec3::new(1.0, 1.0, 1.0));
        assert_eq!(g.members(c), &[ParticleId(0), ParticleId(2)]);
        assert_eq!(g.particle_count(), 3);
    }

    #[test]
    fn positions_outside_periodic_box_wrap() {
        let g = CellGrid::new(&cube(10.0), 2.5).unwrap();
        assert_eq!(
            g.cell_of(DVec3::new(-0.5, 0.5, 0.5)),
            g.cell_of(DVec3::new(9.5, 0.5, 0.5))
        );
    }

    #[test]
    fn positions_outside_open_box_clamp() {
        let bx = cube(10.0).with_periodic([false; 3]);
        let g = CellGrid::new(&bx, 2.5).unwrap();
        assert_eq!(
            g.cell_of(DVec3::new(-3.0, 0.5, 0.5)),
            g.cell_of(DVec3::new(0.5, 0.5, 0.5))
        );
    }

    #[test]
    fn nan_position_does_not_panic() {
        let mut g = CellGrid::new(&cube(10.0), 2.5).unwrap();
        g.rebuild(&[DVec3::new(f64::NAN, 1.0, 1.0)]);
        assert_eq!(g.particle_count(), 1);
        let _ = g.candidate_cells(DVec3::splat(f64::NAN));
    }

    // ── Candidate cells ─────────────────────────────────────────

    #[test]
    fn interior_cell_has_27_candidates() {
        let g = CellGrid::new(&cube(10.0), 2.0).unwrap();
        assert_eq!(g.candidate_cells(DVec3::splat(5.0)).len(), 27);
    }

    #[test]
    fn open_corner_has_8_candidates() {
        let bx = cube(10.0).with_periodic([false; 3]);
        let g = CellGrid::new(&bx, 2.0).unwrap();
        assert_eq!(g.candidate_cells(DVec3::splat(0.1)).len(), 8);
    }

    #[test]
    fn narrow_periodic_axis_dedups() {
        let bx = PeriodicBox::new(DVec3::new(10.0, 10.0, 4.0)).unwrap();
        let g = CellGrid::new(&bx, 2.0).unwrap();
        assert_eq!(g.dims()[2], 2);
        assert_eq!(g.candidate_cells(DVec3::splat(1.0)).len(), 9 * 2);
    }

    // ── Compliance ──────────────────────────────────────────────

    #[test]
    fn compliance_periodic() {
        let bx = cube(10.0);
        let mut g = CellGrid::new(&bx, 2.2).unwrap();
        let positions = lattice(10.0, 6);
        g.rebuild(&positions);
        compliance::run_full_compliance(&g, &bx, &positions);
    }

    #[test]
    fn compliance_mixed_edges() {
        let bx = PeriodicBox::new(DVec3::new(9.0, 6.0, 3.0))
            .unwrap()
            .with_periodic([true, false, true]);
        let mut g = CellGrid::new(&bx, 1.4).unwrap();
        let positions = lattice(6.0, 5);
        g.rebuild(&positions);
        compliance::run_full_compliance(&g, &bx, &positions);
    }

    proptest! {
        #[test]
        fn candidates_cover_radius(
            seed_positions in proptest::collection::vec((0.0f64..8.0, 0.0f64..8.0, 0.0f64..8.0), 2..40),
            radius in 0.5f64..3.9,
        ) {
            let bx = cube(8.0);
            let positions: Vec<DVec3> = seed_positions
                .into_iter()
                .map(|(x, y, z)| DVec3::new(x, y, z))
                .collect();
            let mut g = CellGrid::new(&bx, radius).unwrap();
            g.rebuild(&positions);
            compliance::assert_covers_radius(&g, &bx, &positions);
        }
    }
}
