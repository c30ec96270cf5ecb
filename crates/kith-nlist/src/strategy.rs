//! Neighbour discovery strategies.
//!
//! Both strategies find every unordered pair closer than the search radius
//! under the system's minimum-image convention and return the same half
//! adjacency. Particles with non-finite positions are never paired.

use std::fmt;

use kith_core::{DVec3, ParticleId, ParticleSystem};
use kith_space::{CellGrid, SpaceError, SpatialPartition};

use crate::generation::Adjacency;

/// Which search built a generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuildStrategy {
    /// Bucket particles into a [`CellGrid`] and check neighbouring cells.
    CellList,
    /// Check all O(N²) pairs.
    AllPairs,
}

impl BuildStrategy {
    /// Name used in configuration records: `"cell"` or `"n_square"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CellList => "cell",
            Self::AllPairs => "n_square",
        }
    }
}

impl fmt::Display for BuildStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one neighbour search.
#[derive(Clone, Debug)]
pub struct SearchOutput {
    /// The half adjacency found.
    pub adjacency: Adjacency,
    /// Number of pair distances evaluated.
    pub distance_checks: u64,
}

/// A "find all pairs within radius" capability.
pub trait NeighbourSearch {
    /// The strategy this search implements.
    fn strategy(&self) -> BuildStrategy;

    /// Find every pair of `positions` closer than `radius`.
    ///
    /// Distances use `system`'s minimum-image convention. `positions[i]` is
    /// the position of `ParticleId(i)`.
    fn search(
        &mut self,
        system: &dyn ParticleSystem,
        positions: &[DVec3],
        radius: f64,
    ) -> Result<SearchOutput, SpaceError>;
}

#[inline]
fn within(system: &dyn ParticleSystem, a: DVec3, b: DVec3, radius_sq: f64) -> bool {
    system.minimum_image(b - a).length_squared() < radius_sq
}

// ── AllPairsSearch ─────────────────────────────────────────────────

/// Exhaustive O(N²) search. Always applicable.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllPairsSearch;

impl AllPairsSearch {
    /// Infallible form of [`NeighbourSearch::search`].
    pub fn run(&self, system: &dyn ParticleSystem, positions: &[DVec3], radius: f64) -> SearchOutput {
        let radius_sq = radius * radius;
        let mut adjacency = Adjacency::with_capacity(positions.len());
        let mut row = Vec::new();
        let mut checks = 0u64;
        for (i, &pi) in positions.iter().enumerate() {
            if pi.is_finite() {
                for (j, &pj) in positions.iter().enumerate().skip(i + 1) {
                    if !pj.is_finite() {
                        continue;
                    }
                    checks += 1;
                    if within(system, pi, pj, radius_sq) {
                        row.push(ParticleId(j as u32));
                    }
                }
            }
            adjacency.push_row(&mut row);
        }
        SearchOutput {
            adjacency,
            distance_checks: checks,
        }
    }
}

impl NeighbourSearch for AllPairsSearch {
    fn strategy(&self) -> BuildStrategy {
        BuildStrategy::AllPairs
    }

    fn search(
        &mut self,
        system: &dyn ParticleSystem,
        positions: &[DVec3],
        radius: f64,
    ) -> Result<SearchOutput, SpaceError> {
        Ok(self.run(system, positions, radius))
    }
}

// ── CellSearch ─────────────────────────────────────────────────────

/// Cell-list search over a [`CellGrid`] sized to the search radius.
///
/// The grid is created on first use and resized only when the box or
/// radius changes.
#[derive(Clone, Debug, Default)]
pub struct CellSearch {
    grid: Option<CellGrid>,
}

impl CellSearch {
    /// A search with no grid allocated yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The grid used by the most recent successful search.
    pub fn grid(&self) -> Option<&CellGrid> {
        self.grid.as_ref()
    }
}

impl NeighbourSearch for CellSearch {
    fn strategy(&self) -> BuildStrategy {
        BuildStrategy::CellList
    }

    /// Fails with [`SpaceError::BoxTooSmall`] unless every periodic box
    /// length exceeds `2 * radius`, or with the grid's own error if it
    /// cannot be allocated.
    fn search(
        &mut self,
        system: &dyn ParticleSystem,
        positions: &[DVec3],
        radius: f64,
    ) -> Result<SearchOutput, SpaceError> {
        let bx = system.periodic_box();
        CellGrid::ensure_image_free(bx, radius)?;
        let grid = match &mut self.grid {
            Some(grid) => grid,
            empty => empty.insert(CellGrid::new(bx, radius)?),
        };
        grid.rebuild_for_radius(bx, radius, positions)?;

        let radius_sq = radius * radius;
        let mut adjacency = Adjacency::with_capacity(positions.len());
        let mut row = Vec::new();
        let mut checks = 0u64;
        for (i, &pi) in positions.iter().enumerate() {
            if pi.is_finite() {
                for cell in grid.candidate_cells(pi) {
                    for &j in grid.members(cell) {
                        if j.index() <= i {
                            continue;
                        }
                        let pj = positions[j.index()];
                        if !pj.is_finite() {
                            continue;
                        }
                        checks += 1;
                        if within(system, pi, pj, radius_sq) {
                            row.push(j);
                        }
                    }
                }
            }
            adjacency.push_row(&mut row);
        }
        Ok(SearchOutput {
            adjacency,
            distance_checks: checks,
        })
    }
}
