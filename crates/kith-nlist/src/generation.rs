//! Immutable neighbour-list generations.
//!
//! Every full build produces a new [`Generation`]: the half adjacency plus
//! the position snapshot it was computed from. The neighbour list hands
//! generations out as `Arc<Generation>`, so a reader that cloned one keeps
//! a consistent view while the list moves on.

use kith_core::{DVec3, GenerationId, ParticleId, PeriodicBox};

use crate::strategy::BuildStrategy;

/// Half adjacency in compressed row form.
///
/// Each unordered pair `{i, j}` with `i < j` appears once, in row `i`.
/// Rows are ascending and free of duplicates and self-references.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Adjacency {
    offsets: Vec<usize>,
    neighbours: Vec<ParticleId>,
}

impl Adjacency {
    pub(crate) fn with_capacity(particles: usize) -> Self {
        let mut offsets = Vec::with_capacity(particles + 1);
        offsets.push(0);
        Self {
            offsets,
            neighbours: Vec::new(),
        }
    }

    /// Append the next row. `row` is sorted and drained.
    pub(crate) fn push_row(&mut self, row: &mut Vec<ParticleId>) {
        row.sort_unstable();
        self.neighbours.append(row);
        self.offsets.push(self.neighbours.len());
    }

    /// Number of rows.
    pub fn particle_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Partners of `i` with larger index. Empty when `i` is out of range.
    pub fn row(&self, i: usize) -> &[ParticleId] {
        match (self.offsets.get(i), self.offsets.get(i + 1)) {
            (Some(&start), Some(&end)) => &self.neighbours[start..end],
            _ => &[],
        }
    }

    /// Number of unordered pairs.
    pub fn pair_count(&self) -> usize {
        self.neighbours.len()
    }

    /// All pairs `(i, j)` with `i < j`, ordered by `i` then `j`.
    pub fn pairs(&self) -> impl Iterator<Item = (ParticleId, ParticleId)> + '_ {
        (0..self.particle_count()).flat_map(move |i| {
            self.row(i)
                .iter()
                .map(move |&j| (ParticleId(i as u32), j))
        })
    }

    /// Whether `{a, b}` is stored, in either argument order.
    pub fn contains_pair(&self, a: ParticleId, b: ParticleId) -> bool {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        self.row(lo.index()).binary_search(&hi).is_ok()
    }
}

/// One full neighbour-list build.
#[derive(Clone, Debug)]
pub struct Generation {
    id: GenerationId,
    strategy: BuildStrategy,
    search_radius: f64,
    bx: PeriodicBox,
    adjacency: Adjacency,
    snapshot: Vec<DVec3>,
}

impl Generation {
    pub(crate) fn new(
        id: GenerationId,
        strategy: BuildStrategy,
        search_radius: f64,
        bx: PeriodicBox,
        adjacency: Adjacency,
        snapshot: Vec<DVec3>,
    ) -> Self {
        Self {
            id,
            strategy,
            search_radius,
            bx,
            adjacency,
            snapshot,
        }
    }

    /// Build identifier, strictly increasing per list.
    pub fn id(&self) -> GenerationId {
        self.id
    }

    /// Which search produced this generation.
    pub fn strategy(&self) -> BuildStrategy {
        self.strategy
    }

    /// `cutoff + pad` at build time.
    pub fn search_radius(&self) -> f64 {
        self.search_radius
    }

    /// The box at build time.
    pub fn periodic_box(&self) -> &PeriodicBox {
        &self.bx
    }

    /// Number of particles the build covered.
    pub fn particle_count(&self) -> usize {
        self.snapshot.len()
    }

    /// Partners of `id` with larger index, ascending.
    pub fn neighbours(&self, id: ParticleId) -> &[ParticleId] {
        self.adjacency.row(id.index())
    }

    /// The half adjacency.
    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    /// Number of unordered neighbour pairs.
    pub fn pair_count(&self) -> usize {
        self.adjacency.pair_count()
    }

    /// All unordered pairs `(i, j)` with `i < j`.
    pub fn pairs(&self) -> impl Iterator<Item = (ParticleId, ParticleId)> + '_ {
        self.adjacency.pairs()
    }

    /// Whether `{a, b}` are neighbours, in either argument order.
    pub fn contains_pair(&self, a: ParticleId, b: ParticleId) -> bool {
        self.adjacency.contains_pair(a, b)
    }

    /// Positions captured at build time.
    pub fn snapshot(&self) -> &[DVec3] {
        &self.snapshot
    }

    /// Position of `id` at build time.
    pub fn position_at_build(&self, id: ParticleId) -> Option<DVec3> {
        self.snapshot.get(id.index()).copied()
    }
}
