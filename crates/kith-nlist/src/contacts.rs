//! Contact graphs derived from a neighbour-list generation.
//!
//! A contact is a neighbour pair whose current separation is below the
//! contact distance. The graph is rebuilt wholesale from the adjacency and
//! never patched.

use kith_core::{GenerationId, ParticleId, ParticleSystem};
use kith_planar::{PlanarError, UndirectedGraph};
use smallvec::SmallVec;

use crate::generation::Generation;

/// How the contact distance for a pair is chosen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ContactRule {
    /// Sum of the two particles' radii, evaluated per pair.
    RadiusSum,
    /// The same distance for every pair.
    Fixed(f64),
}

impl ContactRule {
    /// Contact distance for a pair with radii `ri` and `rj`.
    pub fn threshold(self, ri: f64, rj: f64) -> f64 {
        match self {
            Self::RadiusSum => ri + rj,
            Self::Fixed(d) => d,
        }
    }
}

type ContactRow = SmallVec<[ParticleId; 8]>;

/// Undirected simple graph of particles in contact.
///
/// Edges are stored canonically as `(i, j)` with `i < j`, ordered by `i`
/// then `j`. Per-particle adjacency is symmetric and ascending.
#[derive(Clone, Debug, PartialEq)]
pub struct ContactGraph {
    generation: GenerationId,
    rule: ContactRule,
    edges: Vec<(ParticleId, ParticleId)>,
    adjacency: Vec<ContactRow>,
}

impl ContactGraph {
    /// Filter `generation`'s pairs by current separation under `rule`.
    ///
    /// Pairs whose separation is non-finite, or that reference particles
    /// no longer in `system`, are skipped.
    pub fn build(generation: &Generation, system: &dyn ParticleSystem, rule: ContactRule) -> Self {
        let n = generation.particle_count();
        let live = system.particle_count();
        let mut edges = Vec::new();
        let mut adjacency = vec![ContactRow::new(); n];
        for (i, j) in generation.pairs() {
            if i.index() >= live || j.index() >= live {
                continue;
            }
            let dr = system.minimum_image(system.position(j) - system.position(i));
            let separation = dr.length();
            if !separation.is_finite() {
                continue;
            }
            if separation < rule.threshold(system.radius(i), system.radius(j)) {
                edges.push((i, j));
                adjacency[i.index()].push(j);
                adjacency[j.index()].push(i);
            }
        }
        // Pairs arrive sorted by (i, j), so row i receives every smaller
        // partner before any larger one and stays ascending.
        Self {
            generation: generation.id(),
            rule,
            edges,
            adjacency,
        }
    }

    /// The generation this graph was derived from.
    pub fn generation(&self) -> GenerationId {
        self.generation
    }

    /// The rule in force when the graph was built.
    pub fn rule(&self) -> ContactRule {
        self.rule
    }

    /// Number of vertices (particles covered by the generation).
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of contacts.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Contacts as `(i, j)` with `i < j`.
    pub fn edges(&self) -> &[(ParticleId, ParticleId)] {
        &self.edges
    }

    /// Particles in contact with `id`, ascending. Empty when out of range.
    pub fn neighbours(&self, id: ParticleId) -> &[ParticleId] {
        self.adjacency
            .get(id.index())
            .map(|row| row.as_slice())
            .unwrap_or(&[])
    }

    /// Whether `{a, b}` is a contact.
    pub fn contains_edge(&self, a: ParticleId, b: ParticleId) -> bool {
        self.neighbours(a).binary_search(&b).is_ok()
    }

    /// Contact distance `rule` assigns to the pair `{i, j}` in `system`.
    pub fn threshold_for(&self, system: &dyn ParticleSystem, i: ParticleId, j: ParticleId) -> f64 {
        self.rule.threshold(system.radius(i), system.radius(j))
    }

    /// Copy into a [`UndirectedGraph`] over vertex indices.
    pub fn to_planar_graph(&self) -> Result<UndirectedGraph, PlanarError> {
        UndirectedGraph::from_edges(
            self.vertex_count(),
            self.edges.iter().map(|&(i, j)| (i.index(), j.index())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{AllPairsSearch, BuildStrategy};
    use kith_core::{DVec3, Particle, ParticleStore, PeriodicBox};

    fn generation_for(s: &ParticleStore, radius: f64) -> Generation {
        let p: Vec<DVec3> = s.positions().collect();
        let out = AllPairsSearch.run(s, &p, radius);
        Generation::new(
            GenerationId(1),
            BuildStrategy::AllPairs,
            radius,
            *s.periodic_box(),
            out.adjacency,
            p,
        )
    }

    fn chain(radii: &[f64], spacing: f64) -> ParticleStore {
        let mut s = ParticleStore::new(PeriodicBox::new(DVec3::splat(50.0)).unwrap());
        for (k, &r) in radii.iter().enumerate() {
            s.push(Particle::new(DVec3::new(1.0 + k as f64 * spacing, 5.0, 5.0), r))
                .unwrap();
        }
        s
    }

    #[test]
    fn radius_sum_is_per_pair() {
        // Gaps of 1.0; only pairs touching a large particle overlap.
        let s = chain(&[0.4, 0.4, 0.7, 0.7], 1.0);
        let g = generation_for(&s, 3.0);
        let c = ContactGraph::build(&g, &s, ContactRule::RadiusSum);
        assert_eq!(c.edges(), &[(ParticleId(1), ParticleId(2)), (ParticleId(2), ParticleId(3))]);
        assert!((c.threshold_for(&s, ParticleId(0), ParticleId(1)) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn fixed_distance_applies_to_all() {
        let s = chain(&[0.1, 0.1, 0.1], 1.0);
        let g = generation_for(&s, 3.0);
        let c = ContactGraph::build(&g, &s, ContactRule::Fixed(1.5));
        assert_eq!(c.edge_count(), 2);
        assert_eq!(c.neighbours(ParticleId(1)), &[ParticleId(0), ParticleId(2)]);
        assert!(c.contains_edge(ParticleId(2), ParticleId(1)));
        assert!(!c.contains_edge(ParticleId(0), ParticleId(2)));
    }

    #[test]
    fn contacts_are_subset_of_neighbours() {
        let s = chain(&[1.0; 6], 0.9);
        let g = generation_for(&s, 1.0);
        let c = ContactGraph::build(&g, &s, ContactRule::Fixed(0.95));
        for &(i, j) in c.edges() {
            assert!(g.contains_pair(i, j));
        }
        // A radius sum of 2.0 would admit the 1.8 pairs, but they are not neighbours.
        let wide = ContactGraph::build(&g, &s, ContactRule::RadiusSum);
        assert!(wide.edges().iter().all(|&(i, j)| g.contains_pair(i, j)));
        assert_eq!(wide.edge_count(), 5);
    }

    #[test]
    fn idempotent_for_same_generation() {
        let s = chain(&[0.5; 5], 0.8);
        let g = generation_for(&s, 2.0);
        let a = ContactGraph::build(&g, &s, ContactRule::RadiusSum);
        let b = ContactGraph::build(&g, &s, ContactRule::RadiusSum);
        assert_eq!(a, b);
        assert_eq!(a.generation(), GenerationId(1));
    }

    #[test]
    fn degenerate_pairs_skipped() {
        let mut s = chain(&[0.5, 0.5], 0.5);
        let g = generation_for(&s, 2.0);
        s.set_position(ParticleId(1), DVec3::new(f64::INFINITY, 5.0, 5.0));
        let c = ContactGraph::build(&g, &s, ContactRule::RadiusSum);
        assert_eq!(c.edge_count(), 0);
        assert_eq!(c.vertex_count(), 2);
    }

    #[test]
    fn converts_to_planar_graph() {
        let s = chain(&[0.5; 4], 0.8);
        let g = generation_for(&s, 1.0);
        let c = ContactGraph::build(&g, &s, ContactRule::RadiusSum);
        let pg = c.to_planar_graph().unwrap();
        assert_eq!(pg.vertex_count(), 4);
        assert_eq!(pg.edge_count(), 3);
        assert!(pg.has_edge(2, 3));
    }

    #[test]
    fn empty_adjacency_gives_empty_graph() {
        let s = chain(&[], 1.0);
        let g = generation_for(&s, 1.0);
        let c = ContactGraph::build(&g, &s, ContactRule::RadiusSum);
        assert_eq!(c.vertex_count(), 0);
        assert!(c.neighbours(ParticleId(0)).is_empty());
    }
}
