//! SpatialPartition trait compliance test helpers.
//!
//! These functions verify that a partition satisfies the invariants the
//! neighbour list relies on. Reused across backend test modules.

use crate::partition::SpatialPartition;
use indexmap::IndexSet;
use kith_core::{DVec3, ParticleId, PeriodicBox};

/// Assert that every query position's own cell is among its candidates.
pub fn assert_candidates_include_own_cell(part: &dyn SpatialPartition, positions: &[DVec3]) {
    for p in positions {
        let own = part.cell_of(*p);
        assert!(
            part.candidate_cells(*p).contains(&own),
            "candidate_cells({p:?}) does not contain own cell {own}"
        );
    }
}

/// Assert that candidate cells are ascending, unique, and in range.
pub fn assert_candidates_sorted_unique(part: &dyn SpatialPartition, positions: &[DVec3]) {
    for p in positions {
        let cells = part.candidate_cells(*p);
        for w in cells.windows(2) {
            assert!(w[0] < w[1], "candidate_cells({p:?}) not strictly ascending: {cells:?}");
        }
        if let Some(&last) = cells.last() {
            assert!(last < part.cell_count(), "candidate cell {last} out of range");
        }
    }
}

/// Assert that each particle is bucketed exactly once, in its own cell.
pub fn assert_members_partition_particles(part: &dyn SpatialPartition, positions: &[DVec3]) {
    assert_eq!(part.particle_count(), positions.len());
    let mut seen: IndexSet<ParticleId> = IndexSet::new();
    for cell in 0..part.cell_count() {
        let members = part.members(cell);
        for w in members.windows(2) {
            assert!(w[0] < w[1], "members of cell {cell} not ascending: {members:?}");
        }
        for &id in members {
            assert_eq!(
                part.cell_of(positions[id.index()]),
                cell,
                "particle {id} bucketed into cell {cell} but cell_of disagrees"
            );
            assert!(seen.insert(id), "particle {id} bucketed twice");
        }
    }
    assert_eq!(seen.len(), positions.len(), "some particles were not bucketed");
}

/// Assert that candidate-cell adjacency is symmetric between particles.
pub fn assert_candidates_symmetric(part: &dyn SpatialPartition, positions: &[DVec3]) {
    for a in positions {
        let ca = part.candidate_cells(*a);
        for b in positions {
            let cb = part.candidate_cells(*b);
            assert_eq!(
                ca.contains(&part.cell_of(*b)),
                cb.contains(&part.cell_of(*a)),
                "candidate symmetry violated between {a:?} and {b:?}"
            );
        }
    }
}

/// Assert that every particle within `radius` of a query lies in a candidate cell.
pub fn assert_covers_radius(part: &dyn SpatialPartition, bx: &PeriodicBox, positions: &[DVec3]) {
    let r = part.radius();
    for a in positions {
        let cells = part.candidate_cells(*a);
        for b in positions {
            if bx.distance(*a, *b) < r {
                assert!(
                    cells.contains(&part.cell_of(*b)),
                    "{b:?} is within {r} of {a:?} but not in a candidate cell"
                );
            }
        }
    }
}

/// Run all 5 compliance checks on a built partition.
pub fn run_full_compliance(part: &dyn SpatialPartition, bx: &PeriodicBox, positions: &[DVec3]) {
    assert_candidates_include_own_cell(part, positions);
    assert_candidates_sorted_unique(part, positions);
    assert_members_partition_particles(part, positions);
    assert_candidates_symmetric(part, positions);
    assert_covers_radius(part, bx, positions);
}
