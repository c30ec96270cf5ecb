//! Integration test: neighbour search correctness.
//!
//! Cell-list and all-pairs builds must produce identical pair sets, both
//! equal to an exhaustive minimum-image oracle. Between rebuilds, the
//! Verlet criterion must keep every pair within the cutoff listed.

use kith_core::{DVec3, Particle, ParticleId, ParticleStore, ParticleSystem, PeriodicBox};
use kith_nlist::{BuildStrategy, NeighbourList, NeighbourListConfig};
use kith_test_utils::{brute_force_pairs, init_tracing, jitter, random_gas, square_lattice, FixtureBox};
use proptest::prelude::*;

fn pair_list(nl: &NeighbourList) -> Vec<(u32, u32)> {
    nl.generation().pairs().map(|(a, b)| (a.0, b.0)).collect()
}

// ── Strategy equivalence ─────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn cell_and_all_pairs_agree(
        n in 0usize..150,
        box_length in 6.0f64..12.0,
        cutoff in 0.3f64..2.0,
        pad in 0.0f64..0.5,
        seed in any::<u64>(),
    ) {
        let store = random_gas(n, box_length, 0.5, seed);
        let base = NeighbourListConfig::new(cutoff).with_pad(pad);
        let cells = NeighbourList::new(&base, &store).unwrap();
        let brute = NeighbourList::new(&base.clone().with_build_type(BuildStrategy::AllPairs), &store).unwrap();

        prop_assert_eq!(brute.strategy(), BuildStrategy::AllPairs);
        if box_length > 2.0 * (cutoff + pad) {
            prop_assert_eq!(cells.strategy(), BuildStrategy::CellList);
        }
        let expected = brute_force_pairs(&store, cutoff + pad);
        prop_assert_eq!(pair_list(&cells), expected.clone());
        prop_assert_eq!(pair_list(&brute), expected);
    }
}

#[test]
fn periodic_lattice_pairs_wrap() {
    init_tracing();
    let store = square_lattice(4, 4, 1.0, 0.5, FixtureBox::Periodic);
    let nl = NeighbourList::new(&NeighbourListConfig::new(1.05).with_pad(0.1), &store).unwrap();
    assert_eq!(nl.strategy(), BuildStrategy::CellList);
    // Four neighbours per site, two of them through a boundary on edge sites.
    assert_eq!(nl.generation().pair_count(), 32);
    assert!(nl.generation().contains_pair(ParticleId(0), ParticleId(3)));
    assert!(nl.generation().contains_pair(ParticleId(12), ParticleId(0)));
}

#[test]
fn open_lattice_pairs_stop_at_walls() {
    let store = square_lattice(3, 3, 1.0, 0.5, FixtureBox::Open);
    let nl = NeighbourList::new(&NeighbourListConfig::new(1.05).with_pad(0.1), &store).unwrap();
    assert_eq!(nl.generation().pair_count(), 12);
    assert!(!nl.generation().contains_pair(ParticleId(0), ParticleId(2)));
    assert_eq!(pair_list(&nl), brute_force_pairs(&store, 1.15));
}

// ── Minimum image ────────────────────────────────────────────────────

#[test]
fn separation_measured_through_boundary() {
    let bx = PeriodicBox::new(DVec3::splat(10.0)).unwrap();
    let mut store = ParticleStore::new(bx);
    store.push(Particle::new(DVec3::new(0.1, 5.0, 5.0), 0.5)).unwrap();
    store.push(Particle::new(DVec3::new(9.9, 5.0, 5.0), 0.5)).unwrap();

    let dr = store.minimum_image(store.position(ParticleId(1)) - store.position(ParticleId(0)));
    assert!((dr.length() - 0.2).abs() < 1e-12);

    for strategy in [BuildStrategy::CellList, BuildStrategy::AllPairs] {
        let config = NeighbourListConfig::new(0.25).with_pad(0.0).with_build_type(strategy);
        let nl = NeighbourList::new(&config, &store).unwrap();
        assert_eq!(nl.strategy(), strategy);
        assert_eq!(nl.neighbours(ParticleId(0)), &[ParticleId(1)]);
    }
}

#[test]
fn non_finite_particles_have_no_neighbours() {
    let mut store = random_gas(40, 6.0, 0.5, 11);
    store.set_position(ParticleId(7), DVec3::new(f64::NAN, 1.0, 1.0));
    let nl = NeighbourList::new(&NeighbourListConfig::new(1.5), &store).unwrap();
    let generation = nl.generation();
    assert!(generation.neighbours(ParticleId(7)).is_empty());
    assert!(generation.pairs().all(|(a, b)| a != ParticleId(7) && b != ParticleId(7)));
    assert_eq!(pair_list(&nl), brute_force_pairs(&store, 2.0));
}

// ── Staleness ────────────────────────────────────────────────────────

#[test]
fn verlet_skin_keeps_interacting_pairs() {
    init_tracing();
    let cutoff = 1.0;
    let mut store = random_gas(200, 10.0, 0.3, 42);
    let mut nl = NeighbourList::new(&NeighbourListConfig::new(cutoff).with_pad(0.4), &store).unwrap();

    let mut rebuilds = 0;
    for step in 0..40 {
        jitter(&mut store, 0.03, false, 1000 + step);
        if nl.update(&store) {
            rebuilds += 1;
        } else {
            assert!(nl.max_displacement(&store) <= 0.5 * nl.pad());
        }
        let generation = nl.generation();
        for (i, j) in brute_force_pairs(&store, cutoff) {
            assert!(
                generation.contains_pair(ParticleId(i), ParticleId(j)),
                "step {step}: interacting pair ({i}, {j}) missing from generation {}",
                generation.id()
            );
        }
    }
    // Steps of up to 0.05 against a 0.2 threshold: some rebuilds, not one per step.
    assert!(rebuilds > 0);
    assert!(rebuilds < 40);
}

#[test]
fn stale_particle_flagged_individually() {
    let mut store = random_gas(20, 8.0, 0.5, 5);
    let nl = NeighbourList::new(&NeighbourListConfig::new(1.0).with_pad(0.4), &store).unwrap();
    store.translate(ParticleId(3), DVec3::new(0.25, 0.0, 0.0));
    assert!(nl.need_update(&store, ParticleId(3)));
    assert!(!nl.need_update(&store, ParticleId(4)));
    assert!(nl.needs_rebuild(&store));
    assert!(nl.need_update(&store, ParticleId(20)));
}

// ── Rescale ──────────────────────────────────────────────────────────

#[test]
fn rescale_matches_fresh_build() {
    let store = random_gas(80, 9.0, 0.5, 3);
    let mut nl = NeighbourList::new(&NeighbourListConfig::new(1.0).with_pad(0.3), &store).unwrap();
    let id = nl.rescale_cutoff(1.5, &store).unwrap();
    assert_eq!(nl.generation().id(), id);
    assert!((nl.cutoff() - 1.5).abs() < 1e-12);

    let fresh = NeighbourList::new(&NeighbourListConfig::new(1.5).with_pad(0.3), &store).unwrap();
    assert_eq!(pair_list(&nl), pair_list(&fresh));
}
