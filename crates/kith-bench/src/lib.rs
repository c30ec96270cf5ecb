//! Benchmark profiles for the Kith neighbour-search workspace.
//!
//! Each profile pairs a deterministic particle configuration with the
//! neighbour-list options it is meant to exercise:
//!
//! - [`gas_profile`]: 1000 particles at unit number density, cell lists
//! - [`all_pairs_profile`]: the same gas forced onto all-pairs search
//! - [`layer_profile`]: a flat triangulated layer with faces enabled
//! - [`drift`]: seeded small displacements for staleness scans

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use kith_core::ParticleStore;
use kith_nlist::{BuildStrategy, NeighbourListConfig};
use kith_test_utils::{hexagonal_patch, jitter, random_gas};

/// Particles in the gas profiles.
pub const GAS_PARTICLES: usize = 1000;

/// 1000 particles in a periodic cube of side 10, cutoff 1.0, pad 0.3.
///
/// Search radius 1.3 gives 7 cells per axis and roughly nine neighbours
/// per particle.
pub fn gas_profile(seed: u64) -> (ParticleStore, NeighbourListConfig) {
    let store = random_gas(GAS_PARTICLES, 10.0, 0.5, seed);
    let config = NeighbourListConfig::new(1.0).with_pad(0.3);
    (store, config)
}

/// [`gas_profile`] with cell lists disabled.
pub fn all_pairs_profile(seed: u64) -> (ParticleStore, NeighbourListConfig) {
    let (store, config) = gas_profile(seed);
    (store, config.with_build_type(BuildStrategy::AllPairs))
}

/// Triangulated hexagonal layer with `rings` rings, contacts and faces on.
///
/// Holds `1 + 3 * rings * (rings + 1)` particles; the contact graph has
/// `6 * rings²` triangular faces plus the outer boundary.
pub fn layer_profile(rings: usize, seed: u64) -> (ParticleStore, NeighbourListConfig) {
    let mut store = hexagonal_patch(rings, 1.0, 0.55);
    jitter(&mut store, 0.02, true, seed);
    let config = NeighbourListConfig::new(1.2).with_pad(0.2).with_faces(true);
    (store, config)
}

/// Displace every particle by up to `amplitude` per axis.
pub fn drift(store: &mut ParticleStore, amplitude: f64, seed: u64) {
    jitter(store, amplitude, false, seed);
}
