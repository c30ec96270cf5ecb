//! Test utilities for Kith development.
//!
//! Provides deterministic particle configurations ([`fixtures`]), a
//! brute-force pair oracle independent of any search strategy, and
//! [`init_tracing`] for surfacing log output in failing tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use kith_core::{ParticleId, ParticleSystem};
use tracing_subscriber::filter::LevelFilter;

pub use fixtures::{
    complete_cluster, hexagonal_patch, jitter, random_gas, square_lattice, FixtureBox,
};

/// Install a `DEBUG`-level fmt subscriber writing through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Every pair `(i, j)`, `i < j`, closer than `radius` under the system's
/// minimum-image convention, by exhaustive search.
///
/// Non-finite positions are never paired.
pub fn brute_force_pairs(system: &dyn ParticleSystem, radius: f64) -> Vec<(u32, u32)> {
    let n = system.particle_count();
    let r2 = radius * radius;
    let mut out = Vec::new();
    for i in 0..n {
        let pi = system.position(ParticleId(i as u32));
        if !pi.is_finite() {
            continue;
        }
        for j in i + 1..n {
            let pj = system.position(ParticleId(j as u32));
            if !pj.is_finite() {
                continue;
            }
            if system.minimum_image(pj - pi).length_squared() < r2 {
                out.push((i as u32, j as u32));
            }
        }
    }
    out
}
