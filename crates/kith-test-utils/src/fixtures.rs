//! Deterministic particle configurations.
//!
//! - [`hexagonal_patch`]: a flat triangular-lattice hexagon whose contact
//!   graph is a planar triangulation.
//! - [`square_lattice`]: a flat square lattice, optionally periodic.
//! - [`random_gas`]: uniformly random positions from a seeded ChaCha8 RNG.
//! - [`complete_cluster`]: `k` particles all touching each other.
//! - [`jitter`]: seeded random displacements of an existing store.

use glam::DVec3;
use kith_core::{Particle, ParticleId, ParticleStore, PeriodicBox};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// How a fixture's box treats its boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FixtureBox {
    /// Periodic on all axes, sized to tile the lattice exactly.
    Periodic,
    /// Non-periodic, with a margin so nothing touches the walls.
    Open,
}

fn store_with(bx: PeriodicBox, positions: impl IntoIterator<Item = DVec3>, radius: f64) -> ParticleStore {
    let mut store = ParticleStore::new(bx);
    for p in positions {
        store
            .push(Particle::new(p, radius))
            .expect("fixture radius must be valid");
    }
    store
}

/// Triangular-lattice hexagon with `rings` rings around a centre particle,
/// in the plane `z = 0`, centred at the origin of a large periodic box.
///
/// Holds `1 + 3 * rings * (rings + 1)` particles at nearest-neighbour
/// distance `spacing`.
pub fn hexagonal_patch(rings: usize, spacing: f64, radius: f64) -> ParticleStore {
    let r = rings as i64;
    let a = DVec3::new(spacing, 0.0, 0.0);
    let b = DVec3::new(0.5 * spacing, 0.5 * 3f64.sqrt() * spacing, 0.0);
    let mut positions = Vec::new();
    for i in -r..=r {
        for j in -r..=r {
            // Axial coordinates inside the hexagon.
            if (i + j).abs() <= r {
                positions.push(a * i as f64 + b * j as f64);
            }
        }
    }
    let extent = 4.0 * (rings as f64 + 2.0) * spacing;
    let bx = PeriodicBox::centered(DVec3::splat(extent)).expect("fixture box must be valid");
    store_with(bx, positions, radius)
}

/// `nx × ny` square lattice in the plane `z = spacing / 2`.
pub fn square_lattice(nx: usize, ny: usize, spacing: f64, radius: f64, boundary: FixtureBox) -> ParticleStore {
    let positions: Vec<DVec3> = (0..ny)
        .flat_map(|y| {
            (0..nx).map(move |x| {
                DVec3::new(
                    (x as f64 + 0.5) * spacing,
                    (y as f64 + 0.5) * spacing,
                    0.5 * spacing,
                )
            })
        })
        .collect();
    let bx = match boundary {
        FixtureBox::Periodic => PeriodicBox::new(DVec3::new(
            nx as f64 * spacing,
            ny as f64 * spacing,
            10.0 * spacing,
        )),
        FixtureBox::Open => PeriodicBox::new(DVec3::new(
            (nx as f64 + 2.0) * spacing,
            (ny as f64 + 2.0) * spacing,
            10.0 * spacing,
        ))
        .map(|bx| bx.with_periodic([false; 3])),
    }
    .expect("fixture box must be valid");
    store_with(bx, positions, radius)
}

/// `n` particles uniformly distributed in a periodic cube of side
/// `box_length`.
pub fn random_gas(n: usize, box_length: f64, radius: f64, seed: u64) -> ParticleStore {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let positions: Vec<DVec3> = (0..n)
        .map(|_| {
            DVec3::new(
                rng.random::<f64>() * box_length,
                rng.random::<f64>() * box_length,
                rng.random::<f64>() * box_length,
            )
        })
        .collect();
    let bx = PeriodicBox::new(DVec3::splat(box_length)).expect("fixture box must be valid");
    store_with(bx, positions, radius)
}

/// `k` particles on a circle of diameter `radius`, so every pair is closer
/// than the radius sum and the contact graph is the complete graph `K_k`.
pub fn complete_cluster(k: usize, radius: f64) -> ParticleStore {
    let positions: Vec<DVec3> = (0..k)
        .map(|i| {
            let t = std::f64::consts::TAU * i as f64 / k as f64;
            DVec3::new(5.0 + 0.5 * radius * t.cos(), 5.0 + 0.5 * radius * t.sin(), 5.0)
        })
        .collect();
    let bx = PeriodicBox::new(DVec3::splat(10.0 + 4.0 * radius)).expect("fixture box must be valid");
    store_with(bx, positions, radius)
}

/// Displace every particle by a uniform random vector in the cube
/// `[-amplitude, amplitude]^3`, wrapping into the box. With `planar` set,
/// the z component is left untouched.
pub fn jitter(store: &mut ParticleStore, amplitude: f64, planar: bool, seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for i in 0..store.len() {
        let mut dr = DVec3::new(
            rng.random_range(-amplitude..=amplitude),
            rng.random_range(-amplitude..=amplitude),
            rng.random_range(-amplitude..=amplitude),
        );
        if planar {
            dr.z = 0.0;
        }
        store.translate(ParticleId(i as u32), dr);
    }
}
