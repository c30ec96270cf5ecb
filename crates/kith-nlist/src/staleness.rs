//! Verlet-skin staleness checks.
//!
//! A list built with search radius `cutoff + pad` stays a superset of the
//! true interaction pairs until some particle has moved more than `pad / 2`
//! since the snapshot. Any stale particle invalidates the whole list.

use kith_core::{ParticleId, ParticleSystem};

use crate::generation::Generation;

/// Minimum-image displacement of `id` since `generation` was built.
///
/// `None` when `id` is outside the snapshot or outside the system.
pub fn displacement(generation: &Generation, system: &dyn ParticleSystem, id: ParticleId) -> Option<f64> {
    if id.index() >= system.particle_count() {
        return None;
    }
    let then = generation.position_at_build(id)?;
    let now = system.position(id);
    Some(system.minimum_image(now - then).length())
}

/// Whether `id` has moved far enough to invalidate the list.
///
/// Particles missing from the snapshot are stale. A particle whose
/// position changed between finite and non-finite is stale; one that was
/// non-finite at build time and still is, is not.
pub fn is_stale(generation: &Generation, system: &dyn ParticleSystem, id: ParticleId, pad: f64) -> bool {
    let Some(then) = generation.position_at_build(id) else {
        return true;
    };
    if id.index() >= system.particle_count() {
        return true;
    }
    let now = system.position(id);
    match (then.is_finite(), now.is_finite()) {
        (true, true) => system.minimum_image(now - then).length() > 0.5 * pad,
        (false, false) => false,
        _ => true,
    }
}

/// Whether any particle is stale or the particle count changed.
pub fn any_stale(generation: &Generation, system: &dyn ParticleSystem, pad: f64) -> bool {
    system.particle_count() != generation.particle_count()
        || (0..system.particle_count())
            .any(|i| is_stale(generation, system, ParticleId(i as u32), pad))
}

/// Largest finite displacement since the snapshot, or 0 for an empty
/// system.
pub fn max_displacement(generation: &Generation, system: &dyn ParticleSystem) -> f64 {
    (0..system.particle_count().min(generation.particle_count()))
        .filter_map(|i| displacement(generation, system, ParticleId(i as u32)))
        .filter(|d| d.is_finite())
        .fold(0.0, f64::max)
}
