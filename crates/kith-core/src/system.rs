//! The particle-system collaborator consumed by neighbour search.
//!
//! Neighbour lists read particle state through [`ParticleSystem`] and never
//! own or mutate it. [`ParticleStore`] is a plain `Vec`-backed
//! implementation for hosts that have no container of their own, and for
//! tests.

use glam::DVec3;

use crate::error::GeometryError;
use crate::id::ParticleId;
use crate::periodic::PeriodicBox;

/// Read-only view of the particles and box a neighbour list is built over.
///
/// Particle IDs are dense: valid IDs are `0..particle_count()`. Accessors
/// may panic when given an ID outside that range, like slice indexing.
pub trait ParticleSystem {
    /// Number of particles.
    fn particle_count(&self) -> usize;

    /// Current position of a particle.
    fn position(&self, id: ParticleId) -> DVec3;

    /// Radius of a particle.
    fn radius(&self, id: ParticleId) -> f64;

    /// Integer type tag of a particle.
    fn particle_type(&self, id: ParticleId) -> u32;

    /// The simulation box.
    fn periodic_box(&self) -> &PeriodicBox;

    /// Shortest periodic equivalent of a raw displacement.
    ///
    /// The default delegates to [`PeriodicBox::minimum_image`]. Hosts with
    /// sheared or otherwise non-orthogonal boxes override this.
    fn minimum_image(&self, dr: DVec3) -> DVec3 {
        self.periodic_box().minimum_image(dr)
    }
}

/// One particle's state as stored by [`ParticleStore`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Position in box coordinates.
    pub position: DVec3,
    /// Particle radius, used for the radius-sum contact distance.
    pub radius: f64,
    /// Integer type tag.
    pub particle_type: u32,
}

impl Particle {
    /// A particle of type 0.
    pub fn new(position: DVec3, radius: f64) -> Self {
        Self {
            position,
            radius,
            particle_type: 0,
        }
    }

    /// Set the type tag.
    pub fn with_type(mut self, particle_type: u32) -> Self {
        self.particle_type = particle_type;
        self
    }
}

/// A `Vec`-backed [`ParticleSystem`].
///
/// # Examples
///
/// ```
/// use kith_core::{DVec3, Particle, ParticleStore, ParticleSystem, PeriodicBox};
///
/// let bx = PeriodicBox::new(DVec3::splat(10.0)).unwrap();
/// let mut store = ParticleStore::new(bx);
/// let a = store.push(Particle::new(DVec3::new(1.0, 1.0, 1.0), 0.5)).unwrap();
/// store.translate(a, DVec3::new(0.25, 0.0, 0.0));
/// assert_eq!(store.particle_count(), 1);
/// assert_eq!(store.position(a).x, 1.25);
/// ```
#[derive(Clone, Debug)]
pub struct ParticleStore {
    particles: Vec<Particle>,
    bx: PeriodicBox,
}

impl ParticleStore {
    /// An empty store in the given box.
    pub fn new(bx: PeriodicBox) -> Self {
        Self {
            particles: Vec::new(),
            bx,
        }
    }

    /// Build a store from parallel position and radius slices (all type 0).
    pub fn from_positions(
        bx: PeriodicBox,
        positions: &[DVec3],
        radii: &[f64],
    ) -> Result<Self, GeometryError> {
        if positions.len() != radii.len() {
            return Err(GeometryError::LengthMismatch {
                positions: positions.len(),
                radii: radii.len(),
            });
        }
        let mut store = Self::new(bx);
        store.particles.reserve(positions.len());
        for (&p, &r) in positions.iter().zip(radii) {
            store.push(Particle::new(p, r))?;
        }
        Ok(store)
    }

    /// Append a particle, returning its ID.
    ///
    /// Rejects radii that are NaN, infinite, or negative.
    pub fn push(&mut self, particle: Particle) -> Result<ParticleId, GeometryError> {
        let index = self.particles.len();
        if !particle.radius.is_finite() || particle.radius < 0.0 {
            return Err(GeometryError::InvalidRadius {
                particle: index,
                value: particle.radius,
            });
        }
        self.particles.push(particle);
        Ok(ParticleId(index as u32))
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the store holds no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Look up a particle.
    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id.index())
    }

    /// All particles in ID order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Iterate over positions in ID order.
    pub fn positions(&self) -> impl Iterator<Item = DVec3> + '_ {
        self.particles.iter().map(|p| p.position)
    }

    /// Overwrite a particle's position.
    pub fn set_position(&mut self, id: ParticleId, position: DVec3) {
        self.particles[id.index()].position = position;
    }

    /// Move a particle by `dr`, folding the result back into the box.
    pub fn translate(&mut self, id: ParticleId, dr: DVec3) {
        let p = &mut self.particles[id.index()];
        p.position = self.bx.wrap(p.position + dr);
    }

    /// Replace the simulation box (e.g. after a volume change).
    pub fn set_box(&mut self, bx: PeriodicBox) {
        self.bx = bx;
    }
}

impl ParticleSystem for ParticleStore {
    fn particle_count(&self) -> usize {
        self.particles.len()
    }

    fn position(&self, id: ParticleId) -> DVec3 {
        self.particles[id.index()].position
    }

    fn radius(&self, id: ParticleId) -> f64 {
        self.particles[id.index()].radius
    }

    fn particle_type(&self, id: ParticleId) -> u32 {
        self.particles[id.index()].particle_type
    }

    fn periodic_box(&self) -> &PeriodicBox {
        &self.bx
    }
}
