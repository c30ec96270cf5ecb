//! Core types and traits for the Kith neighbour-search workspace.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! vocabulary shared by the spatial partition, the planar graph unit, and
//! the neighbour list: particle and generation IDs, the periodic box with
//! its minimum-image convention, the [`ParticleSystem`] collaborator trait,
//! and geometry errors.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod periodic;
pub mod system;

pub use error::GeometryError;
pub use glam::DVec3;
pub use id::{GenerationId, ParticleId};
pub use periodic::{Axis, PeriodicBox};
pub use system::{Particle, ParticleStore, ParticleSystem};
