//! Kith: neighbour lists, contact graphs, and planar contact faces for
//! particle simulations.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Kith sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use kith::prelude::*;
//!
//! // Three touching particles in a flat layer.
//! let bx = PeriodicBox::new(DVec3::splat(20.0)).unwrap();
//! let mut store = ParticleStore::new(bx);
//! let h = 3f64.sqrt() / 2.0;
//! for p in [
//!     DVec3::new(5.0, 5.0, 5.0),
//!     DVec3::new(6.0, 5.0, 5.0),
//!     DVec3::new(5.5, 5.0 + h, 5.0),
//! ] {
//!     store.push(Particle::new(p, 0.55)).unwrap();
//! }
//!
//! let config = NeighbourListConfig::new(1.2).with_faces(true);
//! let mut nlist = NeighbourList::new(&config, &store).unwrap();
//! assert_eq!(nlist.neighbours(ParticleId(0)), &[ParticleId(1), ParticleId(2)]);
//! assert_eq!(nlist.contacts().unwrap().edge_count(), 3);
//! // The triangle's inside and outside.
//! assert_eq!(nlist.faces().len(), 2);
//!
//! store.translate(ParticleId(2), DVec3::new(0.0, 0.5, 0.0));
//! assert!(nlist.update(&store));
//! assert_eq!(nlist.contacts().unwrap().edge_count(), 1);
//! assert!(nlist.faces().is_empty());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `kith-core` | IDs, periodic boxes, the particle-system trait |
//! | [`space`] | `kith-space` | Cell grids and spatial partitions |
//! | [`planar`] | `kith-planar` | Planarity testing and face traversal |
//! | [`nlist`] | `kith-nlist` | Neighbour lists, contacts, and faces |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`kith-core`).
///
/// Contains [`types::ParticleSystem`], the [`types::PeriodicBox`]
/// minimum-image convention, and the [`types::ParticleStore`] container.
pub use kith_core as types;

/// Spatial partitions (`kith-space`).
///
/// [`space::CellGrid`] buckets particles into cells no smaller than the
/// search radius.
pub use kith_space as space;

/// Planar graphs and embeddings (`kith-planar`).
///
/// [`planar::check_planarity`] runs the left-right planarity test;
/// [`planar::traverse_faces`] walks the faces of the resulting embedding.
pub use kith_planar as planar;

/// Neighbour lists, contact graphs, and faces (`kith-nlist`).
pub use kith_nlist as nlist;

/// Common imports for typical Kith usage.
///
/// ```rust
/// use kith::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use kith_core::{DVec3, GenerationId, Particle, ParticleId, ParticleStore, ParticleSystem, PeriodicBox};

    // Neighbour lists
    pub use kith_nlist::{
        BuildStrategy, ContactGraph, ContactRule, Face, FaceStatus, NeighbourList, NeighbourListConfig,
    };

    // Errors
    pub use kith_core::GeometryError;
    pub use kith_nlist::{ConfigError, FaceError};
}
