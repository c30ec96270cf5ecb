//! Verlet neighbour lists, contact graphs, and planar contact faces.
//!
//! [`NeighbourList`] answers "which particles are close enough to interact"
//! for a [`ParticleSystem`](kith_core::ParticleSystem). A full build finds
//! every pair closer than `cutoff + pad` under the periodic minimum-image
//! convention, using a cell grid when the box is large enough and all-pairs
//! search otherwise. The padding lets the list stay valid across steps
//! until some particle has moved more than `pad / 2`.
//!
//! On top of the neighbour pairs the list can derive a [`ContactGraph`]
//! (pairs closer than a contact distance) and, for particles confined to a
//! two-dimensional layer, the planar [`Face`]s of that graph.
//!
//! # Modules
//!
//! - [`config`]: options, defaults, and the provenance record.
//! - [`strategy`]: cell-list and all-pairs neighbour search.
//! - [`generation`]: immutable adjacency plus position snapshot.
//! - [`staleness`]: the Verlet-skin rebuild criterion.
//! - [`contacts`]: contact graph construction.
//! - [`faces`]: planar face extraction.
//! - [`neighbour_list`]: the orchestrator tying them together.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod contacts;
pub mod faces;
pub mod generation;
pub mod neighbour_list;
pub mod staleness;
pub mod strategy;

pub use config::{
    ConfigEntry, ConfigError, ConfigRecord, ConfigValue, NeighbourListConfig, Provenance,
    ResolvedConfig, DEFAULT_PAD,
};
pub use contacts::{ContactGraph, ContactRule};
pub use faces::{extract_faces, Face, FaceError, FaceStatus};
pub use generation::{Adjacency, Generation};
pub use neighbour_list::NeighbourList;
pub use strategy::{AllPairsSearch, BuildStrategy, CellSearch, NeighbourSearch, SearchOutput};
