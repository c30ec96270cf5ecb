//! Spatial partitioning for Kith neighbour search.
//!
//! This crate defines the [`SpatialPartition`] trait, the bucket-grid
//! service a neighbour list consults to avoid O(N²) candidate searches,
//! along with the concrete [`CellGrid`] backend.
//!
//! A partition buckets particle positions into cells at least one search
//! radius wide. For any query position it enumerates the small set of
//! candidate cells (the containing cell plus its neighbours, wrapped on
//! periodic axes) whose members must be distance-checked.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod edge;
pub mod error;
pub mod grid;
pub mod partition;

#[cfg(test)]
pub(crate) mod compliance;

pub use edge::EdgeBehavior;
pub use error::SpaceError;
pub use grid::CellGrid;
pub use partition::{CandidateCells, SpatialPartition};
