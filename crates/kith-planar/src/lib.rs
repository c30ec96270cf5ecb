//! Planarity testing and face extraction for undirected simple graphs.
//!
//! This crate is independent of any simulation type: vertices are plain
//! `usize` indices. It provides:
//!
//! - [`UndirectedGraph`]: a simple graph with sorted adjacency.
//! - [`check_planarity`]: the left-right planarity test, returning a
//!   combinatorial [`PlanarEmbedding`] (a rotation system) when the graph
//!   is planar.
//! - [`traverse_faces`]: a walk over every directed half-edge of an
//!   embedding, reporting faces through the [`FaceVisitor`] callbacks.
//!
//! # Examples
//!
//! ```
//! use kith_planar::{planar_faces, UndirectedGraph};
//!
//! // A square with one diagonal: two triangles plus the outer 4-cycle.
//! let g = UndirectedGraph::from_edges(4, [(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)]).unwrap();
//! let faces = planar_faces(&g).unwrap();
//! assert_eq!(faces.len(), 3);
//! assert_eq!(faces.iter().filter(|f| f.len() == 3).count(), 2);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod embedding;
pub mod error;
pub mod faces;
pub mod graph;
pub mod planarity;

pub use embedding::PlanarEmbedding;
pub use error::PlanarError;
pub use faces::{
    euler_characteristic_holds, is_simple_cycle, planar_faces, traverse_faces, FaceCollector,
    FaceVisitor,
};
pub use graph::UndirectedGraph;
pub use planarity::check_planarity;
