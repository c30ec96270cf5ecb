//! Error types for planarity testing and face traversal.

use std::error::Error;
use std::fmt;

/// Errors from graph construction, planarity testing, or face traversal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlanarError {
    /// The graph has no planar embedding.
    NonPlanar {
        /// Number of vertices in the tested graph.
        vertices: usize,
        /// Number of edges in the tested graph.
        edges: usize,
    },
    /// An edge endpoint is not a vertex of the graph.
    VertexOutOfRange {
        /// The offending vertex.
        vertex: usize,
        /// Number of vertices in the graph.
        vertex_count: usize,
    },
    /// The rotation system is internally inconsistent.
    InconsistentEmbedding {
        /// What went wrong.
        reason: String,
    },
}

impl fmt::Display for PlanarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPlanar { vertices, edges } => {
                write!(f, "graph with {vertices} vertices and {edges} edges is not planar")
            }
            Self::VertexOutOfRange {
                vertex,
                vertex_count,
            } => {
                write!(f, "vertex {vertex} out of range for graph with {vertex_count} vertices")
            }
            Self::InconsistentEmbedding { reason } => {
                write!(f, "inconsistent planar embedding: {reason}")
            }
        }
    }
}

impl Error for PlanarError {}
