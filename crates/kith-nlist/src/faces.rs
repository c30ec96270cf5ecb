//! Planar faces of the contact graph.
//!
//! Faces are the simple cycles of a planar embedding of the contact graph.
//! Each one is a polygon of mutually touching particles; together they form
//! a contact-based dual mesh of a particle layer.
//!
//! The outer face of each connected component is flagged as a boundary
//! face. Every half-edge lies on exactly one walk, so the signed vector
//! areas of all walks in a component sum to zero; the outer walk is the
//! one whose area opposes all the others.

use std::error::Error;
use std::fmt;

use kith_core::{DVec3, ParticleId, ParticleSystem};
use kith_planar::{check_planarity, is_simple_cycle, traverse_faces, FaceVisitor, PlanarError, UndirectedGraph};

use crate::contacts::ContactGraph;

// ── Face ───────────────────────────────────────────────────────────

/// One polygonal face of the contact graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Face {
    id: usize,
    vertices: Vec<ParticleId>,
    centre: DVec3,
    boundary: bool,
}

impl Face {
    /// Index of this face within its face set.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Boundary vertices in traversal order.
    pub fn vertices(&self) -> &[ParticleId] {
        &self.vertices
    }

    /// Number of sides (equal to the number of vertices).
    pub fn n_sides(&self) -> usize {
        self.vertices.len()
    }

    /// Minimum-image centroid of the vertices, folded into the box.
    pub fn centre(&self) -> DVec3 {
        self.centre
    }

    /// Whether this is the outer face of its connected component.
    pub fn is_boundary(&self) -> bool {
        self.boundary
    }

    /// Whether `{a, b}` is a side of this face.
    pub fn contains_edge(&self, a: ParticleId, b: ParticleId) -> bool {
        let n = self.vertices.len();
        (0..n).any(|k| {
            let (u, v) = (self.vertices[k], self.vertices[(k + 1) % n]);
            (u, v) == (a, b) || (u, v) == (b, a)
        })
    }
}

// ── FaceError / FaceStatus ─────────────────────────────────────────

/// Why face extraction produced no faces.
#[derive(Clone, Debug, PartialEq)]
pub enum FaceError {
    /// The contact graph has no planar embedding. Recoverable: the face
    /// set is left empty and the next build tries again.
    NonPlanar {
        /// Vertices in the contact graph.
        vertices: usize,
        /// Edges in the contact graph.
        edges: usize,
    },
    /// The embedding could not be built or traversed.
    Embedding(PlanarError),
}

impl fmt::Display for FaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPlanar { vertices, edges } => write!(
                f,
                "contact graph with {vertices} vertices and {edges} edges is not planar"
            ),
            Self::Embedding(e) => write!(f, "embedding: {e}"),
        }
    }
}

impl Error for FaceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Embedding(e) => Some(e),
            Self::NonPlanar { .. } => None,
        }
    }
}

impl From<PlanarError> for FaceError {
    fn from(e: PlanarError) -> Self {
        match e {
            PlanarError::NonPlanar { vertices, edges } => Self::NonPlanar { vertices, edges },
            other => Self::Embedding(other),
        }
    }
}

/// Outcome of the most recent face extraction.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum FaceStatus {
    /// No extraction has run for the current generation.
    #[default]
    NotBuilt,
    /// Extraction succeeded.
    Ready {
        /// Number of faces found.
        faces: usize,
    },
    /// Extraction failed; the face set is empty.
    Failed(FaceError),
}

// ── Extraction ─────────────────────────────────────────────────────

/// A closed walk of the embedding, kept or not.
struct Walk {
    first: usize,
    len: usize,
    area: DVec3,
    face: Option<usize>,
}

/// Visitor turning face walks into [`Face`]s, dropping walks that are
/// not simple cycles.
struct FaceAssembler<'a> {
    graph: &'a UndirectedGraph,
    system: &'a dyn ParticleSystem,
    walk: Vec<usize>,
    walks: Vec<Walk>,
    faces: Vec<Face>,
    skipped: usize,
}

impl FaceVisitor for FaceAssembler<'_> {
    fn begin_face(&mut self) {
        self.walk.clear();
    }

    fn next_vertex(&mut self, vertex: usize) {
        self.walk.push(vertex);
    }

    fn end_face(&mut self) {
        let Some(&first) = self.walk.first() else {
            return;
        };
        let vertices: Vec<ParticleId> = self.walk.iter().map(|&v| ParticleId(v as u32)).collect();
        let mut walk = Walk {
            first,
            len: vertices.len(),
            area: vector_area(self.system, &vertices),
            face: None,
        };
        if is_simple_cycle(self.graph, &self.walk) {
            walk.face = Some(self.faces.len());
            let centre = centroid(self.system, &vertices);
            self.faces.push(Face {
                id: self.faces.len(),
                vertices,
                centre,
                boundary: false,
            });
        } else {
            self.skipped += 1;
        }
        self.walks.push(walk);
    }
}

/// Positions along a closed walk, unwrapped step by step from the first.
fn unwrapped(system: &dyn ParticleSystem, vertices: &[ParticleId]) -> Vec<DVec3> {
    let mut out = Vec::with_capacity(vertices.len());
    let mut q = DVec3::ZERO;
    for (k, &v) in vertices.iter().enumerate() {
        if k > 0 {
            q += system.minimum_image(system.position(v) - system.position(vertices[k - 1]));
        }
        out.push(q);
    }
    out
}

/// Signed vector area of a closed walk. Zero for walks that retrace
/// every edge, such as the walk around a tree.
fn vector_area(system: &dyn ParticleSystem, vertices: &[ParticleId]) -> DVec3 {
    let q = unwrapped(system, vertices);
    let n = q.len();
    (0..n).fold(DVec3::ZERO, |acc, k| acc + q[k].cross(q[(k + 1) % n])) * 0.5
}

/// Component label of every vertex.
fn components(graph: &UndirectedGraph) -> Vec<usize> {
    let mut label = vec![usize::MAX; graph.vertex_count()];
    let mut stack = Vec::new();
    let mut next = 0;
    for root in 0..graph.vertex_count() {
        if label[root] != usize::MAX {
            continue;
        }
        label[root] = next;
        stack.push(root);
        while let Some(v) = stack.pop() {
            for &w in graph.neighbours(v) {
                if label[w] == usize::MAX {
                    label[w] = next;
                    stack.push(w);
                }
            }
        }
        next += 1;
    }
    label
}

/// Flag the outer face of each component.
///
/// Per component the candidate is the walk of largest area, ties going to
/// the longer walk and then the later one. It is the outer walk only if no
/// other walk shares its orientation; contact graphs wrapping the periodic
/// box have no outer face and fail this check. A candidate dropped as a
/// non-simple walk marks nothing.
fn mark_boundaries(graph: &UndirectedGraph, walks: &[Walk], faces: &mut [Face]) {
    const TOL: f64 = 1e-9;
    let label = components(graph);
    let mut best: Vec<Option<usize>> = vec![None; graph.vertex_count()];
    for (k, walk) in walks.iter().enumerate() {
        let slot = &mut best[label[walk.first]];
        let replace = match *slot {
            None => true,
            Some(b) => {
                let (a, ab) = (walk.area.length(), walks[b].area.length());
                a > ab * (1.0 + TOL) || (a >= ab * (1.0 - TOL) && walk.len >= walks[b].len)
            }
        };
        if replace {
            *slot = Some(k);
        }
    }
    for b in best.into_iter().flatten() {
        let outer = &walks[b];
        let Some(face) = outer.face else {
            continue;
        };
        let size = outer.area.length();
        if size <= f64::EPSILON {
            continue;
        }
        let normal = outer.area / size;
        let opposed = walks
            .iter()
            .enumerate()
            .filter(|&(k, w)| k != b && label[w.first] == label[outer.first])
            .all(|(_, w)| w.area.dot(normal) <= TOL * size);
        if opposed {
            faces[face].boundary = true;
        }
    }
}

/// Centroid with every vertex unwrapped relative to the first.
fn centroid(system: &dyn ParticleSystem, vertices: &[ParticleId]) -> DVec3 {
    let Some(&first) = vertices.first() else {
        return DVec3::ZERO;
    };
    let origin = system.position(first);
    let sum = vertices
        .iter()
        .map(|&v| system.minimum_image(system.position(v) - origin))
        .fold(DVec3::ZERO, |acc, d| acc + d);
    system
        .periodic_box()
        .wrap(origin + sum / vertices.len() as f64)
}

/// Embed `contacts` and collect its simple-cycle faces.
///
/// Faces are numbered in traversal order, which is deterministic for a
/// given contact graph. The second value counts closed walks that were
/// dropped because they are not simple cycles. Faces are flagged with
/// [`Face::is_boundary`] as described in the module docs.
pub fn extract_faces(
    contacts: &ContactGraph,
    system: &dyn ParticleSystem,
) -> Result<(Vec<Face>, usize), FaceError> {
    let graph = contacts.to_planar_graph()?;
    let embedding = check_planarity(&graph)?;
    let mut assembler = FaceAssembler {
        graph: &graph,
        system,
        walk: Vec::new(),
        walks: Vec::new(),
        faces: Vec::new(),
        skipped: 0,
    };
    traverse_faces(&embedding, &mut assembler)?;
    let FaceAssembler {
        walks,
        mut faces,
        skipped,
        ..
    } = assembler;
    mark_boundaries(&graph, &walks, &mut faces);
    Ok((faces, skipped))
}
