//! Face traversal over a planar embedding.
//!
//! [`traverse_faces`] walks every directed half-edge exactly once. Each
//! closed walk is one face of the embedding and is reported through a
//! [`FaceVisitor`]. Walks around trees, bridges and the outer boundary of
//! a patch are reported too; [`is_simple_cycle`] tells them apart from
//! proper polygonal faces.

use crate::embedding::PlanarEmbedding;
use crate::error::PlanarError;
use crate::graph::UndirectedGraph;
use crate::planarity::check_planarity;

/// Callbacks driven by [`traverse_faces`].
///
/// For each face the traversal calls `begin_face`, then `next_vertex` once
/// per half-edge on the face (with the half-edge's origin), then
/// `end_face`.
pub trait FaceVisitor {
    /// A new face starts.
    fn begin_face(&mut self) {}
    /// The walk passes through `vertex`.
    fn next_vertex(&mut self, vertex: usize);
    /// The current face is closed.
    fn end_face(&mut self) {}
}

/// A [`FaceVisitor`] that records every face as a vertex sequence.
#[derive(Clone, Debug, Default)]
pub struct FaceCollector {
    /// Completed faces in traversal order.
    pub faces: Vec<Vec<usize>>,
    current: Vec<usize>,
}

impl FaceCollector {
    /// An empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the collector and return its faces.
    pub fn into_faces(self) -> Vec<Vec<usize>> {
        self.faces
    }
}

impl FaceVisitor for FaceCollector {
    fn begin_face(&mut self) {
        self.current.clear();
    }

    fn next_vertex(&mut self, vertex: usize) {
        self.current.push(vertex);
    }

    fn end_face(&mut self) {
        self.faces.push(std::mem::take(&mut self.current));
    }
}

/// Walk every face of `embedding`, returning the number of faces.
///
/// Vertices are scanned in ascending order and half-edges around each
/// vertex in clockwise order, so the output is deterministic for a given
/// embedding. Every half-edge is visited exactly once.
///
/// # Errors
///
/// [`PlanarError::InconsistentEmbedding`] if a walk reaches a half-edge
/// with no successor or revisits a half-edge before closing.
pub fn traverse_faces<V>(embedding: &PlanarEmbedding, visitor: &mut V) -> Result<usize, PlanarError>
where
    V: FaceVisitor + ?Sized,
{
    let n = embedding.vertex_count();
    let mut visited: Vec<Vec<bool>> = (0..n).map(|v| vec![false; embedding.degree(v)]).collect();
    let mut faces = 0;

    for v in 0..n {
        for w in embedding.neighbours_cw(v) {
            let slot = embedding
                .slot(v, w)
                .ok_or_else(|| broken(format!("half-edge ({v}, {w}) vanished")))?;
            if visited[v][slot] {
                continue;
            }

            visitor.begin_face();
            let (mut a, mut b) = (v, w);
            loop {
                let s = embedding
                    .slot(a, b)
                    .ok_or_else(|| broken(format!("half-edge ({a}, {b}) missing")))?;
                if visited[a][s] {
                    return Err(broken(format!("half-edge ({a}, {b}) visited twice")));
                }
                visited[a][s] = true;
                visitor.next_vertex(a);
                (a, b) = embedding
                    .next_face_half_edge(a, b)
                    .ok_or_else(|| broken(format!("half-edge ({a}, {b}) has no twin")))?;
                if (a, b) == (v, w) {
                    break;
                }
            }
            visitor.end_face();
            faces += 1;
        }
    }
    Ok(faces)
}

fn broken(reason: String) -> PlanarError {
    PlanarError::InconsistentEmbedding { reason }
}

/// Whether `face` is a simple cycle of `graph` with at least three sides.
///
/// All vertices must be distinct and every consecutive pair, including the
/// closing pair, must be an edge.
pub fn is_simple_cycle(graph: &UndirectedGraph, face: &[usize]) -> bool {
    if face.len() < 3 {
        return false;
    }
    let mut seen = face.to_vec();
    seen.sort_unstable();
    if seen.windows(2).any(|w| w[0] == w[1]) {
        return false;
    }
    face.iter()
        .zip(face.iter().cycle().skip(1))
        .all(|(&a, &b)| graph.has_edge(a, b))
}

/// Embed `graph` and return its simple-cycle faces.
///
/// Closed walks that are not simple cycles (around trees or through
/// bridges) are dropped.
///
/// # Errors
///
/// Propagates [`check_planarity`] and [`traverse_faces`] failures.
pub fn planar_faces(graph: &UndirectedGraph) -> Result<Vec<Vec<usize>>, PlanarError> {
    let embedding = check_planarity(graph)?;
    let mut collector = FaceCollector::new();
    traverse_faces(&embedding, &mut collector)?;
    Ok(collector
        .into_faces()
        .into_iter()
        .filter(|f| is_simple_cycle(graph, f))
        .collect())
}

/// Check Euler's formula `V - E + F = 2` on every connected component that
/// has at least one edge.
///
/// `faces` must be the complete output of [`traverse_faces`] (unfiltered).
/// Isolated vertices are ignored.
pub fn euler_characteristic_holds(graph: &UndirectedGraph, faces: &[Vec<usize>]) -> bool {
    let n = graph.vertex_count();
    let mut component = vec![usize::MAX; n];
    let mut count = 0;
    for start in 0..n {
        if component[start] != usize::MAX || graph.degree(start) == 0 {
            continue;
        }
        let mut stack = vec![start];
        component[start] = count;
        while let Some(v) = stack.pop() {
            for &w in graph.neighbours(v) {
                if component[w] == usize::MAX {
                    component[w] = count;
                    stack.push(w);
                }
            }
        }
        count += 1;
    }

    let mut vertices = vec![0i64; count];
    let mut edges = vec![0i64; count];
    let mut face_count = vec![0i64; count];
    for v in 0..n {
        if let Some(c) = component.get(v).copied().filter(|&c| c != usize::MAX) {
            vertices[c] += 1;
        }
    }
    for (u, _) in graph.edges() {
        edges[component[u]] += 1;
    }
    for face in faces {
        match face.first().and_then(|&v| component.get(v)) {
            Some(&c) if c != usize::MAX => face_count[c] += 1,
            _ => return false,
        }
    }
    (0..count).all(|c| vertices[c] - edges[c] + face_count[c] == 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_faces(g: &UndirectedGraph) -> Vec<Vec<usize>> {
        let emb = check_planarity(g).unwrap();
        let mut c = FaceCollector::new();
        let count = traverse_faces(&emb, &mut c).unwrap();
        assert_eq!(count, c.faces.len());
        c.into_faces()
    }

    fn grid(w: usize, h: usize) -> UndirectedGraph {
        let id = |x: usize, y: usize| y * w + x;
        let mut g = UndirectedGraph::new(w * h);
        for y in 0..h {
            for x in 0..w {
                if x + 1 < w {
                    g.add_edge(id(x, y), id(x + 1, y)).unwrap();
                }
                if y + 1 < h {
                    g.add_edge(id(x, y), id(x, y + 1)).unwrap();
                }
            }
        }
        g
    }

    // ── Traversal ───────────────────────────────────────────────

    #[test]
    fn every_half_edge_visited_once() {
        let g = grid(4, 3);
        let faces = all_faces(&g);
        let total: usize = faces.iter().map(Vec::len).sum();
        assert_eq!(total, 2 * g.edge_count());
    }

    #[test]
    fn k4_has_four_triangles() {
        let mut g = UndirectedGraph::new(4);
        for u in 0..4 {
            for v in u + 1..4 {
                g.add_edge(u, v).unwrap();
            }
        }
        let faces = all_faces(&g);
        assert_eq!(faces.len(), 4);
        assert!(faces.iter().all(|f| f.len() == 3 && is_simple_cycle(&g, f)));
        assert!(euler_characteristic_holds(&g, &faces));
    }

    #[test]
    fn grid_faces_are_squares_plus_outer_boundary() {
        let g = grid(3, 3);
        let faces = planar_faces(&g).unwrap();
        assert_eq!(faces.len(), 5);
        assert_eq!(faces.iter().filter(|f| f.len() == 4).count(), 4);
        assert_eq!(faces.iter().filter(|f| f.len() == 8).count(), 1);
    }

    #[test]
    fn wheel_has_spoke_triangles() {
        // hub 0, rim 1..=6
        let rim = 6;
        let mut g = UndirectedGraph::new(rim + 1);
        for i in 1..=rim {
            g.add_edge(0, i).unwrap();
            g.add_edge(i, i % rim + 1).unwrap();
        }
        let faces = planar_faces(&g).unwrap();
        assert_eq!(faces.len(), rim + 1);
        assert_eq!(faces.iter().filter(|f| f.len() == 3).count(), rim);
        assert!(euler_characteristic_holds(&g, &all_faces(&g)));
    }

    #[test]
    fn tree_yields_no_simple_faces() {
        let g = UndirectedGraph::from_edges(5, [(0, 1), (1, 2), (1, 3), (3, 4)]).unwrap();
        let faces = all_faces(&g);
        assert_eq!(faces.len(), 1);
        assert_eq!(faces[0].len(), 8);
        assert!(planar_faces(&g).unwrap().is_empty());
        assert!(euler_characteristic_holds(&g, &faces));
    }

    #[test]
    fn euler_per_component() {
        let g = UndirectedGraph::from_edges(
            9,
            [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 6), (6, 3), (3, 5)],
        )
        .unwrap();
        let faces = all_faces(&g);
        assert!(euler_characteristic_holds(&g, &faces));
        assert!(!euler_characteristic_holds(&g, &faces[1..]));
    }

    #[test]
    fn visitor_callbacks_balanced() {
        #[derive(Default)]
        struct Counter {
            open: usize,
            closed: usize,
            vertices: usize,
        }
        impl FaceVisitor for Counter {
            fn begin_face(&mut self) {
                self.open += 1;
            }
            fn next_vertex(&mut self, _: usize) {
                self.vertices += 1;
            }
            fn end_face(&mut self) {
                self.closed += 1;
            }
        }
        let g = grid(3, 2);
        let emb = check_planarity(&g).unwrap();
        let mut counter = Counter::default();
        let n = traverse_faces(&emb, &mut counter).unwrap();
        assert_eq!((counter.open, counter.closed), (n, n));
        assert_eq!(counter.vertices, 2 * g.edge_count());
    }

    // ── Simple cycles ───────────────────────────────────────────

    #[test]
    fn simple_cycle_checks() {
        let g = UndirectedGraph::from_edges(4, [(0, 1), (1, 2), (2, 0), (2, 3)]).unwrap();
        assert!(is_simple_cycle(&g, &[0, 1, 2]));
        assert!(!is_simple_cycle(&g, &[0, 1]));
        assert!(!is_simple_cycle(&g, &[0, 1, 2, 1]));
        assert!(!is_simple_cycle(&g, &[0, 2, 3]));
    }

    // ── Properties ──────────────────────────────────────────────

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        /// A triangulated w×h grid with a random subset of its edges.
        fn sparse_triangulated_grid() -> impl Strategy<Value = UndirectedGraph> {
            (2usize..7, 2usize..7).prop_flat_map(|(w, h)| {
                let id = move |x: usize, y: usize| y * w + x;
                let mut all = Vec::new();
                for y in 0..h {
                    for x in 0..w {
                        if x + 1 < w {
                            all.push((id(x, y), id(x + 1, y)));
                        }
                        if y + 1 < h {
                            all.push((id(x, y), id(x, y + 1)));
                        }
                        if x + 1 < w && y + 1 < h {
                            all.push((id(x, y), id(x + 1, y + 1)));
                        }
                    }
                }
                let len = all.len();
                proptest::collection::vec(any::<bool>(), len).prop_map(move |keep| {
                    let edges = all.iter().zip(keep).filter(|(_, k)| *k).map(|(e, _)| *e);
                    UndirectedGraph::from_edges(w * h, edges).unwrap()
                })
            })
        }

        proptest! {
            #[test]
            fn planar_subgraphs_satisfy_euler(g in sparse_triangulated_grid()) {
                let emb = check_planarity(&g).unwrap();
                prop_assert!(emb.check_structure().is_ok());
                let mut c = FaceCollector::new();
                traverse_faces(&emb, &mut c).unwrap();
                let total: usize = c.faces.iter().map(Vec::len).sum();
                prop_assert_eq!(total, 2 * g.edge_count());
                prop_assert!(euler_characteristic_holds(&g, &c.faces));
            }
        }
    }
}
