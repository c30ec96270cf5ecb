//! The left-right planarity test.
//!
//! Three depth-first passes over the graph:
//!
//! 1. **Orientation** turns the graph into a DFS tree plus back edges and
//!    computes lowpoints and nesting depths for every oriented edge.
//! 2. **Testing** processes edges in nesting order, maintaining a stack of
//!    conflict pairs of return-edge intervals. An unresolvable conflict
//!    means the graph is not planar.
//! 3. **Embedding** resolves every edge's side relative to its reference
//!    edge and lays out the rotation system.
//!
//! All passes are iterative; recursion depth never depends on graph size.

use crate::embedding::PlanarEmbedding;
use crate::error::PlanarError;
use crate::graph::UndirectedGraph;

type EdgeId = usize;

const UNVISITED: usize = usize::MAX;

/// A (possibly empty) interval of return edges, `low` being the edge with
/// the lowest lowpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Interval {
    low: Option<EdgeId>,
    high: Option<EdgeId>,
}

impl Interval {
    fn single(e: EdgeId) -> Self {
        Self {
            low: Some(e),
            high: Some(e),
        }
    }

    fn is_empty(&self) -> bool {
        self.low.is_none() && self.high.is_none()
    }
}

/// Left and right return-edge intervals that must lie on opposite sides.
///
/// `id` identifies a pair across pop/push cycles so stack bottoms can be
/// recorded without references into the stack.
#[derive(Clone, Copy, Debug)]
struct ConflictPair {
    id: u64,
    left: Interval,
    right: Interval,
}

impl ConflictPair {
    fn swap(&mut self) {
        std::mem::swap(&mut self.left, &mut self.right);
    }
}

struct LeftRight {
    n: usize,
    /// Per vertex: (neighbour, undirected edge id), neighbours ascending.
    incident: Vec<Vec<(usize, EdgeId)>>,
    /// Oriented (source, target) per edge once the orientation pass saw it.
    ends: Vec<(usize, usize)>,
    oriented: Vec<bool>,
    height: Vec<usize>,
    parent_edge: Vec<Option<EdgeId>>,
    lowpt: Vec<usize>,
    lowpt2: Vec<usize>,
    nesting_depth: Vec<i64>,
    out_edges: Vec<Vec<EdgeId>>,
    ordered: Vec<Vec<EdgeId>>,
    roots: Vec<usize>,

    refs: Vec<Option<EdgeId>>,
    side: Vec<i64>,
    lowpt_edge: Vec<Option<EdgeId>>,
    stack: Vec<ConflictPair>,
    stack_bottom: Vec<Option<u64>>,
    next_pair_id: u64,
}

impl LeftRight {
    fn new(graph: &UndirectedGraph) -> Self {
        let n = graph.vertex_count();
        let m = graph.edge_count();
        let mut incident: Vec<Vec<(usize, EdgeId)>> = vec![Vec::new(); n];
        let mut ends = Vec::with_capacity(m);
        // Edges arrive sorted by (u, v), so each incident list ends up
        // ascending by neighbour.
        for (e, (u, v)) in graph.edges().enumerate() {
            incident[u].push((v, e));
            incident[v].push((u, e));
            ends.push((u, v));
        }
        Self {
            n,
            incident,
            ends,
            oriented: vec![false; m],
            height: vec![UNVISITED; n],
            parent_edge: vec![None; n],
            lowpt: vec![0; m],
            lowpt2: vec![0; m],
            nesting_depth: vec![0; m],
            out_edges: vec![Vec::new(); n],
            ordered: vec![Vec::new(); n],
            roots: Vec::new(),
            refs: vec![None; m],
            side: vec![1; m],
            lowpt_edge: vec![None; m],
            stack: Vec::new(),
            stack_bottom: vec![None; m],
            next_pair_id: 0,
        }
    }

    fn target(&self, e: EdgeId) -> usize {
        self.ends[e].1
    }

    fn new_pair(&mut self, left: Interval, right: Interval) -> ConflictPair {
        let id = self.next_pair_id;
        self.next_pair_id += 1;
        ConflictPair { id, left, right }
    }

    fn top_id(&self) -> Option<u64> {
        self.stack.last().map(|p| p.id)
    }

    // ── Orientation ─────────────────────────────────────────────

    fn orient(&mut self) {
        let mut ind = vec![0usize; self.n];
        let mut resume = vec![false; self.ends.len()];
        for root in 0..self.n {
            if self.height[root] != UNVISITED {
                continue;
            }
            self.height[root] = 0;
            self.roots.push(root);
            self.orient_from(root, &mut ind, &mut resume);
        }
    }

    fn orient_from(&mut self, root: usize, ind: &mut [usize], resume: &mut [bool]) {
        let mut dfs = vec![root];
        'vertices: while let Some(v) = dfs.pop() {
            let parent = self.parent_edge[v];
            let hv = self.height[v];
            while ind[v] < self.incident[v].len() {
                let (w, e) = self.incident[v][ind[v]];
                let returning = resume[e] && self.ends[e].0 == v;
                if !returning {
                    if self.oriented[e] {
                        ind[v] += 1;
                        continue;
                    }
                    self.oriented[e] = true;
                    self.ends[e] = (v, w);
                    self.out_edges[v].push(e);
                    self.lowpt[e] = hv;
                    self.lowpt2[e] = hv;
                    if self.height[w] == UNVISITED {
                        // tree edge: descend, come back to this slot later
                        self.parent_edge[w] = Some(e);
                        self.height[w] = hv + 1;
                        resume[e] = true;
                        dfs.push(v);
                        dfs.push(w);
                        continue 'vertices;
                    }
                    self.lowpt[e] = self.height[w];
                }

                self.nesting_depth[e] = 2 * self.lowpt[e] as i64;
                if self.lowpt2[e] < hv {
                    self.nesting_depth[e] += 1;
                }

                if let Some(pe) = parent {
                    if self.lowpt[e] < self.lowpt[pe] {
                        self.lowpt2[pe] = self.lowpt[pe].min(self.lowpt2[e]);
                        self.lowpt[pe] = self.lowpt[e];
                    } else if self.lowpt[e] > self.lowpt[pe] {
                        self.lowpt2[pe] = self.lowpt2[pe].min(self.lowpt[e]);
                    } else {
                        self.lowpt2[pe] = self.lowpt2[pe].min(self.lowpt2[e]);
                    }
                }
                ind[v] += 1;
            }
        }
    }

    fn sort_by_nesting(&mut self) {
        for v in 0..self.n {
            let mut adj = self.out_edges[v].clone();
            adj.sort_by_key(|&e| self.nesting_depth[e]);
            self.ordered[v] = adj;
        }
    }

    // ── Testing ─────────────────────────────────────────────────

    fn test(&mut self) -> bool {
        let mut ind = vec![0usize; self.n];
        let mut resume = vec![false; self.ends.len()];
        let roots = std::mem::take(&mut self.roots);
        let ok = roots
            .iter()
            .all(|&root| self.test_from(root, &mut ind, &mut resume));
        self.roots = roots;
        ok
    }

    fn test_from(&mut self, root: usize, ind: &mut [usize], resume: &mut [bool]) -> bool {
        let mut dfs = vec![root];
        'vertices: while let Some(v) = dfs.pop() {
            let parent = self.parent_edge[v];
            while ind[v] < self.ordered[v].len() {
                let ei = self.ordered[v][ind[v]];
                let w = self.target(ei);
                if !resume[ei] {
                    self.stack_bottom[ei] = self.top_id();
                    if self.parent_edge[w] == Some(ei) {
                        resume[ei] = true;
                        dfs.push(v);
                        dfs.push(w);
                        continue 'vertices;
                    }
                    self.lowpt_edge[ei] = Some(ei);
                    let pair = self.new_pair(Interval::default(), Interval::single(ei));
                    self.stack.push(pair);
                }

                if self.lowpt[ei] < self.height[v] {
                    if ind[v] == 0 {
                        if let Some(pe) = parent {
                            self.lowpt_edge[pe] = self.lowpt_edge[ei];
                        }
                    } else if let Some(pe) = parent {
                        if !self.add_constraints(ei, pe) {
                            return false;
                        }
                    }
                }
                ind[v] += 1;
            }
            if let Some(pe) = parent {
                self.remove_back_edges(pe);
            }
        }
        true
    }

    fn conflicting(&self, interval: &Interval, b: EdgeId) -> bool {
        match interval.high {
            Some(h) => self.lowpt[h] > self.lowpt[b],
            None => false,
        }
    }

    fn lowest(&self, pair: &ConflictPair) -> Option<usize> {
        let left = pair.left.low.map(|e| self.lowpt[e]);
        let right = pair.right.low.map(|e| self.lowpt[e]);
        match (pair.left.is_empty(), pair.right.is_empty()) {
            (true, _) => right,
            (_, true) => left,
            _ => match (left, right) {
                (Some(l), Some(r)) => Some(l.min(r)),
                (l, r) => l.or(r),
            },
        }
    }

    fn add_constraints(&mut self, ei: EdgeId, e: EdgeId) -> bool {
        let mut p = self.new_pair(Interval::default(), Interval::default());

        // Merge return edges of ei into p.right.
        loop {
            let Some(mut q) = self.stack.pop() else {
                break;
            };
            if !q.left.is_empty() {
                q.swap();
            }
            if !q.left.is_empty() {
                return false;
            }
            if let Some(q_low) = q.right.low {
                if self.lowpt[q_low] > self.lowpt[e] {
                    if p.right.is_empty() {
                        p.right = q.right;
                    } else if let Some(p_low) = p.right.low {
                        self.refs[p_low] = q.right.high;
                    }
                    p.right.low = q.right.low;
                } else {
                    self.refs[q_low] = self.lowpt_edge[e];
                }
            }
            if self.top_id() == self.stack_bottom[ei] {
                break;
            }
        }

        // Merge conflicting return edges of earlier siblings into p.left.
        while let Some(top) = self.stack.last() {
            if !(self.conflicting(&top.left, ei) || self.conflicting(&top.right, ei)) {
                break;
            }
            let Some(mut q) = self.stack.pop() else {
                break;
            };
            if self.conflicting(&q.right, ei) {
                q.swap();
            }
            if self.conflicting(&q.right, ei) {
                return false;
            }
            if let Some(p_low) = p.right.low {
                self.refs[p_low] = q.right.high;
            }
            if q.right.low.is_some() {
                p.right.low = q.right.low;
            }
            if p.left.is_empty() {
                p.left = q.left;
            } else if let Some(p_low) = p.left.low {
                self.refs[p_low] = q.left.high;
            }
            p.left.low = q.left.low;
        }

        if !(p.left.is_empty() && p.right.is_empty()) {
            self.stack.push(p);
        }
        true
    }

    fn remove_back_edges(&mut self, e: EdgeId) {
        let u = self.ends[e].0;
        let hu = self.height[u];

        // Drop pairs whose lowest return edge ends at u.
        while let Some(top) = self.stack.last() {
            if self.lowest(top) != Some(hu) {
                break;
            }
            if let Some(p) = self.stack.pop() {
                if let Some(low) = p.left.low {
                    self.side[low] = -1;
                }
            }
        }

        if let Some(mut p) = self.stack.pop() {
            // trim left
            while let Some(h) = p.left.high {
                if self.target(h) != u {
                    break;
                }
                p.left.high = self.refs[h];
            }
            if p.left.high.is_none() {
                if let Some(low) = p.left.low {
                    self.refs[low] = p.right.low;
                    self.side[low] = -1;
                    p.left.low = None;
                }
            }
            // trim right
            while let Some(h) = p.right.high {
                if self.target(h) != u {
                    break;
                }
                p.right.high = self.refs[h];
            }
            if p.right.high.is_none() {
                if let Some(low) = p.right.low {
                    self.refs[low] = p.left.low;
                    self.side[low] = -1;
                    p.right.low = None;
                }
            }
            self.stack.push(p);
        }

        // Side of e follows the highest return edge.
        if self.lowpt[e] < hu {
            if let Some(top) = self.stack.last() {
                let (hl, hr) = (top.left.high, top.right.high);
                self.refs[e] = match (hl, hr) {
                    (Some(l), Some(r)) if self.lowpt[l] > self.lowpt[r] => Some(l),
                    (Some(l), None) => Some(l),
                    _ => hr,
                };
            }
        }
    }

    // ── Embedding ───────────────────────────────────────────────

    /// Resolve the absolute side of `e` by following its reference chain.
    fn sign(&mut self, e: EdgeId) -> i64 {
        let mut chain = vec![e];
        while let Some(&last) = chain.last() {
            if chain.len() > self.ends.len() {
                break;
            }
            match self.refs[last] {
                Some(r) => chain.push(r),
                None => break,
            }
        }
        // Fold from the end of the chain back to e.
        for i in (0..chain.len().saturating_sub(1)).rev() {
            let (edge, reference) = (chain[i], chain[i + 1]);
            self.side[edge] *= self.side[reference];
            self.refs[edge] = None;
        }
        self.side[e]
    }

    fn embed(mut self) -> Result<PlanarEmbedding, PlanarError> {
        for e in 0..self.ends.len() {
            let s = self.sign(e);
            self.nesting_depth[e] *= s;
        }
        self.sort_by_nesting();

        let mut emb = PlanarEmbedding::with_vertices(self.n);
        for v in 0..self.n {
            let mut previous = None;
            for &e in &self.ordered[v] {
                let w = self.target(e);
                emb.add_half_edge_cw(v, w, previous)?;
                previous = Some(w);
            }
        }

        let mut left_ref: Vec<Option<usize>> = vec![None; self.n];
        let mut right_ref: Vec<Option<usize>> = vec![None; self.n];
        let mut ind = vec![0usize; self.n];
        for &root in &self.roots {
            let mut dfs = vec![root];
            'vertices: while let Some(v) = dfs.pop() {
                while ind[v] < self.ordered[v].len() {
                    let ei = self.ordered[v][ind[v]];
                    ind[v] += 1;
                    let w = self.target(ei);
                    if self.parent_edge[w] == Some(ei) {
                        emb.add_half_edge_first(w, v)?;
                        left_ref[v] = Some(w);
                        right_ref[v] = Some(w);
                        dfs.push(v);
                        dfs.push(w);
                        continue 'vertices;
                    }
                    if self.side[ei] == 1 {
                        emb.add_half_edge_cw(w, v, right_ref[w])?;
                    } else {
                        emb.add_half_edge_ccw(w, v, left_ref[w])?;
                        left_ref[w] = Some(v);
                    }
                }
            }
        }
        Ok(emb)
    }
}

/// Test `graph` for planarity and return a planar embedding if one exists.
///
/// Runs in O(V + E). Graphs with more than `3V - 6` edges are rejected
/// without a traversal.
///
/// # Errors
///
/// [`PlanarError::NonPlanar`] when no planar embedding exists, or
/// [`PlanarError::InconsistentEmbedding`] if the rotation system could not
/// be assembled.
///
/// # Examples
///
/// ```
/// use kith_planar::{check_planarity, PlanarError, UndirectedGraph};
///
/// let mut k5 = UndirectedGraph::new(5);
/// for u in 0..5 {
///     for v in u + 1..5 {
///         k5.add_edge(u, v).unwrap();
///     }
/// }
/// assert!(matches!(check_planarity(&k5), Err(PlanarError::NonPlanar { .. })));
/// ```
pub fn check_planarity(graph: &UndirectedGraph) -> Result<PlanarEmbedding, PlanarError> {
    let vertices = graph.vertex_count();
    let edges = graph.edge_count();
    if vertices > 2 && edges > 3 * vertices - 6 {
        return Err(PlanarError::NonPlanar { vertices, edges });
    }

    let mut lr = LeftRight::new(graph);
    lr.orient();
    lr.sort_by_nesting();
    if !lr.test() {
        return Err(PlanarError::NonPlanar { vertices, edges });
    }
    lr.embed()
}
