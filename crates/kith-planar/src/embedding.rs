//! Combinatorial planar embeddings (rotation systems).
//!
//! For every vertex the embedding stores a cyclic clockwise ordering of its
//! neighbours. Each neighbour slot carries its clockwise and
//! counter-clockwise successor, so insertion next to an existing half-edge
//! is O(1) amortised.

use indexmap::IndexMap;

use crate::error::PlanarError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Link {
    cw: usize,
    ccw: usize,
}

/// A rotation system over vertices `0..vertex_count`.
///
/// Produced by [`check_planarity`](crate::check_planarity). Every undirected
/// edge `{v, w}` appears as two half-edges `(v, w)` and `(w, v)`.
#[derive(Clone, Debug, Default)]
pub struct PlanarEmbedding {
    rotation: Vec<IndexMap<usize, Link>>,
    first: Vec<Option<usize>>,
}

fn inconsistent(reason: String) -> PlanarError {
    PlanarError::InconsistentEmbedding { reason }
}

impl PlanarEmbedding {
    pub(crate) fn with_vertices(vertex_count: usize) -> Self {
        Self {
            rotation: vec![IndexMap::new(); vertex_count],
            first: vec![None; vertex_count],
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.rotation.len()
    }

    /// Number of half-edges leaving `v`.
    pub fn degree(&self, v: usize) -> usize {
        self.rotation[v].len()
    }

    /// Total number of directed half-edges (twice the edge count).
    pub fn half_edge_count(&self) -> usize {
        self.rotation.iter().map(IndexMap::len).sum()
    }

    /// The neighbour where clockwise iteration around `v` starts.
    pub fn first_neighbour(&self, v: usize) -> Option<usize> {
        self.first.get(v).copied().flatten()
    }

    /// The neighbour following `w` clockwise around `v`.
    pub fn cw(&self, v: usize, w: usize) -> Option<usize> {
        self.rotation.get(v)?.get(&w).map(|l| l.cw)
    }

    /// The neighbour following `w` counter-clockwise around `v`.
    pub fn ccw(&self, v: usize, w: usize) -> Option<usize> {
        self.rotation.get(v)?.get(&w).map(|l| l.ccw)
    }

    /// Neighbours of `v` in clockwise order, starting at
    /// [`first_neighbour`](Self::first_neighbour).
    pub fn neighbours_cw(&self, v: usize) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.degree(v));
        let Some(start) = self.first_neighbour(v) else {
            return out;
        };
        let mut current = start;
        loop {
            out.push(current);
            match self.cw(v, current) {
                Some(next) if next != start && out.len() < self.degree(v) => current = next,
                _ => break,
            }
        }
        out
    }

    /// The half-edge following `(v, w)` on the face to its right.
    ///
    /// Returns `(w, u)` where `u` is the neighbour counter-clockwise of `v`
    /// around `w`, or `None` if `(w, v)` is not a half-edge.
    pub fn next_face_half_edge(&self, v: usize, w: usize) -> Option<(usize, usize)> {
        self.ccw(w, v).map(|u| (w, u))
    }

    /// Dense index of half-edge `(v, w)` among the half-edges leaving `v`.
    pub(crate) fn slot(&self, v: usize, w: usize) -> Option<usize> {
        self.rotation.get(v)?.get_index_of(&w)
    }

    /// Insert `(start, end)` clockwise after `(start, reference)`.
    ///
    /// With no reference, `start` must have no half-edges yet.
    pub(crate) fn add_half_edge_cw(
        &mut self,
        start: usize,
        end: usize,
        reference: Option<usize>,
    ) -> Result<(), PlanarError> {
        let rot = &mut self.rotation[start];
        match reference {
            None => {
                if !rot.is_empty() {
                    return Err(inconsistent(format!(
                        "vertex {start} already has neighbours but no reference was given"
                    )));
                }
                rot.insert(end, Link { cw: end, ccw: end });
                self.first[start] = Some(end);
            }
            Some(r) => {
                let cw_ref = rot
                    .get(&r)
                    .ok_or_else(|| inconsistent(format!("missing half-edge ({start}, {r})")))?
                    .cw;
                if let Some(link) = rot.get_mut(&r) {
                    link.cw = end;
                }
                rot.insert(end, Link { cw: cw_ref, ccw: r });
                if let Some(link) = rot.get_mut(&cw_ref) {
                    link.ccw = end;
                }
            }
        }
        Ok(())
    }

    /// Insert `(start, end)` counter-clockwise before `(start, reference)`.
    pub(crate) fn add_half_edge_ccw(
        &mut self,
        start: usize,
        end: usize,
        reference: Option<usize>,
    ) -> Result<(), PlanarError> {
        let Some(r) = reference else {
            return self.add_half_edge_cw(start, end, None);
        };
        let ccw_ref = self
            .ccw(start, r)
            .ok_or_else(|| inconsistent(format!("missing half-edge ({start}, {r})")))?;
        self.add_half_edge_cw(start, end, Some(ccw_ref))?;
        if self.first[start] == Some(r) {
            self.first[start] = Some(end);
        }
        Ok(())
    }

    /// Insert `(start, end)` as the new first neighbour of `start`.
    pub(crate) fn add_half_edge_first(&mut self, start: usize, end: usize) -> Result<(), PlanarError> {
        let reference = if self.rotation[start].is_empty() {
            None
        } else {
            self.first[start]
        };
        self.add_half_edge_ccw(start, end, reference)
    }

    /// Verify the rotation system is well formed.
    ///
    /// Every half-edge must have a twin, `cw` and `ccw` must be mutually
    /// inverse, and clockwise iteration from the first neighbour must visit
    /// every neighbour exactly once.
    pub fn check_structure(&self) -> Result<(), PlanarError> {
        for (v, rot) in self.rotation.iter().enumerate() {
            for (&w, link) in rot {
                if self.ccw(w, v).is_none() {
                    return Err(inconsistent(format!("half-edge ({v}, {w}) has no twin")));
                }
                if self.ccw(v, link.cw) != Some(w) || self.cw(v, link.ccw) != Some(w) {
                    return Err(inconsistent(format!(
                        "cw/ccw links around {v} disagree at {w}"
                    )));
                }
            }
            let cycle = self.neighbours_cw(v);
            if cycle.len() != rot.len() {
                return Err(inconsistent(format!(
                    "rotation around {v} visits {} of {} neighbours",
                    cycle.len(),
                    rot.len()
                )));
            }
        }
        Ok(())
    }
}
