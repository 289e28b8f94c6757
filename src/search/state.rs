use super::bitset::*;
use super::engine::Engine;
use crate::graph::*;
use log::trace;

////////////////////////////////////////////////////////////////////////////////
//
// SearchState
//
////////////////////////////////////////////////////////////////////////////////

/// Marker for a search-local contradiction.
///
/// A state that returned `Err(Contradiction)` is broken and must be dropped;
/// the driver simply moves on to the next sibling candidate.
#[derive(Clone, Copy, Debug)]
pub struct Contradiction;

/// One node of the recursion tree: the partial mapping plus the candidate
/// target set of every source vertex.
///
/// Branching clones the whole state, so a child never leaks its mutations
/// into siblings or the parent.
#[derive(Clone)]
pub struct SearchState<Q: VertexBitSet> {
    /// u -> target vertex, or `INVALID_VERTEX_ID` while unmapped
    f: Vec<Vertex>,
    /// u -> still-viable target vertices
    candidates: Vec<Q>,
}

impl<Q: VertexBitSet> SearchState<Q> {
    /// Root state: all vertices unmapped, full candidate sets.
    pub fn fresh(e: &Engine<Q>) -> Self {
        let full = Q::from_vertices(e.h.vertices());
        SearchState {
            f: vec![INVALID_VERTEX_ID; e.g.num_vertices()],
            candidates: vec![full; e.g.num_vertices()],
        }
    }

    /// Root state seeded with a partial mapping.
    ///
    /// `seed` must have length `|V(G)|`; entries are target vertices or
    /// `INVALID_VERTEX_ID`. Seed entries are committed in index order, so a
    /// retract-mode seed may auto-assign a fixed point before its own entry
    /// is reached; an agreeing duplicate is tolerated. A seed whose
    /// propagation reaches a contradiction fails softly: the whole search
    /// then has no results.
    pub fn seeded(e: &Engine<Q>, seed: &[Vertex]) -> Result<Self, Contradiction> {
        assert_eq!(
            seed.len(),
            e.g.num_vertices(),
            "Seed mapping has a wrong length"
        );

        let mut s = Self::fresh(e);
        for (v, &fv) in seed.iter().enumerate() {
            if fv == INVALID_VERTEX_ID {
                continue;
            }
            assert!(
                (fv as usize) < e.h.num_vertices(),
                "Seed target {} of vertex {} is out of range",
                fv,
                v
            );

            let v = v as Vertex;
            if s.f[v as usize] != INVALID_VERTEX_ID {
                if s.f[v as usize] == fv {
                    continue; // Already assigned by retract propagation
                }
                return Err(Contradiction);
            }
            if !s.candidate(v, fv) {
                return Err(Contradiction);
            }
            s.assign(e, v, fv)?;
        }

        Ok(s)
    }

    pub fn mapping(&self) -> &[Vertex] {
        &self.f
    }

    pub fn is_mapped(&self, v: Vertex) -> bool {
        self.f[v as usize] != INVALID_VERTEX_ID
    }

    pub fn candidate(&self, v: Vertex, fv: Vertex) -> bool {
        self.candidates[v as usize][fv as usize]
    }

    pub fn candidate_count(&self, v: Vertex) -> usize {
        self.candidates[v as usize].count_ones()
    }

    /// Commits `v -> fv` and propagates neighborhood consistency.
    ///
    /// Every still-unmapped 1-hop neighbor of `v` keeps only the 1-hop
    /// neighbors of `fv` as candidates, and every vertex within 2 hops keeps
    /// only the 2-hop neighborhood of `fv`. This bounded-radius check is not
    /// iterated to a fixpoint.
    ///
    /// In retract mode the target must end up a fixed point: an unmapped
    /// `fv` is recursively assigned to itself, and a vertex mapped away from
    /// itself is removed from everyone else's candidates.
    ///
    /// On `Err(Contradiction)` the state is broken and must be discarded.
    pub fn assign(
        &mut self,
        e: &Engine<Q>,
        v: Vertex,
        fv: Vertex,
    ) -> Result<(), Contradiction> {
        debug_assert!(self.candidate(v, fv));
        debug_assert!(!self.is_mapped(v));
        trace!("assign: u{} -> v{}", v, fv);
        self.f[v as usize] = fv;

        let n1g = e.g_neighbors[v as usize];
        let n1h = e.h_neighbors[fv as usize];

        // Limit dist=1 neighborhood candidates
        for n in n1g.iter_ones() {
            if self.f[n] == INVALID_VERTEX_ID {
                self.candidates[n] &= n1h;
            }
        }

        // Limit dist=2 neighborhood candidates
        let mut n2g = Q::ZERO;
        for n in n1g.iter_ones() {
            n2g |= e.g_neighbors[n];
        }
        let mut n2h = Q::ZERO;
        for n in n1h.iter_ones() {
            n2h |= e.h_neighbors[n];
        }
        for n in n2g.iter_ones() {
            if self.f[n] == INVALID_VERTEX_ID {
                self.candidates[n] &= n2h;
            }
        }

        if e.opt.retract_mode {
            // Target is either unmapped or already a fixed point
            debug_assert!(
                self.f[fv as usize] == INVALID_VERTEX_ID
                    || self.f[fv as usize] == fv
            );

            // A non-mapped target must itself become a fixed point
            if self.f[fv as usize] == INVALID_VERTEX_ID {
                if !self.candidate(fv, fv) {
                    return Err(Contradiction);
                }
                self.assign(e, fv, fv)?;
            }

            // If `v` is not a fixed point, it cannot be anyone's target
            if fv != v {
                for i in 0..self.f.len() {
                    if self.f[i] == INVALID_VERTEX_ID {
                        self.candidates[i].set(v as usize, false);
                    }
                }
            }
        }

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////
//
// Tests
//
////////////////////////////////////////////////////////////////////////////////
