use super::backtrack;
use super::bitset::*;
use super::search_option::SearchOptions;
use crate::graph::*;
use std::error::Error;
use std::fmt;

/// Largest supported bit-set width, and thus the largest vertex count of
/// either graph.
pub const MAX_CAPACITY: usize = 4096;

////////////////////////////////////////////////////////////////////////////////
//
// CapacityError
//
////////////////////////////////////////////////////////////////////////////////

/// The graphs exceed the widest supported bit-set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapacityError {
    pub vertices: usize,
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "graphs with {} vertices exceed the largest supported \
            bit-set width of {}",
            self.vertices, MAX_CAPACITY
        )
    }
}

impl Error for CapacityError {}

////////////////////////////////////////////////////////////////////////////////
//
// SearchOutcome
//
////////////////////////////////////////////////////////////////////////////////

/// Aggregate result of one search invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Number of recorded results. With a depth limit configured this counts
    /// partially-consistent branches at the limit, not full homomorphisms.
    pub result_count: u64,
    /// Recorded mappings in depth-first order, each of length `|V(G)|`.
    /// Empty unless `store_results` is set; bounded by `result_limit`.
    /// Entries are `INVALID_VERTEX_ID` where a depth-limited result left a
    /// vertex unmapped.
    pub mappings: Vec<Vec<Vertex>>,
}

////////////////////////////////////////////////////////////////////////////////
//
// Engine
//
////////////////////////////////////////////////////////////////////////////////

/// Search instance for one concrete bit-set width.
///
/// Everything here is read-only once built; search states reference the
/// neighbor bit-sets without copying them.
pub struct Engine<Q: VertexBitSet> {
    pub(crate) g: Graph,
    pub(crate) h: Graph,
    /// v -> neighbors of v in G
    pub(crate) g_neighbors: Vec<Q>,
    /// v -> neighbors of v in H
    pub(crate) h_neighbors: Vec<Q>,
    pub(crate) opt: SearchOptions,
}

impl<Q: VertexBitSet> Engine<Q> {
    pub fn new(g: Graph, h: Graph, opt: SearchOptions) -> Self {
        let g_neighbors = neighbor_sets(&g);
        let h_neighbors = neighbor_sets(&h);
        Engine {
            g,
            h,
            g_neighbors,
            h_neighbors,
            opt,
        }
    }
}

fn neighbor_sets<Q: VertexBitSet>(g: &Graph) -> Vec<Q> {
    g.vertices()
        .map(|v| Q::from_vertices(g.out_neighbors(v)))
        .collect()
}

////////////////////////////////////////////////////////////////////////////////
//
// Homsearch
//
////////////////////////////////////////////////////////////////////////////////

enum EngineImpl {
    W64(Engine<VertexBitSet64>),
    W128(Engine<VertexBitSet128>),
    W256(Engine<VertexBitSet256>),
    W1024(Engine<VertexBitSet1024>),
    W4096(Engine<VertexBitSet4096>),
}

/// Homomorphism and retraction search over a fixed pair of graphs.
///
/// Construction picks the tightest bit-set width that holds both graphs and
/// builds the neighbor index once; every `search*` call then re-runs the
/// backtracking from scratch.
pub struct Homsearch {
    inner: EngineImpl,
}

impl Homsearch {
    pub fn new(
        g: Graph,
        h: Graph,
        opt: SearchOptions,
    ) -> Result<Homsearch, CapacityError> {
        use EngineImpl::*;

        let inner = match g.num_vertices().max(h.num_vertices()) {
            n if n <= 64 => W64(Engine::new(g, h, opt)),
            n if n <= 128 => W128(Engine::new(g, h, opt)),
            n if n <= 256 => W256(Engine::new(g, h, opt)),
            n if n <= 1024 => W1024(Engine::new(g, h, opt)),
            n if n <= 4096 => W4096(Engine::new(g, h, opt)),
            n => return Err(CapacityError { vertices: n }),
        };

        Ok(Homsearch { inner })
    }

    /// Searches from the all-unmapped root state.
    pub fn search(&self) -> SearchOutcome {
        self.search_at(0)
    }

    /// Searches from the all-unmapped root state with an initial depth
    /// counter, which only matters under a `max_depth` bound.
    pub fn search_at(&self, start_depth: usize) -> SearchOutcome {
        use EngineImpl::*;

        match &self.inner {
            W64(e) => backtrack::run(e, None, start_depth),
            W128(e) => backtrack::run(e, None, start_depth),
            W256(e) => backtrack::run(e, None, start_depth),
            W1024(e) => backtrack::run(e, None, start_depth),
            W4096(e) => backtrack::run(e, None, start_depth),
        }
    }

    /// Searches from a caller-supplied partial mapping.
    ///
    /// `seed` must have length `|V(G)|` with `INVALID_VERTEX_ID` marking the
    /// unseeded entries. An infeasible seed yields an empty outcome.
    pub fn search_from(&self, seed: &[Vertex], start_depth: usize) -> SearchOutcome {
        use EngineImpl::*;

        match &self.inner {
            W64(e) => backtrack::run(e, Some(seed), start_depth),
            W128(e) => backtrack::run(e, Some(seed), start_depth),
            W256(e) => backtrack::run(e, Some(seed), start_depth),
            W1024(e) => backtrack::run(e, Some(seed), start_depth),
            W4096(e) => backtrack::run(e, Some(seed), start_depth),
        }
    }
}
