use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::iter::once;
use std::ops::Range;

pub const INVALID_VERTEX_ID: Vertex = Vertex::MAX;

pub type VInt = u32;
pub type Vertex = VInt;
pub type Edge = (Vertex, Vertex);

/// Undirected graph as adjacency lists over dense vertex IDs `0..n`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    neighbors: Vec<Vec<Vertex>>,
    n_edges: usize,
}

impl Eq for Graph {}

impl Graph {
    /// Make a graph from an edge list over vertices `0..n_vertices`.
    ///
    /// Edges are symmetrized and deduplicated. Loop edges are removed.
    pub fn from_edges<E>(n_vertices: usize, edges: E) -> Graph
    where
        E: IntoIterator,
        E::Item: Borrow<Edge>,
    {
        let mut edges: Vec<Edge> = edges
            .into_iter()
            .map(|x| *x.borrow())
            .filter(|(s, t)| s != t) // Remove loops
            .flat_map(|(s, t)| once((s, t)).chain(once((t, s))))
            .collect();
        edges.sort();
        edges.dedup();

        let mut neighbors = vec![vec![]; n_vertices];
        for (&v, nb) in edges.iter().group_by(|&(s, _)| s).into_iter() {
            if v as usize >= neighbors.len() {
                panic!("Edge endpoint {} is out of range", v);
            }
            neighbors[v as usize] = nb.map(|&(_, t)| t).collect();
        }

        Graph {
            neighbors,
            n_edges: edges.len(),
        }
    }

    /// Make a graph from caller-supplied adjacency lists.
    ///
    /// The lists are taken as-is apart from a range check: the caller is
    /// responsible for symmetry and deduplication.
    pub fn from_adjacency(neighbors: Vec<Vec<Vertex>>) -> Graph {
        let n = neighbors.len();
        let n_edges = neighbors.iter().map(|nb| nb.len()).sum();
        for (v, nb) in neighbors.iter().enumerate() {
            for &v_ in nb {
                assert!(
                    (v_ as usize) < n,
                    "Neighbor {} of vertex {} is out of range",
                    v_,
                    v
                );
            }
        }

        Graph { neighbors, n_edges }
    }

    pub fn num_vertices(&self) -> usize {
        self.neighbors.len()
    }

    /// Returns the number of edges
    ///
    /// Note that edges (u, v) and (v, u) are distinguished in counting.
    #[allow(dead_code)]
    pub fn num_edges(&self) -> usize {
        self.n_edges
    }

    pub fn vertices(&self) -> Range<Vertex> {
        0..(self.neighbors.len() as Vertex)
    }

    pub fn out_degree(&self, v: Vertex) -> VInt {
        self.neighbors[v as usize].len() as VInt
    }

    pub fn out_neighbors(&self, v: Vertex) -> impl Iterator<Item = Vertex> + '_ {
        self.neighbors[v as usize].iter().cloned()
    }

    pub fn has_edge(&self, s: Vertex, t: Vertex) -> bool {
        self.neighbors[s as usize].contains(&t)
    }
}

/// Checks that `m` is a full homomorphism from `g` into `h`.
pub fn is_homomorphism(g: &Graph, h: &Graph, m: &[Vertex]) -> Result<(), String> {
    if m.len() != g.num_vertices() {
        return Err(format!(
            "Different size: source = {}, mapping = {}",
            g.num_vertices(),
            m.len(),
        ));
    }

    for u in g.vertices() {
        let v = m[u as usize];
        if (v as usize) >= h.num_vertices() {
            return Err(format!("u{} is mapped to nonexistent vertex {}", u, v));
        }
    }

    // All edges
    for u in g.vertices() {
        for u_ in g.out_neighbors(u) {
            if u <= u_ {
                let v = m[u as usize];
                let v_ = m[u_ as usize];
                if !h.has_edge(v, v_) {
                    return Err(format!(
                        "Source edge ({u}, {u_}) is mapped to nonexistent \
                        target edge ({v}, {v_})"
                    ));
                }
            }
        }
    }

    Ok(())
}

/// Checks that `m` is a retraction of `g` onto a subgraph: a homomorphism
/// `g -> g` that is the identity on its image.
pub fn is_retraction(g: &Graph, m: &[Vertex]) -> Result<(), String> {
    is_homomorphism(g, g, m)?;

    for u in g.vertices() {
        let v = m[u as usize];
        if m[v as usize] != v {
            return Err(format!(
                "u{} is mapped to v{}, which is not a fixed point",
                u, v
            ));
        }
    }

    Ok(())
}
