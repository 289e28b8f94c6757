use super::bitset::*;
use super::engine::{Engine, SearchOutcome};
use super::state::SearchState;
use crate::graph::*;
use log::debug;

////////////////////////////////////////////////////////////////////////////////
//
// SearchRun
//
////////////////////////////////////////////////////////////////////////////////

/// Result accumulator of one top-level invocation.
///
/// This is the only state shared across the whole recursion tree; everything
/// else is either read-only (`engine`) or cloned per branch.
struct SearchRun<'a, Q: VertexBitSet> {
    engine: &'a Engine<Q>,
    result_count: u64,
    mappings: Vec<Vec<Vertex>>,
}

impl<'a, Q: VertexBitSet> SearchRun<'a, Q> {
    fn limit_reached(&self) -> bool {
        self.engine
            .opt
            .result_limit
            .map_or(false, |k| self.result_count >= k)
    }

    fn record(&mut self, s: &SearchState<Q>) {
        if self.engine.opt.store_results && !self.limit_reached() {
            self.mappings.push(s.mapping().to_vec());
        }
        self.result_count += 1;
    }

    /// One node of the depth-first search.
    fn explore(&mut self, s: &SearchState<Q>, depth: usize) {
        let e = self.engine;

        // Select the branch vertex: fewest candidates, then largest degree
        let mut branch = None;
        let mut min_cand = e.h.num_vertices() + 1;
        let mut max_deg = 0;
        for v in e.g.vertices() {
            if s.is_mapped(v) {
                continue;
            }
            let ccount = s.candidate_count(v);
            let deg = e.g.out_degree(v);
            if ccount < min_cand || (ccount == min_cand && deg > max_deg) {
                min_cand = ccount;
                max_deg = deg;
                branch = Some(v);
            }
        }

        // Some vertex has no candidates
        if min_cand == 0 {
            return;
        }

        // All vertices have been mapped
        let Some(v) = branch else {
            self.record(s);
            return;
        };

        // Go over the candidate targets of `v` in ascending order
        for fv in e.h.vertices() {
            if self.limit_reached() {
                break;
            }
            if !s.candidate(v, fv) {
                continue;
            }

            let mut child = s.clone();
            if child.assign(e, v, fv).is_err() {
                continue;
            }

            match e.opt.max_depth {
                Some(d) if depth >= d => self.record(&child),
                _ => self.explore(&child, depth + 1),
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
//
// Public Free Functions
//
////////////////////////////////////////////////////////////////////////////////

/// Runs a full search, optionally seeded with a partial mapping.
pub fn run<Q: VertexBitSet>(
    e: &Engine<Q>,
    seed: Option<&[Vertex]>,
    start_depth: usize,
) -> SearchOutcome {
    let mut run = SearchRun {
        engine: e,
        result_count: 0,
        mappings: Vec::new(),
    };

    let root = match seed {
        None => Ok(SearchState::fresh(e)),
        Some(f0) => SearchState::seeded(e, f0),
    };

    match root {
        Ok(s) => run.explore(&s, start_depth),
        Err(_) => debug!("seed mapping is infeasible; no results"),
    }

    debug!(
        "search finished: result_count = {}, stored = {}",
        run.result_count,
        run.mappings.len()
    );

    SearchOutcome {
        result_count: run.result_count,
        mappings: run.mappings,
    }
}

////////////////////////////////////////////////////////////////////////////////
//
// Tests
//
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::{is_homomorphism, is_retraction};
    use crate::search::{Homsearch, SearchOptions};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// A 5-cycle with diagonals through v0, so v0 is adjacent to every
    /// other vertex. It has exactly 6 retracts and 36 endomorphisms.
    fn c5_diag() -> Graph {
        Graph::from_adjacency(vec![
            vec![1, 2, 3, 4],
            vec![0, 2],
            vec![0, 1, 3],
            vec![0, 2, 4],
            vec![0, 3],
        ])
    }

    /// Brute-force count over all |V(H)|^|V(G)| functions.
    fn brute_force_count(g: &Graph, h: &Graph, retract: bool) -> u64 {
        let n = g.num_vertices();
        let m = h.num_vertices();
        let mut f = vec![0 as Vertex; n];
        let mut count = 0;

        loop {
            let hom = is_homomorphism(g, h, &f).is_ok();
            let fixed =
                !retract || g.vertices().all(|u| f[f[u as usize] as usize] == f[u as usize]);
            if hom && fixed {
                count += 1;
            }

            // Odometer increment
            let mut i = 0;
            loop {
                if i == n {
                    return count;
                }
                f[i] += 1;
                if (f[i] as usize) < m {
                    break;
                }
                f[i] = 0;
                i += 1;
            }
        }
    }

    #[test]
    fn test_retracts_of_c5_diag() {
        init_logger();

        let g = c5_diag();
        let opt = SearchOptions {
            retract_mode: true,
            ..Default::default()
        };
        let hs = Homsearch::new(g.clone(), g.clone(), opt).unwrap();
        let out = hs.search();

        assert_eq!(out.result_count, 6);
        assert_eq!(out.mappings.len(), 6);
        for m in &out.mappings {
            is_retraction(&g, m).unwrap();
        }
        // The identity is always found
        assert!(out.mappings.iter().any(|m| m == &[0, 1, 2, 3, 4]));
    }

    #[test]
    fn test_homomorphisms_of_c5_diag() {
        let g = c5_diag();
        let hs =
            Homsearch::new(g.clone(), g.clone(), SearchOptions::default()).unwrap();
        let out = hs.search();

        assert_eq!(out.result_count, 36);
        assert_eq!(out.mappings.len(), 36);
        for m in &out.mappings {
            is_homomorphism(&g, &g, m).unwrap();
        }
    }

    #[test]
    fn test_counts_match_brute_force() {
        let triangle = Graph::from_edges(3, [(0, 1), (0, 2), (1, 2)]);
        let path4 = Graph::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
        let square = Graph::from_edges(4, [(0, 1), (1, 2), (2, 3), (3, 0)]);

        let cases: [(&Graph, &Graph, bool); 5] = [
            (&path4, &triangle, false),
            (&triangle, &triangle, false),
            (&square, &triangle, false),
            (&square, &square, true),
            (&path4, &path4, true),
        ];

        for (g, h, retract) in cases {
            let opt = SearchOptions {
                retract_mode: retract,
                store_results: false,
                ..Default::default()
            };
            let hs = Homsearch::new(g.clone(), h.clone(), opt).unwrap();
            assert_eq!(
                hs.search().result_count,
                brute_force_count(g, h, retract),
                "mismatch for retract = {}",
                retract
            );
        }
    }

    #[test]
    fn test_seeded_retracts() {
        let g = c5_diag();
        let opt = SearchOptions {
            retract_mode: true,
            ..Default::default()
        };
        let hs = Homsearch::new(g.clone(), g.clone(), opt).unwrap();

        // Fixing v1 as a fixed point leaves 3 retracts
        let seed = [
            INVALID_VERTEX_ID,
            1,
            INVALID_VERTEX_ID,
            INVALID_VERTEX_ID,
            INVALID_VERTEX_ID,
        ];
        assert_eq!(hs.search_from(&seed, 0).result_count, 3);

        // v0 -> v1 cannot be extended to any retraction
        let seed = [
            1,
            INVALID_VERTEX_ID,
            INVALID_VERTEX_ID,
            INVALID_VERTEX_ID,
            INVALID_VERTEX_ID,
        ];
        assert_eq!(hs.search_from(&seed, 0).result_count, 0);
    }

    #[test]
    fn test_seeded_homomorphism() {
        let g = c5_diag();
        let hs =
            Homsearch::new(g.clone(), g.clone(), SearchOptions::default()).unwrap();

        // v0 -> v4, v4 -> v3, v3 -> v0 extends in exactly one way
        let seed = [4, INVALID_VERTEX_ID, INVALID_VERTEX_ID, 0, 3];
        let out = hs.search_from(&seed, 0);

        assert_eq!(out.result_count, 1);
        let m = &out.mappings[0];
        assert_eq!(m[2], 3);
        assert_eq!(m[1], 0);
        is_homomorphism(&g, &g, m).unwrap();
    }

    #[test]
    fn test_result_limit() {
        let g = c5_diag();
        let opt = SearchOptions {
            result_limit: Some(10),
            ..Default::default()
        };
        let hs = Homsearch::new(g.clone(), g, opt).unwrap();
        let out = hs.search();

        assert_eq!(out.result_count, 10);
        assert_eq!(out.mappings.len(), 10);
    }

    #[test]
    fn test_count_only() {
        let g = c5_diag();
        let opt = SearchOptions {
            store_results: false,
            ..Default::default()
        };
        let hs = Homsearch::new(g.clone(), g, opt).unwrap();
        let out = hs.search();

        assert_eq!(out.result_count, 36);
        assert!(out.mappings.is_empty());
    }

    #[test]
    fn test_empty_source_graph() {
        let g = Graph::from_adjacency(vec![]);
        let h = c5_diag();
        let hs = Homsearch::new(g, h, SearchOptions::default()).unwrap();
        let out = hs.search();

        // Exactly one result: the empty mapping
        assert_eq!(out.result_count, 1);
        assert_eq!(out.mappings, vec![Vec::<Vertex>::new()]);
    }

    #[test]
    fn test_depth_limit_records_partial_states() {
        let g = c5_diag();
        let opt = SearchOptions {
            max_depth: Some(0),
            ..Default::default()
        };
        let hs = Homsearch::new(g.clone(), g.clone(), opt).unwrap();
        let out = hs.search();

        // The first branch vertex is v0 (largest degree); each of its 5
        // targets is recorded as a partial result without recursing
        assert_eq!(out.result_count, 5);
        for (fv, m) in out.mappings.iter().enumerate() {
            assert_eq!(m[0], fv as Vertex);
            assert!(m[1..].iter().all(|&x| x == INVALID_VERTEX_ID));
        }
    }

    #[test]
    fn test_determinism() {
        let g = c5_diag();
        let hs =
            Homsearch::new(g.clone(), g, SearchOptions::default()).unwrap();

        let a = hs.search();
        let b = hs.search();
        assert_eq!(a, b);
    }

    #[test]
    fn test_wide_bitset_tiers() {
        // A 70-vertex path forces the 128-bit tier; fold it onto an edge
        let edges: Vec<(Vertex, Vertex)> = (0..69).map(|i| (i, i + 1)).collect();
        let path70 = Graph::from_edges(70, edges);
        let k2 = Graph::from_edges(2, [(0, 1)]);

        let opt = SearchOptions {
            store_results: false,
            ..Default::default()
        };
        let hs = Homsearch::new(path70, k2, opt).unwrap();

        // A path maps onto an edge in exactly two ways (parity of position)
        assert_eq!(hs.search().result_count, 2);
    }

    #[test]
    fn test_capacity_boundary() {
        let small = Graph::from_adjacency(vec![]);
        let at_limit = Graph::from_adjacency(vec![vec![]; 4096]);
        let over = Graph::from_adjacency(vec![vec![]; 4097]);

        assert!(Homsearch::new(
            small.clone(),
            at_limit,
            SearchOptions::default()
        )
        .is_ok());

        let err = Homsearch::new(small, over, SearchOptions::default())
            .err()
            .unwrap();
        assert_eq!(err.vertices, 4097);
    }
}
