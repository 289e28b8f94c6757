/// Fixed parameters of one search engine instance.
#[derive(Clone, Debug)]
pub struct SearchOptions {
    /// Stop opening new branches once this many results have been recorded.
    /// `None` means unbounded.
    pub result_limit: Option<u64>,
    /// Materialize result mappings in addition to counting them.
    pub store_results: bool,
    /// Enforce the fixed-point and image-exclusivity constraints of a
    /// retraction search.
    pub retract_mode: bool,
    /// Record states reaching this depth as results instead of recursing.
    /// Such results may contain unmapped entries.
    pub max_depth: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            result_limit: None,
            store_results: true,
            retract_mode: false,
            max_depth: None,
        }
    }
}
