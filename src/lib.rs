pub mod graph;
pub mod search;

pub use graph::{Graph, Vertex, INVALID_VERTEX_ID};
pub use search::{CapacityError, Homsearch, SearchOptions, SearchOutcome};
