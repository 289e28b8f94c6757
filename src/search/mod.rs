mod backtrack;
mod bitset;
mod engine;
mod search_option;
mod state;

pub use bitset::{
    VertexBitSet, VertexBitSet1024, VertexBitSet128, VertexBitSet256,
    VertexBitSet4096, VertexBitSet64,
};
pub use engine::{CapacityError, Homsearch, SearchOutcome, MAX_CAPACITY};
pub use search_option::SearchOptions;
