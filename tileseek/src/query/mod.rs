//! Query parameters for a retrieval.

pub mod search_params;

pub use search_params::{lang_index, SearchParams, TokenGroup};
