//! Spatial side of a tile: quadtree cell coverings of a viewport and the
//! scale-stratified geometry index queried with them.

pub mod covering;
pub mod scale_index;

pub use covering::{cell_of_point, cover_viewport, CoveringPolicy};
pub use scale_index::{ScaleIndex, ScaleIndexBuilder};
