//! Crate-wide constants.

/// Section tag of the textual (trie) index inside a tile.
pub const TEXT_INDEX_TAG: &str = "text_index";

/// Section tag of the geometry (scale) index inside a tile.
pub const GEOMETRY_INDEX_TAG: &str = "geom_index";

/// Format version written into freshly built text index sections.
pub const TEXT_INDEX_VERSION: u8 = 1;

/// The deepest quadtree level tiles index their geometry at.
pub const MAX_INDEX_SCALE: u32 = 10;

/// Default scale hint used by queries that do not choose one.
pub const DEFAULT_SEARCH_SCALE: u32 = 7;

/// Hard cap on quadtree depth accepted by the covering machinery; Morton
/// codes interleave two coordinates into a u64.
pub const MAX_COVERING_SCALE: u32 = 24;

/// Extent of the common geographic coordinate system. Every cell covering
/// is computed over this fixed square.
pub const WORLD_MIN: f64 = -180.0;
pub const WORLD_MAX: f64 = 180.0;
