use crate::common::FeatureId;
use crate::store::tile::TileId;

/// Receiver of per-tile retrieval results.
///
/// The engine guarantees: at most one call per tile id per run; `features`
/// is never empty, strictly ascending and duplicate-free; there is no
/// ordering guarantee between calls for different tiles beyond the order in
/// which their buckets finish.
pub trait RetrievalCallback {
    fn on_tile_processed(&mut self, tile_id: &TileId, features: &[FeatureId]);
}
