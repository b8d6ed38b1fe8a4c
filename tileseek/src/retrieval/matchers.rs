//! Glue between the retrieval engine and the per-tile indexes.

use crate::common::FeatureId;
use crate::errors::TileSeekResult;
use crate::geometry::RectD;
use crate::index::spatial::{cover_viewport, CoveringPolicy};
use crate::index::text::{match_features_in_trie, AllPassFilter};
use crate::query::SearchParams;
use crate::store::tile::TileHandle;

/// Walks the tile's text trie and collects the features whose indexed tokens
/// match `params`. The result is unsorted; the engine sorts it.
pub(crate) fn retrieve_address_features(
    handle: &TileHandle,
    params: &SearchParams,
) -> TileSeekResult<Vec<FeatureId>> {
    let tile = handle.value()?;
    let coding = tile.header().coding;
    let trie = tile.text_index()?.trie()?;

    let mut features = Vec::new();
    match_features_in_trie(params, &coding, trie, &AllPassFilter, &mut |value| {
        features.push(value.feature);
    });
    Ok(features)
}

/// Collects the features whose covering cell at the clamped scale intersects
/// `viewport`. The result may contain duplicates and is unsorted; the engine
/// normalizes it.
pub(crate) fn retrieve_geometry_features(
    handle: &TileHandle,
    viewport: &RectD,
    params: &SearchParams,
) -> TileSeekResult<Vec<FeatureId>> {
    let tile = handle.value()?;
    let (min_scale, max_scale) = tile.header().scale_range;
    let scale = params.scale().clamp(min_scale, max_scale);
    let index = tile.geometry_index()?;

    let mut features = Vec::new();
    for (lo, hi) in cover_viewport(viewport, scale, CoveringPolicy::ViewportWithLowLevels) {
        index.for_each_in_interval_and_scale(&mut |feature| features.push(feature), lo, hi, scale);
    }
    Ok(features)
}
