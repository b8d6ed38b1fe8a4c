use std::f64::consts::SQRT_2;

use crate::common::constants::{GEOMETRY_INDEX_TAG, TEXT_INDEX_TAG};
use crate::common::sort_and_dedup;
use crate::errors::TileSeekResult;
use crate::geometry::RectD;
use crate::query::SearchParams;
use crate::retrieval::bucket::TileBucket;
use crate::retrieval::callback::RetrievalCallback;
use crate::retrieval::limits::Limits;
use crate::retrieval::matchers::{retrieve_address_features, retrieve_geometry_features};
use crate::store::TileStore;

/// The retrieval engine.
///
/// A retrieval runs in two phases. [`Retrieval::init`] freezes the working
/// set: it enumerates the store, acquires a handle per tile and admits only
/// tiles carrying both index sections. [`Retrieval::run`] then grows the base
/// viewport by a factor of √2 per iteration, matching each still-unfinished
/// bucket against the current viewport and reporting a bucket's final feature
/// list through the callback exactly once — either when the viewport fully
/// covers the tile or, after the loop stops, in a drain over the partially
/// covered remainder.
///
/// `run` is synchronous and cannot be interrupted; callers bound the work
/// through [`Limits`]. After `run` returns, every bucket is finished and a
/// second `run` is a no-op; reusing the engine for another query requires
/// `init` again.
///
/// # Examples
///
/// ```rust,ignore
/// let mut retrieval = Retrieval::new();
/// retrieval.init(&store, viewport, params, Limits::default())?;
/// retrieval.run(&mut callback)?;
/// ```
pub struct Retrieval {
    viewport: RectD,
    params: SearchParams,
    limits: Limits,
    buckets: Vec<TileBucket>,
}

impl Default for Retrieval {
    fn default() -> Self {
        Retrieval::new()
    }
}

impl Retrieval {
    pub fn new() -> Retrieval {
        Retrieval {
            viewport: RectD::default(),
            params: SearchParams::default(),
            limits: Limits::default(),
            buckets: Vec::new(),
        }
    }

    /// Begins a retrieval: captures the inputs and builds the frozen working
    /// set of tile buckets.
    ///
    /// Tiles whose handle is dead or which lack the text or geometry index
    /// section are skipped silently apart from a debug log line.
    pub fn init(
        &mut self,
        store: &TileStore,
        viewport: RectD,
        params: SearchParams,
        limits: Limits,
    ) -> TileSeekResult<()> {
        self.viewport = viewport;
        self.params = params;
        self.limits = limits;
        self.buckets.clear();

        for meta in store.tiles()? {
            let handle = store.handle(&meta.id)?;
            if !handle.is_alive() {
                log::debug!("Skipping tile {}: handle is dead", meta.id);
                continue;
            }
            let tile = handle.value()?;
            if !tile.has_section(TEXT_INDEX_TAG) || !tile.has_section(GEOMETRY_INDEX_TAG) {
                log::debug!("Skipping tile {}: index section missing", meta.id);
                continue;
            }
            self.buckets.push(TileBucket::new(handle)?);
        }
        Ok(())
    }

    /// Drives the retrieval to completion, reporting per-tile results through
    /// `callback`.
    ///
    /// On error, results reported so far are not rolled back and the engine
    /// must be re-initialized before reuse.
    pub fn run(&mut self, callback: &mut dyn RetrievalCallback) -> TileSeekResult<()> {
        let mut viewport_scale = 1.0f64;
        loop {
            let mut scale = viewport_scale;
            if self.limits.is_max_viewport_scale_set() && scale >= self.limits.max_viewport_scale()
            {
                scale = self.limits.max_viewport_scale();
            }

            let viewport = self.viewport.scaled(scale);
            self.retrieve_for_viewport(&viewport, callback)?;

            if self.viewport_covers_all_tiles() {
                break;
            }
            if self.limits.is_max_viewport_scale_set() && scale >= self.limits.max_viewport_scale()
            {
                break;
            }
            if self.limits.is_min_num_features_set()
                && self.count_retrieved_features() >= self.limits.min_num_features()
            {
                break;
            }

            viewport_scale *= SQRT_2;
        }

        for bucket in &mut self.buckets {
            if bucket.is_finished() {
                continue;
            }
            // Not covered by the viewport, so the bucket was never reported.
            bucket.finish_drained();
            if !bucket.intersection().is_empty() {
                callback.on_tile_processed(bucket.id(), bucket.intersection());
            }
        }
        Ok(())
    }

    /// Read-only view of the working set, in iteration order.
    pub fn buckets(&self) -> &[TileBucket] {
        &self.buckets
    }

    fn retrieve_for_viewport(
        &mut self,
        viewport: &RectD,
        callback: &mut dyn RetrievalCallback,
    ) -> TileSeekResult<()> {
        for bucket in &mut self.buckets {
            if bucket.is_finished() || !viewport.intersects(bucket.bounds()) {
                continue;
            }

            if !bucket.intersects_viewport() {
                // First time the viewport touches this tile: retrieve all
                // matching features from the text index.
                let mut features = retrieve_address_features(bucket.handle(), &self.params)?;
                sort_and_dedup(&mut features);
                bucket.cache_address_features(features);
            }

            if !bucket.is_covered() {
                let mut features =
                    retrieve_geometry_features(bucket.handle(), viewport, &self.params)?;
                sort_and_dedup(&mut features);
                bucket.update_geometry_features(features);
            }

            if !bucket.is_covered() && viewport.contains_rect(bucket.bounds()) {
                // Later passes skip the bucket, so report its features now.
                bucket.finish_covered();
                if !bucket.intersection().is_empty() {
                    callback.on_tile_processed(bucket.id(), bucket.intersection());
                }
            }
        }
        Ok(())
    }

    fn viewport_covers_all_tiles(&self) -> bool {
        self.buckets.iter().all(|bucket| bucket.is_covered())
    }

    fn count_retrieved_features(&self) -> u64 {
        self.buckets
            .iter()
            .map(|bucket| bucket.intersection().len() as u64)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::FeatureId;
    use crate::errors::ErrorKind;
    use crate::geometry::PointD;
    use crate::index::text::TokenTrie;
    use crate::store::memory::{MemoryTileStore, TileBuilder};
    use crate::store::tile::{
        TextCodingParams, TextIndexSection, TileData, TileHeader, TileId,
    };

    #[derive(Default)]
    struct RecordingCallback {
        calls: Vec<(TileId, Vec<FeatureId>)>,
    }

    impl RetrievalCallback for RecordingCallback {
        fn on_tile_processed(&mut self, tile_id: &TileId, features: &[FeatureId]) {
            assert!(!features.is_empty());
            assert!(features.windows(2).all(|pair| pair[0] < pair[1]));
            self.calls.push((tile_id.clone(), features.to_vec()));
        }
    }

    fn store_with_bar_tile() -> TileStore {
        let store = MemoryTileStore::new();
        let mut builder = TileBuilder::new("msk");
        builder
            .add_poi(PointD::new(0.0, 0.0), "Whiskey bar", "en")
            .unwrap();
        builder
            .add_poi(PointD::new(1.0, 1.0), "Wine bar", "en")
            .unwrap();
        store.register(builder.build()).unwrap();
        TileStore::new(store)
    }

    #[test]
    fn test_run_reports_each_tile_once() {
        let store = store_with_bar_tile();
        let mut retrieval = Retrieval::new();
        retrieval
            .init(
                &store,
                RectD::new(0.0, 0.0, 1.0, 1.0),
                SearchParams::from_query("bar"),
                Limits::default(),
            )
            .unwrap();

        let mut callback = RecordingCallback::default();
        retrieval.run(&mut callback).unwrap();
        assert_eq!(callback.calls.len(), 1);
        assert_eq!(callback.calls[0].1, vec![0, 1]);
        assert!(retrieval.buckets().iter().all(|b| b.is_finished()));
    }

    #[test]
    fn test_second_run_is_noop() {
        let store = store_with_bar_tile();
        let mut retrieval = Retrieval::new();
        retrieval
            .init(
                &store,
                RectD::new(0.0, 0.0, 1.0, 1.0),
                SearchParams::from_query("bar"),
                Limits::default(),
            )
            .unwrap();

        let mut first = RecordingCallback::default();
        retrieval.run(&mut first).unwrap();
        let mut second = RecordingCallback::default();
        retrieval.run(&mut second).unwrap();
        assert!(second.calls.is_empty());
    }

    #[test]
    fn test_run_without_init_is_empty() {
        let mut retrieval = Retrieval::new();
        let mut callback = RecordingCallback::default();
        retrieval.run(&mut callback).unwrap();
        assert!(callback.calls.is_empty());
    }

    #[test]
    fn test_admission_skips_incomplete_tiles() {
        let store = MemoryTileStore::new();
        let mut full = TileBuilder::new("full");
        full.add_poi(PointD::new(0.0, 0.0), "Cafe", "en").unwrap();
        store.register(full.build()).unwrap();
        store
            .register(TileBuilder::new("no-text").without_text_index().build())
            .unwrap();
        store
            .register(TileBuilder::new("no-geom").without_geometry_index().build())
            .unwrap();

        let mut retrieval = Retrieval::new();
        retrieval
            .init(
                &TileStore::new(store),
                RectD::new(-1.0, -1.0, 1.0, 1.0),
                SearchParams::from_query("cafe"),
                Limits::default(),
            )
            .unwrap();
        assert_eq!(retrieval.buckets().len(), 1);
        assert_eq!(retrieval.buckets()[0].id(), &TileId::new("full"));
    }

    #[test]
    fn test_malformed_text_index_fails_run() {
        let store = MemoryTileStore::new();
        let header = TileHeader {
            bounds: RectD::new(0.0, 0.0, 1.0, 1.0),
            scale_range: (0, 4),
            coding: TextCodingParams::default(),
        };
        let tile = TileData::new(
            TileId::new("broken"),
            header,
            Some(TextIndexSection::with_version(99, TokenTrie::new())),
            Some(crate::index::spatial::ScaleIndexBuilder::new(4).build()),
        );
        store.register(tile).unwrap();

        let mut retrieval = Retrieval::new();
        retrieval
            .init(
                &TileStore::new(store),
                RectD::new(0.0, 0.0, 1.0, 1.0),
                SearchParams::from_query("cafe"),
                Limits::default(),
            )
            .unwrap();

        let mut callback = RecordingCallback::default();
        let err = retrieval.run(&mut callback).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MalformedIndex);
        assert!(callback.calls.is_empty());
    }

    #[test]
    fn test_tile_outside_viewport_is_drained_silently() {
        let store = MemoryTileStore::new();
        let mut far = TileBuilder::new("far");
        far.add_poi(PointD::new(150.0, 150.0), "Cafe", "en").unwrap();
        store.register(far.build()).unwrap();

        let mut limits = Limits::new();
        limits.set_max_viewport_scale(2.0);
        let mut retrieval = Retrieval::new();
        retrieval
            .init(
                &TileStore::new(store),
                RectD::new(0.0, 0.0, 1.0, 1.0),
                SearchParams::from_query("cafe"),
                limits,
            )
            .unwrap();

        let mut callback = RecordingCallback::default();
        retrieval.run(&mut callback).unwrap();
        assert!(callback.calls.is_empty());
        assert!(retrieval.buckets()[0].is_finished());
        assert!(!retrieval.buckets()[0].intersects_viewport());
    }
}
