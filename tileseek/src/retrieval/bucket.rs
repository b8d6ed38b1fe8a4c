use crate::common::{intersect_sorted, FeatureId};
use crate::errors::TileSeekResult;
use crate::geometry::RectD;
use crate::store::tile::{TileHandle, TileId};

/// Progress of a bucket through a retrieval.
///
/// The progression is monotonic and single-writer: `Pending → Touched →
/// Covered`, with `Finished` reachable from any state during the post-loop
/// drain. `Covered` and `Finished` are both terminal.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BucketProgress {
    /// The expanding viewport has not reached the tile yet.
    Pending,
    /// Address features are cached; geometry matches still grow with the
    /// viewport.
    Touched,
    /// The viewport fully contains the tile bounds; the result is final and
    /// has been reported.
    Covered,
    /// Retired by the drain without reaching full coverage; `touched` records
    /// whether the viewport ever intersected the tile.
    Finished { touched: bool },
}

/// Per-tile working state of a retrieval.
///
/// Holds the borrowed tile handle, the one-shot address match cache, the
/// latest geometry matches and their running intersection. All sequences are
/// ascending and duplicate-free.
pub struct TileBucket {
    handle: TileHandle,
    bounds: RectD,
    address_features: Vec<FeatureId>,
    geometry_features: Vec<FeatureId>,
    intersection: Vec<FeatureId>,
    progress: BucketProgress,
}

impl TileBucket {
    pub(crate) fn new(handle: TileHandle) -> TileSeekResult<TileBucket> {
        let bounds = handle.value()?.header().bounds;
        Ok(TileBucket {
            handle,
            bounds,
            address_features: Vec::new(),
            geometry_features: Vec::new(),
            intersection: Vec::new(),
            progress: BucketProgress::Pending,
        })
    }

    pub fn id(&self) -> &TileId {
        self.handle.id()
    }

    pub(crate) fn handle(&self) -> &TileHandle {
        &self.handle
    }

    pub fn bounds(&self) -> &RectD {
        &self.bounds
    }

    pub fn address_features(&self) -> &[FeatureId] {
        &self.address_features
    }

    pub fn geometry_features(&self) -> &[FeatureId] {
        &self.geometry_features
    }

    pub fn intersection(&self) -> &[FeatureId] {
        &self.intersection
    }

    pub fn progress(&self) -> BucketProgress {
        self.progress
    }

    /// Whether the viewport has ever intersected this tile.
    pub fn intersects_viewport(&self) -> bool {
        matches!(
            self.progress,
            BucketProgress::Touched
                | BucketProgress::Covered
                | BucketProgress::Finished { touched: true }
        )
    }

    pub fn is_covered(&self) -> bool {
        self.progress == BucketProgress::Covered
    }

    pub fn is_finished(&self) -> bool {
        matches!(
            self.progress,
            BucketProgress::Covered | BucketProgress::Finished { .. }
        )
    }

    /// First viewport contact: caches the sorted address matches. Happens
    /// exactly once over the lifetime of the retrieval.
    pub(crate) fn cache_address_features(&mut self, features: Vec<FeatureId>) {
        debug_assert_eq!(self.progress, BucketProgress::Pending);
        self.address_features = features;
        self.progress = BucketProgress::Touched;
    }

    /// Replaces the geometry matches of the latest pass and recomputes the
    /// intersection into a fresh buffer.
    pub(crate) fn update_geometry_features(&mut self, features: Vec<FeatureId>) {
        debug_assert_eq!(self.progress, BucketProgress::Touched);
        self.geometry_features = features;
        self.intersection = intersect_sorted(&self.address_features, &self.geometry_features);
    }

    /// Retires the bucket because the viewport fully contains its bounds.
    pub(crate) fn finish_covered(&mut self) {
        debug_assert_eq!(self.progress, BucketProgress::Touched);
        self.progress = BucketProgress::Covered;
    }

    /// Retires the bucket in the post-loop drain.
    pub(crate) fn finish_drained(&mut self) {
        debug_assert!(!self.is_finished());
        self.progress = BucketProgress::Finished {
            touched: self.progress == BucketProgress::Touched,
        };
    }
}
