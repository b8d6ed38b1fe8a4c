use crate::common::FeatureId;
use crate::geometry::PointD;
use crate::index::spatial::covering::cell_of_point;

/// Scale-stratified geometry index of one tile.
///
/// For every scale `0..=max_scale` the index keeps the tile's features as a
/// `(cell, feature)` list sorted by cell code, where `cell` is the Morton
/// code of the feature's position at that scale. Interval queries are a
/// binary search plus a linear walk.
///
/// Built through [`ScaleIndexBuilder`] and immutable afterwards.
#[derive(Debug)]
pub struct ScaleIndex {
    max_scale: u32,
    buckets: Vec<Vec<(u64, FeatureId)>>,
}

impl ScaleIndex {
    pub fn max_scale(&self) -> u32 {
        self.max_scale
    }

    /// Number of features indexed.
    pub fn len(&self) -> usize {
        self.buckets.first().map_or(0, |bucket| bucket.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Emits every feature whose cell code at `scale` lies in `[lo, hi)`.
    ///
    /// A scale outside the built range emits nothing; callers clamp to the
    /// tile's scale range beforehand.
    pub fn for_each_in_interval_and_scale<C: FnMut(FeatureId)>(
        &self,
        collector: &mut C,
        lo: u64,
        hi: u64,
        scale: u32,
    ) {
        let Some(bucket) = self.buckets.get(scale as usize) else {
            return;
        };
        let start = bucket.partition_point(|&(cell, _)| cell < lo);
        for &(cell, feature) in &bucket[start..] {
            if cell >= hi {
                break;
            }
            collector(feature);
        }
    }
}

/// Accumulates features and produces a sealed [`ScaleIndex`].
pub struct ScaleIndexBuilder {
    max_scale: u32,
    buckets: Vec<Vec<(u64, FeatureId)>>,
}

impl ScaleIndexBuilder {
    pub fn new(max_scale: u32) -> ScaleIndexBuilder {
        ScaleIndexBuilder {
            max_scale,
            buckets: vec![Vec::new(); max_scale as usize + 1],
        }
    }

    /// Indexes a point feature at every scale.
    pub fn add(&mut self, point: PointD, feature: FeatureId) {
        for scale in 0..=self.max_scale {
            self.buckets[scale as usize].push((cell_of_point(point, scale), feature));
        }
    }

    pub fn build(mut self) -> ScaleIndex {
        for bucket in &mut self.buckets {
            bucket.sort_unstable();
        }
        ScaleIndex {
            max_scale: self.max_scale,
            buckets: self.buckets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::RectD;
    use crate::index::spatial::covering::{cover_viewport, CoveringPolicy};

    fn build_grid(n: i32) -> ScaleIndex {
        let mut builder = ScaleIndexBuilder::new(7);
        let mut feature = 0;
        for x in 0..n {
            for y in 0..n {
                builder.add(PointD::new(x as f64, y as f64), feature);
                feature += 1;
            }
        }
        builder.build()
    }

    fn query(index: &ScaleIndex, viewport: &RectD, scale: u32) -> Vec<FeatureId> {
        let mut features = Vec::new();
        for (lo, hi) in cover_viewport(viewport, scale, CoveringPolicy::ViewportWithLowLevels) {
            index.for_each_in_interval_and_scale(&mut |f| features.push(f), lo, hi, scale);
        }
        features.sort_unstable();
        features.dedup();
        features
    }

    #[test]
    fn test_len() {
        let index = build_grid(3);
        assert_eq!(index.len(), 9);
        assert!(!index.is_empty());
    }

    #[test]
    fn test_full_interval_returns_all() {
        let index = build_grid(3);
        let mut features = Vec::new();
        index.for_each_in_interval_and_scale(&mut |f| features.push(f), 0, u64::MAX, 7);
        assert_eq!(features.len(), 9);
    }

    #[test]
    fn test_out_of_range_scale_is_empty() {
        let index = build_grid(3);
        let mut features = Vec::new();
        index.for_each_in_interval_and_scale(&mut |f| features.push(f), 0, u64::MAX, 8);
        assert!(features.is_empty());
    }

    #[test]
    fn test_covering_query_at_scale_seven() {
        // the scale-7 cell grid snaps the [-2, 3]² viewport out to 5.625
        let index = build_grid(10);
        let features = query(&index, &RectD::new(-2.0, -2.0, 3.0, 3.0), 7);
        assert_eq!(features.len(), 36);
    }

    #[test]
    fn test_covering_query_small_viewport() {
        let index = build_grid(10);
        let features = query(&index, &RectD::new(4.9, 4.9, 5.1, 5.1), 7);
        assert_eq!(features.len(), 9);
    }

    #[test]
    fn test_duplicates_across_intervals_allowed() {
        let mut builder = ScaleIndexBuilder::new(4);
        builder.add(PointD::new(0.5, 0.5), 7);
        builder.add(PointD::new(0.5, 0.5), 7);
        let index = builder.build();
        let mut features = Vec::new();
        index.for_each_in_interval_and_scale(&mut |f| features.push(f), 0, u64::MAX, 4);
        assert_eq!(features, vec![7, 7]);
    }
}
