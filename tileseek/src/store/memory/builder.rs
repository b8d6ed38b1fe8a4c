use crate::common::constants::MAX_INDEX_SCALE;
use crate::common::util::tokenizer::{fold_token, DelimiterFilter, StringTokenizer};
use crate::common::{FeatureId, LangId};
use crate::errors::{ErrorKind, TileSeekError, TileSeekResult};
use crate::geometry::{PointD, RectD};
use crate::index::spatial::ScaleIndexBuilder;
use crate::index::text::{TokenTrie, TrieValue};
use crate::query::lang_index;
use crate::store::tile::{TextCodingParams, TextIndexSection, TileData, TileHeader, TileId};

struct Poi {
    position: PointD,
    name: String,
    lang: LangId,
}

/// Assembles a [`TileData`] from POIs.
///
/// Feature ids are assigned in insertion order starting at 0. The builder
/// tokenizes and case-folds POI names into the text index, fills every scale
/// bucket of the geometry index, and computes the tile bounds as the envelope
/// of its POIs. The `without_*` switches produce section-less tiles, which a
/// retrieval refuses to admit.
pub struct TileBuilder {
    id: TileId,
    coding: TextCodingParams,
    max_scale: u32,
    with_text_index: bool,
    with_geometry_index: bool,
    pois: Vec<Poi>,
}

impl TileBuilder {
    pub fn new<S: Into<String>>(name: S) -> TileBuilder {
        TileBuilder {
            id: TileId::new(name),
            coding: TextCodingParams::default(),
            max_scale: MAX_INDEX_SCALE,
            with_text_index: true,
            with_geometry_index: true,
            pois: Vec::new(),
        }
    }

    /// Skips the text index section.
    pub fn without_text_index(mut self) -> Self {
        self.with_text_index = false;
        self
    }

    /// Skips the geometry index section.
    pub fn without_geometry_index(mut self) -> Self {
        self.with_geometry_index = false;
        self
    }

    /// Caps the deepest scale the geometry index is built for.
    pub fn max_scale(mut self, max_scale: u32) -> Self {
        self.max_scale = max_scale;
        self
    }

    /// Adds a point of interest and returns its feature id.
    pub fn add_poi(
        &mut self,
        position: PointD,
        name: &str,
        lang: &str,
    ) -> TileSeekResult<FeatureId> {
        let lang = lang_index(lang).ok_or_else(|| {
            TileSeekError::new(
                &format!("Unsupported language code: {}", lang),
                ErrorKind::InvalidOperation,
            )
        })?;
        let feature = self.pois.len() as FeatureId;
        self.pois.push(Poi {
            position,
            name: name.to_string(),
            lang,
        });
        Ok(feature)
    }

    pub fn build(self) -> TileData {
        let mut bounds = RectD::default();
        for (index, poi) in self.pois.iter().enumerate() {
            if index == 0 {
                bounds = RectD::from_point(poi.position);
            } else {
                bounds.expand_to_point(poi.position);
            }
        }

        let text_index = self.with_text_index.then(|| {
            let mut trie = TokenTrie::new();
            for (feature, poi) in self.pois.iter().enumerate() {
                let value = TrieValue {
                    feature: feature as FeatureId,
                    lang: poi.lang,
                };
                for token in StringTokenizer::new(DelimiterFilter, &poi.name) {
                    let term = if self.coding.case_folded {
                        fold_token(token.term())
                    } else {
                        token.term().to_string()
                    };
                    trie.insert(&term, value);
                }
            }
            TextIndexSection::new(trie)
        });

        let geometry_index = self.with_geometry_index.then(|| {
            let mut builder = ScaleIndexBuilder::new(self.max_scale);
            for (feature, poi) in self.pois.iter().enumerate() {
                builder.add(poi.position, feature as FeatureId);
            }
            builder.build()
        });

        let header = TileHeader {
            bounds,
            scale_range: (0, self.max_scale),
            coding: self.coding,
        };
        TileData::new(self.id, header, text_index, geometry_index)
    }
}
