use std::sync::Arc;

use crate::common::constants::{GEOMETRY_INDEX_TAG, TEXT_INDEX_TAG, TEXT_INDEX_VERSION};
use crate::errors::{ErrorKind, TileSeekError, TileSeekResult};
use crate::geometry::RectD;
use crate::index::spatial::ScaleIndex;
use crate::index::text::TokenTrie;

/// Identifier of a tile: its map name, unique within one store.
#[derive(
    Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, serde::Deserialize, serde::Serialize,
)]
pub struct TileId(String);

impl TileId {
    pub fn new<S: Into<String>>(name: S) -> TileId {
        TileId(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registry-level description of a tile.
#[derive(Clone, PartialEq, Debug, serde::Deserialize, serde::Serialize)]
pub struct TileMeta {
    pub id: TileId,
    pub bounds: RectD,
    pub scale_range: (u32, u32),
}

/// Encoding parameters of a tile's text index, needed to match queries the
/// way the index was written.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TextCodingParams {
    /// Tokens were case-folded at indexing time; queries must fold too.
    pub case_folded: bool,
}

impl Default for TextCodingParams {
    fn default() -> Self {
        TextCodingParams { case_folded: true }
    }
}

/// Header of an opened tile.
#[derive(Clone, Debug)]
pub struct TileHeader {
    pub bounds: RectD,
    pub scale_range: (u32, u32),
    pub coding: TextCodingParams,
}

/// The textual index section of a tile: a format version plus the trie.
#[derive(Debug)]
pub struct TextIndexSection {
    format_version: u8,
    trie: TokenTrie,
}

impl TextIndexSection {
    pub fn new(trie: TokenTrie) -> TextIndexSection {
        TextIndexSection {
            format_version: TEXT_INDEX_VERSION,
            trie,
        }
    }

    /// For in-crate tests that need a section this library cannot decode.
    #[cfg(test)]
    pub(crate) fn with_version(format_version: u8, trie: TokenTrie) -> TextIndexSection {
        TextIndexSection {
            format_version,
            trie,
        }
    }

    pub fn format_version(&self) -> u8 {
        self.format_version
    }

    /// The trie root, validated against the supported format version.
    pub fn trie(&self) -> TileSeekResult<&TokenTrie> {
        if self.format_version != TEXT_INDEX_VERSION {
            return Err(TileSeekError::new(
                &format!(
                    "Unsupported text index version {} (expected {})",
                    self.format_version, TEXT_INDEX_VERSION
                ),
                ErrorKind::MalformedIndex,
            ));
        }
        Ok(&self.trie)
    }
}

/// An opened tile: header plus its optional index sections.
#[derive(Debug)]
pub struct TileData {
    id: TileId,
    header: TileHeader,
    text_index: Option<TextIndexSection>,
    geometry_index: Option<ScaleIndex>,
}

impl TileData {
    pub fn new(
        id: TileId,
        header: TileHeader,
        text_index: Option<TextIndexSection>,
        geometry_index: Option<ScaleIndex>,
    ) -> TileData {
        TileData {
            id,
            header,
            text_index,
            geometry_index,
        }
    }

    pub fn id(&self) -> &TileId {
        &self.id
    }

    pub fn header(&self) -> &TileHeader {
        &self.header
    }

    pub fn meta(&self) -> TileMeta {
        TileMeta {
            id: self.id.clone(),
            bounds: self.header.bounds,
            scale_range: self.header.scale_range,
        }
    }

    /// Checks for the presence of a named section.
    pub fn has_section(&self, tag: &str) -> bool {
        match tag {
            TEXT_INDEX_TAG => self.text_index.is_some(),
            GEOMETRY_INDEX_TAG => self.geometry_index.is_some(),
            _ => false,
        }
    }

    /// Opens the text index section.
    pub fn text_index(&self) -> TileSeekResult<&TextIndexSection> {
        self.text_index.as_ref().ok_or_else(|| {
            TileSeekError::new(
                &format!("Tile {} has no {} section", self.id, TEXT_INDEX_TAG),
                ErrorKind::TileUnreadable,
            )
        })
    }

    /// Opens the geometry index section.
    pub fn geometry_index(&self) -> TileSeekResult<&ScaleIndex> {
        self.geometry_index.as_ref().ok_or_else(|| {
            TileSeekError::new(
                &format!("Tile {} has no {} section", self.id, GEOMETRY_INDEX_TAG),
                ErrorKind::TileUnreadable,
            )
        })
    }
}

/// Non-owning handle to an opened tile.
///
/// A handle acquired from a store stays readable for its whole lifetime,
/// independent of later deregistration; a handle for an absent tile is dead.
#[derive(Clone)]
pub struct TileHandle {
    id: TileId,
    data: Option<Arc<TileData>>,
}

impl TileHandle {
    pub(crate) fn alive(id: TileId, data: Arc<TileData>) -> TileHandle {
        TileHandle {
            id,
            data: Some(data),
        }
    }

    pub(crate) fn dead(id: TileId) -> TileHandle {
        TileHandle { id, data: None }
    }

    pub fn id(&self) -> &TileId {
        &self.id
    }

    pub fn is_alive(&self) -> bool {
        self.data.is_some()
    }

    /// The opened tile behind this handle.
    pub fn value(&self) -> TileSeekResult<&TileData> {
        match &self.data {
            Some(data) => Ok(data),
            None => Err(TileSeekError::new(
                &format!("Tile handle for {} is dead", self.id),
                ErrorKind::TileUnreadable,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tile(text: bool, geometry: bool) -> TileData {
        let header = TileHeader {
            bounds: RectD::new(0.0, 0.0, 1.0, 1.0),
            scale_range: (0, 4),
            coding: TextCodingParams::default(),
        };
        let text_index = text.then(|| TextIndexSection::new(TokenTrie::new()));
        let geometry_index =
            geometry.then(|| crate::index::spatial::ScaleIndexBuilder::new(4).build());
        TileData::new(TileId::new("sample"), header, text_index, geometry_index)
    }

    #[test]
    fn test_sections_present() {
        let tile = sample_tile(true, true);
        assert!(tile.has_section(TEXT_INDEX_TAG));
        assert!(tile.has_section(GEOMETRY_INDEX_TAG));
        assert!(!tile.has_section("unknown"));
        assert!(tile.text_index().is_ok());
        assert!(tile.geometry_index().is_ok());
    }

    #[test]
    fn test_missing_sections() {
        let tile = sample_tile(false, false);
        let err = tile.text_index().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::TileUnreadable);
        let err = tile.geometry_index().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::TileUnreadable);
    }

    #[test]
    fn test_text_section_version_check() {
        let section = TextIndexSection::with_version(99, TokenTrie::new());
        let err = section.trie().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MalformedIndex);
        let good = TextIndexSection::new(TokenTrie::new());
        assert_eq!(good.format_version(), TEXT_INDEX_VERSION);
        assert!(good.trie().is_ok());
    }

    #[test]
    fn test_handle_aliveness() {
        let tile = Arc::new(sample_tile(true, true));
        let alive = TileHandle::alive(TileId::new("sample"), tile);
        assert!(alive.is_alive());
        assert!(alive.value().is_ok());

        let dead = TileHandle::dead(TileId::new("gone"));
        assert!(!dead.is_alive());
        assert_eq!(
            dead.value().unwrap_err().kind(),
            &ErrorKind::TileUnreadable
        );
    }

    #[test]
    fn test_meta_mirrors_header() {
        let tile = sample_tile(true, true);
        let meta = tile.meta();
        assert_eq!(meta.id, TileId::new("sample"));
        assert_eq!(meta.bounds, RectD::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(meta.scale_range, (0, 4));
    }
}
