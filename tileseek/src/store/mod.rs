//! Tile registry abstractions.
//!
//! A tile store enumerates tile metadata and hands out [`TileHandle`]s to
//! opened tiles. The crate ships one implementation, the in-memory
//! [`memory::MemoryTileStore`]; other backends can plug in through
//! [`TileStoreProvider`].

pub mod memory;
pub mod tile;

pub use tile::{
    TextCodingParams, TextIndexSection, TileData, TileHandle, TileHeader, TileId, TileMeta,
};

use std::ops::Deref;
use std::sync::Arc;

use crate::errors::TileSeekResult;

/// Low-level interface a tile registry must implement.
///
/// Implementers must be `Send + Sync`; handles they produce are shared
/// `Arc`-backed views that stay readable for as long as the caller keeps
/// them, even if the tile is deregistered afterwards.
pub trait TileStoreProvider: Send + Sync {
    /// Enumerates the metadata of every registered tile, sorted by tile id
    /// so that repeated enumerations are deterministic.
    fn tiles(&self) -> TileSeekResult<Vec<TileMeta>>;

    /// Acquires a handle for the given tile id.
    ///
    /// An absent tile yields a dead handle rather than an error; callers
    /// check [`TileHandle::is_alive`].
    fn handle(&self, id: &TileId) -> TileSeekResult<TileHandle>;

    /// Checks whether a tile with the given id is registered.
    fn has_tile(&self, id: &TileId) -> TileSeekResult<bool>;

    /// Closes the store. Further operations fail with `StoreClosed`;
    /// closing twice is a no-op.
    fn close(&self) -> TileSeekResult<()>;

    /// Checks whether the store has been closed.
    fn is_closed(&self) -> TileSeekResult<bool>;
}

/// Type-erased, shared wrapper around a [`TileStoreProvider`] implementation.
#[derive(Clone)]
pub struct TileStore {
    inner: Arc<dyn TileStoreProvider>,
}

impl TileStore {
    pub fn new<P: TileStoreProvider + 'static>(provider: P) -> TileStore {
        TileStore {
            inner: Arc::new(provider),
        }
    }
}

impl Deref for TileStore {
    type Target = Arc<dyn TileStoreProvider>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
