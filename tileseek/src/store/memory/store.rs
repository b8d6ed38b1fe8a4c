use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::errors::{ErrorKind, TileSeekError, TileSeekResult};
use crate::store::tile::{TileData, TileHandle, TileId, TileMeta};
use crate::store::TileStoreProvider;

/// In-memory implementation of a tile store.
///
/// # Purpose
/// `MemoryTileStore` keeps every registered tile in a concurrent map and
/// serves handles as cheap `Arc` clones. It is the backing store for tests
/// and for embedders that assemble tiles at runtime; nothing is persisted.
///
/// # Characteristics
/// - **Thread-safe**: registration and handle acquisition may race freely
/// - **Stable handles**: a handle stays readable after its tile is
///   deregistered; only new acquisitions observe the removal
/// - **Deterministic enumeration**: [`TileStoreProvider::tiles`] reports
///   metas sorted by tile id
///
/// # Usage
/// ```rust,ignore
/// let store = MemoryTileStore::new();
/// store.register(TileBuilder::new("msk").build())?;
/// let handle = store.handle(&TileId::new("msk"))?;
/// assert!(handle.is_alive());
/// ```
#[derive(Clone, Default)]
pub struct MemoryTileStore {
    inner: Arc<MemoryTileStoreInner>,
}

#[derive(Default)]
struct MemoryTileStoreInner {
    closed: AtomicBool,
    tiles: DashMap<TileId, Arc<TileData>>,
}

impl MemoryTileStore {
    pub fn new() -> MemoryTileStore {
        MemoryTileStore::default()
    }

    /// Registers a tile, replacing any previous tile with the same id.
    pub fn register(&self, tile: TileData) -> TileSeekResult<()> {
        self.inner.ensure_open()?;
        let id = tile.id().clone();
        if self.inner.tiles.insert(id.clone(), Arc::new(tile)).is_some() {
            log::debug!("Replaced tile {} in memory store", id);
        }
        Ok(())
    }

    /// Removes a tile from the registry. Returns whether it was present.
    /// Handles acquired earlier keep working.
    pub fn deregister(&self, id: &TileId) -> TileSeekResult<bool> {
        self.inner.ensure_open()?;
        Ok(self.inner.tiles.remove(id).is_some())
    }

    /// Number of registered tiles.
    pub fn len(&self) -> usize {
        self.inner.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.tiles.is_empty()
    }
}

impl MemoryTileStoreInner {
    fn ensure_open(&self) -> TileSeekResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(TileSeekError::new(
                "Memory tile store is closed",
                ErrorKind::StoreClosed,
            ));
        }
        Ok(())
    }
}

impl TileStoreProvider for MemoryTileStore {
    fn tiles(&self) -> TileSeekResult<Vec<TileMeta>> {
        self.inner.ensure_open()?;
        let mut metas: Vec<TileMeta> = self
            .inner
            .tiles
            .iter()
            .map(|entry| entry.value().meta())
            .collect();
        metas.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(metas)
    }

    fn handle(&self, id: &TileId) -> TileSeekResult<TileHandle> {
        self.inner.ensure_open()?;
        match self.inner.tiles.get(id) {
            Some(entry) => Ok(TileHandle::alive(id.clone(), Arc::clone(entry.value()))),
            None => Ok(TileHandle::dead(id.clone())),
        }
    }

    fn has_tile(&self, id: &TileId) -> TileSeekResult<bool> {
        self.inner.ensure_open()?;
        Ok(self.inner.tiles.contains_key(id))
    }

    fn close(&self) -> TileSeekResult<()> {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            log::debug!("Memory tile store already closed");
        } else {
            self.inner.tiles.clear();
        }
        Ok(())
    }

    fn is_closed(&self) -> TileSeekResult<bool> {
        Ok(self.inner.closed.load(Ordering::Acquire))
    }
}
