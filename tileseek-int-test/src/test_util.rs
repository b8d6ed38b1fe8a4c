use tileseek::{
    MemoryTileStore, PointD, SearchParams, TileBuilder, TileSeekResult, TileStore, TileStoreProvider,
};

/// Shared state of one integration test: the tile store under test.
#[derive(Clone)]
pub struct TestContext {
    store: MemoryTileStore,
}

impl TestContext {
    pub fn new(store: MemoryTileStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &MemoryTileStore {
        &self.store
    }

    /// Type-erased view of the store, as the engine consumes it.
    pub fn tile_store(&self) -> TileStore {
        TileStore::new(self.store.clone())
    }
}

/// Runs a test between its setup and teardown, panicking with the failure
/// after teardown ran.
pub fn run_test<B, T, A>(before: B, test: T, after: A)
where
    B: FnOnce() -> TileSeekResult<TestContext>,
    T: FnOnce(TestContext) -> TileSeekResult<()>,
    A: FnOnce(TestContext) -> TileSeekResult<()>,
{
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Test setup failed: {:?}", e),
    };
    let outcome = test(ctx.clone());
    if let Err(e) = after(ctx) {
        eprintln!("Warning: test teardown failed: {:?}", e);
    }
    if let Err(e) = outcome {
        panic!("Test failed: {:?}", e);
    }
}

pub fn create_test_context() -> TileSeekResult<TestContext> {
    Ok(TestContext::new(MemoryTileStore::new()))
}

pub fn cleanup(ctx: TestContext) -> TileSeekResult<()> {
    ctx.store().close()
}

/// Registers a tile holding a `width × height` grid of identically named
/// POIs on integer coordinates starting at the origin.
pub fn register_grid_tile(
    ctx: &TestContext,
    name: &str,
    width: i32,
    height: i32,
    poi_name: &str,
) -> TileSeekResult<()> {
    let mut builder = TileBuilder::new(name);
    for x in 0..width {
        for y in 0..height {
            builder.add_poi(PointD::new(x as f64, y as f64), poi_name, "en")?;
        }
    }
    ctx.store().register(builder.build())
}

/// Registers a tile holding a single POI.
pub fn register_poi_tile(
    ctx: &TestContext,
    name: &str,
    position: PointD,
    poi_name: &str,
) -> TileSeekResult<()> {
    let mut builder = TileBuilder::new(name);
    builder.add_poi(position, poi_name, "en")?;
    ctx.store().register(builder.build())
}

/// Search params for an English query, the way interactive callers build
/// them.
pub fn english_params(query: &str) -> TileSeekResult<SearchParams> {
    let mut params = SearchParams::from_query(query);
    params.add_lang("en")?;
    Ok(params)
}

pub fn is_sorted<T: Ord>(iterable: impl IntoIterator<Item = T>, ascending: bool) -> bool {
    let mut iter = iterable.into_iter();
    if let Some(mut prev) = iter.next() {
        for current in iter {
            if ascending {
                if prev > current {
                    return false;
                }
            } else if prev < current {
                return false;
            }
            prev = current;
        }
    }
    true
}
