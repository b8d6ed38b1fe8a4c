//! # TileSeek — Geo-Textual Retrieval Engine
//!
//! TileSeek answers the question "which map features match this text *and*
//! are visible around here?" over a set of tiled map files. Each tile carries
//! two orthogonal indexes — a textual trie over feature name tokens and a
//! scale-stratified geometry index — and a retrieval intersects their sorted
//! id streams per tile while progressively expanding the viewport until a
//! termination policy is satisfied.
//!
//! ## Key Features
//!
//! - **Progressive expansion**: the viewport grows by √2 per step, so work
//!   done on a tile is reused and each tile is reported exactly once
//! - **Two matchers, one intersection**: address matches are computed once
//!   per tile, geometry matches re-run per expansion, both merged by a
//!   linear two-pointer intersection
//! - **Termination policies**: full coverage, minimum feature count and
//!   maximum viewport scale, in any combination
//! - **Pluggable registry**: tiles come from a [`store::TileStoreProvider`];
//!   an in-memory store and a tile builder ship with the crate
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tileseek::{
//!     Limits, MemoryTileStore, PointD, RectD, Retrieval, SearchParams, TileBuilder, TileStore,
//! };
//!
//! # fn main() -> tileseek::TileSeekResult<()> {
//! let store = MemoryTileStore::new();
//! let mut builder = TileBuilder::new("downtown");
//! builder.add_poi(PointD::new(0.5, 0.5), "Whiskey bar", "en")?;
//! store.register(builder.build())?;
//!
//! let mut params = SearchParams::from_query("whiskey bar");
//! params.add_lang("en")?;
//!
//! let mut retrieval = Retrieval::new();
//! retrieval.init(
//!     &TileStore::new(store),
//!     RectD::new(0.0, 0.0, 1.0, 1.0),
//!     params,
//!     Limits::default(),
//! )?;
//! retrieval.run(&mut my_callback)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`common`] - Shared types, constants and utilities
//! - [`errors`] - Error types and result definitions
//! - [`geometry`] - Points and rectangles in the common coordinate system
//! - [`index`] - The textual trie and the scale-stratified geometry index
//! - [`query`] - Search parameters and query normalization
//! - [`retrieval`] - The expansion loop, buckets, limits and the callback
//! - [`store`] - Tile registry abstractions and the in-memory store

pub mod common;
pub mod errors;
pub mod geometry;
pub mod index;
pub mod query;
pub mod retrieval;
pub mod store;

pub use common::{FeatureId, LangId};
pub use errors::{ErrorKind, TileSeekError, TileSeekResult};
pub use geometry::{PointD, RectD};
pub use query::SearchParams;
pub use retrieval::{Limits, Retrieval, RetrievalCallback};
pub use store::memory::{MemoryTileStore, TileBuilder};
pub use store::{TileHandle, TileId, TileMeta, TileStore, TileStoreProvider};
