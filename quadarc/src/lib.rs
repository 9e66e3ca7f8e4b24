// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! QuadArc - A buffered streaming client for versioned RDF quad stores
//!
//! QuadArc is the concurrency and streaming layer over a versioned quad
//! storage engine. The engine owns index structures and the on-disk layout;
//! QuadArc owns everything between it and the caller:
//!
//! - **Operation lifecycle**: every query, count and append holds an
//!   operation slot; `close` coalesces concurrent callers and waits for all
//!   in-flight operations to drain before the engine is closed.
//! - **Buffered streaming**: query results arrive in fixed-size pages
//!   through one paging protocol with three result shapes - plain quads
//!   (version-materialized), change-flagged quads (delta-materialized) and
//!   version-annotated quads (version query).
//! - **Append pipeline**: delta batches are deterministically sorted into
//!   the engine's canonical order before submission.
//!
//! # Usage
//!
//! ```ignore
//! use quadarc::{BufferedQuadStore, Quad, QuadDelta, SearchOptions, StoreOptions, Term};
//!
//! let store = BufferedQuadStore::open("./data", StoreOptions::default()).await?;
//! store
//!     .append(
//!         vec![QuadDelta::addition(Quad::new(
//!             Term::named("http://example.org/s"),
//!             Term::named("http://example.org/p"),
//!             Term::literal("o"),
//!         ))],
//!         None,
//!     )
//!     .await?;
//!
//! let mut results =
//!     store.search_version_materialized(None, None, None, SearchOptions::default())?;
//! loop {
//!     let (done, quads) = results.pull().await?;
//!     for quad in quads {
//!         println!("{}", quad.subject);
//!     }
//!     if done {
//!         break;
//!     }
//! }
//! store.close(false).await?;
//! ```

pub mod codec;
pub mod engine;
pub mod error;
pub mod model;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use model::{Literal, Quad, QuadDelta, QuadVersion, Term};
pub use store::{
    BufferedQuadStore, CountResult, DeltaMaterializedStream, DeltaSearchOptions, QueryStream,
    SearchOptions, StoreFeatures, StoreOptions, VersionMaterializedStream, VersionQueryStream,
    DEFAULT_BUFFER_SIZE,
};

/// QuadArc version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// QuadArc crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
