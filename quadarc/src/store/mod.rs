// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! The store handle, its buffered result streams, the operation lifecycle
//! and the append pre-sort pipeline.

mod append;
mod handle;
mod lifecycle;
mod options;
mod stream;

pub use handle::BufferedQuadStore;
pub use options::{
    CountResult, DeltaSearchOptions, SearchOptions, StoreFeatures, StoreOptions,
    DEFAULT_BUFFER_SIZE,
};
pub use stream::{
    DeltaMaterializedStream, QueryStream, ResultDecoder, VersionMaterializedStream,
    VersionQueryStream,
};
