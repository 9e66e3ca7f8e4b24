// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Store configuration, capability surface and query parameter types.

use crate::engine::{EngineKind, SnapshotStrategy};
use serde::{Deserialize, Serialize};

/// Default page size for buffered result streams.
pub const DEFAULT_BUFFER_SIZE: usize = 128;

/// Options for opening a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreOptions {
    /// Number of results fetched per page. Values below 1 are clamped to 1.
    pub buffer_size: usize,
    /// Open the store read-only; appends are rejected and the store
    /// directory is never created.
    pub read_only: bool,
    /// Engine-internal version-storage/merge strategy.
    pub strategy: SnapshotStrategy,
    /// Storage engine backend.
    pub engine: EngineKind,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions {
            buffer_size: DEFAULT_BUFFER_SIZE,
            read_only: false,
            strategy: SnapshotStrategy::default(),
            engine: EngineKind::default(),
        }
    }
}

/// The operations a store instance supports. Immutable after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreFeatures {
    pub search_version_materialized: bool,
    pub count_version_materialized: bool,
    pub search_delta_materialized: bool,
    pub count_delta_materialized: bool,
    pub search_version: bool,
    pub count_version: bool,
    /// False when the store is opened read-only.
    pub append_versioned: bool,
}

impl StoreFeatures {
    pub(crate) fn for_mode(read_only: bool) -> Self {
        StoreFeatures {
            search_version_materialized: true,
            count_version_materialized: true,
            search_delta_materialized: true,
            count_delta_materialized: true,
            search_version: true,
            count_version: true,
            append_versioned: !read_only,
        }
    }
}

/// Result of a count operation. `exact_cardinality == false` marks the
/// cardinality as an engine-side upper-bound estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountResult {
    pub cardinality: u64,
    pub exact_cardinality: bool,
}

/// Parameters for a version-materialized search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Number of results to skip.
    pub offset: usize,
    /// Version to materialize; `None` is the latest version.
    pub version: Option<u64>,
}

/// Parameters for a delta-materialized search. The range must satisfy
/// `version_start < version_end <= max_version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeltaSearchOptions {
    /// Number of results to skip.
    pub offset: usize,
    pub version_start: u64,
    pub version_end: u64,
}

impl DeltaSearchOptions {
    pub fn range(version_start: u64, version_end: u64) -> Self {
        DeltaSearchOptions {
            offset: 0,
            version_start,
            version_end,
        }
    }
}
