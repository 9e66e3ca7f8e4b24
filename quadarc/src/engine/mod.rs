// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Storage engine contract
//!
//! This module defines the narrow boundary between the client layer and the
//! storage engine that owns index structures, compression and the on-disk
//! layout. Everything crossing this boundary is in encoded string form (see
//! [`crate::codec`]); versions use the engine's `-1 = latest / no versions`
//! sentinel convention.
//!
//! Search entry points hand out a cursor ([`QueryProcessor`]) synchronously;
//! counts, appends and close complete asynchronously. The engine is
//! responsible for point-in-time consistency across concurrent operations;
//! this layer never reorders results within one cursor.

pub mod factory;
pub mod memory;

use crate::codec::{EncodedQuad, EncodedQuadDelta, EncodedQuadVersion};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use factory::{create_engine, EngineKind};
pub use memory::MemoryEngine;

/// Error type for engine operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Engine is closed")]
    Closed,

    #[error("Version {version} is out of range (maximum version {max_version})")]
    VersionOutOfRange { version: i64, max_version: i64 },

    #[error("Append input is not in sorted order at index {0}")]
    UnsortedInput(usize),

    #[error("Storage engine error: {0}")]
    Backend(String),
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Io(err.to_string())
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// An encoded subject/predicate/object pattern. `None` in a position matches
/// any value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriplePattern {
    pub subject: Option<String>,
    pub predicate: Option<String>,
    pub object: Option<String>,
}

impl TriplePattern {
    pub fn new(
        subject: Option<String>,
        predicate: Option<String>,
        object: Option<String>,
    ) -> Self {
        TriplePattern {
            subject,
            predicate,
            object,
        }
    }

    /// Whether an encoded quad matches this pattern.
    pub fn matches(&self, quad: &EncodedQuad) -> bool {
        fn position(pattern: &Option<String>, value: &str) -> bool {
            match pattern {
                Some(expected) => expected == value,
                None => true,
            }
        }
        position(&self.subject, &quad.subject)
            && position(&self.predicate, &quad.predicate)
            && position(&self.object, &quad.object)
    }
}

/// Count result at the engine boundary. `has_exact_count == false` marks the
/// total as an upper-bound estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineCount {
    pub total_count: u64,
    pub has_exact_count: bool,
}

/// Selects the engine's internal version-storage/merge strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotStrategy {
    pub name: String,
    pub parameter: String,
}

impl Default for SnapshotStrategy {
    fn default() -> Self {
        SnapshotStrategy {
            name: "never".to_string(),
            parameter: "0".to_string(),
        }
    }
}

/// A per-query cursor handed out by the engine.
///
/// Contract requirement on implementations: the end of a result stream must
/// be observable as a page shorter than the requested limit. An engine that
/// has exactly `limit` results left may return them as one full page followed
/// by one empty page; it must never fail to terminate. The client layer
/// detects exhaustion purely through short pages.
#[async_trait]
pub trait QueryProcessor<T>: Send {
    /// Pull up to `limit` items, advancing the engine-side cursor.
    async fn pull(&mut self, limit: usize) -> EngineResult<Vec<T>>;
}

/// The storage engine collaborator wrapped by
/// [`BufferedQuadStore`](crate::store::BufferedQuadStore).
///
/// One search entry point exists per query mode, each yielding a cursor over
/// a differently decorated result shape. `max_version` and `closed` are read
/// at call time; the engine is the source of truth for both.
#[async_trait]
pub trait StorageEngine: Send + Sync {
    /// Highest committed version, or -1 if the store holds no versioned data.
    fn max_version(&self) -> i64;

    /// Whether the engine has been closed.
    fn closed(&self) -> bool;

    /// Cursor over the quads that hold at `version` (-1 = latest).
    fn search_version_materialized(
        &self,
        pattern: &TriplePattern,
        offset: usize,
        version: i64,
    ) -> EngineResult<Box<dyn QueryProcessor<EncodedQuad>>>;

    /// Cardinality of a version-materialized query.
    async fn count_version_materialized(
        &self,
        pattern: &TriplePattern,
        version: i64,
    ) -> EngineResult<EngineCount>;

    /// Cursor over the quads that changed between `version_start` and
    /// `version_end`, each decorated with its direction of change.
    fn search_delta_materialized(
        &self,
        pattern: &TriplePattern,
        offset: usize,
        version_start: u64,
        version_end: u64,
    ) -> EngineResult<Box<dyn QueryProcessor<EncodedQuadDelta>>>;

    /// Cardinality of a delta-materialized query.
    async fn count_delta_materialized(
        &self,
        pattern: &TriplePattern,
        version_start: u64,
        version_end: u64,
    ) -> EngineResult<EngineCount>;

    /// Cursor over all matching quads, each decorated with the versions it
    /// holds in.
    fn search_version(
        &self,
        pattern: &TriplePattern,
        offset: usize,
    ) -> EngineResult<Box<dyn QueryProcessor<EncodedQuadVersion>>>;

    /// Cardinality of a version query.
    async fn count_version(&self, pattern: &TriplePattern) -> EngineResult<EngineCount>;

    /// Apply a batch of deltas as `version`. Input must be sorted in
    /// ascending (subject, predicate, object) encoded order; the client layer
    /// guarantees this unless the caller certified a pre-sorted batch.
    async fn append(&self, version: u64, deltas: Vec<EncodedQuadDelta>) -> EngineResult<usize>;

    /// Close the engine. `remove` additionally deletes on-disk state.
    async fn close(&self, remove: bool) -> EngineResult<()>;
}
