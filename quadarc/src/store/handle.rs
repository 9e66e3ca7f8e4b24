// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! The buffered quad store handle
//!
//! `BufferedQuadStore` is the client-facing entry point: it validates and
//! defaults query parameters, charges the operation counter around every
//! engine round-trip, hands out buffered result streams, and coordinates the
//! drain-before-close protocol. The handle is cheap to clone; clones share
//! the engine, the operation counter and the close state.
//!
//! Precondition checks (closed store, unversioned store, invalid version
//! range, read-only append) always run before the counter is charged, so a
//! rejected call can never leak an operation slot.

use super::append::sort_deltas;
use super::lifecycle::{driver_lost, CloseRegistration, Lifecycle};
use super::options::{
    CountResult, DeltaSearchOptions, SearchOptions, StoreFeatures, StoreOptions,
};
use super::stream::{
    DeltaMaterializedStream, QueryStream, VersionMaterializedStream, VersionQueryStream,
};
use crate::codec::{encode_pattern_term, encode_quad_delta};
use crate::engine::{create_engine, EngineCount, StorageEngine, TriplePattern};
use crate::error::{StoreError, StoreResult};
use crate::model::{QuadDelta, Term};
use std::path::Path;
use std::sync::Arc;

/// Version sentinel at the engine boundary meaning "latest".
const LATEST_VERSION: i64 = -1;

/// A handle to a versioned quad store.
#[derive(Clone)]
pub struct BufferedQuadStore {
    engine: Arc<dyn StorageEngine>,
    lifecycle: Arc<Lifecycle>,
    buffer_size: usize,
    read_only: bool,
    features: StoreFeatures,
}

impl BufferedQuadStore {
    /// Open a store at `path`.
    ///
    /// The path must be non-empty. If it does not exist and the store is not
    /// read-only, the directory is created before the engine is constructed.
    pub async fn open(path: impl AsRef<Path>, options: StoreOptions) -> StoreResult<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(StoreError::InvalidPath(
                "Store path must not be empty".to_string(),
            ));
        }
        if !options.read_only && !path.exists() {
            std::fs::create_dir_all(path).map_err(|err| {
                StoreError::InvalidPath(format!(
                    "Unable to create store directory '{}': {}",
                    path.display(),
                    err
                ))
            })?;
        }
        let engine = create_engine(options.engine, path, &options.strategy)?;
        log::debug!(
            "Opened {} store at '{}' (buffer size {}, read-only: {})",
            options.engine,
            path.display(),
            options.buffer_size.max(1),
            options.read_only
        );
        Ok(Self::with_engine(engine, &options))
    }

    /// Wrap an externally constructed storage engine.
    ///
    /// This is the injection point for native engine bindings; `open` uses it
    /// with the backend chosen by the engine factory.
    pub fn with_engine(engine: Arc<dyn StorageEngine>, options: &StoreOptions) -> Self {
        BufferedQuadStore {
            engine,
            lifecycle: Lifecycle::new(),
            // The paging protocol degenerates below one item per page.
            buffer_size: options.buffer_size.max(1),
            read_only: options.read_only,
            features: StoreFeatures::for_mode(options.read_only),
        }
    }

    /// The configured page size.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Whether the store was opened read-only.
    pub fn read_only(&self) -> bool {
        self.read_only
    }

    /// The operations this store supports.
    pub fn features(&self) -> &StoreFeatures {
        &self.features
    }

    /// Highest committed version, or -1 if the store holds no versioned
    /// data. Read through to the engine at call time.
    pub fn max_version(&self) -> i64 {
        self.engine.max_version()
    }

    /// Whether the store has been closed. Read through to the engine.
    pub fn closed(&self) -> bool {
        self.engine.closed()
    }

    /// Number of in-flight operations (queries, counts and appends).
    pub fn in_flight_operations(&self) -> usize {
        self.lifecycle.operations()
    }

    /// Search the quads that hold at one version.
    ///
    /// `None` (or a variable) in a pattern position matches any term. The
    /// returned stream charges the operation counter until it is exhausted,
    /// disposed or dropped.
    pub fn search_version_materialized(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        options: SearchOptions,
    ) -> StoreResult<VersionMaterializedStream> {
        self.check_queryable()?;
        let pattern = pattern_of(subject, predicate, object);
        let version = options.version.map(|v| v as i64).unwrap_or(LATEST_VERSION);
        let slot = self.lifecycle.charge();
        let processor =
            self.engine
                .search_version_materialized(&pattern, options.offset, version)?;
        Ok(QueryStream::new(processor, self.buffer_size, slot))
    }

    /// Count the quads that hold at one version (`None` = latest).
    pub async fn count_version_materialized(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        version: Option<u64>,
    ) -> StoreResult<CountResult> {
        self.check_queryable()?;
        let pattern = pattern_of(subject, predicate, object);
        let version = version.map(|v| v as i64).unwrap_or(LATEST_VERSION);
        let _slot = self.lifecycle.charge();
        let count = self
            .engine
            .count_version_materialized(&pattern, version)
            .await?;
        Ok(count_result(count))
    }

    /// Search the quads that changed between two versions, decorated with
    /// their direction of change.
    pub fn search_delta_materialized(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        options: DeltaSearchOptions,
    ) -> StoreResult<DeltaMaterializedStream> {
        self.check_queryable()?;
        self.check_version_range(options.version_start, options.version_end)?;
        let pattern = pattern_of(subject, predicate, object);
        let slot = self.lifecycle.charge();
        let processor = self.engine.search_delta_materialized(
            &pattern,
            options.offset,
            options.version_start,
            options.version_end,
        )?;
        Ok(QueryStream::new(processor, self.buffer_size, slot))
    }

    /// Count the quads that changed between two versions.
    pub async fn count_delta_materialized(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        version_start: u64,
        version_end: u64,
    ) -> StoreResult<CountResult> {
        self.check_queryable()?;
        self.check_version_range(version_start, version_end)?;
        let pattern = pattern_of(subject, predicate, object);
        let _slot = self.lifecycle.charge();
        let count = self
            .engine
            .count_delta_materialized(&pattern, version_start, version_end)
            .await?;
        Ok(count_result(count))
    }

    /// Search all matching quads, decorated with the versions they hold in.
    pub fn search_version(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        offset: usize,
    ) -> StoreResult<VersionQueryStream> {
        self.check_queryable()?;
        let pattern = pattern_of(subject, predicate, object);
        let slot = self.lifecycle.charge();
        let processor = self.engine.search_version(&pattern, offset)?;
        Ok(QueryStream::new(processor, self.buffer_size, slot))
    }

    /// Count all matching quads of a version query.
    pub async fn count_version(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> StoreResult<CountResult> {
        self.check_queryable()?;
        let pattern = pattern_of(subject, predicate, object);
        let _slot = self.lifecycle.charge();
        let count = self.engine.count_version(&pattern).await?;
        Ok(count_result(count))
    }

    /// Append a batch of deltas as a new version.
    ///
    /// The batch is sorted into the engine's canonical (subject, predicate,
    /// object) order before submission. `version` defaults to
    /// `max_version + 1`. Returns the number of delta records the engine
    /// accepted.
    pub async fn append(
        &self,
        deltas: Vec<QuadDelta>,
        version: Option<u64>,
    ) -> StoreResult<usize> {
        self.append_sorted(sort_deltas(deltas), version).await
    }

    /// Append a batch the caller certifies to be pre-sorted in ascending
    /// (subject, predicate, object) encoded order. Skips the sort; submitting
    /// unsorted input through this entry point is rejected or undefined at
    /// the engine boundary.
    pub async fn append_sorted(
        &self,
        deltas: Vec<QuadDelta>,
        version: Option<u64>,
    ) -> StoreResult<usize> {
        if self.closed() {
            return Err(StoreError::Closed);
        }
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        let _slot = self.lifecycle.charge();
        let version = version.unwrap_or_else(|| (self.engine.max_version() + 1) as u64);
        let encoded = deltas.iter().map(encode_quad_delta).collect::<Vec<_>>();
        log::debug!("Appending {} deltas as version {}", encoded.len(), version);
        Ok(self.engine.append(version, encoded).await?)
    }

    /// Close the store, draining in-flight operations first.
    ///
    /// Concurrent close calls coalesce into exactly one engine close; every
    /// caller resolves with the same outcome, and calls made after completion
    /// resolve immediately with the recorded outcome. Closing is terminal.
    /// `remove` additionally deletes the on-disk state.
    pub async fn close(&self, remove: bool) -> StoreResult<()> {
        match self.lifecycle.register_close() {
            CloseRegistration::Finished(outcome) => outcome,
            CloseRegistration::Waiter(waiter) => waiter.await.map_err(driver_lost)?,
            CloseRegistration::Driver { waiter, drain } => {
                let engine = Arc::clone(&self.engine);
                let lifecycle = Arc::clone(&self.lifecycle);
                // Detached driver: a caller that drops its close future must
                // not strand the other waiters.
                tokio::spawn(async move {
                    if let Some(drain) = drain {
                        let _ = drain.await;
                    }
                    log::debug!("Closing engine (remove: {})", remove);
                    let outcome = engine.close(remove).await.map_err(StoreError::from);
                    lifecycle.finish_close(outcome);
                });
                waiter.await.map_err(driver_lost)?
            }
        }
    }

    fn check_queryable(&self) -> StoreResult<()> {
        if self.closed() {
            return Err(StoreError::Closed);
        }
        if self.max_version() < 0 {
            return Err(StoreError::NoVersions);
        }
        Ok(())
    }

    fn check_version_range(&self, version_start: u64, version_end: u64) -> StoreResult<()> {
        if version_start >= version_end {
            return Err(StoreError::InvalidVersionRange(format!(
                "version_start ({}) must be strictly smaller than version_end ({})",
                version_start, version_end
            )));
        }
        let max_version = self.max_version();
        if version_end as i64 > max_version {
            return Err(StoreError::InvalidVersionRange(format!(
                "version_end ({}) can not be larger than the maximum version ({})",
                version_end, max_version
            )));
        }
        Ok(())
    }
}

fn pattern_of(
    subject: Option<&Term>,
    predicate: Option<&Term>,
    object: Option<&Term>,
) -> TriplePattern {
    TriplePattern::new(
        encode_pattern_term(subject),
        encode_pattern_term(predicate),
        encode_pattern_term(object),
    )
}

fn count_result(count: EngineCount) -> CountResult {
    CountResult {
        cardinality: count.total_count,
        exact_cardinality: count.has_exact_count,
    }
}
