// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Shared fixtures for the integration test suite.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use quadarc::codec::{EncodedQuad, EncodedQuadDelta, EncodedQuadVersion};
use quadarc::engine::{
    EngineCount, EngineResult, MemoryEngine, QueryProcessor, SnapshotStrategy, StorageEngine,
    TriplePattern,
};
use quadarc::{BufferedQuadStore, Quad, QuadDelta, StoreOptions, Term};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// `http://example.org/<local>` named node.
pub fn ex(local: &str) -> Term {
    Term::named(format!("http://example.org/{}", local))
}

pub fn triple(subject: &str, predicate: &str, object: &str) -> Quad {
    Quad::new(ex(subject), ex(predicate), ex(object))
}

pub fn addition(subject: &str, predicate: &str, object: &str) -> QuadDelta {
    QuadDelta::addition(triple(subject, predicate, object))
}

pub fn deletion(subject: &str, predicate: &str, object: &str) -> QuadDelta {
    QuadDelta::deletion(triple(subject, predicate, object))
}

/// Open a store over the memory engine in a fresh temporary directory.
pub async fn open_store(options: StoreOptions) -> (BufferedQuadStore, TempDir) {
    init_logging();
    let temp = TempDir::new().expect("Failed to create temp dir");
    let store = BufferedQuadStore::open(temp.path().join("store"), options)
        .await
        .expect("Failed to open store");
    (store, temp)
}

/// Store seeded with three versions:
///
/// - v0: s1, s2, s3, s4
/// - v1: adds s5, deletes s2
/// - v2: adds s6
pub async fn seeded_store(buffer_size: usize) -> (BufferedQuadStore, TempDir) {
    let (store, temp) = open_store(StoreOptions {
        buffer_size,
        ..StoreOptions::default()
    })
    .await;
    store
        .append(
            vec![
                addition("s1", "p", "o1"),
                addition("s2", "p", "o2"),
                addition("s3", "p", "o3"),
                addition("s4", "p", "o4"),
            ],
            None,
        )
        .await
        .expect("Failed to seed version 0");
    store
        .append(vec![addition("s5", "p", "o5"), deletion("s2", "p", "o2")], None)
        .await
        .expect("Failed to seed version 1");
    store
        .append(vec![addition("s6", "p", "o6")], None)
        .await
        .expect("Failed to seed version 2");
    (store, temp)
}

/// Engine double: delegates to the memory engine while counting calls and
/// capturing append payloads, so tests can observe exactly what crossed the
/// engine boundary.
pub struct InstrumentedEngine {
    inner: MemoryEngine,
    search_calls: AtomicUsize,
    count_calls: AtomicUsize,
    close_calls: AtomicUsize,
    appends: Mutex<Vec<(u64, Vec<EncodedQuadDelta>)>>,
}

impl InstrumentedEngine {
    pub fn new() -> Self {
        InstrumentedEngine {
            inner: MemoryEngine::open(None, &SnapshotStrategy::default()),
            search_calls: AtomicUsize::new(0),
            count_calls: AtomicUsize::new(0),
            close_calls: AtomicUsize::new(0),
            appends: Mutex::new(Vec::new()),
        }
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    /// Append payloads in submission order.
    pub fn appends(&self) -> Vec<(u64, Vec<EncodedQuadDelta>)> {
        self.appends.lock().clone()
    }
}

/// Store over an instrumented engine, plus the engine for observation.
pub fn instrumented_store(options: StoreOptions) -> (BufferedQuadStore, Arc<InstrumentedEngine>) {
    init_logging();
    let engine = Arc::new(InstrumentedEngine::new());
    let store = BufferedQuadStore::with_engine(engine.clone(), &options);
    (store, engine)
}

#[async_trait]
impl StorageEngine for InstrumentedEngine {
    fn max_version(&self) -> i64 {
        self.inner.max_version()
    }

    fn closed(&self) -> bool {
        self.inner.closed()
    }

    fn search_version_materialized(
        &self,
        pattern: &TriplePattern,
        offset: usize,
        version: i64,
    ) -> EngineResult<Box<dyn QueryProcessor<EncodedQuad>>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.search_version_materialized(pattern, offset, version)
    }

    async fn count_version_materialized(
        &self,
        pattern: &TriplePattern,
        version: i64,
    ) -> EngineResult<EngineCount> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.count_version_materialized(pattern, version).await
    }

    fn search_delta_materialized(
        &self,
        pattern: &TriplePattern,
        offset: usize,
        version_start: u64,
        version_end: u64,
    ) -> EngineResult<Box<dyn QueryProcessor<EncodedQuadDelta>>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .search_delta_materialized(pattern, offset, version_start, version_end)
    }

    async fn count_delta_materialized(
        &self,
        pattern: &TriplePattern,
        version_start: u64,
        version_end: u64,
    ) -> EngineResult<EngineCount> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .count_delta_materialized(pattern, version_start, version_end)
            .await
    }

    fn search_version(
        &self,
        pattern: &TriplePattern,
        offset: usize,
    ) -> EngineResult<Box<dyn QueryProcessor<EncodedQuadVersion>>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.search_version(pattern, offset)
    }

    async fn count_version(&self, pattern: &TriplePattern) -> EngineResult<EngineCount> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.count_version(pattern).await
    }

    async fn append(&self, version: u64, deltas: Vec<EncodedQuadDelta>) -> EngineResult<usize> {
        self.appends.lock().push((version, deltas.clone()));
        self.inner.append(version, deltas).await
    }

    async fn close(&self, remove: bool) -> EngineResult<()> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.close(remove).await
    }
}
