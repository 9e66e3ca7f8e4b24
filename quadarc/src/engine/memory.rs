// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory reference engine
//!
//! A complete implementation of the [`StorageEngine`] contract that keeps one
//! materialized snapshot per version, keyed by encoded (subject, predicate,
//! object) so that every cursor streams in canonical order. It backs the test
//! suite and serves as executable documentation of the contract; it performs
//! no compression, no delta chaining and no persistence.
//!
//! Two contract points worth noting:
//! - the sorted-input append precondition is *checked* here and rejected with
//!   [`EngineError::UnsortedInput`], where a native engine would exhibit
//!   undefined behavior;
//! - appends are accepted only at `max_version + 1`; re-appending at a
//!   historical version is an engine capability this backend does not
//!   implement.

use super::{
    EngineCount, EngineError, EngineResult, QueryProcessor, SnapshotStrategy, StorageEngine,
    TriplePattern,
};
use crate::codec::{EncodedQuad, EncodedQuadDelta, EncodedQuadVersion};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

type SpoKey = (String, String, String);

fn spo_key(quad: &EncodedQuad) -> SpoKey {
    (
        quad.subject.clone(),
        quad.predicate.clone(),
        quad.object.clone(),
    )
}

fn spo_key_ref(quad: &EncodedQuad) -> (&str, &str, &str) {
    (&quad.subject, &quad.predicate, &quad.object)
}

/// In-memory versioned quad engine.
pub struct MemoryEngine {
    path: Option<PathBuf>,
    snapshots: RwLock<Vec<BTreeMap<SpoKey, EncodedQuad>>>,
    closed: AtomicBool,
}

impl MemoryEngine {
    /// Open an engine. `path` is only used for directory removal on
    /// `close(remove = true)`; no data is read from or written to disk.
    pub fn open(path: Option<&Path>, strategy: &SnapshotStrategy) -> Self {
        log::debug!(
            "Opening in-memory engine (path: {:?}, strategy: {}/{})",
            path,
            strategy.name,
            strategy.parameter
        );
        MemoryEngine {
            path: path.map(Path::to_path_buf),
            snapshots: RwLock::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    fn guard_open(&self) -> EngineResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            Err(EngineError::Closed)
        } else {
            Ok(())
        }
    }

    /// Resolve a `-1 = latest` version sentinel against the snapshot list.
    fn resolve_version(
        snapshots: &[BTreeMap<SpoKey, EncodedQuad>],
        version: i64,
    ) -> EngineResult<usize> {
        let max_version = snapshots.len() as i64 - 1;
        let resolved = if version < 0 { max_version } else { version };
        if resolved < 0 || resolved > max_version {
            return Err(EngineError::VersionOutOfRange {
                version,
                max_version,
            });
        }
        Ok(resolved as usize)
    }

    fn materialized(
        snapshots: &[BTreeMap<SpoKey, EncodedQuad>],
        pattern: &TriplePattern,
        version: i64,
    ) -> EngineResult<Vec<EncodedQuad>> {
        let version = Self::resolve_version(snapshots, version)?;
        Ok(snapshots[version]
            .values()
            .filter(|quad| pattern.matches(quad))
            .cloned()
            .collect())
    }

    fn deltas(
        snapshots: &[BTreeMap<SpoKey, EncodedQuad>],
        pattern: &TriplePattern,
        version_start: u64,
        version_end: u64,
    ) -> EngineResult<Vec<EncodedQuadDelta>> {
        let max_version = snapshots.len() as i64 - 1;
        if version_start >= version_end || version_end as i64 > max_version {
            return Err(EngineError::VersionOutOfRange {
                version: version_end as i64,
                max_version,
            });
        }
        let start = &snapshots[version_start as usize];
        let end = &snapshots[version_end as usize];
        let mut changes: BTreeMap<SpoKey, EncodedQuadDelta> = BTreeMap::new();
        for (key, quad) in end {
            if !start.contains_key(key) && pattern.matches(quad) {
                changes.insert(
                    key.clone(),
                    EncodedQuadDelta {
                        quad: quad.clone(),
                        addition: true,
                    },
                );
            }
        }
        for (key, quad) in start {
            if !end.contains_key(key) && pattern.matches(quad) {
                changes.insert(
                    key.clone(),
                    EncodedQuadDelta {
                        quad: quad.clone(),
                        addition: false,
                    },
                );
            }
        }
        Ok(changes.into_values().collect())
    }

    fn versioned(
        snapshots: &[BTreeMap<SpoKey, EncodedQuad>],
        pattern: &TriplePattern,
    ) -> Vec<EncodedQuadVersion> {
        let mut hits: BTreeMap<SpoKey, EncodedQuadVersion> = BTreeMap::new();
        for (version, snapshot) in snapshots.iter().enumerate() {
            for (key, quad) in snapshot {
                if pattern.matches(quad) {
                    hits.entry(key.clone())
                        .or_insert_with(|| EncodedQuadVersion {
                            quad: quad.clone(),
                            versions: Vec::new(),
                        })
                        .versions
                        .push(version as u64);
                }
            }
        }
        hits.into_values().collect()
    }
}

#[async_trait]
impl StorageEngine for MemoryEngine {
    fn max_version(&self) -> i64 {
        self.snapshots.read().len() as i64 - 1
    }

    fn closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn search_version_materialized(
        &self,
        pattern: &TriplePattern,
        offset: usize,
        version: i64,
    ) -> EngineResult<Box<dyn QueryProcessor<EncodedQuad>>> {
        self.guard_open()?;
        let items = Self::materialized(&self.snapshots.read(), pattern, version)?;
        Ok(Box::new(VecProcessor::new(items, offset)))
    }

    async fn count_version_materialized(
        &self,
        pattern: &TriplePattern,
        version: i64,
    ) -> EngineResult<EngineCount> {
        self.guard_open()?;
        let items = Self::materialized(&self.snapshots.read(), pattern, version)?;
        Ok(EngineCount {
            total_count: items.len() as u64,
            has_exact_count: true,
        })
    }

    fn search_delta_materialized(
        &self,
        pattern: &TriplePattern,
        offset: usize,
        version_start: u64,
        version_end: u64,
    ) -> EngineResult<Box<dyn QueryProcessor<EncodedQuadDelta>>> {
        self.guard_open()?;
        let items = Self::deltas(&self.snapshots.read(), pattern, version_start, version_end)?;
        Ok(Box::new(VecProcessor::new(items, offset)))
    }

    async fn count_delta_materialized(
        &self,
        pattern: &TriplePattern,
        version_start: u64,
        version_end: u64,
    ) -> EngineResult<EngineCount> {
        self.guard_open()?;
        let items = Self::deltas(&self.snapshots.read(), pattern, version_start, version_end)?;
        Ok(EngineCount {
            total_count: items.len() as u64,
            has_exact_count: true,
        })
    }

    fn search_version(
        &self,
        pattern: &TriplePattern,
        offset: usize,
    ) -> EngineResult<Box<dyn QueryProcessor<EncodedQuadVersion>>> {
        self.guard_open()?;
        let items = Self::versioned(&self.snapshots.read(), pattern);
        Ok(Box::new(VecProcessor::new(items, offset)))
    }

    async fn count_version(&self, pattern: &TriplePattern) -> EngineResult<EngineCount> {
        self.guard_open()?;
        let items = Self::versioned(&self.snapshots.read(), pattern);
        Ok(EngineCount {
            total_count: items.len() as u64,
            has_exact_count: true,
        })
    }

    async fn append(&self, version: u64, deltas: Vec<EncodedQuadDelta>) -> EngineResult<usize> {
        self.guard_open()?;
        for index in 1..deltas.len() {
            if spo_key_ref(&deltas[index - 1].quad) > spo_key_ref(&deltas[index].quad) {
                return Err(EngineError::UnsortedInput(index));
            }
        }
        let mut snapshots = self.snapshots.write();
        let next = snapshots.len() as u64;
        if version != next {
            return Err(EngineError::Backend(format!(
                "Appends must target version {} (got {})",
                next, version
            )));
        }
        let mut snapshot = snapshots.last().cloned().unwrap_or_default();
        let mut changed = 0;
        for delta in &deltas {
            let key = spo_key(&delta.quad);
            if delta.addition {
                if snapshot.insert(key, delta.quad.clone()).is_none() {
                    changed += 1;
                }
            } else if snapshot.remove(&key).is_some() {
                changed += 1;
            }
        }
        snapshots.push(snapshot);
        log::debug!(
            "Appended version {} ({} deltas, {} applied)",
            version,
            deltas.len(),
            changed
        );
        Ok(changed)
    }

    async fn close(&self, remove: bool) -> EngineResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Err(EngineError::Closed);
        }
        if remove {
            if let Some(path) = &self.path {
                match std::fs::remove_dir_all(path) {
                    Ok(()) => log::debug!("Removed store directory {}", path.display()),
                    Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                    Err(err) => return Err(err.into()),
                }
            }
        }
        Ok(())
    }
}

/// Cursor over an eagerly computed result set. The offset is applied when the
/// cursor is created; `pull` only advances it.
struct VecProcessor<T> {
    items: std::vec::IntoIter<T>,
}

impl<T> VecProcessor<T> {
    fn new(items: Vec<T>, offset: usize) -> Self {
        let mut items = items.into_iter();
        if offset > 0 {
            // Consume the offset up front; the remainder is the result set.
            let _ = items.by_ref().nth(offset - 1);
        }
        VecProcessor { items }
    }
}

#[async_trait]
impl<T: Send + 'static> QueryProcessor<T> for VecProcessor<T> {
    async fn pull(&mut self, limit: usize) -> EngineResult<Vec<T>> {
        Ok(self.items.by_ref().take(limit).collect())
    }
}
