// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Storage engine factory
//!
//! Instantiates a storage engine backend from configuration. External engine
//! bindings do not register here; they implement
//! [`StorageEngine`](super::StorageEngine) and are injected through
//! [`BufferedQuadStore::with_engine`](crate::store::BufferedQuadStore::with_engine).

use super::memory::MemoryEngine;
use super::{EngineResult, SnapshotStrategy, StorageEngine};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Storage engine backend selector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EngineKind {
    /// In-memory reference engine. Versioned data is not persisted.
    /// Best for: unit testing, development.
    Memory,
}

impl Default for EngineKind {
    fn default() -> Self {
        EngineKind::Memory
    }
}

impl std::str::FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(EngineKind::Memory),
            _ => Err(format!(
                "Unknown engine kind: {}. Valid options: memory",
                s
            )),
        }
    }
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EngineKind::Memory => "memory",
        };
        write!(f, "{}", name)
    }
}

/// Create a storage engine backend for the given path and strategy.
pub fn create_engine(
    kind: EngineKind,
    path: &Path,
    strategy: &SnapshotStrategy,
) -> EngineResult<Arc<dyn StorageEngine>> {
    match kind {
        EngineKind::Memory => {
            let engine = MemoryEngine::open(Some(path), strategy);
            Ok(Arc::new(engine) as Arc<dyn StorageEngine>)
        }
    }
}
