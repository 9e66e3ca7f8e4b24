// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Store-level error type
//!
//! Precondition violations are rejected before an operation is charged and
//! never retried by this layer. Engine-reported failures propagate verbatim.
//! `Closed` is deliberately distinct from engine errors so callers can tell
//! "retry won't help" apart from transient failures.

use crate::codec::CodecError;
use crate::engine::EngineError;
use thiserror::Error;

/// Error type for store operations.
///
/// `Clone` is required: a single close outcome is broadcast to every waiter
/// registered while the close was pending.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store has been closed. Closing is terminal.
    #[error("Attempted to use a closed store")]
    Closed,

    /// A mutation was attempted on a store opened in read-only mode.
    #[error("Attempted to append to a store in read-only mode")]
    ReadOnly,

    /// A versioned query was issued against a store without any versions.
    #[error("Attempted to query a store without versions")]
    NoVersions,

    /// A delta-materialized version range failed validation.
    #[error("Invalid version range: {0}")]
    InvalidVersionRange(String),

    /// The store path is unusable.
    #[error("Invalid store path: {0}")]
    InvalidPath(String),

    /// A result could not be decoded from its wire form.
    #[error("Term decoding failed: {0}")]
    Codec(#[from] CodecError),

    /// The storage engine reported a failure.
    #[error("Storage engine error: {0}")]
    Engine(#[from] EngineError),

    /// Internal coordination failure (e.g. a close driver vanished).
    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
