// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Quad model and its query-mode decorations
//!
//! A `Quad` is a subject/predicate/object/graph statement. Delta-materialized
//! results decorate a quad with an addition flag (`QuadDelta`), version-query
//! results with the set of versions the quad holds in (`QuadVersion`).

use super::term::Term;
use serde::{Deserialize, Serialize};

/// An RDF quad. `graph == None` places the statement in the default graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quad {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
    pub graph: Option<Term>,
}

impl Quad {
    /// Create a quad in the default graph.
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Quad {
            subject,
            predicate,
            object,
            graph: None,
        }
    }

    /// Create a quad in a named graph.
    pub fn with_graph(subject: Term, predicate: Term, object: Term, graph: Term) -> Self {
        Quad {
            subject,
            predicate,
            object,
            graph: Some(graph),
        }
    }
}

/// A quad plus the direction of change: `addition == true` inserts the quad,
/// `addition == false` deletes it.
///
/// Produced by callers for [`append`](crate::store::BufferedQuadStore::append)
/// and returned by delta-materialized queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuadDelta {
    pub quad: Quad,
    pub addition: bool,
}

impl QuadDelta {
    /// An insertion delta.
    pub fn addition(quad: Quad) -> Self {
        QuadDelta {
            quad,
            addition: true,
        }
    }

    /// A deletion delta.
    pub fn deletion(quad: Quad) -> Self {
        QuadDelta {
            quad,
            addition: false,
        }
    }
}

/// A quad plus the versions in which it holds. Returned only by version
/// queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuadVersion {
    pub quad: Quad,
    pub versions: Vec<u64>,
}
