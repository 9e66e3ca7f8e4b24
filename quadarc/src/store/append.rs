// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Deterministic pre-sort for append batches
//!
//! The engine's append path requires its input in ascending lexicographic
//! (subject, predicate, object) order of the encoded term strings; unsorted
//! input is undefined behavior at that boundary. The sort is stable and
//! compares bytewise, field by field, so any permutation of the same batch
//! submits byte-identical data.

use crate::codec::encode_term;
use crate::model::QuadDelta;

fn sort_key(delta: &QuadDelta) -> (String, String, String) {
    (
        encode_term(&delta.quad.subject),
        encode_term(&delta.quad.predicate),
        encode_term(&delta.quad.object),
    )
}

/// Sort a delta batch into the engine's canonical append order.
pub(crate) fn sort_deltas(mut deltas: Vec<QuadDelta>) -> Vec<QuadDelta> {
    deltas.sort_by_cached_key(sort_key);
    deltas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Quad, Term};

    fn delta(s: &str, p: &str, o: &str) -> QuadDelta {
        QuadDelta::addition(Quad::new(Term::named(s), Term::named(p), Term::named(o)))
    }

    #[test]
    fn test_sorts_by_subject_then_predicate_then_object() {
        let sorted = sort_deltas(vec![
            delta("b", "a", "a"),
            delta("a", "b", "a"),
            delta("a", "a", "b"),
            delta("a", "a", "a"),
        ]);
        let keys: Vec<String> = sorted
            .iter()
            .map(|d| {
                let (s, p, o) = sort_key(d);
                format!("{} {} {}", s, p, o)
            })
            .collect();
        assert_eq!(keys, vec!["a a a", "a a b", "a b a", "b a a"]);
    }

    #[test]
    fn test_sort_uses_encoded_term_order() {
        // Encoded literals start with a quote, which sorts before letters.
        let literal = QuadDelta::addition(Quad::new(
            Term::literal("x"),
            Term::named("p"),
            Term::named("o"),
        ));
        let named = delta("a", "p", "o");
        let sorted = sort_deltas(vec![named.clone(), literal.clone()]);
        assert_eq!(sorted, vec![literal, named]);
    }

    #[test]
    fn test_sort_is_idempotent_over_permutations() {
        let batch = vec![
            delta("c", "p", "o"),
            delta("a", "p", "o"),
            delta("b", "p", "o"),
        ];
        let mut reversed = batch.clone();
        reversed.reverse();
        assert_eq!(sort_deltas(batch), sort_deltas(reversed));
    }
}
