// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! RDF term model
//!
//! Terms are opaque structured values with value-based equality. A `Variable`
//! is a pattern placeholder: it never occurs in stored data and encodes to a
//! wildcard at the engine boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// IRI of the XSD string datatype, the implicit datatype of plain literals.
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// An RDF literal: a lexical value with an optional language tag or datatype.
///
/// A literal without language tag and without datatype is an `xsd:string`
/// literal; constructors normalize an explicit `xsd:string` datatype to
/// `None` so that value equality does not depend on which spelling was used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    /// Raw lexical form. May contain quotes, backslashes and line breaks.
    pub value: String,
    /// Language tag (e.g. `en`), mutually exclusive with `datatype`.
    pub language: Option<String>,
    /// Datatype IRI; `None` denotes `xsd:string`.
    pub datatype: Option<String>,
}

/// An RDF term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    /// An IRI in its absolute string form.
    NamedNode(String),
    /// A blank node label, without the `_:` prefix.
    BlankNode(String),
    /// A literal value.
    Literal(Literal),
    /// A query variable, without the `?` prefix. Wildcard in patterns.
    Variable(String),
}

impl Term {
    /// Create a named node (IRI) term.
    pub fn named(iri: impl Into<String>) -> Self {
        Term::NamedNode(iri.into())
    }

    /// Create a blank node term from a label (no `_:` prefix).
    pub fn blank(label: impl Into<String>) -> Self {
        Term::BlankNode(label.into())
    }

    /// Create a plain (`xsd:string`) literal term.
    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal(Literal {
            value: value.into(),
            language: None,
            datatype: None,
        })
    }

    /// Create a language-tagged literal term.
    pub fn literal_lang(value: impl Into<String>, language: impl Into<String>) -> Self {
        Term::Literal(Literal {
            value: value.into(),
            language: Some(language.into()),
            datatype: None,
        })
    }

    /// Create a datatyped literal term. An explicit `xsd:string` datatype is
    /// normalized away.
    pub fn literal_typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        let datatype = datatype.into();
        Term::Literal(Literal {
            value: value.into(),
            language: None,
            datatype: if datatype == XSD_STRING {
                None
            } else {
                Some(datatype)
            },
        })
    }

    /// Create a variable term (a wildcard in query patterns).
    pub fn variable(name: impl Into<String>) -> Self {
        Term::Variable(name.into())
    }

    /// Whether this term is a variable.
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::codec::encode_term(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_typed_normalizes_xsd_string() {
        assert_eq!(Term::literal_typed("a", XSD_STRING), Term::literal("a"));
        assert_ne!(
            Term::literal_typed("1", "http://www.w3.org/2001/XMLSchema#integer"),
            Term::literal("1")
        );
    }

    #[test]
    fn test_term_equality_is_value_based() {
        assert_eq!(
            Term::named("http://example.org/s"),
            Term::named(String::from("http://example.org/s"))
        );
        assert_ne!(Term::named("a"), Term::blank("a"));
        assert_ne!(Term::literal("a"), Term::literal_lang("a", "en"));
    }
}
