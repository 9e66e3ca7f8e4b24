// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Term and quad wire codec
//!
//! The storage engine speaks flat strings: IRIs in their absolute form,
//! blank nodes as `_:label`, variables as `?name`, and literals as
//! `"lexical"`, `"lexical"@lang` or `"lexical"^^datatype-iri`. A literal
//! without suffix is an `xsd:string`. This encoding is the de-facto wire
//! format at the engine boundary and is treated as bit-exact: embedded
//! quotes, backslashes and raw line breaks in the lexical form pass through
//! uninterpreted, and the decoder locates the literal terminator by scanning
//! for the last `"` in the string.
//!
//! Wildcard positions in query patterns encode as `None`, never as an empty
//! string. The empty string is reserved for the default graph in the graph
//! position of an encoded quad.

use crate::model::{Quad, QuadDelta, QuadVersion, Term};
use thiserror::Error;

/// Error type for wire decoding failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Empty term string")]
    EmptyTerm,

    #[error("Unterminated literal: {0}")]
    UnterminatedLiteral(String),

    #[error("Malformed literal suffix: {0}")]
    MalformedLiteral(String),
}

/// A quad in its encoded string form. The empty `graph` string denotes the
/// default graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedQuad {
    pub subject: String,
    pub predicate: String,
    pub object: String,
    pub graph: String,
}

/// An encoded quad decorated with the direction of change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedQuadDelta {
    pub quad: EncodedQuad,
    pub addition: bool,
}

/// An encoded quad decorated with the versions it holds in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedQuadVersion {
    pub quad: EncodedQuad,
    pub versions: Vec<u64>,
}

/// Encode a term to its wire string.
pub fn encode_term(term: &Term) -> String {
    match term {
        Term::NamedNode(iri) => iri.clone(),
        Term::BlankNode(label) => format!("_:{}", label),
        Term::Variable(name) => format!("?{}", name),
        Term::Literal(literal) => {
            let mut out = format!("\"{}\"", literal.value);
            if let Some(language) = &literal.language {
                out.push('@');
                out.push_str(language);
            } else if let Some(datatype) = &literal.datatype {
                out.push_str("^^");
                out.push_str(datatype);
            }
            out
        }
    }
}

/// Encode a pattern position. An absent term or a variable matches any value
/// and encodes to `None`.
pub fn encode_pattern_term(term: Option<&Term>) -> Option<String> {
    match term {
        None => None,
        Some(Term::Variable(_)) => None,
        Some(term) => Some(encode_term(term)),
    }
}

/// Decode a wire string back into a term.
pub fn decode_term(encoded: &str) -> Result<Term, CodecError> {
    if encoded.is_empty() {
        return Err(CodecError::EmptyTerm);
    }
    if let Some(rest) = encoded.strip_prefix("_:") {
        return Ok(Term::blank(rest));
    }
    if let Some(rest) = encoded.strip_prefix('?') {
        return Ok(Term::variable(rest));
    }
    if encoded.starts_with('"') {
        // The lexical form may itself contain quotes, so the terminator is
        // the last quote in the string, not the first closing one.
        let end = encoded.rfind('"').unwrap_or(0);
        if end == 0 {
            return Err(CodecError::UnterminatedLiteral(encoded.to_string()));
        }
        let value = &encoded[1..end];
        let suffix = &encoded[end + 1..];
        return if suffix.is_empty() {
            Ok(Term::literal(value))
        } else if let Some(language) = suffix.strip_prefix('@') {
            Ok(Term::literal_lang(value, language))
        } else if let Some(datatype) = suffix.strip_prefix("^^") {
            Ok(Term::literal_typed(value, datatype))
        } else {
            Err(CodecError::MalformedLiteral(encoded.to_string()))
        };
    }
    Ok(Term::named(encoded))
}

/// Encode a quad. The default graph becomes the empty string.
pub fn encode_quad(quad: &Quad) -> EncodedQuad {
    EncodedQuad {
        subject: encode_term(&quad.subject),
        predicate: encode_term(&quad.predicate),
        object: encode_term(&quad.object),
        graph: quad.graph.as_ref().map(encode_term).unwrap_or_default(),
    }
}

/// Decode an encoded quad.
pub fn decode_quad(encoded: EncodedQuad) -> Result<Quad, CodecError> {
    Ok(Quad {
        subject: decode_term(&encoded.subject)?,
        predicate: decode_term(&encoded.predicate)?,
        object: decode_term(&encoded.object)?,
        graph: if encoded.graph.is_empty() {
            None
        } else {
            Some(decode_term(&encoded.graph)?)
        },
    })
}

/// Encode a quad delta for submission to the engine.
pub fn encode_quad_delta(delta: &QuadDelta) -> EncodedQuadDelta {
    EncodedQuadDelta {
        quad: encode_quad(&delta.quad),
        addition: delta.addition,
    }
}

/// Decode an encoded quad delta, reconstructing the addition flag.
pub fn decode_quad_delta(encoded: EncodedQuadDelta) -> Result<QuadDelta, CodecError> {
    Ok(QuadDelta {
        quad: decode_quad(encoded.quad)?,
        addition: encoded.addition,
    })
}

/// Decode an encoded versioned quad, reconstructing the version set.
pub fn decode_quad_version(encoded: EncodedQuadVersion) -> Result<QuadVersion, CodecError> {
    Ok(QuadVersion {
        quad: decode_quad(encoded.quad)?,
        versions: encoded.versions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::XSD_STRING;

    fn roundtrip(term: Term) {
        let encoded = encode_term(&term);
        assert_eq!(decode_term(&encoded).unwrap(), term);
    }

    #[test]
    fn test_named_node_roundtrip() {
        roundtrip(Term::named("http://example.org/s"));
    }

    #[test]
    fn test_blank_node_roundtrip() {
        roundtrip(Term::blank("b42"));
        assert_eq!(encode_term(&Term::blank("b42")), "_:b42");
    }

    #[test]
    fn test_variable_roundtrip() {
        roundtrip(Term::variable("s"));
        assert_eq!(encode_term(&Term::variable("s")), "?s");
    }

    #[test]
    fn test_plain_literal_roundtrip() {
        roundtrip(Term::literal("hello"));
        assert_eq!(encode_term(&Term::literal("hello")), "\"hello\"");
    }

    #[test]
    fn test_language_literal_roundtrip() {
        let term = Term::literal_lang("bonjour", "fr");
        assert_eq!(encode_term(&term), "\"bonjour\"@fr");
        roundtrip(term);
    }

    #[test]
    fn test_datatype_literal_roundtrip() {
        let term = Term::literal_typed("13", "http://www.w3.org/2001/XMLSchema#integer");
        assert_eq!(
            encode_term(&term),
            "\"13\"^^http://www.w3.org/2001/XMLSchema#integer"
        );
        roundtrip(term);
    }

    #[test]
    fn test_xsd_string_literal_has_no_suffix() {
        assert_eq!(
            encode_term(&Term::literal_typed("a", XSD_STRING)),
            "\"a\""
        );
    }

    #[test]
    fn test_literal_with_embedded_quotes() {
        let term = Term::literal("say \"hi\" twice");
        assert_eq!(encode_term(&term), "\"say \"hi\" twice\"");
        roundtrip(term);
    }

    #[test]
    fn test_literal_with_embedded_quotes_and_language() {
        roundtrip(Term::literal_lang("a \"b\" c", "en"));
    }

    #[test]
    fn test_literal_with_backslashes_and_line_breaks() {
        roundtrip(Term::literal("line one\nline two\\end\ttab"));
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(decode_term(""), Err(CodecError::EmptyTerm));
        assert_eq!(
            decode_term("\"unterminated"),
            Err(CodecError::UnterminatedLiteral("\"unterminated".to_string()))
        );
        assert!(matches!(
            decode_term("\"a\"~x"),
            Err(CodecError::MalformedLiteral(_))
        ));
    }

    #[test]
    fn test_pattern_encoding() {
        assert_eq!(encode_pattern_term(None), None);
        assert_eq!(encode_pattern_term(Some(&Term::variable("x"))), None);
        assert_eq!(
            encode_pattern_term(Some(&Term::named("http://example.org/p"))),
            Some("http://example.org/p".to_string())
        );
    }

    #[test]
    fn test_quad_roundtrip_with_default_graph() {
        let quad = Quad::new(
            Term::named("http://example.org/s"),
            Term::named("http://example.org/p"),
            Term::literal_lang("o", "en"),
        );
        let encoded = encode_quad(&quad);
        assert_eq!(encoded.graph, "");
        assert_eq!(decode_quad(encoded).unwrap(), quad);
    }

    #[test]
    fn test_quad_roundtrip_with_named_graph() {
        let quad = Quad::with_graph(
            Term::named("http://example.org/s"),
            Term::named("http://example.org/p"),
            Term::named("http://example.org/o"),
            Term::named("http://example.org/g"),
        );
        let encoded = encode_quad(&quad);
        assert_eq!(encoded.graph, "http://example.org/g");
        assert_eq!(decode_quad(encoded).unwrap(), quad);
    }

    #[test]
    fn test_delta_decoration_roundtrip() {
        let delta = QuadDelta::deletion(Quad::new(
            Term::named("http://example.org/s"),
            Term::named("http://example.org/p"),
            Term::literal("o"),
        ));
        let decoded = decode_quad_delta(encode_quad_delta(&delta)).unwrap();
        assert_eq!(decoded, delta);
    }

    #[test]
    fn test_version_decoration_roundtrip() {
        let quad = Quad::new(
            Term::named("http://example.org/s"),
            Term::named("http://example.org/p"),
            Term::named("http://example.org/o"),
        );
        let encoded = EncodedQuadVersion {
            quad: encode_quad(&quad),
            versions: vec![0, 2, 3],
        };
        let decoded = decode_quad_version(encoded).unwrap();
        assert_eq!(decoded.quad, quad);
        assert_eq!(decoded.versions, vec![0, 2, 3]);
    }
}
