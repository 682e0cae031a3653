//! SPARQL/N-Triples rendering and the SPARQL JSON results term shape.
//!
//! Terms are rendered in N-Triples syntax so they can be pasted into
//! SPARQL queries and `INSERT DATA` blocks. The JSON shape of [`RawTerm`] is
//! the one used by the SPARQL 1.1 Query Results JSON format, which also makes
//! it the on-disk format for payload and seed files.

use serde::{Deserialize, Serialize};

use super::{Iri, Literal, Term, Triple};

/// Escape a literal's lexical form for use between double quotes.
pub fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

/// Reduce a blank node label to characters every SPARQL parser accepts.
///
/// ASCII alphanumerics are kept, every other byte becomes `_` and two hex
/// digits, so distinct labels stay distinct.
pub fn sanitize_label(label: &str) -> String {
    if label.is_empty() {
        return "_".to_string();
    }
    let mut out = String::with_capacity(label.len());
    for byte in label.bytes() {
        if byte.is_ascii_alphanumeric() {
            out.push(byte as char);
        } else {
            out.push_str(&format!("_{byte:02x}"));
        }
    }
    out
}

/// Render a term, renaming blank nodes into `scope`.
///
/// Blank node labels share one namespace per SPARQL request, so documents
/// written in the same batch each get their own scope.
pub fn render_scoped(term: &Term, scope: &str) -> String {
    match term {
        Term::Blank(label) => format!("_:{scope}_{}", sanitize_label(label)),
        other => other.to_string(),
    }
}

/// Render a triple as one N-Triples line with blank nodes renamed into `scope`.
pub fn render_triple(triple: &Triple, scope: &str) -> String {
    format!(
        "{} <{}> {} .",
        render_scoped(&triple.subject, scope),
        triple.predicate,
        render_scoped(&triple.object, scope)
    )
}

/// Query selecting every triple of one document.
pub fn select_graph(graph: &Iri) -> String {
    format!("SELECT ?s ?p ?o WHERE {{ GRAPH <{graph}> {{ ?s ?p ?o }} }}")
}

/// Query asking whether a document holds any triple.
pub fn ask_graph(graph: &Iri) -> String {
    format!("ASK {{ GRAPH <{graph}> {{ ?s ?p ?o }} }}")
}

/// A term in SPARQL 1.1 Query Results JSON shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTerm {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    #[serde(rename = "xml:lang", default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
}

impl TryFrom<RawTerm> for Term {
    type Error = String;

    fn try_from(raw: RawTerm) -> Result<Self, Self::Error> {
        match raw.kind.as_str() {
            "uri" => Iri::new(raw.value)
                .map(Term::Iri)
                .map_err(|e| e.to_string()),
            "bnode" => Ok(Term::Blank(raw.value)),
            "literal" | "typed-literal" => {
                let literal = match (raw.lang, raw.datatype) {
                    (Some(lang), _) => Literal::lang(raw.value, lang),
                    (None, Some(datatype)) => {
                        let datatype = Iri::new(datatype).map_err(|e| e.to_string())?;
                        Literal::typed(raw.value, datatype)
                    }
                    (None, None) => Literal::simple(raw.value),
                };
                Ok(Term::Literal(literal))
            }
            other => Err(format!("unknown term type {other:?}")),
        }
    }
}

impl From<Term> for RawTerm {
    fn from(term: Term) -> Self {
        match term {
            Term::Iri(iri) => RawTerm {
                kind: "uri".into(),
                value: iri.into(),
                lang: None,
                datatype: None,
            },
            Term::Blank(label) => RawTerm {
                kind: "bnode".into(),
                value: label,
                lang: None,
                datatype: None,
            },
            Term::Literal(literal) => RawTerm {
                kind: "literal".into(),
                lang: literal.language().map(str::to_string),
                datatype: literal.datatype().map(|d| d.to_string()),
                value: literal.value,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_nodes_are_scoped() {
        let triple = Triple::new(
            Term::Blank("a-1".into()),
            Iri::from_static("https://example.org/p"),
            Term::Blank("b".into()),
        );
        assert_eq!(
            render_triple(&triple, "g0"),
            "_:g0_a_2d1 <https://example.org/p> _:g0_b ."
        );
    }

    #[test]
    fn sanitized_labels_stay_distinct() {
        let labels = ["a-b", "a_b", "a_2db", "ab", "", "_", "ä"];
        let sanitized: std::collections::HashSet<_> =
            labels.iter().map(|l| sanitize_label(l)).collect();
        assert_eq!(sanitized.len(), labels.len());
        assert_eq!(sanitize_label("a-b"), "a_2db");
        assert_eq!(sanitize_label("a_b"), "a_5fb");
        assert_eq!(sanitize_label("node42"), "node42");
    }

    #[test]
    fn parses_typed_literal_from_results_json() {
        let raw: RawTerm = serde_json::from_str(
            r#"{"type":"literal","value":"3","datatype":"http://www.w3.org/2001/XMLSchema#integer"}"#,
        )
        .unwrap();
        let term = Term::try_from(raw).unwrap();
        let literal = term.as_literal().unwrap();
        assert_eq!(literal.value(), "3");
        assert!(literal.datatype().is_some());
    }

    #[test]
    fn rejects_unknown_term_type() {
        let raw = RawTerm {
            kind: "triple".into(),
            value: String::new(),
            lang: None,
            datatype: None,
        };
        assert!(Term::try_from(raw).is_err());
    }
}
