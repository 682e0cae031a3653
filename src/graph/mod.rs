//! Graph data model: IRIs, terms, triples and per-document resources.
//!
//! Every domain object lives in its own named graph whose name is the
//! object's IRI. A [`GraphResource`] holds the triples of exactly one such
//! document; links between documents are ordinary triples whose object is
//! another document's IRI.

pub mod resource;
pub mod sparql;

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::vocab::{rdf, xsd};

pub use resource::{GraphResource, ResourceState};

/// An absolute IRI naming a resource, a property or a class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Iri(Cow<'static, str>);

impl Iri {
    /// Parse and validate an IRI.
    pub fn new(iri: impl Into<String>) -> StoreResult<Self> {
        let iri = iri.into();
        oxigraph::model::NamedNode::new(iri.as_str()).map_err(|e| StoreError::InvalidIri {
            iri: iri.clone(),
            message: e.to_string(),
        })?;
        Ok(Self(Cow::Owned(iri)))
    }

    /// Wrap a vocabulary constant. The string must already be a valid IRI.
    pub const fn from_static(iri: &'static str) -> Self {
        Self(Cow::Borrowed(iri))
    }

    /// Wrap an IRI that a trusted source (the backing store) already validated.
    pub(crate) fn new_unchecked(iri: impl Into<String>) -> Self {
        Self(Cow::Owned(iri.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Iri {
    type Error = StoreError;

    fn try_from(value: String) -> StoreResult<Self> {
        Self::new(value)
    }
}

impl From<Iri> for String {
    fn from(iri: Iri) -> Self {
        iri.0.into_owned()
    }
}

impl PartialEq<str> for Iri {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

/// A literal value with an optional datatype or language tag.
///
/// Simple literals and `xsd:string` literals are the same value; the datatype
/// is normalized away on construction so they compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    value: String,
    datatype: Option<Iri>,
    language: Option<String>,
}

impl Literal {
    /// A plain string literal.
    pub fn simple(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    /// A literal with an explicit datatype.
    pub fn typed(value: impl Into<String>, datatype: Iri) -> Self {
        let datatype = (datatype != xsd::string && datatype != rdf::langString).then_some(datatype);
        Self {
            value: value.into(),
            datatype,
            language: None,
        }
    }

    /// A language-tagged string.
    pub fn lang(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: Some(language.into().to_ascii_lowercase()),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Self::typed(value.to_string(), xsd::boolean)
    }

    pub fn date_time(value: chrono::DateTime<chrono::Utc>) -> Self {
        Self::typed(
            value.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            xsd::dateTime,
        )
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn datatype(&self) -> Option<&Iri> {
        self.datatype.as_ref()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Interpret the literal as an `xsd:boolean`.
    pub fn as_bool(&self) -> Option<bool> {
        match self.value.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }
}

/// An RDF term: IRI, blank node or literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "sparql::RawTerm", into = "sparql::RawTerm")]
pub enum Term {
    Iri(Iri),
    Blank(String),
    Literal(Literal),
}

impl Term {
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Blank(_))
    }

    /// The lexical value: the IRI string, blank label or literal value.
    pub fn value(&self) -> &str {
        match self {
            Term::Iri(iri) => iri.as_str(),
            Term::Blank(label) => label,
            Term::Literal(literal) => literal.value(),
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl From<&Iri> for Term {
    fn from(iri: &Iri) -> Self {
        Term::Iri(iri.clone())
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Term::Literal(literal)
    }
}

impl fmt::Display for Term {
    /// N-Triples syntax, usable verbatim inside SPARQL.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::Blank(label) => write!(f, "_:{}", sparql::sanitize_label(label)),
            Term::Literal(literal) => {
                write!(f, "\"{}\"", sparql::escape_literal(literal.value()))?;
                if let Some(language) = literal.language() {
                    write!(f, "@{language}")
                } else if let Some(datatype) = literal.datatype() {
                    write!(f, "^^<{datatype}>")
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// A (subject, predicate, object) statement inside one document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Iri,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: impl Into<Term>, predicate: Iri, object: impl Into<Term>) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> {} .", self.subject, self.predicate, self.object)
    }
}
