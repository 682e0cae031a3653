use serde::{Deserialize, Serialize};

use crate::graph::{GraphResource, Iri, Term, Triple};

/// A submitted document: triples describing one root node.
///
/// The root is usually a blank node or a placeholder IRI; the cascade that
/// consumes the payload rebases it onto the target resource's IRI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub root: Term,
    #[serde(default)]
    pub triples: Vec<Triple>,
}

impl Payload {
    pub fn new(root: impl Into<Term>) -> Self {
        Self {
            root: root.into(),
            triples: Vec::new(),
        }
    }

    /// Add `root predicate object`.
    pub fn with(mut self, predicate: Iri, object: impl Into<Term>) -> Self {
        self.triples
            .push(Triple::new(self.root.clone(), predicate, object));
        self
    }

    /// Add an arbitrary triple, e.g. on a nested node.
    pub fn with_triple(mut self, triple: Triple) -> Self {
        self.triples.push(triple);
        self
    }

    /// Objects of `root predicate ?o`.
    pub fn objects<'a>(&'a self, predicate: &'a Iri) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples
            .iter()
            .filter(move |t| t.subject == self.root && &t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// The triples with every occurrence of the root replaced by `iri`.
    pub fn rebase(&self, iri: &Iri) -> Vec<Triple> {
        let target = Term::Iri(iri.clone());
        let swap = |term: &Term| {
            if term == &self.root {
                target.clone()
            } else {
                term.clone()
            }
        };
        self.triples
            .iter()
            .map(|t| Triple {
                subject: swap(&t.subject),
                predicate: t.predicate.clone(),
                object: swap(&t.object),
            })
            .collect()
    }

    /// View the payload as an untracked document named `iri`.
    pub fn to_resource(&self, iri: &Iri) -> GraphResource {
        GraphResource::detached(iri.clone(), self.rebase(iri))
    }
}
