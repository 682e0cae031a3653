//! A single graph document held in a resource store's working set.

use serde::{Deserialize, Serialize};

use super::{Iri, Term, Triple};
use crate::vocab::rdf;

/// Lifecycle of a document inside one working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceState {
    /// Loaded from the backing store.
    Fetched,
    /// Registered in this working set; not yet persisted.
    Created,
    /// Marked for removal; dropped from the backing store on save.
    Deleted,
}

impl std::fmt::Display for ResourceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetched => write!(f, "fetched"),
            Self::Created => write!(f, "created"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}

/// In-memory representation of one document: its IRI, its triples and its
/// lifecycle state.
///
/// Triples keep insertion order, so multi-valued links (a table's column
/// mappings) are visited in the order they were loaded or added. Every
/// mutating method flags the resource as modified, which is what `save()`
/// uses to decide which fetched documents need to be written back.
#[derive(Debug, Clone)]
pub struct GraphResource {
    iri: Iri,
    root: Term,
    triples: Vec<Triple>,
    state: ResourceState,
    modified: bool,
    next_blank: usize,
}

impl GraphResource {
    pub(crate) fn fetched(iri: Iri, triples: Vec<Triple>) -> Self {
        let mut resource = Self::empty(iri, ResourceState::Fetched);
        for triple in triples {
            if !resource.triples.contains(&triple) {
                resource.triples.push(triple);
            }
        }
        resource
    }

    pub(crate) fn created(iri: Iri) -> Self {
        Self::empty(iri, ResourceState::Created)
    }

    /// A detached document, e.g. a request payload, that no store tracks.
    pub fn detached(iri: Iri, triples: Vec<Triple>) -> Self {
        let mut resource = Self::fetched(iri, triples);
        resource.state = ResourceState::Created;
        resource
    }

    fn empty(iri: Iri, state: ResourceState) -> Self {
        Self {
            root: Term::Iri(iri.clone()),
            iri,
            triples: Vec::new(),
            state,
            modified: false,
            next_blank: 0,
        }
    }

    pub fn iri(&self) -> &Iri {
        &self.iri
    }

    /// The document's root node (its own IRI as a term).
    pub fn term(&self) -> &Term {
        &self.root
    }

    pub fn state(&self) -> ResourceState {
        self.state
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub(crate) fn mark_deleted(&mut self) {
        self.state = ResourceState::Deleted;
    }

    pub(crate) fn mark_saved(&mut self) {
        self.state = ResourceState::Fetched;
        self.modified = false;
    }

    // -- reading ----------------------------------------------------------

    /// Objects of `subject predicate ?o`.
    pub fn objects<'a>(
        &'a self,
        subject: &'a Term,
        predicate: &'a Iri,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples
            .iter()
            .filter(move |t| &t.subject == subject && &t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// First object of `subject predicate ?o`.
    pub fn object(&self, subject: &Term, predicate: &Iri) -> Option<&Term> {
        self.triples
            .iter()
            .find(|t| &t.subject == subject && &t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// Subjects of `?s predicate object`.
    pub fn subjects<'a>(
        &'a self,
        predicate: &'a Iri,
        object: &'a Term,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples
            .iter()
            .filter(move |t| &t.predicate == predicate && &t.object == object)
            .map(|t| &t.subject)
    }

    /// Objects of the root node for `predicate`.
    pub fn out<'a>(&'a self, predicate: &'a Iri) -> impl Iterator<Item = &'a Term> + 'a {
        self.objects(&self.root, predicate)
    }

    /// First object of the root node for `predicate`.
    pub fn out_first(&self, predicate: &Iri) -> Option<&Term> {
        self.object(&self.root, predicate)
    }

    /// IRI objects of the root node for `predicate`, in triple order.
    pub fn out_iris(&self, predicate: &Iri) -> Vec<Iri> {
        self.out(predicate).filter_map(Term::as_iri).cloned().collect()
    }

    /// First IRI object of the root node for `predicate`.
    pub fn out_iri(&self, predicate: &Iri) -> Option<Iri> {
        self.out(predicate).find_map(Term::as_iri).cloned()
    }

    pub fn has(&self, subject: &Term, predicate: &Iri, object: &Term) -> bool {
        self.triples
            .iter()
            .any(|t| &t.subject == subject && &t.predicate == predicate && &t.object == object)
    }

    /// Whether the root node carries `rdf:type class`.
    pub fn has_type(&self, class: &Iri) -> bool {
        self.has(&self.root, &rdf::type_, &Term::Iri(class.clone()))
    }

    // -- writing ----------------------------------------------------------

    /// Add a triple; duplicates are ignored.
    pub fn add(&mut self, subject: impl Into<Term>, predicate: Iri, object: impl Into<Term>) -> &mut Self {
        let triple = Triple::new(subject, predicate, object);
        if !self.triples.contains(&triple) {
            self.triples.push(triple);
            self.modified = true;
        }
        self
    }

    /// Add `root predicate object`.
    pub fn add_out(&mut self, predicate: Iri, object: impl Into<Term>) -> &mut Self {
        let root = self.root.clone();
        self.add(root, predicate, object)
    }

    /// Add every triple of `triples`.
    pub fn extend(&mut self, triples: impl IntoIterator<Item = Triple>) -> &mut Self {
        for triple in triples {
            if !self.triples.contains(&triple) {
                self.triples.push(triple);
                self.modified = true;
            }
        }
        self
    }

    /// Remove one triple. Returns whether it was present.
    pub fn remove(&mut self, subject: &Term, predicate: &Iri, object: &Term) -> bool {
        let before = self.triples.len();
        self.triples
            .retain(|t| !(&t.subject == subject && &t.predicate == predicate && &t.object == object));
        let removed = self.triples.len() != before;
        self.modified |= removed;
        removed
    }

    /// Remove every triple matching the pattern; `None` matches anything.
    pub fn remove_matching(
        &mut self,
        subject: Option<&Term>,
        predicate: Option<&Iri>,
        object: Option<&Term>,
    ) -> usize {
        let before = self.triples.len();
        self.triples.retain(|t| {
            !(subject.is_none_or(|s| &t.subject == s)
                && predicate.is_none_or(|p| &t.predicate == p)
                && object.is_none_or(|o| &t.object == o))
        });
        let removed = before - self.triples.len();
        self.modified |= removed > 0;
        removed
    }

    /// Remove `root predicate ?o` and return the removed objects.
    pub fn delete_out(&mut self, predicate: &Iri) -> Vec<Term> {
        let objects: Vec<Term> = self.out(predicate).cloned().collect();
        let root = self.root.clone();
        self.remove_matching(Some(&root), Some(predicate), None);
        objects
    }

    /// Replace `root predicate ?o` with the given objects.
    pub fn set_out(&mut self, predicate: Iri, objects: impl IntoIterator<Item = Term>) -> &mut Self {
        self.delete_out(&predicate);
        for object in objects {
            self.add_out(predicate.clone(), object);
        }
        self
    }

    /// Remove every triple whose subject is `node`, following blank-node
    /// objects so nested structures disappear with their parent.
    pub fn remove_node(&mut self, node: &Term) -> usize {
        let mut pending = vec![node.clone()];
        let mut removed = 0;
        while let Some(current) = pending.pop() {
            let nested: Vec<Term> = self
                .triples
                .iter()
                .filter(|t| t.subject == current && t.object.is_blank() && t.object != current)
                .map(|t| t.object.clone())
                .collect();
            removed += self.remove_matching(Some(&current), None, None);
            pending.extend(nested);
        }
        removed
    }

    /// Drop every triple of the document.
    pub fn clear(&mut self) {
        if !self.triples.is_empty() {
            self.triples.clear();
            self.modified = true;
        }
    }

    /// Allocate a blank node label unused in this document.
    pub fn blank_node(&mut self) -> Term {
        loop {
            self.next_blank += 1;
            let candidate = Term::Blank(format!("n{}", self.next_blank));
            let used = self
                .triples
                .iter()
                .any(|t| t.subject == candidate || t.object == candidate);
            if !used {
                return candidate;
            }
        }
    }

    /// Copy the subgraph reachable from `node` through blank nodes in
    /// `source` into this document under a fresh blank node.
    pub fn copy_node(&mut self, source: &GraphResource, node: &Term) -> Term {
        let target = match node {
            Term::Blank(_) => self.blank_node(),
            other => other.clone(),
        };
        let outgoing: Vec<(Iri, Term)> = source
            .triples
            .iter()
            .filter(|t| &t.subject == node)
            .map(|t| (t.predicate.clone(), t.object.clone()))
            .collect();
        for (predicate, object) in outgoing {
            let object = if object.is_blank() && &object != node {
                self.copy_node(source, &object)
            } else {
                object
            };
            self.add(target.clone(), predicate, object);
        }
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Literal;
    use crate::vocab::schema;

    fn doc() -> GraphResource {
        GraphResource::fetched(Iri::from_static("https://example.org/doc"), Vec::new())
    }

    #[test]
    fn add_ignores_duplicates_and_flags_modified() {
        let mut res = doc();
        assert!(!res.is_modified());
        res.add_out(schema::name, Literal::simple("A"));
        res.add_out(schema::name, Literal::simple("A"));
        assert_eq!(res.len(), 1);
        assert!(res.is_modified());
    }

    #[test]
    fn out_iris_preserves_insertion_order() {
        let mut res = doc();
        let a = Iri::from_static("https://example.org/a");
        let b = Iri::from_static("https://example.org/b");
        res.add_out(schema::hasPart, b.clone());
        res.add_out(schema::hasPart, a.clone());
        assert_eq!(res.out_iris(&schema::hasPart), vec![b, a]);
    }

    #[test]
    fn remove_node_follows_blank_nodes() {
        let mut res = doc();
        let part = Term::Iri(Iri::from_static("https://example.org/doc#part"));
        let detail = res.blank_node();
        res.add_out(schema::hasPart, part.clone());
        res.add(part.clone(), schema::about, Iri::from_static("https://example.org/p"));
        res.add(part.clone(), schema::description, detail.clone());
        res.add(detail.clone(), schema::name, Literal::simple("nested"));

        let removed = res.remove_node(&part);
        assert_eq!(removed, 3);
        assert_eq!(res.len(), 1);
        assert!(res.objects(&detail, &schema::name).next().is_none());
    }

    #[test]
    fn first_object_outlives_lookup_arguments() {
        let mut res = doc();
        res.add_out(schema::name, Literal::simple("A"));
        let name = {
            let predicate = Iri::from_static("http://schema.org/name");
            res.out_first(&predicate)
        };
        assert_eq!(name.map(Term::value), Some("A"));

        let subject = res.term().clone();
        let again = {
            let predicate = schema::name;
            res.object(&subject, &predicate)
        };
        assert_eq!(again, name);
    }

    #[test]
    fn blank_nodes_are_unique() {
        let mut res = doc();
        let a = res.blank_node();
        res.add_out(schema::contactPoint, a.clone());
        let b = res.blank_node();
        assert_ne!(a, b);
    }

    #[test]
    fn copy_node_duplicates_nested_structure() {
        let mut source = doc();
        let contact = source.blank_node();
        source.add_out(schema::contactPoint, contact.clone());
        source.add(contact.clone(), schema::name, Literal::simple("Jane"));

        let mut target = GraphResource::created(Iri::from_static("https://example.org/other"));
        let copied = target.copy_node(&source, &contact);
        assert!(copied.is_blank());
        assert_eq!(
            target.object(&copied, &schema::name),
            Some(&Term::Literal(Literal::simple("Jane")))
        );
    }
}
