//! Hydra collections and their declarative membership rules.

use super::{ResourceKind, TypedResource, iri_of};
use crate::graph::sparql::render_scoped;
use crate::graph::{GraphResource, Iri, Term};
use crate::vocab::hydra;

/// One `hydra:manages` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberAssertion {
    /// `?member property object`
    Outgoing { property: Iri, object: Term },
    /// `subject property ?member`
    Incoming { subject: Term, property: Iri },
}

/// The triples every member of a collection must carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipRule {
    assertions: Vec<MemberAssertion>,
}

impl MembershipRule {
    pub fn new(assertions: Vec<MemberAssertion>) -> Self {
        Self { assertions }
    }

    /// Read the `hydra:manages` blocks of a collection document.
    ///
    /// Blocks without a `hydra:property`, or with neither an object nor a
    /// subject, do not constrain membership and are skipped.
    pub fn read(collection: &GraphResource) -> Self {
        let mut assertions = Vec::new();
        for block in collection.out(&hydra::manages) {
            let Some(property) = iri_of(collection, block, &hydra::property) else {
                continue;
            };
            if let Some(object) = collection.object(block, &hydra::object) {
                assertions.push(MemberAssertion::Outgoing {
                    property,
                    object: object.clone(),
                });
            } else if let Some(subject) = collection.object(block, &hydra::subject) {
                assertions.push(MemberAssertion::Incoming {
                    subject: subject.clone(),
                    property,
                });
            }
        }
        Self { assertions }
    }

    /// Write the rule as `hydra:manages` blocks onto a collection document.
    pub fn write(&self, collection: &mut GraphResource) {
        let root = collection.term().clone();
        for assertion in &self.assertions {
            let block = collection.blank_node();
            collection.add(root.clone(), hydra::manages, block.clone());
            match assertion {
                MemberAssertion::Outgoing { property, object } => {
                    collection.add(block.clone(), hydra::property, property.clone());
                    collection.add(block, hydra::object, object.clone());
                }
                MemberAssertion::Incoming { subject, property } => {
                    collection.add(block.clone(), hydra::subject, subject.clone());
                    collection.add(block, hydra::property, property.clone());
                }
            }
        }
    }

    pub fn assertions(&self) -> &[MemberAssertion] {
        &self.assertions
    }

    pub fn is_empty(&self) -> bool {
        self.assertions.is_empty()
    }

    /// A SELECT binding `?member` to every document satisfying the rule.
    ///
    /// `None` for an empty rule, which would match every document.
    pub fn members_query(&self) -> Option<String> {
        if self.assertions.is_empty() {
            return None;
        }
        let mut patterns = String::new();
        for (index, assertion) in self.assertions.iter().enumerate() {
            match assertion {
                MemberAssertion::Outgoing { property, object } => {
                    patterns.push_str(&format!(
                        "  GRAPH ?member {{ ?member <{property}> {} }}\n",
                        render_scoped(object, "rule")
                    ));
                }
                MemberAssertion::Incoming { subject, property } => {
                    patterns.push_str(&format!(
                        "  GRAPH ?owner{index} {{ {} <{property}> ?member }}\n",
                        render_scoped(subject, "rule")
                    ));
                }
            }
        }
        Some(format!(
            "SELECT DISTINCT ?member WHERE {{\n{patterns}}} ORDER BY ?member"
        ))
    }
}

/// A hydra collection: title plus membership rule.
#[derive(Debug, Clone)]
pub struct Collection {
    pub iri: Iri,
    pub title: Option<String>,
    pub rule: MembershipRule,
}

impl TypedResource for Collection {
    const KIND: ResourceKind = ResourceKind::Collection;

    fn read(resource: &GraphResource) -> Self {
        Self {
            iri: resource.iri().clone(),
            title: resource
                .out_first(&hydra::title)
                .map(|t| t.value().to_string()),
            rule: MembershipRule::read(resource),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::{cc, rdf};

    fn collection() -> GraphResource {
        GraphResource::created(Iri::from_static("https://example.org/tables"))
    }

    #[test]
    fn rule_survives_write_and_read() {
        let mapping = Iri::from_static("https://example.org/mapping");
        let rule = MembershipRule::new(vec![
            MemberAssertion::Outgoing {
                property: rdf::type_,
                object: cc::Table.into(),
            },
            MemberAssertion::Outgoing {
                property: cc::csvMapping,
                object: mapping.into(),
            },
        ]);
        let mut doc = collection();
        rule.write(&mut doc);
        assert_eq!(MembershipRule::read(&doc), rule);
    }

    #[test]
    fn incomplete_blocks_are_skipped() {
        let mut doc = collection();
        let block = doc.blank_node();
        doc.add_out(hydra::manages, block.clone());
        doc.add(block, hydra::object, cc::Table);
        assert!(MembershipRule::read(&doc).is_empty());
    }

    #[test]
    fn members_query_joins_every_assertion() {
        let rule = MembershipRule::new(vec![
            MemberAssertion::Outgoing {
                property: rdf::type_,
                object: cc::Table.into(),
            },
            MemberAssertion::Incoming {
                subject: Iri::from_static("https://example.org/project").into(),
                property: cc::csvMapping,
            },
        ]);
        let query = rule.members_query().unwrap();
        assert!(query.contains(&format!("?member <{}> <{}>", rdf::type_, cc::Table)));
        assert!(query.contains(&format!(
            "<https://example.org/project> <{}> ?member",
            cc::csvMapping
        )));
        assert!(MembershipRule::default().members_query().is_none());
    }
}
