use super::{ResourceKind, TypedResource};
use crate::graph::{GraphResource, Iri, Term};
use crate::vocab::{cc, schema};

/// The published dataset of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub iri: Iri,
    pub has_part: Vec<Term>,
    pub dimension_metadata: Option<Iri>,
    /// `schema:contactPoint` nodes.
    pub contact_points: Vec<Term>,
}

impl TypedResource for Dataset {
    const KIND: ResourceKind = ResourceKind::Dataset;

    fn read(resource: &GraphResource) -> Self {
        Self {
            iri: resource.iri().clone(),
            has_part: resource.out(&schema::hasPart).cloned().collect(),
            dimension_metadata: resource.out_iri(&cc::dimensionMetadata),
            contact_points: resource.out(&schema::contactPoint).cloned().collect(),
        }
    }
}
