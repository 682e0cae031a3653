use super::{ResourceKind, TypedResource};
use crate::graph::{GraphResource, Iri, Term};
use crate::vocab::{cc, schema};

/// A mapped source table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub iri: Iri,
    pub name: Option<String>,
    /// Whether rows of this table become cube observations.
    pub observation: bool,
    pub csv_mapping: Option<Iri>,
    pub csv_source: Option<Iri>,
    /// Column mapping links, in link order.
    pub column_mappings: Vec<Iri>,
}

impl TypedResource for Table {
    const KIND: ResourceKind = ResourceKind::Table;

    fn read(resource: &GraphResource) -> Self {
        Self {
            iri: resource.iri().clone(),
            name: resource.out_first(&schema::name).map(|t| t.value().to_string()),
            observation: resource.has_type(&cc::ObservationTable),
            csv_mapping: resource.out_iri(&cc::csvMapping),
            csv_source: resource.out_iri(&cc::csvSource),
            column_mappings: resource.out_iris(&cc::columnMapping),
        }
    }
}

impl Table {
    pub fn links(&self, mapping: &Iri) -> bool {
        self.column_mappings.contains(mapping)
    }
}

/// Remove the table's link to a column mapping.
pub fn unlink_column_mapping(table: &mut GraphResource, mapping: &Iri) -> bool {
    let root = table.term().clone();
    table.remove(&root, &cc::columnMapping, &Term::Iri(mapping.clone()))
}
