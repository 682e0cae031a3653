//! Typed views over graph documents.
//!
//! Documents are generic triple sets; the kind of domain object a document
//! holds is decided once, from its `rdf:type`, by [`ResourceKind::of`]. Typed
//! views ([`Table`], [`ColumnMapping`], [`Dictionary`], …) decode a snapshot
//! of the fields a cascade needs. Mutations always go through the
//! [`GraphResource`] held by the store, never through a view.

pub mod collection;
pub mod column_mapping;
pub mod dataset;
pub mod dictionary;
pub mod dimension;
pub mod job;
pub mod payload;
pub mod project;
pub mod table;

use crate::error::{StoreError, StoreResult};
use crate::graph::{GraphResource, Iri, Term};
use crate::vocab::{cc, hydra, prov, schema};

pub use collection::{Collection, MemberAssertion, MembershipRule};
pub use column_mapping::{ColumnMapping, IdentifierMapping, MappingKind};
pub use dataset::Dataset;
pub use dictionary::{Dictionary, DictionaryEntry};
pub use dimension::{DimensionMetadata, DimensionMetadataCollection};
pub use job::{Job, JobStatus};
pub use payload::Payload;
pub use project::Project;
pub use table::Table;

/// The closed set of document kinds the cascades know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Project,
    CsvMapping,
    CsvSourceCollection,
    TableCollection,
    Table,
    ObservationTable,
    ColumnMapping,
    DimensionMetadataCollection,
    Dictionary,
    Dataset,
    JobCollection,
    Job,
    Collection,
    Other,
}

impl ResourceKind {
    /// Classify a document by its root node's `rdf:type`.
    ///
    /// More specific types win: an observation table is also a table, a
    /// table collection is also a hydra collection.
    pub fn of(resource: &GraphResource) -> Self {
        let priority = [
            (ResourceKind::ObservationTable, &cc::ObservationTable),
            (ResourceKind::Table, &cc::Table),
            (ResourceKind::ColumnMapping, &cc::ColumnMapping),
            (ResourceKind::DimensionMetadataCollection, &cc::DimensionMetadataCollection),
            (ResourceKind::Dictionary, &prov::Dictionary),
            (ResourceKind::CsvMapping, &cc::CsvMapping),
            (ResourceKind::CsvSourceCollection, &cc::CSVSourceCollection),
            (ResourceKind::TableCollection, &cc::TableCollection),
            (ResourceKind::JobCollection, &cc::JobCollection),
            (ResourceKind::Job, &cc::Job),
            (ResourceKind::Project, &cc::CubeProject),
            (ResourceKind::Dataset, &schema::Dataset),
            (ResourceKind::Collection, &hydra::Collection),
        ];
        priority
            .iter()
            .find(|(_, class)| resource.has_type(class))
            .map(|(kind, _)| *kind)
            .unwrap_or(ResourceKind::Other)
    }

    /// Whether a document of kind `self` can be viewed as `expected`.
    pub fn satisfies(self, expected: ResourceKind) -> bool {
        self == expected
            || matches!(
                (self, expected),
                (ResourceKind::ObservationTable, ResourceKind::Table)
                    | (
                        ResourceKind::CsvSourceCollection
                            | ResourceKind::TableCollection
                            | ResourceKind::JobCollection,
                        ResourceKind::Collection
                    )
            )
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Project => "cube project",
            Self::CsvMapping => "CSV mapping",
            Self::CsvSourceCollection => "CSV source collection",
            Self::TableCollection => "table collection",
            Self::Table => "table",
            Self::ObservationTable => "observation table",
            Self::ColumnMapping => "column mapping",
            Self::DimensionMetadataCollection => "dimension metadata collection",
            Self::Dictionary => "dictionary",
            Self::Dataset => "dataset",
            Self::JobCollection => "job collection",
            Self::Job => "job",
            Self::Collection => "collection",
            Self::Other => "resource",
        };
        f.write_str(name)
    }
}

/// A typed snapshot decoded from one document.
pub trait TypedResource: Sized {
    /// The kind a document must have to decode as this view.
    const KIND: ResourceKind;

    /// Read the view's fields, without checking the document's kind.
    fn read(resource: &GraphResource) -> Self;

    /// Decode, rejecting documents of another kind.
    fn decode(resource: &GraphResource) -> StoreResult<Self> {
        if !ResourceKind::of(resource).satisfies(Self::KIND) {
            return Err(StoreError::TypeMismatch {
                iri: resource.iri().to_string(),
                expected: Self::KIND.to_string(),
            });
        }
        Ok(Self::read(resource))
    }
}

/// First IRI object of `subject predicate ?o`.
pub(crate) fn iri_of(resource: &GraphResource, subject: &Term, predicate: &Iri) -> Option<Iri> {
    resource
        .objects(subject, predicate)
        .find_map(Term::as_iri)
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_types(types: &[&Iri]) -> GraphResource {
        let mut res = GraphResource::created(Iri::from_static("https://example.org/doc"));
        for class in types {
            res.add_out(crate::vocab::rdf::type_, (*class).clone());
        }
        res
    }

    #[test]
    fn observation_table_wins_over_table() {
        let res = doc_with_types(&[&cc::Table, &cc::ObservationTable]);
        assert_eq!(ResourceKind::of(&res), ResourceKind::ObservationTable);
        assert!(ResourceKind::ObservationTable.satisfies(ResourceKind::Table));
        assert!(!ResourceKind::Table.satisfies(ResourceKind::ObservationTable));
    }

    #[test]
    fn table_collection_is_a_collection() {
        let res = doc_with_types(&[&cc::TableCollection, &hydra::Collection]);
        assert_eq!(ResourceKind::of(&res), ResourceKind::TableCollection);
        assert!(ResourceKind::TableCollection.satisfies(ResourceKind::Collection));
    }

    #[test]
    fn untyped_document_is_other() {
        let res = doc_with_types(&[]);
        assert_eq!(ResourceKind::of(&res), ResourceKind::Other);
    }

    #[test]
    fn decode_rejects_wrong_kind() {
        let res = doc_with_types(&[&cc::Table]);
        let err = ColumnMapping::decode(&res).unwrap_err();
        assert!(matches!(err, StoreError::TypeMismatch { .. }));
    }
}
