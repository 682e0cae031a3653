use super::{ResourceKind, TypedResource, iri_of};
use crate::graph::{GraphResource, Iri, Term};
use crate::vocab::cc;

/// How a column's cell values turn into observation values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingKind {
    /// Cells become literals.
    Literal {
        datatype: Option<Iri>,
        language: Option<String>,
        default_value: Option<Term>,
    },
    /// Cells identify rows of another table.
    Reference {
        referenced_table: Option<Iri>,
        identifier_mappings: Vec<IdentifierMapping>,
    },
}

/// Pairs a source column with a column of the referenced table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierMapping {
    pub source_column: Option<Iri>,
    pub referenced_column: Option<Iri>,
}

/// Maps one source column onto a target property (the dimension).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub iri: Iri,
    pub source_column: Option<Iri>,
    pub target_property: Option<Iri>,
    pub kind: MappingKind,
}

impl TypedResource for ColumnMapping {
    const KIND: ResourceKind = ResourceKind::ColumnMapping;

    fn read(resource: &GraphResource) -> Self {
        let is_reference = resource.has_type(&cc::ReferenceColumnMapping)
            || resource.out_first(&cc::referencedTable).is_some();

        let kind = if is_reference {
            MappingKind::Reference {
                referenced_table: resource.out_iri(&cc::referencedTable),
                identifier_mappings: resource
                    .out(&cc::identifierMapping)
                    .map(|node| IdentifierMapping {
                        source_column: iri_of(resource, node, &cc::sourceColumn),
                        referenced_column: iri_of(resource, node, &cc::referencedColumn),
                    })
                    .collect(),
            }
        } else {
            MappingKind::Literal {
                datatype: resource.out_iri(&cc::datatype),
                language: resource.out_first(&cc::language).map(|t| t.value().to_string()),
                default_value: resource.out_first(&cc::defaultValue).cloned(),
            }
        };

        Self {
            iri: resource.iri().clone(),
            source_column: resource.out_iri(&cc::sourceColumn),
            target_property: resource.out_iri(&cc::targetProperty),
            kind,
        }
    }
}

impl ColumnMapping {
    pub fn targets(&self, property: &Iri) -> bool {
        self.target_property.as_ref() == Some(property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Literal;
    use crate::vocab::{rdf, xsd};

    fn mapping() -> GraphResource {
        let mut res = GraphResource::created(Iri::from_static("https://example.org/table/m"));
        res.add_out(rdf::type_, cc::ColumnMapping)
            .add_out(cc::sourceColumn, Iri::from_static("https://example.org/source/col"))
            .add_out(cc::targetProperty, Iri::from_static("https://example.org/pollutant"));
        res
    }

    #[test]
    fn literal_mapping_fields() {
        let mut res = mapping();
        res.add_out(cc::datatype, xsd::integer)
            .add_out(cc::language, Literal::simple("fr"));

        let decoded = ColumnMapping::decode(&res).unwrap();
        assert!(decoded.targets(&Iri::from_static("https://example.org/pollutant")));
        assert_eq!(
            decoded.kind,
            MappingKind::Literal {
                datatype: Some(xsd::integer),
                language: Some("fr".into()),
                default_value: None,
            }
        );
    }

    #[test]
    fn reference_mapping_reads_identifier_pairs() {
        let mut res = mapping();
        let pair = res.blank_node();
        res.add_out(rdf::type_, cc::ReferenceColumnMapping)
            .add_out(cc::referencedTable, Iri::from_static("https://example.org/other"))
            .add_out(cc::identifierMapping, pair.clone());
        res.add(pair.clone(), cc::sourceColumn, Iri::from_static("https://example.org/source/id"));
        res.add(pair, cc::referencedColumn, Iri::from_static("https://example.org/other/id"));

        let MappingKind::Reference {
            referenced_table,
            identifier_mappings,
        } = ColumnMapping::read(&res).kind
        else {
            panic!("expected a reference mapping");
        };
        assert_eq!(referenced_table, Some(Iri::from_static("https://example.org/other")));
        assert_eq!(identifier_mappings.len(), 1);
        assert_eq!(
            identifier_mappings[0].referenced_column,
            Some(Iri::from_static("https://example.org/other/id"))
        );
    }
}
