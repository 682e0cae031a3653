use super::{ResourceKind, TypedResource};
use crate::graph::{GraphResource, Iri};
use crate::vocab::{cc, dcterms, rdfs};

/// A cube project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub iri: Iri,
    pub label: Option<String>,
    pub creator: Option<Iri>,
    pub csv_mapping: Option<Iri>,
    pub dataset: Option<Iri>,
    pub cube_graph: Option<Iri>,
}

impl TypedResource for Project {
    const KIND: ResourceKind = ResourceKind::Project;

    fn read(resource: &GraphResource) -> Self {
        Self {
            iri: resource.iri().clone(),
            label: resource.out_first(&rdfs::label).map(|t| t.value().to_string()),
            creator: resource.out_iri(&dcterms::creator),
            csv_mapping: resource.out_iri(&cc::csvMapping),
            dataset: resource.out_iri(&cc::dataset),
            cube_graph: resource.out_iri(&cc::cubeGraph),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Literal;
    use crate::vocab::rdf;

    #[test]
    fn reads_project_links() {
        let mut res = GraphResource::created(Iri::from_static("https://example.org/project/ubd"));
        res.add_out(rdf::type_, cc::CubeProject)
            .add_out(rdfs::label, Literal::simple("UBD"))
            .add_out(cc::csvMapping, Iri::from_static("https://example.org/project/ubd/csv-mapping"));

        let project = Project::decode(&res).unwrap();
        assert_eq!(project.label.as_deref(), Some("UBD"));
        assert!(project.csv_mapping.is_some());
        assert!(project.dataset.is_none());
    }
}
