//! Project scaffolding.

use crate::error::{CubeResult, ValidationError};
use crate::graph::{GraphResource, Iri, Literal};
use crate::model::{MemberAssertion, MembershipRule};
use crate::store::{IdentifierMinter, ResourceStore};
use crate::vocab::{cc, dcterms, hydra, rdf, rdfs, shape};

/// Input of [`create_project`].
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub projects_collection: Iri,
    pub label: String,
    pub creator: Iri,
    /// `shape:cube-project/create#CSV` scaffolds the CSV mapping documents.
    pub source_kind: Option<Iri>,
}

/// Create a project and, for CSV projects, its mapping scaffolding, then
/// save.
///
/// CSV projects get a CSV mapping plus two collections (sources and
/// tables) whose membership rules tie new members to that mapping.
pub async fn create_project(store: &mut ResourceStore, command: CreateProject) -> CubeResult<Iri> {
    let label = command.label.trim();
    if label.is_empty() {
        return Err(ValidationError::MissingField {
            field: "rdfs:label".into(),
        }
        .into());
    }

    let project = store
        .create_member(&command.projects_collection, Some(label))
        .await?;
    project
        .add_out(rdf::type_, cc::CubeProject)
        .add_out(rdfs::label, Literal::simple(label))
        .add_out(dcterms::creator, command.creator.clone())
        .add_out(dcterms::created, Literal::date_time(chrono::Utc::now()));
    let project_iri = project.iri().clone();

    if command.source_kind.as_ref() == Some(&shape::project_create_csv) {
        let mapping_iri = IdentifierMinter::child(&project_iri, "csv-mapping");
        let sources_iri = IdentifierMinter::child(&mapping_iri, "csv-source");
        let tables_iri = IdentifierMinter::child(&mapping_iri, "tables");

        store
            .create(mapping_iri.clone())?
            .add_out(rdf::type_, cc::CsvMapping)
            .add_out(cc::project, project_iri.clone())
            .add_out(cc::csvSourceCollection, sources_iri.clone())
            .add_out(cc::tables, tables_iri.clone());
        store
            .get(&project_iri)
            .await?
            .add_out(cc::csvMapping, mapping_iri.clone());

        let sources = store.create(sources_iri)?;
        scaffold_collection(sources, &cc::CSVSourceCollection, "CSV-Sources", &cc::CSVSource, &mapping_iri);

        let tables = store.create(tables_iri)?;
        scaffold_collection(tables, &cc::TableCollection, "Tables", &cc::Table, &mapping_iri);
    }

    store.save().await?;
    tracing::info!(project = %project_iri, "created project");
    Ok(project_iri)
}

fn scaffold_collection(
    collection: &mut GraphResource,
    class: &Iri,
    title: &str,
    member_class: &Iri,
    mapping: &Iri,
) {
    collection
        .add_out(rdf::type_, class.clone())
        .add_out(rdf::type_, hydra::Collection)
        .add_out(hydra::title, Literal::simple(title))
        .add_out(cc::csvMapping, mapping.clone());
    MembershipRule::new(vec![
        MemberAssertion::Outgoing {
            property: rdf::type_,
            object: member_class.into(),
        },
        MemberAssertion::Outgoing {
            property: cc::csvMapping,
            object: mapping.into(),
        },
    ])
    .write(collection);
}
