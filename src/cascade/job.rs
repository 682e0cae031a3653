//! Transformation jobs.

use crate::error::{CubeResult, StoreError, ValidationError};
use crate::graph::{Iri, Literal, Term};
use crate::model::{Job, JobStatus, Payload, TypedResource};
use crate::queries;
use crate::store::ResourceStore;
use crate::vocab::{cc, dcterms, rdf, rdfs, schema};

/// Queue a transformation of a project's tables into its cube graph.
///
/// The job collection names the CSV mapping; the project owning that
/// mapping supplies the cube graph and label copied onto the new job.
pub async fn start_transformation(store: &mut ResourceStore, job_collection: &Iri) -> CubeResult<Iri> {
    let csv_mapping = store
        .get(job_collection)
        .await?
        .out_iri(&cc::csvMapping)
        .ok_or_else(|| ValidationError::MissingField {
            field: "cc:csvMapping".into(),
        })?;

    let mapping = store.get(&csv_mapping).await?;
    let tables = mapping.out_iri(&cc::tables);
    let linked_project = mapping.out_iri(&cc::project);
    let project = match linked_project {
        Some(project) => project,
        None => queries::project_for_csv_mapping(store.backend().as_ref(), &csv_mapping)
            .await?
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "cc:csvMapping".into(),
                message: format!("no project uses <{csv_mapping}>"),
            })?,
    };

    let project_resource = store.get(&project).await?;
    let cube_graph: Vec<Term> = project_resource.out(&cc::cubeGraph).cloned().collect();
    let label: Vec<Term> = project_resource.out(&rdfs::label).cloned().collect();

    let job = store.create_member(job_collection, None).await?;
    job.add_out(rdf::type_, cc::Job)
        .add_out(rdf::type_, cc::TransformJob)
        .add_out(schema::actionStatus, JobStatus::Potential.iri())
        .add_out(dcterms::created, Literal::date_time(chrono::Utc::now()));
    for graph in cube_graph {
        job.add_out(cc::cubeGraph, graph);
    }
    if let Some(tables) = tables {
        job.add_out(cc::tables, tables);
    }
    for label in label {
        job.add_out(rdfs::label, label);
    }

    let iri = job.iri().clone();
    tracing::info!(job = %iri, project = %project, "queued transformation job");
    Ok(iri)
}

/// Apply a status report to a job.
///
/// Status and `rdfs:seeAlso` change only when reported. The error node is
/// replaced by the reported one, or removed when none is reported.
pub async fn update_job(store: &mut ResourceStore, job: &Iri, payload: &Payload) -> CubeResult<Job> {
    if store.get_resource::<Job>(job).await?.is_none() {
        return Err(StoreError::NotFound {
            iri: job.to_string(),
        }
        .into());
    }
    let changes = payload.to_resource(job);
    let status = changes.out_iri(&schema::actionStatus);
    if let Some(status) = &status {
        if JobStatus::from_iri(status).is_none() {
            return Err(ValidationError::InvalidValue {
                field: "schema:actionStatus".into(),
                message: format!("<{status}> is not an action status"),
            }
            .into());
        }
    }
    let see_also: Vec<Term> = changes.out(&rdfs::seeAlso).cloned().collect();

    let resource = store.get(job).await?;
    if let Some(status) = status {
        resource.set_out(schema::actionStatus, [Term::Iri(status)]);
    }
    if !see_also.is_empty() {
        resource.set_out(rdfs::seeAlso, see_also);
    }
    for stale in resource.delete_out(&schema::error) {
        resource.remove_node(&stale);
    }
    if let Some(error) = changes.out_first(&schema::error) {
        let copied = resource.copy_node(&changes, error);
        resource.add_out(schema::error, copied);
    }

    let updated = Job::read(resource);
    tracing::info!(job = %job, status = ?updated.status, "updated job");
    Ok(updated)
}
