use super::{ResourceKind, TypedResource};
use crate::graph::{GraphResource, Iri, Term};
use crate::vocab::{cc, rdfs, schema};

/// `schema:actionStatus` values a job moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Potential,
    Active,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn iri(self) -> Iri {
        match self {
            Self::Potential => schema::PotentialActionStatus,
            Self::Active => schema::ActiveActionStatus,
            Self::Completed => schema::CompletedActionStatus,
            Self::Failed => schema::FailedActionStatus,
        }
    }

    pub fn from_iri(iri: &Iri) -> Option<Self> {
        [Self::Potential, Self::Active, Self::Completed, Self::Failed]
            .into_iter()
            .find(|status| &status.iri() == iri)
    }
}

/// A transformation job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub iri: Iri,
    pub label: Option<String>,
    pub status: Option<JobStatus>,
    pub see_also: Vec<Term>,
    /// The `schema:error` node, if the job failed.
    pub error: Option<Term>,
    pub cube_graph: Option<Iri>,
    pub tables: Option<Iri>,
}

impl TypedResource for Job {
    const KIND: ResourceKind = ResourceKind::Job;

    fn read(resource: &GraphResource) -> Self {
        Self {
            iri: resource.iri().clone(),
            label: resource.out_first(&rdfs::label).map(|t| t.value().to_string()),
            status: resource
                .out_iri(&schema::actionStatus)
                .and_then(|iri| JobStatus::from_iri(&iri)),
            see_also: resource.out(&rdfs::seeAlso).cloned().collect(),
            error: resource.out_first(&schema::error).cloned(),
            cube_graph: resource.out_iri(&cc::cubeGraph),
            tables: resource.out_iri(&cc::tables),
        }
    }
}
