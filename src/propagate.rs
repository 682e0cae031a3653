//! Rewrites raw observation values into managed terms.
//!
//! When a dictionary gains entries, observations already produced from the
//! source data still carry the raw values. The [`TermPropagator`] replaces
//! them in the observation store, outside the dictionary's own save, so a
//! slow or failing rewrite never holds up the edit that triggered it.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::backend::GraphStore;
use crate::error::PropagationError;
use crate::graph::{Iri, Term};
use crate::vocab::cube;

/// Bulk substitution of raw values by managed terms for one dimension.
#[derive(Debug, Clone)]
pub struct TermPropagator {
    backend: Arc<dyn GraphStore>,
    /// Restrict rewrites to one graph; every graph otherwise.
    graph: Option<Iri>,
}

impl TermPropagator {
    pub fn new(backend: Arc<dyn GraphStore>) -> Self {
        Self {
            backend,
            graph: None,
        }
    }

    pub fn with_graph(mut self, graph: Option<Iri>) -> Self {
        self.graph = graph;
        self
    }

    /// The update replacing `dimension raw` by `dimension term` on every
    /// observation.
    pub fn substitution_update(&self, dimension: &Iri, raw: &Term, term: &Term) -> String {
        let graph = self
            .graph
            .as_ref()
            .map(|g| format!("<{g}>"))
            .unwrap_or_else(|| "?g".to_string());
        format!(
            "DELETE {{ GRAPH {graph} {{ ?observation <{dimension}> {raw} }} }}
INSERT {{ GRAPH {graph} {{ ?observation <{dimension}> {term} }} }}
WHERE {{ GRAPH {graph} {{ ?observation a <{observation}> ; <{dimension}> {raw} }} }}",
            observation = cube::Observation,
        )
    }

    /// Apply every substitution. Returns the number of updates issued.
    pub async fn propagate(
        &self,
        dimension: &Iri,
        substitutions: &[(Term, Term)],
    ) -> Result<usize, PropagationError> {
        for (raw, term) in substitutions {
            let update = self.substitution_update(dimension, raw, term);
            self.backend
                .update(&update)
                .await
                .map_err(|e| PropagationError::Update {
                    dimension: dimension.to_string(),
                    message: e.to_string(),
                })?;
        }
        if !substitutions.is_empty() {
            tracing::info!(
                dimension = %dimension,
                terms = substitutions.len(),
                "propagated managed terms to observations"
            );
        }
        Ok(substitutions.len())
    }

    /// Run [`propagate`](Self::propagate) on a background task. Failures are
    /// logged, never returned.
    pub fn propagate_detached(
        &self,
        dimension: Iri,
        substitutions: Vec<(Term, Term)>,
    ) -> JoinHandle<()> {
        let propagator = self.clone();
        tokio::spawn(async move {
            if let Err(e) = propagator.propagate(&dimension, &substitutions).await {
                tracing::error!(error = %e, "failed to update observations");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{OxigraphStore, WriteBatch};
    use crate::graph::{Literal, Triple};
    use crate::vocab::rdf;

    fn iri(s: &str) -> Iri {
        Iri::new(s).unwrap()
    }

    #[test]
    fn update_is_scoped_to_configured_graph() {
        let backend: Arc<dyn GraphStore> = Arc::new(OxigraphStore::in_memory().unwrap());
        let propagator = TermPropagator::new(backend)
            .with_graph(Some(iri("https://example.org/cube-graph")));
        let update = propagator.substitution_update(
            &iri("https://example.org/pollutant"),
            &Literal::simple("so2").into(),
            &iri("http://www.wikidata.org/entity/Q5282").into(),
        );
        assert!(update.contains("GRAPH <https://example.org/cube-graph>"));
        assert!(!update.contains("?g"));
        assert!(update.contains("<https://example.org/pollutant> \"so2\""));
    }

    #[tokio::test]
    async fn rewrites_only_matching_observations() {
        let store = OxigraphStore::in_memory().unwrap();
        let graph = iri("https://example.org/cube-graph");
        let pollutant = iri("https://example.org/pollutant");
        let so2 = iri("https://example.org/observation/so2");
        let no2 = iri("https://example.org/observation/no2");
        let mut batch = WriteBatch::new();
        batch.replace(
            graph.clone(),
            vec![
                Triple::new(so2.clone(), rdf::type_, cube::Observation),
                Triple::new(so2.clone(), pollutant.clone(), Literal::simple("so2")),
                Triple::new(no2.clone(), rdf::type_, cube::Observation),
                Triple::new(no2.clone(), pollutant.clone(), Literal::simple("no2")),
            ],
        );
        store.write(&batch).await.unwrap();

        let backend: Arc<dyn GraphStore> = Arc::new(store);
        let q5282 = iri("http://www.wikidata.org/entity/Q5282");
        let count = TermPropagator::new(backend.clone())
            .propagate(&pollutant, &[(Literal::simple("so2").into(), q5282.clone().into())])
            .await
            .unwrap();
        assert_eq!(count, 1);

        let triples = backend.fetch(&graph).await.unwrap().unwrap();
        assert!(triples.contains(&Triple::new(so2, pollutant.clone(), q5282)));
        assert!(triples.contains(&Triple::new(no2, pollutant, Literal::simple("no2"))));
        assert_eq!(triples.len(), 4);
    }

    #[tokio::test]
    async fn empty_substitutions_issue_no_update() {
        let backend: Arc<dyn GraphStore> = Arc::new(OxigraphStore::in_memory().unwrap());
        let count = TermPropagator::new(backend)
            .propagate(&iri("https://example.org/pollutant"), &[])
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
