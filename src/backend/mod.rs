//! Backing graph store protocol.
//!
//! The resource store talks to the database holding all documents through
//! [`GraphStore`]: fetch one document, write a batch of documents, and run
//! SPARQL queries and updates for lookups and bulk substitutions.
//!
//! - [`OxigraphStore`]: embedded oxigraph, in memory or on disk
//! - `SparqlHttpStore`: SPARQL 1.1 protocol endpoints (feature `remote`)

#[cfg(feature = "remote")]
pub mod http;
pub mod embedded;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::graph::sparql::{self, render_triple};
use crate::graph::{Iri, Term, Triple};

#[cfg(feature = "remote")]
pub use http::SparqlHttpStore;
pub use embedded::OxigraphStore;

/// One row of a SELECT result: variable name (without `?`) to bound term.
pub type Solution = BTreeMap<String, Term>;

/// A write against one document.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphWrite {
    /// Replace the document's content wholesale.
    Replace { graph: Iri, triples: Vec<Triple> },
    /// Remove the document.
    Drop { graph: Iri },
}

impl GraphWrite {
    pub fn graph(&self) -> &Iri {
        match self {
            GraphWrite::Replace { graph, .. } | GraphWrite::Drop { graph } => graph,
        }
    }
}

/// A set of document writes sent to the backing store in one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    writes: Vec<GraphWrite>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, graph: Iri, triples: Vec<Triple>) -> &mut Self {
        self.writes.push(GraphWrite::Replace { graph, triples });
        self
    }

    pub fn drop_graph(&mut self, graph: Iri) -> &mut Self {
        self.writes.push(GraphWrite::Drop { graph });
        self
    }

    pub fn writes(&self) -> &[GraphWrite] {
        &self.writes
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Render the batch as a single SPARQL update request.
    ///
    /// Every touched graph is dropped first, then replaced documents are
    /// inserted in one `INSERT DATA` block. Blank nodes are scoped per
    /// document so two documents never share one.
    pub fn to_sparql_update(&self) -> String {
        let mut update = String::new();
        for write in &self.writes {
            update.push_str(&format!("DROP SILENT GRAPH <{}> ;\n", write.graph()));
        }

        let mut data = String::new();
        for (index, write) in self.writes.iter().enumerate() {
            if let GraphWrite::Replace { graph, triples } = write {
                if triples.is_empty() {
                    continue;
                }
                let scope = format!("g{index}");
                data.push_str(&format!("  GRAPH <{graph}> {{\n"));
                for triple in triples {
                    data.push_str("    ");
                    data.push_str(&render_triple(triple, &scope));
                    data.push('\n');
                }
                data.push_str("  }\n");
            }
        }

        if data.is_empty() {
            // Trailing separator is not valid after the last operation.
            let trimmed = update.trim_end().trim_end_matches(';').trim_end().to_string();
            return trimmed;
        }
        update.push_str("INSERT DATA {\n");
        update.push_str(&data);
        update.push('}');
        update
    }
}

/// Capability the resource store depends on for persistence and lookups.
///
/// Implementations only need `select`, `ask` and `update`; document-level
/// access is derived from them, with documents stored as named graphs.
#[async_trait]
pub trait GraphStore: Send + Sync + std::fmt::Debug {
    /// Run a SPARQL SELECT query.
    async fn select(&self, query: &str) -> StoreResult<Vec<Solution>>;

    /// Run a SPARQL ASK query.
    async fn ask(&self, query: &str) -> StoreResult<bool>;

    /// Run a SPARQL update request.
    async fn update(&self, update: &str) -> StoreResult<()>;

    /// Load every triple of the document named `graph`.
    ///
    /// An empty named graph does not exist as far as SPARQL is concerned,
    /// so `None` is returned for both.
    async fn fetch(&self, graph: &Iri) -> StoreResult<Option<Vec<Triple>>> {
        let rows = self.select(&sparql::select_graph(graph)).await?;
        if rows.is_empty() {
            return Ok(None);
        }
        let mut triples = Vec::with_capacity(rows.len());
        for mut row in rows {
            let (Some(subject), Some(Term::Iri(predicate)), Some(object)) =
                (row.remove("s"), row.remove("p"), row.remove("o"))
            else {
                return Err(StoreError::Backend {
                    message: format!("malformed triple while fetching <{graph}>"),
                });
            };
            triples.push(Triple {
                subject,
                predicate,
                object,
            });
        }
        Ok(Some(triples))
    }

    /// Whether a document named `graph` exists.
    async fn contains(&self, graph: &Iri) -> StoreResult<bool> {
        self.ask(&sparql::ask_graph(graph)).await
    }

    /// Persist a batch of document writes in one round-trip.
    async fn write(&self, batch: &WriteBatch) -> StoreResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        self.update(&batch.to_sparql_update())
            .await
            .map_err(|e| StoreError::Flush {
                graphs: batch.len(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Literal;

    fn iri(s: &str) -> Iri {
        Iri::new(s).unwrap()
    }

    #[test]
    fn batch_renders_drops_before_inserts() {
        let mut batch = WriteBatch::new();
        batch.drop_graph(iri("https://example.org/gone"));
        batch.replace(
            iri("https://example.org/doc"),
            vec![Triple::new(
                iri("https://example.org/doc"),
                iri("https://example.org/p"),
                Literal::simple("v"),
            )],
        );

        let update = batch.to_sparql_update();
        let drop_gone = update.find("DROP SILENT GRAPH <https://example.org/gone>").unwrap();
        let drop_doc = update.find("DROP SILENT GRAPH <https://example.org/doc>").unwrap();
        let insert = update.find("INSERT DATA").unwrap();
        assert!(drop_gone < insert);
        assert!(drop_doc < insert);
        assert!(update.contains("GRAPH <https://example.org/doc>"));
    }

    #[test]
    fn drop_only_batch_has_no_trailing_separator() {
        let mut batch = WriteBatch::new();
        batch.drop_graph(iri("https://example.org/gone"));
        let update = batch.to_sparql_update();
        assert_eq!(update, "DROP SILENT GRAPH <https://example.org/gone>");
    }
}
