//! Embedded graph store backed by oxigraph.
//!
//! Documents live in named graphs of a local oxigraph [`Store`], either in
//! memory (tests, scratch runs) or in a directory on disk.

use async_trait::async_trait;
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;

use super::{GraphStore, Solution};
use crate::error::{StoreError, StoreResult};
use crate::graph::{Iri, Literal, Term};

/// Graph store running in-process on oxigraph.
#[derive(Clone)]
pub struct OxigraphStore {
    store: Store,
}

impl OxigraphStore {
    /// Create a new in-memory store (no persistence).
    pub fn in_memory() -> StoreResult<Self> {
        let store = Store::new().map_err(|e| StoreError::Backend {
            message: format!("failed to create oxigraph store: {e}"),
        })?;
        Ok(Self { store })
    }

    /// Open or create a persistent store at the given path.
    pub fn open(path: &std::path::Path) -> StoreResult<Self> {
        std::fs::create_dir_all(path).map_err(|e| StoreError::Backend {
            message: format!("failed to create oxigraph directory: {e}"),
        })?;
        let store = Store::open(path).map_err(|e| StoreError::Backend {
            message: format!("failed to open oxigraph store at {}: {e}", path.display()),
        })?;
        Ok(Self { store })
    }

    /// Get internal store reference (for advanced oxigraph operations).
    pub fn store(&self) -> &Store {
        &self.store
    }

    fn convert(term: &oxigraph::model::Term) -> StoreResult<Term> {
        use oxigraph::model::Term as Ox;

        #[allow(unreachable_patterns)]
        match term {
            Ox::NamedNode(node) => Ok(Term::Iri(Iri::new_unchecked(node.as_str()))),
            Ox::BlankNode(node) => Ok(Term::Blank(node.as_str().to_string())),
            Ox::Literal(literal) => {
                let converted = if let Some(language) = literal.language() {
                    Literal::lang(literal.value(), language)
                } else {
                    Literal::typed(
                        literal.value(),
                        Iri::new_unchecked(literal.datatype().as_str()),
                    )
                };
                Ok(Term::Literal(converted))
            }
            other => Err(StoreError::Backend {
                message: format!("unsupported term in result: {other}"),
            }),
        }
    }
}

#[async_trait]
impl GraphStore for OxigraphStore {
    async fn select(&self, query: &str) -> StoreResult<Vec<Solution>> {
        let results = self.store.query(query).map_err(|e| StoreError::Backend {
            message: format!("SPARQL query failed: {e}"),
        })?;

        match results {
            QueryResults::Solutions(solutions) => {
                let mut rows = Vec::new();
                for solution in solutions {
                    let solution = solution.map_err(|e| StoreError::Backend {
                        message: format!("solution error: {e}"),
                    })?;
                    let mut row = Solution::new();
                    for (var, term) in solution.iter() {
                        row.insert(var.as_str().to_string(), Self::convert(term)?);
                    }
                    rows.push(row);
                }
                Ok(rows)
            }
            _ => Err(StoreError::Backend {
                message: "expected solutions from SELECT query".into(),
            }),
        }
    }

    async fn ask(&self, query: &str) -> StoreResult<bool> {
        let results = self.store.query(query).map_err(|e| StoreError::Backend {
            message: format!("SPARQL query failed: {e}"),
        })?;
        match results {
            QueryResults::Boolean(b) => Ok(b),
            _ => Err(StoreError::Backend {
                message: "expected boolean result from ASK query".into(),
            }),
        }
    }

    async fn update(&self, update: &str) -> StoreResult<()> {
        tracing::trace!(update, "oxigraph update");
        self.store.update(update).map_err(|e| StoreError::Backend {
            message: format!("SPARQL update failed: {e}"),
        })
    }
}

impl std::fmt::Debug for OxigraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OxigraphStore").finish()
    }
}
