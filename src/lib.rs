// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # cubeweave
//!
//! Resource store and cascading domain operations for graph-backed
//! data-cube projects.
//!
//! Every domain object (project, table, column mapping, dimension metadata,
//! dictionary) is a document: a named graph in a graph database. Operations
//! load documents into a per-operation working set, edit them there, and
//! flush every change in one batch.
//!
//! ## Architecture
//!
//! - **Graph model** (`graph`): IRIs, terms, triples and per-document resources
//! - **Backends** (`backend`): embedded oxigraph or SPARQL 1.1 endpoints
//! - **Resource store** (`store`): identity-mapped working set with batched save
//! - **Typed views** (`model`): tables, column mappings, dictionaries, collections
//! - **Cascades** (`cascade`): multi-document operations keeping links consistent
//! - **Term propagation** (`propagate`): detached rewrite of observation values
//!
//! ## Library usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use cubeweave::backend::OxigraphStore;
//! use cubeweave::cascade::delete_table;
//! use cubeweave::graph::{Iri, Term};
//! use cubeweave::store::ResourceStore;
//!
//! # async fn run() -> cubeweave::error::CubeResult<()> {
//! let backend = Arc::new(OxigraphStore::in_memory()?);
//! let mut store = ResourceStore::new(backend);
//! let table = Iri::new("https://example.org/cube-project/ubd/table/stations")?;
//! delete_table(&mut store, &Term::Iri(table)).await?;
//! store.save().await?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod cascade;
pub mod config;
pub mod error;
pub mod graph;
pub mod model;
pub mod propagate;
pub mod queries;
pub mod store;
pub mod vocab;
