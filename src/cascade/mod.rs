//! Domain operations spanning several documents.
//!
//! Each routine works on one [`ResourceStore`](crate::store::ResourceStore)
//! and keeps one cross-document invariant. For example, a deleted table
//! takes its column mappings along, and dimension metadata exists exactly
//! for the dimensions some observation column still targets.
//!
//! Apart from [`create_project`], routines leave the final
//! [`save`](crate::store::ResourceStore::save) to the caller, so several of
//! them can be combined into one flush. A routine that fails has not
//! flushed anything.

pub mod column_mapping;
pub mod dataset;
pub mod dictionary;
pub mod job;
pub mod project;
pub mod table;

pub use column_mapping::{create_column_mapping, delete_column_mapping};
pub use dataset::update_dataset;
pub use dictionary::{DictionaryUpdate, UpdateDictionary, update_dictionary};
pub use job::{start_transformation, update_job};
pub use project::{CreateProject, create_project};
pub use table::delete_table;
