use super::column_mapping::delete_column_mapping;
use crate::error::CubeResult;
use crate::graph::Term;
use crate::model::{Table, TypedResource};
use crate::store::{GetOptions, ResourceStore};

/// Delete a table together with every column mapping it links.
///
/// Anything but an existing table IRI is a no-op. Mappings are deleted one
/// after another in link order, so each dimension metadata check sees the
/// deletions before it. A linked mapping that does not exist fails the
/// whole deletion with `NotFound`.
pub async fn delete_table(store: &mut ResourceStore, table: &Term) -> CubeResult<()> {
    let Some(table_iri) = table.as_iri() else {
        tracing::debug!(term = %table, "not a table IRI, nothing to delete");
        return Ok(());
    };
    let Some(resource) = store.get_with(table_iri, GetOptions::allow_missing()).await? else {
        tracing::debug!(table = %table_iri, "table does not exist, nothing to delete");
        return Ok(());
    };

    let mappings = Table::read(resource).column_mappings;
    for mapping in &mappings {
        delete_column_mapping(store, mapping).await?;
    }

    store.delete(table_iri).await?;
    tracing::info!(table = %table_iri, mappings = mappings.len(), "deleted table");
    Ok(())
}
