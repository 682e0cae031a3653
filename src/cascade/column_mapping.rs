//! Column mapping creation and deletion.
//!
//! Both keep dimension metadata in step with the mappings: a part about a
//! dimension exists while at least one column mapping on an observation
//! table of the same CSV mapping targets that dimension.

use crate::error::{CubeResult, StoreResult, ValidationError};
use crate::graph::{Iri, Term};
use crate::model::dimension::{ensure_part_about, remove_part_about};
use crate::model::table::unlink_column_mapping;
use crate::model::{ColumnMapping, Payload, ResourceKind, Table, TypedResource};
use crate::queries;
use crate::store::{GetOptions, ResourceStore};
use crate::vocab::{cc, hydra, rdf, schema};

/// Create a column mapping under `table` from a submitted payload.
///
/// The mapping is named after the source column's `schema:name`, linked
/// from the table, and for observation tables the targeted dimension gets
/// a metadata part if it has none.
pub async fn create_column_mapping(
    store: &mut ResourceStore,
    table: &Iri,
    payload: &Payload,
) -> CubeResult<Iri> {
    let source_column = payload
        .objects(&cc::sourceColumn)
        .find_map(Term::as_iri)
        .cloned()
        .ok_or_else(|| ValidationError::MissingField {
            field: "cc:sourceColumn".into(),
        })?;
    let target_property = payload
        .objects(&cc::targetProperty)
        .next()
        .cloned()
        .ok_or_else(|| ValidationError::MissingField {
            field: "cc:targetProperty".into(),
        })?;

    let table_view = Table::decode(store.get(table).await?)?;
    let column_name = column_name(store, table_view.csv_source.as_ref(), &source_column).await?;

    let iri = store.mint(table, column_name.as_deref()).await?;
    let submitted = payload.to_resource(&iri);
    let mapping = store.create(iri.clone())?;
    let reference = submitted.out_first(&cc::referencedTable).is_some();
    mapping
        .add_out(rdf::type_, cc::ColumnMapping)
        .add_out(rdf::type_, hydra::Resource)
        .add_out(
            rdf::type_,
            if reference {
                cc::ReferenceColumnMapping
            } else {
                cc::LiteralColumnMapping
            },
        );
    let copied = [
        cc::sourceColumn,
        cc::targetProperty,
        cc::datatype,
        cc::language,
        cc::defaultValue,
        cc::referencedTable,
    ];
    for predicate in &copied {
        for object in submitted.out(predicate) {
            mapping.add_out(predicate.clone(), object.clone());
        }
    }
    for node in submitted.out(&cc::identifierMapping) {
        let copied = mapping.copy_node(&submitted, node);
        mapping.add_out(cc::identifierMapping, copied);
    }

    store.get(table).await?.add_out(cc::columnMapping, iri.clone());

    if let (true, Term::Iri(dimension)) = (table_view.observation, &target_property) {
        let collection = queries::dimension_metadata_collection(store.backend().as_ref(), table).await?;
        if let Some(collection) = collection {
            if let Some(resource) = store.get_with(&collection, GetOptions::allow_missing()).await? {
                ensure_part_about(resource, dimension);
            }
        }
    }

    tracing::info!(table = %table, mapping = %iri, "created column mapping");
    Ok(iri)
}

/// `schema:name` of a source column, read from the table's CSV source.
async fn column_name(
    store: &mut ResourceStore,
    source: Option<&Iri>,
    column: &Iri,
) -> StoreResult<Option<String>> {
    let Some(source) = source else {
        return Ok(None);
    };
    let Some(resource) = store.get_with(source, GetOptions::allow_missing()).await? else {
        return Ok(None);
    };
    Ok(resource
        .object(&Term::Iri(column.clone()), &schema::name)
        .map(|name| name.value().to_string()))
}

/// Delete a column mapping, unlink it from its table, and drop the
/// dimension metadata part of its target property when nothing else
/// targets that property any more.
pub async fn delete_column_mapping(store: &mut ResourceStore, mapping: &Iri) -> CubeResult<()> {
    let view = ColumnMapping::read(store.get(mapping).await?);

    let table = owning_table(store, mapping).await?;
    let mut scope = None;
    if let Some(table) = &table {
        if let Some(resource) = store.get_with(table, GetOptions::allow_missing()).await? {
            scope = Table::read(resource).csv_mapping;
            unlink_column_mapping(resource, mapping);
        }
    }

    if let (Some(table), Some(dimension)) = (&table, &view.target_property) {
        let collection =
            queries::dimension_metadata_collection(store.backend().as_ref(), table).await?;
        if let Some(collection) = collection {
            if !still_targeted(store, mapping, dimension, scope.as_ref()).await? {
                if let Some(resource) = store
                    .get_with(&collection, GetOptions::allow_missing())
                    .await?
                {
                    let removed = remove_part_about(resource, dimension);
                    tracing::debug!(dimension = %dimension, removed, "pruned dimension metadata");
                }
            }
        }
    }

    store.delete(mapping).await?;
    tracing::info!(mapping = %mapping, "deleted column mapping");
    Ok(())
}

/// The table linking `mapping`: working set first, backing store second.
async fn owning_table(store: &ResourceStore, mapping: &Iri) -> StoreResult<Option<Iri>> {
    let link = Term::Iri(mapping.clone());
    let cached = store
        .resources()
        .find(|r| r.has(r.term(), &cc::columnMapping, &link))
        .map(|r| r.iri().clone());
    if cached.is_some() {
        return Ok(cached);
    }
    let found = queries::table_for_column_mapping(store.backend().as_ref(), mapping).await?;
    Ok(found.filter(|table| !store.is_deleted(table)))
}

/// Whether a column mapping other than `deleting` on an observation table
/// still targets `dimension`.
///
/// The backing store's answer is corrected by the working set: deleted
/// documents and links removed in this operation do not count, links added
/// in this operation do.
async fn still_targeted(
    store: &mut ResourceStore,
    deleting: &Iri,
    dimension: &Iri,
    scope: Option<&Iri>,
) -> StoreResult<bool> {
    let persisted =
        queries::column_mappings_targeting(store.backend().as_ref(), dimension, scope).await?;
    let mut candidates: Vec<(Iri, Iri)> = persisted;

    for resource in store.resources() {
        if ResourceKind::of(resource) != ResourceKind::ObservationTable {
            continue;
        }
        if scope.is_some_and(|s| resource.out_iri(&cc::csvMapping).as_ref() != Some(s)) {
            continue;
        }
        for linked in resource.out_iris(&cc::columnMapping) {
            candidates.push((linked, resource.iri().clone()));
        }
    }

    for (candidate, table) in candidates {
        if &candidate == deleting || store.is_deleted(&candidate) || store.is_deleted(&table) {
            continue;
        }
        if let Some(cached) = store.cached(&table) {
            let view = Table::read(cached);
            if !view.observation || !view.links(&candidate) {
                continue;
            }
        }
        let targets = store
            .get_with(&candidate, GetOptions::allow_missing())
            .await?
            .is_some_and(|resource| ColumnMapping::read(resource).targets(dimension));
        if targets {
            tracing::debug!(dimension = %dimension, mapping = %candidate, "dimension still targeted");
            return Ok(true);
        }
    }
    Ok(false)
}
