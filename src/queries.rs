//! Cross-document lookups answered by the backing store.
//!
//! Links only point one way (a table links its column mappings, not the
//! reverse), so finding the owner of a document means asking the backing
//! store. These queries see persisted state only; callers correct their
//! answers with the working set where it matters.

use crate::backend::{GraphStore, Solution};
use crate::error::StoreResult;
use crate::graph::{Iri, Term};
use crate::model::MembershipRule;
use crate::vocab::cc;

fn iri_binding(row: &Solution, var: &str) -> Option<Iri> {
    row.get(var).and_then(Term::as_iri).cloned()
}

async fn first_iri(backend: &dyn GraphStore, query: &str, var: &str) -> StoreResult<Option<Iri>> {
    let rows = backend.select(query).await?;
    Ok(rows.iter().find_map(|row| iri_binding(row, var)))
}

/// The table whose document links `mapping`.
pub async fn table_for_column_mapping(
    backend: &dyn GraphStore,
    mapping: &Iri,
) -> StoreResult<Option<Iri>> {
    let query = format!(
        "SELECT ?table WHERE {{ GRAPH ?table {{ ?table <{link}> <{mapping}> }} }} LIMIT 1",
        link = cc::columnMapping,
    );
    first_iri(backend, &query, "table").await
}

/// The dimension metadata collection of the dataset a table feeds:
/// table → CSV mapping → project → dataset → collection.
pub async fn dimension_metadata_collection(
    backend: &dyn GraphStore,
    table: &Iri,
) -> StoreResult<Option<Iri>> {
    let query = format!(
        "SELECT ?collection WHERE {{
  GRAPH <{table}> {{ <{table}> <{csv_mapping}> ?mapping }}
  GRAPH ?project {{ ?project <{csv_mapping}> ?mapping ; <{dataset}> ?dataset }}
  GRAPH ?dataset {{ ?dataset <{metadata}> ?collection }}
}} LIMIT 1",
        csv_mapping = cc::csvMapping,
        dataset = cc::dataset,
        metadata = cc::dimensionMetadata,
    );
    first_iri(backend, &query, "collection").await
}

/// The project owning a CSV mapping. Tables and collections link the
/// mapping too, so only `cc:CubeProject` documents qualify.
pub async fn project_for_csv_mapping(
    backend: &dyn GraphStore,
    mapping: &Iri,
) -> StoreResult<Option<Iri>> {
    let query = format!(
        "SELECT ?project WHERE {{ GRAPH ?project {{ ?project a <{class}> ; <{link}> <{mapping}> }} }} LIMIT 1",
        class = cc::CubeProject,
        link = cc::csvMapping,
    );
    first_iri(backend, &query, "project").await
}

/// Column mappings on observation tables targeting `property`, as
/// `(mapping, table)` pairs. Restricted to the tables of one CSV mapping
/// when `scope` is given.
pub async fn column_mappings_targeting(
    backend: &dyn GraphStore,
    property: &Iri,
    scope: Option<&Iri>,
) -> StoreResult<Vec<(Iri, Iri)>> {
    let scope = scope
        .map(|mapping| format!(" ; <{}> <{mapping}>", cc::csvMapping))
        .unwrap_or_default();
    let query = format!(
        "SELECT DISTINCT ?mapping ?table WHERE {{
  GRAPH ?mapping {{ ?mapping <{target}> <{property}> }}
  GRAPH ?table {{ ?table <{link}> ?mapping ; a <{observation}>{scope} }}
}}",
        target = cc::targetProperty,
        link = cc::columnMapping,
        observation = cc::ObservationTable,
    );
    let rows = backend.select(&query).await?;
    Ok(rows
        .iter()
        .filter_map(|row| Some((iri_binding(row, "mapping")?, iri_binding(row, "table")?)))
        .collect())
}

/// Every document satisfying a collection's membership rule.
pub async fn collection_members(
    backend: &dyn GraphStore,
    rule: &MembershipRule,
) -> StoreResult<Vec<Iri>> {
    let Some(query) = rule.members_query() else {
        return Ok(Vec::new());
    };
    let rows = backend.select(&query).await?;
    Ok(rows.iter().filter_map(|row| iri_binding(row, "member")).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{OxigraphStore, WriteBatch};
    use crate::graph::Triple;
    use crate::model::MemberAssertion;
    use crate::vocab::rdf;

    fn iri(s: &str) -> Iri {
        Iri::new(s).unwrap()
    }

    async fn fixture() -> OxigraphStore {
        let backend = OxigraphStore::in_memory().unwrap();
        let project = iri("https://example.org/project");
        let mapping = iri("https://example.org/project/csv-mapping");
        let dataset = iri("https://example.org/project/dataset");
        let collection = iri("https://example.org/project/dimensions");
        let table = iri("https://example.org/project/table");
        let column = iri("https://example.org/project/table/station");
        let other_table = iri("https://example.org/project/lookup");
        let other_column = iri("https://example.org/project/lookup/station");
        let station = iri("https://example.org/station");

        let mut batch = WriteBatch::new();
        batch
            .replace(
                project.clone(),
                vec![
                    Triple::new(project.clone(), rdf::type_, cc::CubeProject),
                    Triple::new(project.clone(), cc::csvMapping, mapping.clone()),
                    Triple::new(project.clone(), cc::dataset, dataset.clone()),
                ],
            )
            .replace(
                dataset.clone(),
                vec![Triple::new(dataset.clone(), cc::dimensionMetadata, collection.clone())],
            )
            .replace(
                table.clone(),
                vec![
                    Triple::new(table.clone(), rdf::type_, cc::ObservationTable),
                    Triple::new(table.clone(), cc::csvMapping, mapping.clone()),
                    Triple::new(table.clone(), cc::columnMapping, column.clone()),
                ],
            )
            .replace(
                column.clone(),
                vec![Triple::new(column.clone(), cc::targetProperty, station.clone())],
            )
            .replace(
                other_table.clone(),
                vec![
                    Triple::new(other_table.clone(), rdf::type_, cc::Table),
                    Triple::new(other_table.clone(), cc::csvMapping, mapping.clone()),
                    Triple::new(other_table.clone(), cc::columnMapping, other_column.clone()),
                ],
            )
            .replace(
                other_column.clone(),
                vec![Triple::new(other_column.clone(), cc::targetProperty, station)],
            );
        backend.write(&batch).await.unwrap();
        backend
    }

    #[tokio::test]
    async fn finds_owning_table() {
        let backend = fixture().await;
        let table = table_for_column_mapping(&backend, &iri("https://example.org/project/table/station"))
            .await
            .unwrap();
        assert_eq!(table, Some(iri("https://example.org/project/table")));

        let none = table_for_column_mapping(&backend, &iri("https://example.org/nothing"))
            .await
            .unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn follows_table_to_dimension_metadata() {
        let backend = fixture().await;
        let collection = dimension_metadata_collection(&backend, &iri("https://example.org/project/table"))
            .await
            .unwrap();
        assert_eq!(collection, Some(iri("https://example.org/project/dimensions")));

        let project = project_for_csv_mapping(&backend, &iri("https://example.org/project/csv-mapping"))
            .await
            .unwrap();
        assert_eq!(project, Some(iri("https://example.org/project")));
    }

    #[tokio::test]
    async fn tables_sharing_the_mapping_are_not_projects() {
        let backend = OxigraphStore::in_memory().unwrap();
        let mapping = iri("https://example.org/p/csv-mapping");
        let table = iri("https://example.org/p/csv-mapping/table/a");
        let mut batch = WriteBatch::new();
        batch.replace(
            table.clone(),
            vec![
                Triple::new(table.clone(), rdf::type_, cc::Table),
                Triple::new(table, cc::csvMapping, mapping.clone()),
            ],
        );
        backend.write(&batch).await.unwrap();

        assert!(project_for_csv_mapping(&backend, &mapping).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn only_observation_tables_count_as_targeting() {
        let backend = fixture().await;
        let hits = column_mappings_targeting(
            &backend,
            &iri("https://example.org/station"),
            Some(&iri("https://example.org/project/csv-mapping")),
        )
        .await
        .unwrap();
        assert_eq!(
            hits,
            vec![(
                iri("https://example.org/project/table/station"),
                iri("https://example.org/project/table")
            )]
        );
    }

    #[tokio::test]
    async fn lists_members_by_rule() {
        let backend = fixture().await;
        let rule = MembershipRule::new(vec![MemberAssertion::Outgoing {
            property: cc::csvMapping,
            object: iri("https://example.org/project/csv-mapping").into(),
        }]);
        let members = collection_members(&backend, &rule).await.unwrap();
        assert_eq!(
            members,
            vec![
                iri("https://example.org/project"),
                iri("https://example.org/project/lookup"),
                iri("https://example.org/project/table"),
            ]
        );
    }
}
