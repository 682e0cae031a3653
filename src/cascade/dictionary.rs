use tokio::task::JoinHandle;

use crate::error::{CubeResult, StoreError, ValidationError};
use crate::graph::Iri;
use crate::model::dictionary::{replace_entries, set_only_valid_terms, set_shared_dimensions};
use crate::model::{Dictionary, DictionaryEntry, Payload, TypedResource};
use crate::propagate::TermPropagator;
use crate::store::ResourceStore;

/// Input of [`update_dictionary`].
#[derive(Debug, Clone)]
pub struct UpdateDictionary {
    pub dictionary: Iri,
    pub payload: Payload,
    /// Rewrite existing observations with the new entries. `None` defers to
    /// the payload's `cc:applyMappings` flag.
    pub propagate: Option<bool>,
}

/// Outcome of [`update_dictionary`].
#[derive(Debug)]
pub struct DictionaryUpdate {
    /// The dictionary as it stands in the working set.
    pub dictionary: Dictionary,
    /// Entries whose key did not exist before.
    pub new_entries: Vec<DictionaryEntry>,
    /// The detached observation rewrite, if one was started.
    pub propagation: Option<JoinHandle<()>>,
}

/// Apply a submitted dictionary to the stored one.
///
/// The submitted `schema:about` must equal the stored one; this is checked
/// before anything changes. Entries are replaced wholesale and the ones
/// with a new key are handed to the propagator, which runs detached.
pub async fn update_dictionary(
    store: &mut ResourceStore,
    command: UpdateDictionary,
    propagator: &TermPropagator,
) -> CubeResult<DictionaryUpdate> {
    let iri = &command.dictionary;
    let existing = store
        .get_resource::<Dictionary>(iri)
        .await?
        .ok_or_else(|| StoreError::NotFound {
            iri: iri.to_string(),
        })?;
    let submitted = Dictionary::read(&command.payload.to_resource(iri));

    let dimension = match (&existing.about, submitted.about) {
        (_, None) => {
            return Err(ValidationError::MissingField {
                field: "schema:about".into(),
            }
            .into());
        }
        (Some(stored), Some(about)) if stored == &about => about,
        (stored, Some(about)) => {
            return Err(ValidationError::ImmutableField {
                field: "schema:about".into(),
                expected: stored
                    .as_ref()
                    .map_or_else(|| "nothing".to_string(), |s| format!("<{s}>")),
                actual: format!("<{about}>"),
            }
            .into());
        }
    };

    let resource = store.get(iri).await?;
    set_shared_dimensions(resource, &submitted.shared_dimensions);
    set_only_valid_terms(resource, submitted.only_valid_terms);
    let new_entries = replace_entries(resource, &submitted.entries);
    let dictionary = Dictionary::read(resource);

    let propagate = command.propagate.unwrap_or(submitted.apply_mappings);
    let substitutions = Dictionary::substitutions(&new_entries);
    let propagation = (propagate && !substitutions.is_empty())
        .then(|| propagator.propagate_detached(dimension.clone(), substitutions));

    tracing::info!(
        dictionary = %iri,
        dimension = %dimension,
        entries = dictionary.entries.len(),
        new = new_entries.len(),
        propagating = propagation.is_some(),
        "updated dictionary"
    );
    Ok(DictionaryUpdate {
        dictionary,
        new_entries,
        propagation,
    })
}
