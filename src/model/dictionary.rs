//! Dimension mappings: dictionaries from raw cell values to managed terms.

use std::collections::HashSet;

use super::{ResourceKind, TypedResource};
use crate::graph::{GraphResource, Iri, Literal, Term};
use crate::vocab::{cc, prov, rdf, schema};

/// One `prov:KeyEntityPair`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DictionaryEntry {
    /// The raw value found in source data.
    pub key: Term,
    /// The managed term replacing it, if one was chosen.
    pub entity: Option<Term>,
}

impl DictionaryEntry {
    pub fn new(key: impl Into<Term>, entity: impl Into<Term>) -> Self {
        Self {
            key: key.into(),
            entity: Some(entity.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    pub iri: Iri,
    /// The dimension this dictionary governs. Never changes once set.
    pub about: Option<Iri>,
    pub shared_dimensions: Vec<Term>,
    pub only_valid_terms: Option<bool>,
    /// Whether the submitter asked for existing observations to be rewritten.
    pub apply_mappings: bool,
    pub entries: Vec<DictionaryEntry>,
}

impl TypedResource for Dictionary {
    const KIND: ResourceKind = ResourceKind::Dictionary;

    fn read(resource: &GraphResource) -> Self {
        let entries = resource
            .out(&prov::hadDictionaryMember)
            .filter_map(|node| {
                let key = resource.object(node, &prov::pairKey)?.clone();
                let entity = resource.object(node, &prov::pairEntity).cloned();
                Some(DictionaryEntry { key, entity })
            })
            .collect();

        let flag = |predicate: &Iri| {
            resource
                .out_first(predicate)
                .and_then(Term::as_literal)
                .and_then(Literal::as_bool)
        };

        Self {
            iri: resource.iri().clone(),
            about: resource.out_iri(&schema::about),
            shared_dimensions: resource.out(&cc::sharedDimension).cloned().collect(),
            only_valid_terms: flag(&cc::onlyValidTerms),
            apply_mappings: flag(&cc::applyMappings).unwrap_or(false),
            entries,
        }
    }
}

impl Dictionary {
    /// Entries with a chosen term, as `(raw value, term)` pairs. Blank node
    /// keys match nothing in observation data and are left out.
    pub fn substitutions(entries: &[DictionaryEntry]) -> Vec<(Term, Term)> {
        entries
            .iter()
            .filter(|e| !e.key.is_blank())
            .filter_map(|e| Some((e.key.clone(), e.entity.clone()?)))
            .collect()
    }
}

pub fn set_shared_dimensions(dictionary: &mut GraphResource, dimensions: &[Term]) {
    dictionary.set_out(cc::sharedDimension, dimensions.iter().cloned());
}

pub fn set_only_valid_terms(dictionary: &mut GraphResource, value: Option<bool>) {
    dictionary.delete_out(&cc::onlyValidTerms);
    if let Some(value) = value {
        dictionary.add_out(cc::onlyValidTerms, Literal::boolean(value));
    }
}

/// Replace every entry of `dictionary` with `entries`.
///
/// Returns the entries whose key was not present before the replacement.
pub fn replace_entries(
    dictionary: &mut GraphResource,
    entries: &[DictionaryEntry],
) -> Vec<DictionaryEntry> {
    let previous: HashSet<Term> = Dictionary::read(dictionary)
        .entries
        .into_iter()
        .map(|e| e.key)
        .collect();

    for node in dictionary.delete_out(&prov::hadDictionaryMember) {
        dictionary.remove_node(&node);
    }

    let mut added = Vec::new();
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.key.clone()) {
            continue;
        }
        let node = dictionary.blank_node();
        dictionary.add_out(prov::hadDictionaryMember, node.clone());
        dictionary.add(node.clone(), rdf::type_, prov::KeyEntityPair);
        dictionary.add(node.clone(), prov::pairKey, entry.key.clone());
        if let Some(entity) = &entry.entity {
            dictionary.add(node, prov::pairEntity, entity.clone());
        }
        if !previous.contains(&entry.key) {
            added.push(entry.clone());
        }
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionary(entries: &[DictionaryEntry]) -> GraphResource {
        let mut res = GraphResource::created(Iri::from_static("https://example.org/mapping/pollutant"));
        res.add_out(rdf::type_, prov::Dictionary)
            .add_out(schema::about, Iri::from_static("https://example.org/pollutant"));
        replace_entries(&mut res, entries);
        res
    }

    fn entry(key: &str, entity: &'static str) -> DictionaryEntry {
        DictionaryEntry::new(Literal::simple(key), Iri::from_static(entity))
    }

    #[test]
    fn replace_reports_only_new_keys() {
        let x = "http://www.wikidata.org/entity/X";
        let y = "http://www.wikidata.org/entity/Y";
        let mut res = dictionary(&[entry("a", x)]);

        let added = replace_entries(&mut res, &[entry("a", x), entry("b", y)]);
        assert_eq!(added, vec![entry("b", y)]);
        assert_eq!(Dictionary::read(&res).entries.len(), 2);
    }

    #[test]
    fn replace_removes_dropped_entries_and_their_nodes() {
        let x = "http://www.wikidata.org/entity/X";
        let mut res = dictionary(&[entry("a", x), entry("b", x)]);
        let before = res.len();

        replace_entries(&mut res, &[entry("a", x)]);
        let view = Dictionary::read(&res);
        assert_eq!(view.entries, vec![entry("a", x)]);
        assert_eq!(res.len(), before - 4);
    }

    #[test]
    fn flags_and_shared_dimensions() {
        let mut res = dictionary(&[]);
        set_only_valid_terms(&mut res, Some(true));
        set_shared_dimensions(
            &mut res,
            &[Iri::from_static("https://ld.admin.ch/dimension/pollutant").into()],
        );
        let view = Dictionary::read(&res);
        assert_eq!(view.only_valid_terms, Some(true));
        assert_eq!(view.shared_dimensions.len(), 1);
        assert!(!view.apply_mappings);

        set_only_valid_terms(&mut res, None);
        assert_eq!(Dictionary::read(&res).only_valid_terms, None);
    }

    #[test]
    fn substitutions_skip_entries_without_term() {
        let entries = vec![
            entry("a", "http://www.wikidata.org/entity/X"),
            DictionaryEntry {
                key: Literal::simple("b").into(),
                entity: None,
            },
        ];
        assert_eq!(Dictionary::substitutions(&entries).len(), 1);
    }

    #[test]
    fn substitutions_skip_blank_node_keys() {
        let entries = vec![
            entry("a", "http://www.wikidata.org/entity/X"),
            DictionaryEntry::new(
                Term::Blank("key".into()),
                Iri::from_static("http://www.wikidata.org/entity/Y"),
            ),
        ];
        let substitutions = Dictionary::substitutions(&entries);
        assert_eq!(substitutions.len(), 1);
        assert_eq!(substitutions[0].0, Term::from(Literal::simple("a")));
    }
}
