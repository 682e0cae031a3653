use super::{ResourceKind, TypedResource, iri_of};
use crate::graph::{GraphResource, Iri, Term};
use crate::vocab::schema;

/// Metadata describing one dimension of the cube.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionMetadata {
    pub node: Term,
    pub about: Option<Iri>,
}

/// The per-dataset set of dimension metadata parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionMetadataCollection {
    pub iri: Iri,
    pub parts: Vec<DimensionMetadata>,
}

impl TypedResource for DimensionMetadataCollection {
    const KIND: ResourceKind = ResourceKind::DimensionMetadataCollection;

    fn read(resource: &GraphResource) -> Self {
        let parts = resource
            .out(&schema::hasPart)
            .map(|node| DimensionMetadata {
                node: node.clone(),
                about: iri_of(resource, node, &schema::about),
            })
            .collect();
        Self {
            iri: resource.iri().clone(),
            parts,
        }
    }
}

impl DimensionMetadataCollection {
    pub fn part_about(&self, property: &Iri) -> Option<&DimensionMetadata> {
        self.parts.iter().find(|p| p.about.as_ref() == Some(property))
    }
}

/// Remove every part about `property` along with its nested triples.
/// Returns the number of parts removed.
pub fn remove_part_about(collection: &mut GraphResource, property: &Iri) -> usize {
    let about = Term::Iri(property.clone());
    let parts: Vec<Term> = collection
        .out(&schema::hasPart)
        .filter(|node| collection.has(node, &schema::about, &about))
        .cloned()
        .collect();
    let root = collection.term().clone();
    for part in &parts {
        collection.remove(&root, &schema::hasPart, part);
        collection.remove_node(part);
    }
    parts.len()
}

/// Add a part about `property` unless one exists. Returns the part's node.
pub fn ensure_part_about(collection: &mut GraphResource, property: &Iri) -> Term {
    let about = Term::Iri(property.clone());
    let existing = collection
        .out(&schema::hasPart)
        .find(|node| collection.has(node, &schema::about, &about))
        .cloned();
    if let Some(part) = existing {
        return part;
    }
    let part = collection.blank_node();
    collection.add_out(schema::hasPart, part.clone());
    collection.add(part.clone(), schema::about, about);
    part
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Literal;

    fn collection() -> GraphResource {
        let mut res =
            GraphResource::created(Iri::from_static("https://example.org/dimension-metadata"));
        let part = Term::Iri(Iri::from_static("https://example.org/dimension-metadata/a"));
        res.add_out(schema::hasPart, part.clone());
        res.add(part.clone(), schema::about, Iri::from_static("https://example.org/a"));
        res.add(part, schema::name, Literal::lang("A", "en"));
        res
    }

    #[test]
    fn remove_part_drops_nested_triples() {
        let mut res = collection();
        let b = Iri::from_static("https://example.org/b");
        ensure_part_about(&mut res, &b);
        assert_eq!(DimensionMetadataCollection::read(&res).parts.len(), 2);

        let a = Iri::from_static("https://example.org/a");
        assert_eq!(remove_part_about(&mut res, &a), 1);
        let view = DimensionMetadataCollection::read(&res);
        assert!(view.part_about(&a).is_none());
        assert!(view.part_about(&b).is_some());
        assert_eq!(res.len(), 2);
    }

    #[test]
    fn ensure_part_is_idempotent() {
        let mut res = collection();
        let a = Iri::from_static("https://example.org/a");
        let before = res.len();
        ensure_part_about(&mut res, &a);
        assert_eq!(res.len(), before);
    }
}
