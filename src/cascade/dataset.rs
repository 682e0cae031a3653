use crate::error::CubeResult;
use crate::graph::{Iri, Term};
use crate::model::Payload;
use crate::store::ResourceStore;
use crate::vocab::{cc, dcat, hydra, rdf, schema, vcard, void};

/// Replace a dataset's metadata with a submitted payload.
///
/// `schema:hasPart` and `cc:dimensionMetadata` are structural links owned
/// by the project, not by whoever edits the metadata: the stored values
/// survive and submitted values for them are discarded. Every
/// `dcat:contactPoint` is mirrored as a `schema:ContactPoint`.
pub async fn update_dataset(
    store: &mut ResourceStore,
    dataset: &Iri,
    payload: &Payload,
) -> CubeResult<()> {
    let resource = store.get(dataset).await?;
    let has_part: Vec<Term> = resource.out(&schema::hasPart).cloned().collect();
    let dimension_metadata: Vec<Term> = resource.out(&cc::dimensionMetadata).cloned().collect();

    resource.clear();
    resource.extend(payload.rebase(dataset));
    resource
        .add_out(rdf::type_, hydra::Resource)
        .add_out(rdf::type_, schema::Dataset)
        .add_out(rdf::type_, void::Dataset)
        .add_out(rdf::type_, dcat::Dataset);
    resource
        .set_out(schema::hasPart, has_part)
        .set_out(cc::dimensionMetadata, dimension_metadata);

    let contacts: Vec<Term> = resource.out(&dcat::contactPoint).cloned().collect();
    for stale in resource.delete_out(&schema::contactPoint) {
        if !contacts.contains(&stale) {
            resource.remove_node(&stale);
        }
    }
    for contact in &contacts {
        let name = resource.object(contact, &vcard::fn_).cloned();
        let email = resource.object(contact, &vcard::hasEmail).cloned();
        let node = resource.blank_node();
        resource.add_out(schema::contactPoint, node.clone());
        resource.add(node.clone(), rdf::type_, schema::ContactPoint);
        if let Some(name) = name {
            resource.add(node.clone(), schema::name, name);
        }
        if let Some(email) = email {
            resource.add(node, schema::email, email);
        }
    }

    tracing::info!(dataset = %dataset, contacts = contacts.len(), "updated dataset metadata");
    Ok(())
}
