//! Identity-mapped working set over the backing graph store.
//!
//! A [`ResourceStore`] lives for one logical operation. Documents are fetched
//! lazily on first access and cached by IRI, so every cascade step sees the
//! edits made by the steps before it. Nothing reaches the backing store until
//! [`ResourceStore::save`], which sends every change in one batched request.

pub mod minter;

use std::collections::HashMap;
use std::sync::Arc;

use crate::backend::{GraphStore, WriteBatch};
use crate::error::{StoreError, StoreResult};
use crate::graph::{GraphResource, Iri, ResourceState, Term};
use crate::model::{MemberAssertion, MembershipRule, TypedResource};
use crate::queries;

pub use minter::IdentifierMinter;

/// Upper bound on minting attempts before giving up on a parent.
const MAX_MINT_ATTEMPTS: usize = 16;

/// Options for [`ResourceStore::get_with`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GetOptions {
    /// Return `None` instead of failing when the document does not exist.
    pub allow_missing: bool,
}

impl GetOptions {
    pub fn allow_missing() -> Self {
        Self {
            allow_missing: true,
        }
    }
}

/// Counts of documents written by one [`ResourceStore::save`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveSummary {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl SaveSummary {
    pub fn total(&self) -> usize {
        self.created + self.updated + self.deleted
    }
}

/// Per-operation unit of work over graph documents.
pub struct ResourceStore {
    backend: Arc<dyn GraphStore>,
    resources: HashMap<Iri, GraphResource>,
    /// Working-set insertion order, so writes are deterministic.
    order: Vec<Iri>,
    minter: IdentifierMinter,
}

impl ResourceStore {
    pub fn new(backend: Arc<dyn GraphStore>) -> Self {
        Self {
            backend,
            resources: HashMap::new(),
            order: Vec::new(),
            minter: IdentifierMinter::new(),
        }
    }

    /// Replace the identifier minter, e.g. with a seeded one in tests.
    pub fn with_minter(mut self, minter: IdentifierMinter) -> Self {
        self.minter = minter;
        self
    }

    pub fn backend(&self) -> &Arc<dyn GraphStore> {
        &self.backend
    }

    /// Load a document, failing with `NotFound` if it does not exist or was
    /// deleted in this working set.
    pub async fn get(&mut self, iri: &Iri) -> StoreResult<&mut GraphResource> {
        self.get_with(iri, GetOptions::default())
            .await?
            .ok_or_else(|| StoreError::NotFound {
                iri: iri.to_string(),
            })
    }

    /// Load a document, optionally tolerating its absence.
    pub async fn get_with(
        &mut self,
        iri: &Iri,
        options: GetOptions,
    ) -> StoreResult<Option<&mut GraphResource>> {
        if !self.resources.contains_key(iri) {
            match self.backend.fetch(iri).await? {
                Some(triples) => {
                    tracing::debug!(iri = %iri, triples = triples.len(), "fetched resource");
                    self.insert(GraphResource::fetched(iri.clone(), triples));
                }
                None if options.allow_missing => return Ok(None),
                None => {
                    return Err(StoreError::NotFound {
                        iri: iri.to_string(),
                    });
                }
            }
        } else {
            tracing::trace!(iri = %iri, "working set hit");
        }

        match self.resources.get_mut(iri) {
            Some(resource) if resource.state() != ResourceState::Deleted => Ok(Some(resource)),
            _ if options.allow_missing => Ok(None),
            _ => Err(StoreError::NotFound {
                iri: iri.to_string(),
            }),
        }
    }

    /// Load a document and decode it as a typed view. A missing document
    /// yields `None`; a document of another kind is a `TypeMismatch`.
    pub async fn get_resource<T: TypedResource>(&mut self, iri: &Iri) -> StoreResult<Option<T>> {
        match self.get_with(iri, GetOptions::allow_missing()).await? {
            Some(resource) => T::decode(resource).map(Some),
            None => Ok(None),
        }
    }

    /// Register a brand-new document.
    pub fn create(&mut self, iri: Iri) -> StoreResult<&mut GraphResource> {
        if self.resources.contains_key(&iri) {
            return Err(StoreError::IdentityCollision {
                iri: iri.to_string(),
            });
        }
        tracing::debug!(iri = %iri, "created resource");
        Ok(self.insert(GraphResource::created(iri)))
    }

    /// Derive an IRI under `parent` that is neither in the working set nor
    /// in the backing store.
    pub async fn mint(&mut self, parent: &Iri, hint: Option<&str>) -> StoreResult<Iri> {
        let mut candidate = self.minter.first_candidate(parent, hint);
        for attempt in 1..=MAX_MINT_ATTEMPTS {
            if !self.is_taken(&candidate).await? {
                return Ok(candidate);
            }
            if attempt == MAX_MINT_ATTEMPTS {
                break;
            }
            tracing::debug!(iri = %candidate, "identifier taken, retrying");
            candidate = self.minter.retry_candidate(parent, hint);
        }
        Err(StoreError::IdentityCollision {
            iri: candidate.to_string(),
        })
    }

    /// Create a new member of a collection.
    ///
    /// The member's IRI is minted under the collection's IRI. Every
    /// `hydra:manages` block of the collection is asserted for the member:
    /// property/object blocks on the member itself, subject/property blocks
    /// on the subject's document.
    pub async fn create_member(
        &mut self,
        collection: &Iri,
        hint: Option<&str>,
    ) -> StoreResult<&mut GraphResource> {
        let rule = MembershipRule::read(self.get(collection).await?);
        let iri = self.mint(collection, hint).await?;

        let member_term = Term::Iri(iri.clone());
        let member = self.create(iri.clone())?;
        let mut incoming = Vec::new();
        for assertion in rule.assertions() {
            match assertion {
                MemberAssertion::Outgoing { property, object } => {
                    member.add_out(property.clone(), object.clone());
                }
                MemberAssertion::Incoming { subject, property } => {
                    incoming.push((subject.clone(), property.clone()));
                }
            }
        }

        for (subject, property) in incoming {
            let Some(owner) = subject.as_iri() else {
                tracing::warn!(collection = %collection, "membership subject is not an IRI, skipped");
                continue;
            };
            let owner = owner.clone();
            self.get(&owner)
                .await?
                .add(subject, property, member_term.clone());
        }

        tracing::debug!(collection = %collection, member = %iri, "created collection member");
        self.resources
            .get_mut(&iri)
            .ok_or_else(|| StoreError::NotFound {
                iri: iri.to_string(),
            })
    }

    /// Members of a collection: persisted documents satisfying its
    /// membership rule plus members created in this working set, minus
    /// members deleted in it.
    pub async fn members(&mut self, collection: &Iri) -> StoreResult<Vec<Iri>> {
        let rule = MembershipRule::read(self.get(collection).await?);
        let mut members = queries::collection_members(self.backend.as_ref(), &rule).await?;
        members.retain(|member| !self.is_deleted(member));

        if rule.is_empty() {
            return Ok(members);
        }
        for resource in self.resources() {
            if resource.state() != ResourceState::Created || members.contains(resource.iri()) {
                continue;
            }
            let admitted = rule.assertions().iter().all(|assertion| match assertion {
                MemberAssertion::Outgoing { property, object } => {
                    resource.has(resource.term(), property, object)
                }
                MemberAssertion::Incoming { subject, property } => subject
                    .as_iri()
                    .and_then(|owner| self.cached(owner))
                    .is_some_and(|owner| owner.has(subject, property, resource.term())),
            });
            if admitted {
                members.push(resource.iri().clone());
            }
        }
        Ok(members)
    }

    /// Mark a document deleted. A document created in this working set and
    /// never saved is simply forgotten.
    pub async fn delete(&mut self, iri: &Iri) -> StoreResult<()> {
        let resource = self.get(iri).await?;
        if resource.state() == ResourceState::Created {
            self.resources.remove(iri);
            self.order.retain(|i| i != iri);
            tracing::debug!(iri = %iri, "forgot unsaved resource");
        } else {
            resource.mark_deleted();
            tracing::debug!(iri = %iri, "marked resource deleted");
        }
        Ok(())
    }

    /// The cached, non-deleted document for `iri`, without fetching.
    pub fn cached(&self, iri: &Iri) -> Option<&GraphResource> {
        self.resources
            .get(iri)
            .filter(|r| r.state() != ResourceState::Deleted)
    }

    /// Whether `iri` was deleted in this working set.
    pub fn is_deleted(&self, iri: &Iri) -> bool {
        self.resources
            .get(iri)
            .is_some_and(|r| r.state() == ResourceState::Deleted)
    }

    /// Non-deleted documents of the working set, in the order they entered.
    pub fn resources(&self) -> impl Iterator<Item = &GraphResource> {
        self.order.iter().filter_map(|iri| self.cached(iri))
    }

    /// Flush every change in one batched write.
    ///
    /// Deleted documents are dropped and evicted from the working set;
    /// created and modified documents are replaced wholesale. The backing store gives no atomicity across
    /// documents, so a failure may leave part of the batch persisted.
    pub async fn save(&mut self) -> StoreResult<SaveSummary> {
        let mut batch = WriteBatch::new();
        let mut summary = SaveSummary::default();

        for iri in &self.order {
            let Some(resource) = self.resources.get(iri) else {
                continue;
            };
            match resource.state() {
                ResourceState::Deleted => {
                    batch.drop_graph(iri.clone());
                    summary.deleted += 1;
                }
                ResourceState::Created => {
                    batch.replace(iri.clone(), resource.triples().to_vec());
                    summary.created += 1;
                }
                ResourceState::Fetched if resource.is_modified() => {
                    batch.replace(iri.clone(), resource.triples().to_vec());
                    summary.updated += 1;
                }
                ResourceState::Fetched => {}
            }
        }

        if batch.is_empty() {
            tracing::debug!("nothing to save");
            return Ok(summary);
        }

        self.backend.write(&batch).await?;
        // Dropped documents leave the working set; a later save must not
        // drop a document re-created under the same IRI.
        self.resources
            .retain(|_, resource| resource.state() != ResourceState::Deleted);
        let resources = &self.resources;
        self.order.retain(|iri| resources.contains_key(iri));
        for resource in self.resources.values_mut() {
            resource.mark_saved();
        }

        tracing::info!(
            created = summary.created,
            updated = summary.updated,
            deleted = summary.deleted,
            "saved working set"
        );
        Ok(summary)
    }

    async fn is_taken(&self, iri: &Iri) -> StoreResult<bool> {
        if self.resources.contains_key(iri) {
            return Ok(true);
        }
        self.backend.contains(iri).await
    }

    fn insert(&mut self, resource: GraphResource) -> &mut GraphResource {
        let iri = resource.iri().clone();
        self.order.push(iri.clone());
        self.resources.entry(iri).or_insert(resource)
    }
}

impl std::fmt::Debug for ResourceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceStore")
            .field("backend", &self.backend)
            .field("resources", &self.resources.len())
            .finish()
    }
}
