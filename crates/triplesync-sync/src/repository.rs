//! Entity sync orchestration.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, warn};
use triplesync_core::{vocab, EntityUris, Statement, SyncConfig, SyncSettings, Term};
use triplesync_store::{var, AskQuery, Filter, Row, SelectQuery, TripleStore, Update};

use crate::diff::diff;
use crate::error::{RepoResult, SyncError, SyncStep};
use crate::fetch::current_subgraph;
use crate::reachability::filter_removable_reference_statements;

/// Result of syncing one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncResult {
    pub added: usize,
    pub removed: usize,
    /// Reference triples kept because another entity still uses them.
    pub retained: usize,
}

impl SyncResult {
    /// Number of triples actually changed in the store.
    pub fn changed(&self) -> usize {
        self.added + self.removed
    }
}

/// Keeps entities in a triple store in line with their desired statements.
///
/// Cheap to clone; clones share the store handle.
#[derive(Clone)]
pub struct RdfRepository {
    store: Arc<dyn TripleStore>,
    uris: EntityUris,
    settings: SyncSettings,
}

impl RdfRepository {
    pub fn new(store: Arc<dyn TripleStore>, uris: EntityUris) -> Self {
        Self {
            store,
            uris,
            settings: SyncSettings::default(),
        }
    }

    pub fn from_config(store: Arc<dyn TripleStore>, config: &SyncConfig) -> Self {
        Self {
            store,
            uris: config.uris(),
            settings: config.sync.clone(),
        }
    }

    pub fn uris(&self) -> &EntityUris {
        &self.uris
    }

    /// Replace everything the store holds for `entity_id` with `desired`.
    ///
    /// Reference triples are only removed when no other entity's statement
    /// node still points at the reference. Syncing the same set twice
    /// reports zero changes the second time and sends no update.
    pub async fn sync(
        &self,
        entity_id: &str,
        desired: impl IntoIterator<Item = Statement>,
    ) -> RepoResult<SyncResult> {
        let entity = self.uris.entity(entity_id)?;
        let desired = self.check_desired(entity_id, &entity, desired.into_iter().collect())?;

        let current = current_subgraph(self.store.as_ref(), &self.uris, entity_id).await?;
        let changes = diff(&current, &desired);
        if changes.is_empty() {
            debug!(entity = entity_id, statements = desired.len(), "Entity already up to date");
            return Ok(SyncResult::default());
        }

        let filtered = filter_removable_reference_statements(
            self.store.as_ref(),
            &self.uris,
            entity_id,
            changes.to_remove,
            &desired,
            self.settings.reachability_batch_size,
        )
        .await?;

        let result = SyncResult {
            added: changes.to_add.len(),
            removed: filtered.removable.len(),
            retained: filtered.retained.len(),
        };

        if result.changed() == 0 {
            debug!(entity = entity_id, retained = result.retained, "Only shared references differ, nothing to apply");
            return Ok(result);
        }

        let update = Update::new(filtered.removable, changes.to_add);
        self.store
            .update(&update)
            .await
            .map_err(|e| SyncError::from_store(entity_id, SyncStep::Apply, e))?;

        info!(
            entity = entity_id,
            added = result.added,
            removed = result.removed,
            retained = result.retained,
            "Synced entity"
        );

        Ok(result)
    }

    /// The subgraph the store currently holds for `entity_id`.
    pub async fn current(&self, entity_id: &str) -> RepoResult<BTreeSet<Statement>> {
        current_subgraph(self.store.as_ref(), &self.uris, entity_id).await
    }

    /// Whether the stored revision marker of `entity_id` is at least `revision`.
    pub async fn has_revision(&self, entity_id: &str, revision: i64) -> RepoResult<bool> {
        let entity = self.uris.entity_term(entity_id)?;
        let query = AskQuery::new()
            .pattern(entity, Term::iri(vocab::schema::VERSION), var("version"))
            .filter(Filter::GreaterOrEqual(var("version"), revision));

        self.store
            .ask(&query)
            .await
            .map_err(|e| SyncError::from_store(entity_id, SyncStep::Revision, e))
    }

    /// Pass-through read query.
    pub async fn query(&self, query: &SelectQuery) -> RepoResult<Vec<Row>> {
        self.store.select(query).await.map_err(SyncError::Query)
    }

    /// Pass-through existence query.
    pub async fn ask(&self, query: &AskQuery) -> RepoResult<bool> {
        self.store.ask(query).await.map_err(SyncError::Query)
    }

    /// Drop reference content no desired statement node of this entity
    /// points at: fetch would never reach it again, so it could never be
    /// removed. Other subjects outside the entity are kept but logged, since
    /// later syncs of this entity will not remove them either.
    fn check_desired(
        &self,
        entity_id: &str,
        entity: &str,
        desired: BTreeSet<Statement>,
    ) -> RepoResult<BTreeSet<Statement>> {
        let statement_prefix = self.uris.statement_prefix(entity_id)?;
        let owned_node = |term: &Term| term.as_iri().is_some_and(|iri| iri.starts_with(&statement_prefix));

        let site_links: BTreeSet<Term> = desired
            .iter()
            .filter(|s| s.predicate.as_iri() == Some(vocab::schema::ABOUT) && s.object.as_iri() == Some(entity))
            .map(|s| s.subject.clone())
            .collect();
        let pointed: BTreeSet<Term> = desired
            .iter()
            .filter(|s| owned_node(&s.subject) && s.predicate.as_iri() == Some(vocab::prov::WAS_DERIVED_FROM))
            .map(|s| s.object.clone())
            .collect();

        let (kept, orphaned): (BTreeSet<Statement>, BTreeSet<Statement>) =
            desired.into_iter().partition(|s| match s.subject.as_iri() {
                Some(subject) if self.uris.is_reference(subject) => pointed.contains(&s.subject),
                _ => true,
            });
        if !orphaned.is_empty() {
            warn!(
                entity = entity_id,
                dropped = orphaned.len(),
                "Desired reference content has no statement pointing at it, dropping"
            );
        }

        let foreign = kept
            .iter()
            .filter(|s| match s.subject.as_iri() {
                Some(subject) => {
                    subject != entity
                        && !owned_node(&s.subject)
                        && !self.uris.is_reference(subject)
                        && !site_links.contains(&s.subject)
                }
                None => true,
            })
            .count();
        if foreign > 0 {
            warn!(entity = entity_id, foreign, "Desired statements include subjects outside the entity");
        }

        Ok(kept)
    }
}
