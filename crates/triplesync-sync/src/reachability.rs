//! Garbage collection of shared reference nodes.
//!
//! A reference node's triples may only be removed when no statement node
//! outside the entity being synced still points at it. The entity's own
//! statement nodes are left out of the reachability universe because the
//! sync replaces them wholesale. Reachability is asked of the store at
//! filter time; nothing is counted in memory.
//!
//! The check and the update are separate requests and no lock spans them.
//! Two entities dropping their last pointers to one reference at the same
//! time may each see the other's pointer and leave the reference orphaned;
//! a pointer written by another sync between our check and our update is
//! not seen, so the reference can be removed under it.

use std::collections::{BTreeMap, BTreeSet};

use futures::future::try_join_all;
use tracing::debug;
use triplesync_core::{vocab, EntityUris, Statement, Term};
use triplesync_store::{var, Filter, SelectQuery, TripleStore};

use crate::error::{RepoResult, SyncError, SyncStep};

/// Removal candidates split by reachability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceFilter {
    /// Statements safe to delete.
    pub removable: BTreeSet<Statement>,
    /// Reference statements kept because the reference is still in use.
    pub retained: BTreeSet<Statement>,
}

/// Filter `to_remove` so reference triples are only removed when the
/// reference is unreachable.
///
/// A reference the desired set still points at but whose content it does
/// not restate is treated as reachable without asking the store.
pub async fn filter_removable_reference_statements(
    store: &dyn TripleStore,
    uris: &EntityUris,
    entity_id: &str,
    to_remove: BTreeSet<Statement>,
    desired: &BTreeSet<Statement>,
    batch_size: usize,
) -> RepoResult<ReferenceFilter> {
    let statement_prefix = uris.statement_prefix(entity_id)?;

    let mut by_reference: BTreeMap<String, Vec<Statement>> = BTreeMap::new();
    let mut removable = BTreeSet::new();
    for statement in to_remove {
        match statement.subject_iri() {
            Some(subject) if uris.is_reference(subject) => {
                by_reference.entry(subject.to_string()).or_default().push(statement);
            }
            _ => {
                removable.insert(statement);
            }
        }
    }

    if by_reference.is_empty() {
        return Ok(ReferenceFilter {
            removable,
            retained: BTreeSet::new(),
        });
    }

    let mut reachable = still_pointed_without_content(uris, desired);
    let to_check: Vec<&String> = by_reference.keys().filter(|r| !reachable.contains(*r)).collect();

    let queries: Vec<SelectQuery> = to_check
        .chunks(batch_size.max(1))
        .map(|batch| reachability_query(batch, &statement_prefix))
        .collect();

    let results = try_join_all(queries.iter().map(|q| store.select(q)))
        .await
        .map_err(|e| SyncError::from_store(entity_id, SyncStep::Reachability, e))?;

    for row in results.into_iter().flatten() {
        if let Some(reference) = row.iri("ref") {
            reachable.insert(reference.to_string());
        }
    }

    let mut retained = BTreeSet::new();
    for (reference, statements) in by_reference {
        if reachable.contains(&reference) {
            debug!(entity = entity_id, reference = %reference, "Reference still in use, keeping");
            retained.extend(statements);
        } else {
            debug!(entity = entity_id, reference = %reference, "Reference unreachable, removing");
            removable.extend(statements);
        }
    }

    Ok(ReferenceFilter { removable, retained })
}

/// `SELECT DISTINCT ?ref` for the references in `batch` that a statement
/// node outside `statement_prefix` still derives from.
fn reachability_query(batch: &[&String], statement_prefix: &str) -> SelectQuery {
    SelectQuery::new()
        .select(&["ref"])
        .distinct()
        .pattern(var("st"), Term::iri(vocab::prov::WAS_DERIVED_FROM), var("ref"))
        .filter(Filter::In(var("ref"), batch.iter().map(|r| Term::iri(r.as_str())).collect()))
        .filter(Filter::not(Filter::StrStarts(var("st"), statement_prefix.to_string())))
}

/// References the desired set points at without restating their content.
fn still_pointed_without_content(uris: &EntityUris, desired: &BTreeSet<Statement>) -> BTreeSet<String> {
    let with_content: BTreeSet<&str> = desired
        .iter()
        .filter_map(Statement::subject_iri)
        .filter(|s| uris.is_reference(s))
        .collect();

    desired
        .iter()
        .filter(|s| s.predicate.as_iri() == Some(vocab::prov::WAS_DERIVED_FROM))
        .filter_map(|s| s.object.as_iri())
        .filter(|r| uris.is_reference(r) && !with_content.contains(r))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use triplesync_store::MemoryStore;

    fn setup() -> (EntityUris, String, Statement) {
        let uris = EntityUris::default();
        let reference = format!("{}e36b7373814a0b74caa84a5fc2b1e3297060ab0f", uris.reference_namespace());
        let content = Statement::iris(
            &reference,
            &uris.value_predicate("P854").unwrap(),
            "http://www.anb.org/articles/02/02-00332.html",
        );
        (uris, reference, content)
    }

    fn pointer(uris: &EntityUris, entity: &str, reference: &str) -> Statement {
        Statement::iris(
            &uris.statement(entity, "9D3713FF").unwrap(),
            vocab::prov::WAS_DERIVED_FROM,
            reference,
        )
    }

    #[tokio::test]
    async fn test_non_reference_statements_pass_through() {
        let (uris, _, _) = setup();
        let store = MemoryStore::new();
        let plain = Statement::iris(&uris.entity("Q23").unwrap(), "http://p", "http://o");
        let filtered = filter_removable_reference_statements(
            &store,
            &uris,
            "Q23",
            BTreeSet::from([plain.clone()]),
            &BTreeSet::new(),
            50,
        )
        .await
        .unwrap();
        assert_eq!(filtered.removable, BTreeSet::from([plain]));
        assert!(filtered.retained.is_empty());
    }

    #[tokio::test]
    async fn test_own_pointer_does_not_keep_reference_alive() {
        let (uris, reference, content) = setup();
        let own = pointer(&uris, "Q23", &reference);
        let store = MemoryStore::with_statements(vec![own.clone(), content.clone()]);

        let filtered = filter_removable_reference_statements(
            &store,
            &uris,
            "Q23",
            BTreeSet::from([own.clone(), content.clone()]),
            &BTreeSet::new(),
            50,
        )
        .await
        .unwrap();
        assert_eq!(filtered.removable, BTreeSet::from([own, content]));
    }

    #[tokio::test]
    async fn test_other_entity_pointer_keeps_reference() {
        let (uris, reference, content) = setup();
        let own = pointer(&uris, "Q23", &reference);
        let other = pointer(&uris, "Q1234134", &reference);
        let store = MemoryStore::with_statements(vec![own.clone(), other, content.clone()]);

        let filtered = filter_removable_reference_statements(
            &store,
            &uris,
            "Q23",
            BTreeSet::from([own.clone(), content.clone()]),
            &BTreeSet::new(),
            1,
        )
        .await
        .unwrap();
        assert_eq!(filtered.removable, BTreeSet::from([own]));
        assert_eq!(filtered.retained, BTreeSet::from([content]));
    }

    #[tokio::test]
    async fn test_prefix_is_not_confused_by_longer_ids() {
        let (uris, reference, content) = setup();
        let own = pointer(&uris, "Q23", &reference);
        let other = pointer(&uris, "Q234", &reference);
        let store = MemoryStore::with_statements(vec![own, other, content.clone()]);

        let filtered = filter_removable_reference_statements(
            &store,
            &uris,
            "Q23",
            BTreeSet::from([content.clone()]),
            &BTreeSet::new(),
            50,
        )
        .await
        .unwrap();
        assert_eq!(filtered.retained, BTreeSet::from([content]));
    }

    #[tokio::test]
    async fn test_desired_pointer_without_content_keeps_reference() {
        let (uris, reference, content) = setup();
        let own = pointer(&uris, "Q23", &reference);
        let store = MemoryStore::with_statements(vec![own.clone(), content.clone()]);

        let filtered = filter_removable_reference_statements(
            &store,
            &uris,
            "Q23",
            BTreeSet::from([content.clone()]),
            &BTreeSet::from([own]),
            50,
        )
        .await
        .unwrap();
        assert!(filtered.removable.is_empty());
        assert_eq!(filtered.retained, BTreeSet::from([content]));
    }

    #[tokio::test]
    async fn test_batches_cover_every_reference() {
        let uris = EntityUris::default();
        let mut store_statements = Vec::new();
        let mut to_remove = BTreeSet::new();
        for i in 0..7 {
            let reference = format!("{}{:040}", uris.reference_namespace(), i);
            let content = Statement::iris(&reference, "http://p", &format!("http://o/{}", i));
            store_statements.push(content.clone());
            to_remove.insert(content);
            if i % 2 == 0 {
                store_statements.push(Statement::iris(
                    &uris.statement("Q5", &format!("s{}", i)).unwrap(),
                    vocab::prov::WAS_DERIVED_FROM,
                    &reference,
                ));
            }
        }
        let store = MemoryStore::with_statements(store_statements);

        let filtered =
            filter_removable_reference_statements(&store, &uris, "Q23", to_remove, &BTreeSet::new(), 3)
                .await
                .unwrap();
        assert_eq!(filtered.retained.len(), 4);
        assert_eq!(filtered.removable.len(), 3);
    }
}
