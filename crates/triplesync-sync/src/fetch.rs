//! Retrieval of the subgraph an entity currently owns in the store.
//!
//! The subgraph is:
//! - `<entity> ?p ?o`
//! - site links: `?page schema:about <entity> . ?page ?p ?o`
//! - statement nodes: every triple whose subject starts with the entity's
//!   statement prefix
//! - references reached from those statement nodes via `prov:wasDerivedFrom`
//!
//! Reference content is included even though reference nodes are shared, so
//! an unchanged reference diffs as unchanged.
//!
//! Triples with a blank node in subject or object position are left out.
//! Some other writer put them there; they cannot be named in a `DELETE DATA`
//! block, so the sync leaves them alone.

use std::collections::BTreeSet;

use tracing::{debug, warn};
use triplesync_core::{vocab, EntityUris, Statement, Term};
use triplesync_store::{var, Filter, Row, SelectQuery, StoreResult, TripleStore};

use crate::error::{RepoResult, SyncError, SyncStep};

/// Fetch everything `entity_id` currently owns.
pub async fn current_subgraph(
    store: &dyn TripleStore,
    uris: &EntityUris,
    entity_id: &str,
) -> RepoResult<BTreeSet<Statement>> {
    let entity = uris.entity_term(entity_id)?;
    let statement_prefix = uris.statement_prefix(entity_id)?;

    let direct = SelectQuery::new()
        .select(&["p", "o"])
        .pattern(entity.clone(), var("p"), var("o"));

    let site_links = SelectQuery::new()
        .select(&["s", "p", "o"])
        .pattern(var("s"), Term::iri(vocab::schema::ABOUT), entity.clone())
        .pattern(var("s"), var("p"), var("o"));

    let statements = SelectQuery::new()
        .select(&["s", "p", "o"])
        .pattern(var("s"), var("p"), var("o"))
        .filter(Filter::StrStarts(var("s"), statement_prefix.clone()));

    let references = SelectQuery::new()
        .select(&["s", "p", "o"])
        .distinct()
        .pattern(var("st"), Term::iri(vocab::prov::WAS_DERIVED_FROM), var("s"))
        .pattern(var("s"), var("p"), var("o"))
        .filter(Filter::StrStarts(var("st"), statement_prefix));

    let (direct, site_links, statements, references) = futures::try_join!(
        store.select(&direct),
        store.select(&site_links),
        store.select(&statements),
        store.select(&references),
    )
    .map_err(|e| SyncError::from_store(entity_id, SyncStep::Fetch, e))?;

    let mut subgraph = BTreeSet::new();
    let to_statements = |rows: Vec<Row>, subject: Option<&Term>| -> StoreResult<Vec<Statement>> {
        rows.into_iter()
            .map(|row| {
                let s = match subject {
                    Some(s) => s.clone(),
                    None => row.require("s")?.clone(),
                };
                Ok(Statement::new(s, row.require("p")?.clone(), row.require("o")?.clone()))
            })
            .collect()
    };

    let counts = [direct.len(), site_links.len(), statements.len(), references.len()];
    for (rows, subject) in [
        (direct, Some(&entity)),
        (site_links, None),
        (statements, None),
        (references, None),
    ] {
        let batch = to_statements(rows, subject).map_err(|e| SyncError::from_store(entity_id, SyncStep::Fetch, e))?;
        subgraph.extend(batch);
    }

    let with_blank = subgraph.len();
    subgraph.retain(|s| !matches!(s.subject, Term::Blank(_)) && !matches!(s.object, Term::Blank(_)));
    let skipped = with_blank - subgraph.len();
    if skipped > 0 {
        warn!(entity = entity_id, skipped, "Ignoring stored triples with blank nodes");
    }

    debug!(
        entity = entity_id,
        direct = counts[0],
        site_links = counts[1],
        statement_nodes = counts[2],
        references = counts[3],
        total = subgraph.len(),
        "Fetched current subgraph"
    );

    Ok(subgraph)
}
