//! Shared helpers for repository tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use triplesync_core::{vocab, EntityUris, Literal, Statement, Term};
use triplesync_store::results::parse_select;
use triplesync_store::{AskQuery, MemoryStore, Row, SelectQuery, StoreError, StoreResult, TripleStore, Update};
use triplesync_sync::RdfRepository;

pub const REFERENCE_HASH: &str = "e36b7373814a0b74caa84a5fc2b1e3297060ab0f";

pub fn repository() -> (Arc<MemoryStore>, RdfRepository) {
    let store = Arc::new(MemoryStore::new());
    let repo = RdfRepository::new(store.clone(), EntityUris::default());
    (store, repo)
}

pub fn uris() -> EntityUris {
    EntityUris::default()
}

pub fn entity(id: &str) -> Term {
    uris().entity_term(id).unwrap()
}

/// Expand a bare id (`Q23`, `P509`) to an entity IRI; leave full IRIs alone.
pub fn expand(id: &str) -> String {
    if id.contains("://") {
        id.to_string()
    } else {
        uris().entity(id).unwrap()
    }
}

pub fn statement(subject: &str, predicate: &str, object: impl Into<Term>) -> Statement {
    Statement::new(Term::iri(expand(subject)), Term::iri(expand(predicate)), object)
}

pub fn link(subject: &str, predicate: &str, object: &str) -> Statement {
    statement(subject, predicate, Term::iri(expand(object)))
}

/// The triples describing one site link.
pub fn site_link(entity_id: &str, page: &str, language: &str) -> Vec<Statement> {
    vec![
        link(page, vocab::rdf::TYPE, vocab::schema::ARTICLE),
        statement(page, vocab::schema::IN_LANGUAGE, Literal::simple(language)),
        link(page, vocab::schema::ABOUT, entity_id),
    ]
}

/// An entity statement with its statement node, value and rank.
pub fn expanded_statement(
    statement_id: &str,
    subject: &str,
    predicate: &str,
    value: &str,
    rank: &str,
) -> Vec<Statement> {
    let uris = uris();
    let statement_uri = uris.statement(subject, statement_id).unwrap();
    vec![
        link(subject, predicate, &statement_uri),
        link(&statement_uri, &uris.value_predicate(predicate).unwrap(), value),
        link(&statement_uri, vocab::ontology::RANK, rank),
    ]
}

/// Same as [`expanded_statement`] plus a `prov:wasDerivedFrom` pointer.
pub fn referenced_statement(
    statement_id: &str,
    subject: &str,
    predicate: &str,
    value: &str,
    rank: &str,
    reference: &str,
) -> Vec<Statement> {
    let mut statements = expanded_statement(statement_id, subject, predicate, value, rank);
    let statement_uri = statements[1].subject.clone();
    statements.push(Statement::new(
        statement_uri,
        Term::iri(vocab::prov::WAS_DERIVED_FROM),
        Term::iri(reference),
    ));
    statements
}

pub fn reference_uri() -> String {
    format!("{}{}", uris().reference_namespace(), REFERENCE_HASH)
}

pub fn version(entity_id: &str, revision: i64) -> Statement {
    statement(entity_id, vocab::schema::VERSION, Literal::integer(revision))
}

/// Which store operation a [`FailingStore`] breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    /// The n-th select call (0-based).
    Select(usize),
    Update,
}

/// Wraps a [`MemoryStore`] and makes one operation fail as unreachable.
pub struct FailingStore {
    pub inner: Arc<MemoryStore>,
    fail_on: FailOn,
    selects: AtomicUsize,
}

impl FailingStore {
    pub fn new(inner: Arc<MemoryStore>, fail_on: FailOn) -> Self {
        Self {
            inner,
            fail_on,
            selects: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TripleStore for FailingStore {
    async fn select(&self, query: &SelectQuery) -> StoreResult<Vec<Row>> {
        let n = self.selects.fetch_add(1, Ordering::SeqCst);
        if self.fail_on == FailOn::Select(n) {
            return Err(StoreError::Unreachable("connection refused".into()));
        }
        self.inner.select(query).await
    }

    async fn ask(&self, query: &AskQuery) -> StoreResult<bool> {
        self.inner.ask(query).await
    }

    async fn update(&self, update: &Update) -> StoreResult<()> {
        if self.fail_on == FailOn::Update {
            return Err(StoreError::Unreachable("connection reset".into()));
        }
        self.inner.update(update).await
    }
}

/// Wraps a [`MemoryStore`] and sends select results through the SPARQL JSON
/// results format, the way a remote endpoint returns them. Simple literals
/// come back typed `xsd:string`, as RDF 1.1 stores report them.
pub struct JsonStore {
    pub inner: Arc<MemoryStore>,
}

impl JsonStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self { inner }
    }
}

fn binding(term: &Term) -> Value {
    match term {
        Term::Iri(iri) => json!({"type": "uri", "value": iri}),
        Term::Blank(label) => json!({"type": "bnode", "value": label}),
        Term::Literal(Literal::Simple(value)) => {
            json!({"type": "literal", "value": value, "datatype": vocab::xsd::STRING})
        }
        Term::Literal(Literal::LangString { value, lang }) => {
            json!({"type": "literal", "value": value, "xml:lang": lang})
        }
        Term::Literal(Literal::Typed { value, datatype }) => {
            json!({"type": "literal", "value": value, "datatype": datatype})
        }
    }
}

#[async_trait]
impl TripleStore for JsonStore {
    async fn select(&self, query: &SelectQuery) -> StoreResult<Vec<Row>> {
        let rows = self.inner.select(query).await?;
        let bindings: Vec<Value> = rows
            .iter()
            .map(|row| {
                let values: Map<String, Value> =
                    row.iter().map(|(name, term)| (name.to_string(), binding(term))).collect();
                Value::Object(values)
            })
            .collect();
        let body = json!({"head": {"vars": []}, "results": {"bindings": bindings}});
        parse_select(&body.to_string())
    }

    async fn ask(&self, query: &AskQuery) -> StoreResult<bool> {
        self.inner.ask(query).await
    }

    async fn update(&self, update: &Update) -> StoreResult<()> {
        self.inner.update(update).await
    }
}
