//! The store boundary.

use std::collections::BTreeMap;

use async_trait::async_trait;
use triplesync_core::Term;

use crate::error::{StoreError, StoreResult};
use crate::query::{AskQuery, SelectQuery, Update};

/// One solution: variable name to bound term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Row(BTreeMap<String, Term>);

impl Row {
    pub fn get(&self, name: &str) -> Option<&Term> {
        self.0.get(name)
    }

    /// The bound term, or a protocol error if the store left it unbound.
    pub fn require(&self, name: &str) -> StoreResult<&Term> {
        self.get(name)
            .ok_or_else(|| StoreError::protocol(format!("variable ?{} not bound in result row", name)))
    }

    pub fn iri(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Term::as_iri)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn insert(&mut self, name: &str, term: Term) {
        self.0.insert(name.to_string(), term);
    }

    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.0.retain(|k, _| keep(k));
    }
}

impl From<BTreeMap<String, Term>> for Row {
    fn from(values: BTreeMap<String, Term>) -> Self {
        Self(values)
    }
}

/// A triple store reachable through read queries and atomic updates.
///
/// Implementations must apply an [`Update`]'s deletions and insertions as
/// one unit: readers observe either the state before or the state after.
#[async_trait]
pub trait TripleStore: Send + Sync {
    async fn select(&self, query: &SelectQuery) -> StoreResult<Vec<Row>>;

    async fn ask(&self, query: &AskQuery) -> StoreResult<bool>;

    async fn update(&self, update: &Update) -> StoreResult<()>;
}
