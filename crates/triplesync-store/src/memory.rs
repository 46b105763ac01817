//! In-process triple store.
//!
//! Evaluates the typed query subset directly over a sorted set of
//! statements. Updates hold the write lock for their whole duration, so
//! readers never observe a half-applied update.

use std::collections::{BTreeSet, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use triplesync_core::{Statement, Term};

use crate::error::StoreResult;
use crate::query::{AskQuery, Filter, PatternTerm, SelectQuery, TriplePattern, Update};
use crate::store::{Row, TripleStore};

/// Triple store held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    statements: RwLock<BTreeSet<Statement>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_statements(statements: impl IntoIterator<Item = Statement>) -> Self {
        Self {
            statements: RwLock::new(statements.into_iter().collect()),
        }
    }

    pub async fn len(&self) -> usize {
        self.statements.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.statements.read().await.is_empty()
    }

    pub async fn contains(&self, statement: &Statement) -> bool {
        self.statements.read().await.contains(statement)
    }

    /// Copy of every stored statement, in sorted order.
    pub async fn snapshot(&self) -> Vec<Statement> {
        self.statements.read().await.iter().cloned().collect()
    }
}

#[async_trait]
impl TripleStore for MemoryStore {
    async fn select(&self, query: &SelectQuery) -> StoreResult<Vec<Row>> {
        query.validate()?;
        let data = self.statements.read().await;
        let mut rows = solve(&data, &query.patterns, &query.filters);
        drop(data);

        if !query.order_by.is_empty() {
            rows.sort_by(|a, b| {
                query
                    .order_by
                    .iter()
                    .map(|v| a.get(v.name()).cmp(&b.get(v.name())))
                    .find(|o| o.is_ne())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        if !query.projection.is_empty() {
            for row in &mut rows {
                row.retain(|name| query.projection.iter().any(|v| v.name() == name));
            }
        }
        if query.distinct {
            let mut seen = HashSet::new();
            rows.retain(|row| seen.insert(row.clone()));
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        debug!(rows = rows.len(), "Evaluated select against memory store");
        Ok(rows)
    }

    async fn ask(&self, query: &AskQuery) -> StoreResult<bool> {
        query.validate()?;
        let data = self.statements.read().await;
        Ok(!solve(&data, &query.patterns, &query.filters).is_empty())
    }

    async fn update(&self, update: &Update) -> StoreResult<()> {
        update.validate()?;
        let mut data = self.statements.write().await;
        for statement in &update.delete {
            data.remove(statement);
        }
        for statement in &update.insert {
            data.insert(statement.clone());
        }
        debug!(deleted = update.delete.len(), inserted = update.insert.len(), total = data.len(), "Applied update to memory store");
        Ok(())
    }
}

/// Nested-loop join of the patterns, then filtering.
fn solve(data: &BTreeSet<Statement>, patterns: &[TriplePattern], filters: &[Filter]) -> Vec<Row> {
    let mut solutions = vec![Row::default()];

    for pattern in patterns {
        let mut next = Vec::new();
        for row in &solutions {
            for statement in data {
                if let Some(extended) = extend(row, pattern, statement) {
                    next.push(extended);
                }
            }
        }
        solutions = next;
        if solutions.is_empty() {
            break;
        }
    }

    solutions
        .into_iter()
        .filter(|row| filters.iter().all(|f| evaluate(f, row) == Some(true)))
        .collect()
}

fn extend(row: &Row, pattern: &TriplePattern, statement: &Statement) -> Option<Row> {
    let mut extended = row.clone();
    let terms = [&statement.subject, &statement.predicate, &statement.object];

    for (position, term) in pattern.positions().into_iter().zip(terms) {
        match position {
            PatternTerm::Term(expected) => {
                if expected != term {
                    return None;
                }
            }
            PatternTerm::Var(v) => match extended.get(v.name()) {
                Some(bound) if bound != term => return None,
                Some(_) => {}
                None => extended.insert(v.name(), term.clone()),
            },
        }
    }
    Some(extended)
}

/// Three-valued filter evaluation; `None` is a SPARQL evaluation error.
fn evaluate(filter: &Filter, row: &Row) -> Option<bool> {
    match filter {
        Filter::StrStarts(v, prefix) => {
            let term = row.get(v.name())?;
            Some(term.str_value().starts_with(prefix.as_str()))
        }
        Filter::In(v, terms) => {
            let term = row.get(v.name())?;
            Some(terms.contains(term))
        }
        Filter::Not(inner) => evaluate(inner, row).map(|b| !b),
        Filter::GreaterOrEqual(v, n) => {
            let value = row.get(v.name()).and_then(Term::as_literal)?.as_integer()?;
            Some(value >= *n)
        }
        Filter::And(parts) => {
            let mut result = Some(true);
            for part in parts {
                match evaluate(part, row) {
                    Some(false) => return Some(false),
                    Some(true) => {}
                    None => result = None,
                }
            }
            result
        }
    }
}
