//! Typed read queries and updates.
//!
//! A small subset of SPARQL: basic graph patterns, a handful of filter
//! functions, `DISTINCT`, `ORDER BY` and `LIMIT`. Enough for everything
//! the sync engine asks and for ad hoc verification lookups.

use std::collections::BTreeSet;
use std::fmt;

use triplesync_core::{Statement, Term};

use crate::error::{StoreError, StoreResult};

/// A query variable (`?name`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(String);

impl Var {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

/// Shorthand for [`Var::new`].
pub fn var(name: &str) -> Var {
    Var::new(name)
}

/// A position in a triple pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternTerm {
    Var(Var),
    Term(Term),
}

impl From<Var> for PatternTerm {
    fn from(v: Var) -> Self {
        Self::Var(v)
    }
}

impl From<&Var> for PatternTerm {
    fn from(v: &Var) -> Self {
        Self::Var(v.clone())
    }
}

impl From<Term> for PatternTerm {
    fn from(t: Term) -> Self {
        Self::Term(t)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriplePattern {
    pub subject: PatternTerm,
    pub predicate: PatternTerm,
    pub object: PatternTerm,
}

impl TriplePattern {
    pub fn new(
        subject: impl Into<PatternTerm>,
        predicate: impl Into<PatternTerm>,
        object: impl Into<PatternTerm>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    pub fn positions(&self) -> [&PatternTerm; 3] {
        [&self.subject, &self.predicate, &self.object]
    }

    fn vars(&self) -> impl Iterator<Item = &Var> {
        self.positions().into_iter().filter_map(|p| match p {
            PatternTerm::Var(v) => Some(v),
            PatternTerm::Term(_) => None,
        })
    }
}

/// Filter expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// `STRSTARTS(STR(?v), "prefix")`
    StrStarts(Var, String),
    /// `?v IN (t1, t2, ...)`
    In(Var, Vec<Term>),
    /// `!(expr)`
    Not(Box<Filter>),
    /// `?v >= n` on integer literals.
    GreaterOrEqual(Var, i64),
    /// Conjunction.
    And(Vec<Filter>),
}

impl Filter {
    pub fn not(inner: Filter) -> Self {
        Self::Not(Box::new(inner))
    }

    fn collect_vars<'a>(&'a self, out: &mut Vec<&'a Var>) {
        match self {
            Self::StrStarts(v, _) | Self::In(v, _) | Self::GreaterOrEqual(v, _) => out.push(v),
            Self::Not(inner) => inner.collect_vars(out),
            Self::And(parts) => parts.iter().for_each(|p| p.collect_vars(out)),
        }
    }
}

/// `SELECT` query. An empty projection selects every bound variable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectQuery {
    pub projection: Vec<Var>,
    pub patterns: Vec<TriplePattern>,
    pub filters: Vec<Filter>,
    pub distinct: bool,
    pub order_by: Vec<Var>,
    pub limit: Option<usize>,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, vars: &[&str]) -> Self {
        self.projection = vars.iter().map(|v| Var::new(*v)).collect();
        self
    }

    pub fn pattern(
        mut self,
        subject: impl Into<PatternTerm>,
        predicate: impl Into<PatternTerm>,
        object: impl Into<PatternTerm>,
    ) -> Self {
        self.patterns.push(TriplePattern::new(subject, predicate, object));
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn order_by(mut self, name: &str) -> Self {
        self.order_by.push(Var::new(name));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Variables bound by the graph patterns.
    pub fn bound_vars(&self) -> BTreeSet<&Var> {
        self.patterns.iter().flat_map(|p| p.vars()).collect()
    }

    /// Reject queries referring to variables no pattern binds.
    pub fn validate(&self) -> StoreResult<()> {
        validate_patterns(&self.patterns, &self.filters)?;
        let bound = self.bound_vars();
        for v in self.projection.iter().chain(self.order_by.iter()) {
            if !bound.contains(v) {
                return Err(StoreError::malformed(format!("{} is not bound by any pattern", v)));
            }
        }
        Ok(())
    }
}

/// `ASK` query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AskQuery {
    pub patterns: Vec<TriplePattern>,
    pub filters: Vec<Filter>,
}

impl AskQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pattern(
        mut self,
        subject: impl Into<PatternTerm>,
        predicate: impl Into<PatternTerm>,
        object: impl Into<PatternTerm>,
    ) -> Self {
        self.patterns.push(TriplePattern::new(subject, predicate, object));
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn validate(&self) -> StoreResult<()> {
        validate_patterns(&self.patterns, &self.filters)
    }
}

fn validate_patterns(patterns: &[TriplePattern], filters: &[Filter]) -> StoreResult<()> {
    if patterns.is_empty() {
        return Err(StoreError::malformed("query has no graph pattern"));
    }
    for pattern in patterns {
        if let PatternTerm::Term(Term::Literal(_)) = pattern.subject {
            return Err(StoreError::malformed("literal in subject position"));
        }
        if let PatternTerm::Term(Term::Literal(_) | Term::Blank(_)) = pattern.predicate {
            return Err(StoreError::malformed("predicate must be an IRI or a variable"));
        }
    }

    let bound: BTreeSet<&Var> = patterns.iter().flat_map(|p| p.vars()).collect();
    let mut filter_vars = Vec::new();
    filters.iter().for_each(|f| f.collect_vars(&mut filter_vars));
    if let Some(v) = filter_vars.into_iter().find(|v| !bound.contains(v)) {
        return Err(StoreError::malformed(format!("filter refers to unbound {}", v)));
    }
    Ok(())
}

/// Atomic delete+insert request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Update {
    pub delete: Vec<Statement>,
    pub insert: Vec<Statement>,
}

impl Update {
    pub fn new(delete: impl IntoIterator<Item = Statement>, insert: impl IntoIterator<Item = Statement>) -> Self {
        Self {
            delete: delete.into_iter().collect(),
            insert: insert.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.delete.is_empty() && self.insert.is_empty()
    }

    /// Ground statements only: blank nodes cannot be addressed in a data block.
    pub fn validate(&self) -> StoreResult<()> {
        let has_blank = |s: &Statement| {
            matches!(s.subject, Term::Blank(_)) || matches!(s.object, Term::Blank(_))
        };
        if let Some(s) = self.delete.iter().chain(self.insert.iter()).find(|&s| has_blank(s)) {
            return Err(StoreError::malformed(format!("blank node in update data: {}", s)));
        }
        if let Some(s) = self
            .delete
            .iter()
            .chain(self.insert.iter())
            .find(|s| s.predicate.as_iri().is_none() || s.subject.as_literal().is_some())
        {
            return Err(StoreError::malformed(format!("ill-formed triple in update data: {}", s)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triplesync_core::Literal;

    #[test]
    fn test_validate_unbound_projection() {
        let query = SelectQuery::new().select(&["x"]).pattern(var("s"), var("p"), var("o"));
        assert!(matches!(query.validate(), Err(StoreError::MalformedQuery(_))));
    }

    #[test]
    fn test_validate_unbound_filter() {
        let query = AskQuery::new()
            .pattern(var("s"), var("p"), var("o"))
            .filter(Filter::not(Filter::StrStarts(var("x"), "http://".into())));
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_validate_empty() {
        assert!(SelectQuery::new().validate().is_err());
        assert!(AskQuery::new().validate().is_err());
    }

    #[test]
    fn test_validate_literal_subject() {
        let query = AskQuery::new().pattern(Term::from(Literal::simple("x")), var("p"), var("o"));
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_update_rejects_blank_nodes() {
        let update = Update::new(
            vec![Statement::new(Term::Blank("b0".into()), Term::iri("http://p"), Term::iri("http://o"))],
            vec![],
        );
        assert!(update.validate().is_err());
        assert!(Update::default().is_empty());
    }
}
