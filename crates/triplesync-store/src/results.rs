//! SPARQL 1.1 query results JSON format.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use triplesync_core::{Literal, Term};

use crate::error::{StoreError, StoreResult};
use crate::store::Row;

/// Top-level results document. `ASK` responses carry `boolean` instead of
/// `results`.
#[derive(Debug, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub head: SparqlHead,
    pub results: Option<SparqlResultSet>,
    pub boolean: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SparqlHead {
    #[serde(default)]
    pub vars: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SparqlResultSet {
    pub bindings: Vec<HashMap<String, SparqlValue>>,
}

/// One bound value.
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlValue {
    #[serde(rename = "type")]
    pub value_type: String,
    pub value: String,
    pub datatype: Option<String>,
    #[serde(rename = "xml:lang")]
    pub lang: Option<String>,
}

impl SparqlValue {
    pub fn into_term(self) -> StoreResult<Term> {
        match self.value_type.as_str() {
            "uri" => Ok(Term::Iri(self.value)),
            "bnode" => Ok(Term::Blank(self.value)),
            "literal" | "typed-literal" => Ok(Term::Literal(match (self.lang, self.datatype) {
                (Some(lang), _) => Literal::lang(self.value, lang),
                (None, Some(datatype)) => Literal::typed(self.value, datatype),
                (None, None) => Literal::simple(self.value),
            })),
            other => Err(StoreError::protocol(format!("unknown binding type '{}'", other))),
        }
    }
}

/// Parse a `SELECT` response body.
pub fn parse_select(body: &str) -> StoreResult<Vec<Row>> {
    let results: SparqlResults = serde_json::from_str(body)?;
    let set = results
        .results
        .ok_or_else(|| StoreError::protocol("response has no 'results' member"))?;

    set.bindings
        .into_iter()
        .map(|binding| {
            let values = binding
                .into_iter()
                .map(|(name, value)| Ok((name, value.into_term()?)))
                .collect::<StoreResult<BTreeMap<String, Term>>>()?;
            Ok(Row::from(values))
        })
        .collect()
}

/// Parse an `ASK` response body.
pub fn parse_ask(body: &str) -> StoreResult<bool> {
    let results: SparqlResults = serde_json::from_str(body)?;
    results
        .boolean
        .ok_or_else(|| StoreError::protocol("response has no 'boolean' member"))
}
