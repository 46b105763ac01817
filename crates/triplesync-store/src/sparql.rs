//! Rendering of typed queries and updates to SPARQL 1.1 text.

use triplesync_core::model::quote;
use triplesync_core::{Literal, Statement, Term};

use crate::error::{StoreError, StoreResult};
use crate::query::{AskQuery, Filter, PatternTerm, SelectQuery, TriplePattern, Update};

/// Render a term in SPARQL / N-Triples syntax.
pub fn render_term(term: &Term) -> StoreResult<String> {
    match term {
        Term::Iri(iri) => {
            if iri.chars().any(|c| matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\') || c <= ' ') {
                return Err(StoreError::malformed(format!("invalid IRI: {}", iri)));
            }
            Ok(format!("<{}>", iri))
        }
        Term::Blank(label) => Ok(format!("_:{}", label)),
        Term::Literal(literal) => Ok(render_literal(literal)),
    }
}

fn render_literal(literal: &Literal) -> String {
    match literal {
        Literal::Simple(value) => quote(value),
        Literal::LangString { value, lang } => format!("{}@{}", quote(value), lang),
        Literal::Typed { value, datatype } => format!("{}^^<{}>", quote(value), datatype),
    }
}

fn render_position(position: &PatternTerm) -> StoreResult<String> {
    match position {
        PatternTerm::Var(v) => Ok(v.to_string()),
        PatternTerm::Term(t) => render_term(t),
    }
}

fn render_pattern(pattern: &TriplePattern) -> StoreResult<String> {
    Ok(format!(
        "{} {} {} .",
        render_position(&pattern.subject)?,
        render_position(&pattern.predicate)?,
        render_position(&pattern.object)?
    ))
}

/// Render a filter expression (without the surrounding `FILTER`).
pub fn render_filter(filter: &Filter) -> StoreResult<String> {
    Ok(match filter {
        Filter::StrStarts(v, prefix) => format!("STRSTARTS(STR({}), {})", v, quote(prefix)),
        Filter::In(v, terms) => {
            let rendered = terms.iter().map(render_term).collect::<StoreResult<Vec<_>>>()?;
            format!("{} IN ({})", v, rendered.join(", "))
        }
        Filter::Not(inner) => format!("!({})", render_filter(inner)?),
        Filter::GreaterOrEqual(v, n) => format!("{} >= {}", v, n),
        Filter::And(parts) => {
            if parts.is_empty() {
                return Ok("true".to_string());
            }
            let rendered = parts.iter().map(render_filter).collect::<StoreResult<Vec<_>>>()?;
            format!("({})", rendered.join(" && "))
        }
    })
}

fn render_where(patterns: &[TriplePattern], filters: &[Filter]) -> StoreResult<String> {
    let mut body = String::from("WHERE {\n");
    for pattern in patterns {
        body.push_str("  ");
        body.push_str(&render_pattern(pattern)?);
        body.push('\n');
    }
    for filter in filters {
        body.push_str(&format!("  FILTER({})\n", render_filter(filter)?));
    }
    body.push('}');
    Ok(body)
}

pub fn render_select(query: &SelectQuery) -> StoreResult<String> {
    query.validate()?;

    let mut out = String::from("SELECT ");
    if query.distinct {
        out.push_str("DISTINCT ");
    }
    if query.projection.is_empty() {
        out.push('*');
    } else {
        let vars: Vec<String> = query.projection.iter().map(|v| v.to_string()).collect();
        out.push_str(&vars.join(" "));
    }
    out.push('\n');
    out.push_str(&render_where(&query.patterns, &query.filters)?);
    if !query.order_by.is_empty() {
        let vars: Vec<String> = query.order_by.iter().map(|v| v.to_string()).collect();
        out.push_str(&format!("\nORDER BY {}", vars.join(" ")));
    }
    if let Some(limit) = query.limit {
        out.push_str(&format!("\nLIMIT {}", limit));
    }
    Ok(out)
}

pub fn render_ask(query: &AskQuery) -> StoreResult<String> {
    query.validate()?;
    Ok(format!("ASK\n{}", render_where(&query.patterns, &query.filters)?))
}

fn render_data_block(keyword: &str, statements: &[Statement]) -> StoreResult<String> {
    let mut out = format!("{} DATA {{\n", keyword);
    for s in statements {
        out.push_str(&format!(
            "  {} {} {} .\n",
            render_term(&s.subject)?,
            render_term(&s.predicate)?,
            render_term(&s.object)?
        ));
    }
    out.push('}');
    Ok(out)
}

/// Render an update as `DELETE DATA` followed by `INSERT DATA` in one
/// request. Returns an empty string for an empty update.
pub fn render_update(update: &Update) -> StoreResult<String> {
    update.validate()?;

    let mut operations = Vec::new();
    if !update.delete.is_empty() {
        operations.push(render_data_block("DELETE", &update.delete)?);
    }
    if !update.insert.is_empty() {
        operations.push(render_data_block("INSERT", &update.insert)?);
    }
    Ok(operations.join(";\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::var;

    #[test]
    fn test_render_select() {
        let query = SelectQuery::new()
            .select(&["p", "o"])
            .pattern(Term::iri("http://www.wikidata.org/entity/Q23"), var("p"), var("o"))
            .order_by("o")
            .limit(10);
        assert_eq!(
            render_select(&query).unwrap(),
            "SELECT ?p ?o\nWHERE {\n  <http://www.wikidata.org/entity/Q23> ?p ?o .\n}\nORDER BY ?o\nLIMIT 10"
        );
    }

    #[test]
    fn test_render_filters() {
        let filter = Filter::And(vec![
            Filter::In(var("ref"), vec![Term::iri("http://r/1"), Term::iri("http://r/2")]),
            Filter::not(Filter::StrStarts(var("st"), "http://s/Q23-".into())),
        ]);
        assert_eq!(
            render_filter(&filter).unwrap(),
            r#"(?ref IN (<http://r/1>, <http://r/2>) && !(STRSTARTS(STR(?st), "http://s/Q23-")))"#
        );
        assert_eq!(render_filter(&Filter::GreaterOrEqual(var("v"), 10)).unwrap(), "?v >= 10");
    }

    #[test]
    fn test_render_update_escapes_literals() {
        let update = Update::new(
            vec![Statement::new(
                Term::iri("http://e/Q42"),
                Term::iri("http://e/P396"),
                Literal::simple(r"IT\ICCU\RAVV\034417"),
            )],
            vec![Statement::new(
                Term::iri("http://e/Q23"),
                Term::iri("http://label"),
                Literal::lang(r#"George "Cherry Tree" Washington"#, "en"),
            )],
        );
        let rendered = render_update(&update).unwrap();
        assert_eq!(
            rendered,
            concat!(
                "DELETE DATA {\n  <http://e/Q42> <http://e/P396> \"IT\\\\ICCU\\\\RAVV\\\\034417\" .\n};\n",
                "INSERT DATA {\n  <http://e/Q23> <http://label> \"George \\\"Cherry Tree\\\" Washington\"@en .\n}"
            )
        );
    }

    #[test]
    fn test_render_empty_update() {
        assert_eq!(render_update(&Update::default()).unwrap(), "");
    }

    #[test]
    fn test_rejects_bad_iri() {
        assert!(render_term(&Term::iri("http://e/Q23> . <x")).is_err());
        assert!(render_term(&Term::iri("http://e/a b")).is_err());
    }
}
