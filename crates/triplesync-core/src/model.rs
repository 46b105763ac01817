//! Triple model: terms, literals and statements.
//!
//! Equality is structural on every component. Two literals are equal only
//! when they are the same kind and carry identical lexical text (and
//! language tag or datatype), so a diff between two statement sets never
//! needs to reason about value semantics.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::vocab;

/// A literal value.
///
/// `xsd:string` is never stored as `Typed`: RDF 1.1 makes it the datatype
/// of every simple literal, so it is folded into `Simple` on construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "LiteralRepr")]
pub enum Literal {
    /// Plain string without language tag.
    Simple(String),
    /// Language-tagged string.
    LangString { value: String, lang: String },
    /// Literal with an explicit datatype IRI (numbers, dates...).
    Typed { value: String, datatype: String },
}

impl Literal {
    pub fn simple(value: impl Into<String>) -> Self {
        Self::Simple(value.into())
    }

    pub fn lang(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Self::LangString {
            value: value.into(),
            lang: lang.into(),
        }
    }

    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        let datatype = datatype.into();
        if datatype == vocab::xsd::STRING {
            return Self::Simple(value.into());
        }
        Self::Typed {
            value: value.into(),
            datatype,
        }
    }

    /// An `xsd:integer` literal.
    pub fn integer(value: i64) -> Self {
        Self::typed(value.to_string(), vocab::xsd::INTEGER)
    }

    /// The lexical form.
    pub fn lexical(&self) -> &str {
        match self {
            Self::Simple(value) => value,
            Self::LangString { value, .. } => value,
            Self::Typed { value, .. } => value,
        }
    }

    /// The language tag, if any.
    pub fn language(&self) -> Option<&str> {
        match self {
            Self::LangString { lang, .. } => Some(lang),
            Self::Simple(_) | Self::Typed { .. } => None,
        }
    }

    /// The integer value of an integer-typed literal.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Typed { value, datatype } if vocab::INTEGER_DATATYPES.contains(&datatype.as_str()) => {
                value.trim().parse().ok()
            }
            _ => None,
        }
    }
}

/// Wire shape of [`Literal`]; deserialization goes through the constructors.
#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum LiteralRepr {
    Simple(String),
    LangString { value: String, lang: String },
    Typed { value: String, datatype: String },
}

impl From<LiteralRepr> for Literal {
    fn from(repr: LiteralRepr) -> Self {
        match repr {
            LiteralRepr::Simple(value) => Self::simple(value),
            LiteralRepr::LangString { value, lang } => Self::lang(value, lang),
            LiteralRepr::Typed { value, datatype } => Self::typed(value, datatype),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(value) => write!(f, "{}", quote(value)),
            Self::LangString { value, lang } => write!(f, "{}@{}", quote(value), lang),
            Self::Typed { value, datatype } => write!(f, "{}^^<{}>", quote(value), datatype),
        }
    }
}

/// An RDF term.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    Iri(String),
    /// Blank node label, as returned by a store.
    Blank(String),
    Literal(Literal),
}

impl Term {
    pub fn iri(value: impl Into<String>) -> Self {
        Self::Iri(value.into())
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    /// The string value of the term, as SPARQL `STR()` sees it.
    pub fn str_value(&self) -> &str {
        match self {
            Self::Iri(iri) => iri,
            Self::Blank(label) => label,
            Self::Literal(literal) => literal.lexical(),
        }
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{}>", iri),
            Self::Blank(label) => write!(f, "_:{}", label),
            Self::Literal(literal) => literal.fmt(f),
        }
    }
}

/// A single triple.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Statement {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Statement {
    pub fn new(subject: impl Into<Term>, predicate: impl Into<Term>, object: impl Into<Term>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Convenience for a statement whose three components are IRIs.
    pub fn iris(subject: &str, predicate: &str, object: &str) -> Self {
        Self::new(Term::iri(subject), Term::iri(predicate), Term::iri(object))
    }

    pub fn subject_iri(&self) -> Option<&str> {
        self.subject.as_iri()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// Quote a lexical form using N-Triples / SPARQL string escapes.
pub fn quote(value: &str) -> String {
    let mut result = String::with_capacity(value.len() + 2);
    result.push('"');

    for ch in value.chars() {
        match ch {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04X}", c as u32));
            }
            c => result.push(c),
        }
    }

    result.push('"');
    result
}
