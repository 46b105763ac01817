//! Namespace scheme mapping entity identifiers to subject URIs.
//!
//! Layout for a host `H`:
//! - entities: `http://H/entity/Q23`
//! - statement nodes: `http://H/entity/statement/Q23-<statementId>`
//! - value predicates: `http://H/entity/value/P19`
//! - reference nodes: `http://H/reference/<blake3 hex of content>`

use crate::error::{CoreError, CoreResult};
use crate::model::Term;
use crate::vocab;

/// Default host for the namespace scheme.
pub const DEFAULT_HOST: &str = "www.wikidata.org";

/// Deterministic URI builder for one namespace host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityUris {
    entity: String,
    statement: String,
    value: String,
    reference: String,
}

impl Default for EntityUris {
    fn default() -> Self {
        Self::new(DEFAULT_HOST)
    }
}

impl EntityUris {
    pub fn new(host: &str) -> Self {
        let host = host.trim_end_matches('/');
        let entity = format!("http://{}/entity/", host);
        Self {
            statement: format!("{}statement/", entity),
            value: format!("{}value/", entity),
            reference: format!("http://{}/reference/", host),
            entity,
        }
    }

    pub fn reference_namespace(&self) -> &str {
        &self.reference
    }

    /// Subject URI of an entity.
    pub fn entity(&self, entity_id: &str) -> CoreResult<String> {
        validate_entity_id(entity_id)?;
        Ok(format!("{}{}", self.entity, entity_id))
    }

    pub fn entity_term(&self, entity_id: &str) -> CoreResult<Term> {
        self.entity(entity_id).map(Term::Iri)
    }

    /// Property IRI in the entity namespace (`entity:P19`).
    pub fn property(&self, property_id: &str) -> CoreResult<String> {
        self.entity(property_id)
    }

    /// Statement-node predicate carrying a value (`v:P19`).
    pub fn value_predicate(&self, property_id: &str) -> CoreResult<String> {
        validate_entity_id(property_id)?;
        Ok(format!("{}{}", self.value, property_id))
    }

    /// Statement node URI for one assertion of `entity_id`.
    pub fn statement(&self, entity_id: &str, statement_id: &str) -> CoreResult<String> {
        if statement_id.is_empty() || statement_id.chars().any(|c| c.is_whitespace() || c == '>' || c == '<') {
            return Err(CoreError::InvalidStatementId(statement_id.to_string()));
        }
        Ok(format!("{}{}", self.statement_prefix(entity_id)?, statement_id))
    }

    /// Prefix shared by every statement node of `entity_id`.
    ///
    /// Includes the trailing `-` so `Q23-` never matches statements of `Q234`.
    pub fn statement_prefix(&self, entity_id: &str) -> CoreResult<String> {
        validate_entity_id(entity_id)?;
        Ok(format!("{}{}-", self.statement, entity_id))
    }

    /// Content-derived reference URI.
    ///
    /// The pairs are serialized in N-Triples term syntax and sorted before
    /// hashing, so identical content always maps to the same node.
    pub fn reference_for(&self, content: &[(Term, Term)]) -> String {
        let mut lines: Vec<String> = content
            .iter()
            .map(|(predicate, object)| format!("{} {}", predicate, object))
            .collect();
        lines.sort();
        lines.dedup();

        let mut hasher = blake3::Hasher::new();
        for line in &lines {
            hasher.update(line.as_bytes());
            hasher.update(b"\n");
        }
        format!("{}{}", self.reference, hasher.finalize().to_hex())
    }

    pub fn is_reference(&self, uri: &str) -> bool {
        uri.len() > self.reference.len() && uri.starts_with(&self.reference)
    }

    /// SPARQL prefix block for the namespaces above plus the vocabularies
    /// the entity model uses.
    pub fn prefixes(&self) -> String {
        let mut out = String::new();
        for (prefix, iri) in [
            ("entity", self.entity.as_str()),
            ("s", self.statement.as_str()),
            ("v", self.value.as_str()),
            ("ref", self.reference.as_str()),
            ("ontology", vocab::ontology::NAMESPACE),
            ("prov", vocab::prov::NAMESPACE),
            ("schema", vocab::schema::NAMESPACE),
            ("rdf", vocab::rdf::NAMESPACE),
            ("rdfs", vocab::rdfs::NAMESPACE),
            ("xsd", vocab::xsd::NAMESPACE),
        ] {
            out.push_str(&format!("PREFIX {}: <{}>\n", prefix, iri));
        }
        out
    }
}

/// Entity identifiers are one or more ASCII uppercase letters followed by
/// one or more digits (`Q23`, `P31`, `L7`).
pub fn validate_entity_id(entity_id: &str) -> CoreResult<()> {
    let digits = entity_id.trim_start_matches(|c: char| c.is_ascii_uppercase());
    let letters = entity_id.len() - digits.len();
    if letters == 0 || digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(CoreError::InvalidEntityId(entity_id.to_string()));
    }
    Ok(())
}
