//! Well-known vocabulary IRIs used by the entity model.

/// RDF namespace.
pub mod rdf {
    pub const NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

/// RDFS namespace.
pub mod rdfs {
    pub const NAMESPACE: &str = "http://www.w3.org/2000/01/rdf-schema#";
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
}

/// XML Schema datatypes.
pub mod xsd {
    pub const NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const INT: &str = "http://www.w3.org/2001/XMLSchema#int";
    pub const LONG: &str = "http://www.w3.org/2001/XMLSchema#long";
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
}

/// schema.org terms used for site links and revision markers.
pub mod schema {
    pub const NAMESPACE: &str = "http://schema.org/";
    pub const ABOUT: &str = "http://schema.org/about";
    pub const ARTICLE: &str = "http://schema.org/Article";
    pub const IN_LANGUAGE: &str = "http://schema.org/inLanguage";
    /// Revision marker predicate.
    pub const VERSION: &str = "http://schema.org/version";
}

/// W3C provenance ontology.
pub mod prov {
    pub const NAMESPACE: &str = "http://www.w3.org/ns/prov#";
    pub const WAS_DERIVED_FROM: &str = "http://www.w3.org/ns/prov#wasDerivedFrom";
}

/// Wikibase ontology (statement ranks).
pub mod ontology {
    pub const NAMESPACE: &str = "http://wikiba.se/ontology#";
    pub const RANK: &str = "http://wikiba.se/ontology#rank";
    pub const NORMAL_RANK: &str = "http://wikiba.se/ontology#NormalRank";
    pub const DEPRECATED_RANK: &str = "http://wikiba.se/ontology#DeprecatedRank";
}

/// Integer-valued datatypes accepted for numeric comparison.
pub const INTEGER_DATATYPES: &[&str] = &[xsd::INTEGER, xsd::INT, xsd::LONG];
