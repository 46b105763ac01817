//! # Triplesync Store
//!
//! Access to the triple store backing the entity sync engine.
//!
//! The store is reached only through [`TripleStore`]: typed read queries
//! (`select`, `ask`) and one atomic delete+insert `update`. Two
//! implementations are provided: [`SparqlClient`] for a remote SPARQL 1.1
//! endpoint and [`MemoryStore`] for tests and dry runs.

pub mod client;
pub mod error;
pub mod memory;
pub mod query;
pub mod results;
pub mod sparql;
pub mod store;

pub use client::SparqlClient;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use query::{var, AskQuery, Filter, PatternTerm, SelectQuery, TriplePattern, Update, Var};
pub use store::{Row, TripleStore};
