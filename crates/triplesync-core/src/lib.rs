//! Triplesync Core Library
//!
//! Statement model, namespace scheme and configuration shared by the
//! store access layer and the entity sync engine.

pub mod config;
pub mod error;
pub mod model;
pub mod uris;
pub mod vocab;

pub use config::{NamespaceSettings, StoreSettings, SyncConfig, SyncSettings};
pub use error::{CoreError, CoreResult};
pub use model::{Literal, Statement, Term};
pub use uris::EntityUris;
