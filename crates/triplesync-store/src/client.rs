//! SPARQL 1.1 protocol client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use tracing::debug;
use triplesync_core::StoreSettings;

use crate::error::{StoreError, StoreResult};
use crate::query::{AskQuery, SelectQuery, Update};
use crate::results;
use crate::sparql;
use crate::store::{Row, TripleStore};

const RESULTS_JSON: &str = "application/sparql-results+json";

/// Client for a remote SPARQL endpoint.
#[derive(Clone)]
pub struct SparqlClient {
    query_endpoint: String,
    update_endpoint: String,
    client: reqwest::Client,
}

impl SparqlClient {
    /// Create a client from store settings.
    pub fn new(settings: &StoreSettings) -> StoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| StoreError::Unreachable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            query_endpoint: settings.query_endpoint.clone(),
            update_endpoint: settings.update_endpoint().to_string(),
            client,
        })
    }

    pub fn query_endpoint(&self) -> &str {
        &self.query_endpoint
    }

    async fn post_query(&self, query: &str) -> StoreResult<String> {
        debug!(endpoint = %self.query_endpoint, query, "Sending SPARQL query");

        let response = self
            .client
            .post(&self.query_endpoint)
            .header(ACCEPT, RESULTS_JSON)
            .form(&[("query", query)])
            .send()
            .await?;

        read_body(response).await
    }

    /// Execute a raw `SELECT` query.
    pub async fn select_text(&self, query: &str) -> StoreResult<Vec<Row>> {
        let body = self.post_query(query).await?;
        results::parse_select(&body)
    }

    /// Execute a raw `ASK` query.
    pub async fn ask_text(&self, query: &str) -> StoreResult<bool> {
        let body = self.post_query(query).await?;
        results::parse_ask(&body)
    }

    /// Execute a raw update request.
    pub async fn update_text(&self, update: &str) -> StoreResult<()> {
        debug!(endpoint = %self.update_endpoint, bytes = update.len(), "Sending SPARQL update");

        let response = self
            .client
            .post(&self.update_endpoint)
            .form(&[("update", update)])
            .send()
            .await?;

        read_body(response).await.map(|_| ())
    }

    /// Check whether the endpoint answers a trivial query.
    pub async fn health_check(&self) -> bool {
        self.ask_text("ASK { ?s ?p ?o }").await.is_ok()
    }
}

async fn read_body(response: reqwest::Response) -> StoreResult<String> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        return Ok(body);
    }
    if status == StatusCode::BAD_REQUEST {
        return Err(StoreError::MalformedQuery(body));
    }
    Err(StoreError::Rejected {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl TripleStore for SparqlClient {
    async fn select(&self, query: &SelectQuery) -> StoreResult<Vec<Row>> {
        let text = sparql::render_select(query)?;
        self.select_text(&text).await
    }

    async fn ask(&self, query: &AskQuery) -> StoreResult<bool> {
        let text = sparql::render_ask(query)?;
        self.ask_text(&text).await
    }

    async fn update(&self, update: &Update) -> StoreResult<()> {
        let text = sparql::render_update(update)?;
        if text.is_empty() {
            return Ok(());
        }
        self.update_text(&text).await
    }
}
