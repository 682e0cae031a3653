//! Remote graph store speaking the SPARQL 1.1 protocol over HTTP.
//!
//! Queries go to the query endpoint as form-encoded `query=` posts and are
//! answered in SPARQL JSON results format; updates go to the update endpoint
//! as `update=` posts.
//!
//! # Feature Flag
//!
//! This module is only available when the `remote` feature is enabled.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{GraphStore, Solution};
use crate::error::{StoreError, StoreResult};
use crate::graph::Term;

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// Graph store behind SPARQL query and update endpoints.
pub struct SparqlHttpStore {
    client: Client,
    query_endpoint: String,
    update_endpoint: String,
    credentials: Option<(String, String)>,
}

#[derive(Debug, Deserialize)]
struct SelectResponse {
    results: SelectBindings,
}

#[derive(Debug, Deserialize)]
struct SelectBindings {
    bindings: Vec<BTreeMap<String, Term>>,
}

#[derive(Debug, Deserialize)]
struct AskResponse {
    boolean: bool,
}

impl SparqlHttpStore {
    /// Create a store for the given endpoints with a per-request timeout.
    pub fn new(
        query_endpoint: impl Into<String>,
        update_endpoint: impl Into<String>,
        request_timeout: Duration,
    ) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| StoreError::Backend {
                message: format!("failed to create HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            query_endpoint: query_endpoint.into(),
            update_endpoint: update_endpoint.into(),
            credentials: None,
        })
    }

    /// Authenticate every request with HTTP basic auth.
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    async fn post_query(&self, query: &str) -> StoreResult<reqwest::Response> {
        let mut request = self
            .client
            .post(&self.query_endpoint)
            .header(reqwest::header::ACCEPT, SPARQL_RESULTS_JSON)
            .form(&[("query", query)]);
        if let Some((user, password)) = &self.credentials {
            request = request.basic_auth(user, Some(password));
        }
        let response = request.send().await.map_err(|e| StoreError::Backend {
            message: format!("query request to {} failed: {e}", self.query_endpoint),
        })?;
        Self::check(response).await
    }

    async fn check(response: reqwest::Response) -> StoreResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Backend {
            message: format!("endpoint answered {status}: {body}"),
        })
    }
}

#[async_trait]
impl GraphStore for SparqlHttpStore {
    async fn select(&self, query: &str) -> StoreResult<Vec<Solution>> {
        let response = self.post_query(query).await?;
        let parsed: SelectResponse = response.json().await.map_err(|e| StoreError::Backend {
            message: format!("invalid SELECT response: {e}"),
        })?;
        Ok(parsed.results.bindings)
    }

    async fn ask(&self, query: &str) -> StoreResult<bool> {
        let response = self.post_query(query).await?;
        let parsed: AskResponse = response.json().await.map_err(|e| StoreError::Backend {
            message: format!("invalid ASK response: {e}"),
        })?;
        Ok(parsed.boolean)
    }

    async fn update(&self, update: &str) -> StoreResult<()> {
        let mut request = self
            .client
            .post(&self.update_endpoint)
            .form(&[("update", update)]);
        if let Some((user, password)) = &self.credentials {
            request = request.basic_auth(user, Some(password));
        }
        let response = request.send().await.map_err(|e| StoreError::Backend {
            message: format!("update request to {} failed: {e}", self.update_endpoint),
        })?;
        Self::check(response).await?;
        Ok(())
    }
}

impl std::fmt::Debug for SparqlHttpStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparqlHttpStore")
            .field("query_endpoint", &self.query_endpoint)
            .field("update_endpoint", &self.update_endpoint)
            .field("has_credentials", &self.credentials.is_some())
            .finish()
    }
}
