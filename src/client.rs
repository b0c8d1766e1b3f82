//! Index client contract and the HTTP push API implementation.
//!
//! The orchestrator only depends on the [`IndexClient`] trait: upsert a batch
//! of documents stamped with the run's ordering token, and delete every
//! document of a source whose last-seen token is older. Both operations are
//! idempotent at the record level on the server side; neither is retried
//! here — a transport or authorization failure aborts the run.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};

use crate::document::PushDocument;
use crate::token::OrderingToken;

/// Remote document index collaborator.
///
/// # Lifecycle
///
/// 1. The orchestrator owns one client for the duration of a run.
/// 2. [`upsert_documents`](IndexClient::upsert_documents) is called once per
///    flushed batch, always with the run's token.
/// 3. After every upsert has succeeded,
///    [`delete_documents_older_than`](IndexClient::delete_documents_older_than)
///    is called exactly once with the same token.
#[async_trait]
pub trait IndexClient: Send + Sync {
    /// Adds or updates `batch` in `source_id`, stamping every document with
    /// `token`. Re-upserting the same document id with the same token is safe.
    async fn upsert_documents(
        &self,
        source_id: &str,
        batch: &[PushDocument],
        token: OrderingToken,
    ) -> Result<()>;

    /// Deletes every document of `source_id` whose last-seen ordering token
    /// is older than `token`. `cutoff` optionally restricts the purge to
    /// documents not modified since that instant.
    async fn delete_documents_older_than(
        &self,
        source_id: &str,
        token: OrderingToken,
        cutoff: Option<DateTime<Utc>>,
    ) -> Result<()>;
}

/// Thin HTTP client for the hosted push API.
///
/// Authenticates with a bearer API key. Does not retry; status handling is
/// surface-level only (non-2xx becomes an error with the response body).
pub struct PushApiClient {
    http: reqwest::Client,
    push_url: String,
    organization_id: String,
}

impl PushApiClient {
    /// `push_url` is the API base (for example the value resolved from the
    /// endpoint table, or a self-hosted override).
    pub fn new(
        push_url: impl Into<String>,
        organization_id: impl Into<String>,
        api_key: &str,
    ) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        let mut auth =
            reqwest::header::HeaderValue::from_str(&format!("Bearer {}", api_key))
                .context("API key contains characters not allowed in a header")?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("failed to build HTTP client")?;

        let push_url: String = push_url.into();
        Ok(Self {
            http,
            push_url: push_url.trim_end_matches('/').to_string(),
            organization_id: organization_id.into(),
        })
    }

    fn documents_url(&self, source_id: &str, tail: &str) -> String {
        format!(
            "{}/organizations/{}/sources/{}/documents{}",
            self.push_url, self.organization_id, source_id, tail
        )
    }
}

#[async_trait]
impl IndexClient for PushApiClient {
    async fn upsert_documents(
        &self,
        source_id: &str,
        batch: &[PushDocument],
        token: OrderingToken,
    ) -> Result<()> {
        let url = self.documents_url(source_id, "/batch");
        let body = serde_json::json!({ "addOrUpdate": batch });

        let response = self
            .http
            .put(&url)
            .query(&[("orderingId", token.to_string())])
            .json(&body)
            .send()
            .await
            .with_context(|| format!("document upsert request to {} failed", url))?;

        ensure_success(response, "document upsert").await
    }

    async fn delete_documents_older_than(
        &self,
        source_id: &str,
        token: OrderingToken,
        cutoff: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let url = self.documents_url(source_id, "/olderthan");
        let mut query = vec![("orderingId".to_string(), token.to_string())];
        if let Some(cutoff) = cutoff {
            query.push((
                "olderThan".to_string(),
                cutoff.to_rfc3339_opts(SecondsFormat::Secs, true),
            ));
        }

        let response = self
            .http
            .delete(&url)
            .query(&query)
            .send()
            .await
            .with_context(|| format!("stale-document deletion request to {} failed", url))?;

        ensure_success(response, "stale-document deletion").await
    }
}

async fn ensure_success(response: reqwest::Response, what: &str) -> Result<()> {
    if response.status().is_success() {
        return Ok(());
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    bail!(
        "{} failed (HTTP {}): {}",
        what,
        status,
        body.chars().take(500).collect::<String>()
    );
}
