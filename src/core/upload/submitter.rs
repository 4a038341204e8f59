//! Batch submitter
//!
//! Turns validation outcomes into per-entry submission results by talking
//! to the Fastly ACL API. Entries fan out concurrently inside a fixed-size
//! batch; batches run strictly in sequence with a pacing delay in between
//! to stay under the upstream rate limit.

use crate::config::UploadConfig;
use crate::core::fastly::FastlyClient;
use crate::core::upload::validator::{EntrySpec, ValidationOutcome};
use futures::future::join_all;
use serde::{Serialize, Serializer};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Per-entry outcome status: the upstream HTTP status code, or one of the
/// literals `"invalid"` / `"error"` for entries that never completed an
/// upstream exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// Upstream responded; carries its HTTP status code
    Upstream(u16),
    /// Entry failed validation; no network call was made
    Invalid,
    /// The network call itself failed (connect, read, or decode)
    Error,
}

impl Serialize for EntryStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            EntryStatus::Upstream(code) => serializer.serialize_u16(*code),
            EntryStatus::Invalid => serializer.serialize_str("invalid"),
            EntryStatus::Error => serializer.serialize_str("error"),
        }
    }
}

/// Record of one entry's submission attempt
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResult {
    /// The untouched input line, as the caller wrote it
    #[serde(rename = "ip")]
    pub original: String,
    /// Outcome status
    pub status: EntryStatus,
    /// Whether the upstream indicated success
    pub ok: bool,
    /// Decoded upstream body, present when an exchange completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
    /// Validation reason or network error description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Submits an upload's entries in paced, fixed-size batches.
pub struct BatchSubmitter {
    client: Arc<FastlyClient>,
    batch_size: usize,
    batch_pause: Duration,
}

impl BatchSubmitter {
    /// Build a submitter over a shared client with the configured tunables
    pub fn new(client: Arc<FastlyClient>, config: &UploadConfig) -> Self {
        Self {
            client,
            batch_size: config.batch_size,
            batch_pause: Duration::from_millis(config.batch_pause_ms),
        }
    }

    /// Submit every outcome and collect one result per entry.
    ///
    /// Output preserves batch order and, within a batch, input order
    /// (`join_all` resolves by index, not completion order). N batches
    /// incur N-1 pacing delays; the final batch has no trailing delay.
    /// No per-entry failure ever aborts a batch.
    pub async fn submit_all(
        &self,
        outcomes: &[ValidationOutcome],
        service_id: &str,
        acl_id: &str,
        comment: &str,
    ) -> Vec<SubmissionResult> {
        let mut results = Vec::with_capacity(outcomes.len());

        for (index, batch) in outcomes.chunks(self.batch_size).enumerate() {
            if index > 0 {
                tokio::time::sleep(self.batch_pause).await;
            }
            debug!("Submitting batch {} ({} entries)", index + 1, batch.len());

            let submissions = batch
                .iter()
                .map(|outcome| self.submit_one(outcome, service_id, acl_id, comment));
            results.extend(join_all(submissions).await);
        }

        results
    }

    async fn submit_one(
        &self,
        outcome: &ValidationOutcome,
        service_id: &str,
        acl_id: &str,
        comment: &str,
    ) -> SubmissionResult {
        match outcome {
            ValidationOutcome::Invalid { original, reason } => SubmissionResult {
                original: original.clone(),
                status: EntryStatus::Invalid,
                ok: false,
                response: None,
                error: Some(reason.clone()),
            },
            ValidationOutcome::Valid(spec) => {
                self.submit_entry(spec, service_id, acl_id, comment).await
            }
        }
    }

    async fn submit_entry(
        &self,
        spec: &EntrySpec,
        service_id: &str,
        acl_id: &str,
        comment: &str,
    ) -> SubmissionResult {
        match self
            .client
            .create_acl_entry(service_id, acl_id, spec, comment)
            .await
        {
            Ok(upstream) => {
                let ok = upstream.is_success();
                if !ok {
                    warn!(
                        "Upstream rejected entry {}: status {}",
                        spec.original, upstream.status
                    );
                }
                SubmissionResult {
                    original: spec.original.clone(),
                    status: EntryStatus::Upstream(upstream.status),
                    ok,
                    response: Some(upstream.body),
                    error: None,
                }
            }
            Err(e) => {
                warn!("Submission failed for entry {}: {}", spec.original, e);
                SubmissionResult {
                    original: spec.original.clone(),
                    status: EntryStatus::Error,
                    ok: false,
                    response: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
