//! Bulk upload pipeline
//!
//! `UploadService` is the entry point: it enforces preconditions and the
//! ACL capacity ceiling, then drives parser -> validator -> submitter and
//! assembles the final report. Stateless per call; nothing survives the
//! request.

pub mod parser;
pub mod submitter;
pub mod validator;

use crate::config::UploadConfig;
use crate::core::fastly::FastlyClient;
use crate::utils::error::{GatewayError, Result};
use serde::Serialize;
use std::sync::Arc;
use submitter::{BatchSubmitter, SubmissionResult};
use tracing::info;
use validator::ValidationOutcome;

/// Comment attached to entries when the caller does not supply one
pub const DEFAULT_COMMENT: &str = "Bulk upload";

/// One upload request, as decoded from the multipart form
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Target Fastly service
    pub service_id: String,
    /// Target ACL within the service
    pub acl_id: String,
    /// Optional per-entry comment; empty or absent falls back to
    /// [`DEFAULT_COMMENT`]
    pub comment: Option<String>,
    /// Raw bytes of the uploaded file
    pub file: Vec<u8>,
}

/// Aggregate result of one upload
#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    /// Always true; failures surface as error responses instead
    pub success: bool,
    /// Count of entries attempted, valid and invalid alike
    pub processed: usize,
    /// Per-entry outcomes in batch order, input order within a batch
    pub results: Vec<SubmissionResult>,
}

/// Orchestrates one bulk upload end to end
pub struct UploadService {
    client: Arc<FastlyClient>,
    config: UploadConfig,
}

impl UploadService {
    /// Build a service over a shared client with the configured tunables
    pub fn new(client: Arc<FastlyClient>, config: UploadConfig) -> Self {
        Self { client, config }
    }

    /// Run the pipeline for one request.
    ///
    /// Fails whole-request only on missing credential or on a candidate
    /// count above the ACL ceiling; per-entry failures are folded into the
    /// report. The ceiling counts candidates before validation, matching
    /// the remote list's capacity check.
    pub async fn process(&self, request: UploadRequest) -> Result<UploadReport> {
        // Credential check comes first: no parsing effort, no network calls
        // on a misconfigured deployment.
        self.client.token()?;

        let content = String::from_utf8_lossy(&request.file);
        let outcomes: Vec<ValidationOutcome> = parser::candidate_lines(&content)
            .map(validator::validate_line)
            .collect();

        if outcomes.len() > self.config.max_entries {
            return Err(GatewayError::TooManyEntries {
                count: outcomes.len(),
                limit: self.config.max_entries,
            });
        }

        let comment = match request.comment.as_deref() {
            Some(comment) if !comment.is_empty() => comment,
            _ => DEFAULT_COMMENT,
        };

        info!(
            "Uploading {} entries to ACL {} on service {}",
            outcomes.len(),
            request.acl_id,
            request.service_id
        );

        let results = BatchSubmitter::new(Arc::clone(&self.client), &self.config)
            .submit_all(&outcomes, &request.service_id, &request.acl_id, comment)
            .await;

        Ok(UploadReport {
            success: true,
            processed: results.len(),
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FastlyConfig;
    use crate::core::upload::submitter::EntryStatus;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, token: Option<&str>) -> Arc<FastlyClient> {
        let config = FastlyConfig {
            base_url: server.uri(),
            api_token: token.map(str::to_string),
            timeout_secs: 5,
        };
        Arc::new(FastlyClient::new(&config).unwrap())
    }

    fn upload_config(max_entries: usize) -> UploadConfig {
        UploadConfig {
            batch_size: 50,
            batch_pause_ms: 0,
            max_entries,
        }
    }

    fn request(file: &str, comment: Option<&str>) -> UploadRequest {
        UploadRequest {
            service_id: "svc1".to_string(),
            acl_id: "acl1".to_string(),
            comment: comment.map(str::to_string),
            file: file.as_bytes().to_vec(),
        }
    }

    #[tokio::test]
    async fn missing_token_fails_before_any_submission() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let service = UploadService::new(client_for(&server, None), upload_config(1000));
        let result = service.process(request("10.0.0.1\n", None)).await;

        assert!(matches!(result, Err(GatewayError::Config(_))));
    }

    #[tokio::test]
    async fn candidate_count_at_ceiling_proceeds() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/service/svc1/acl/acl1/entry"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(6)
            .mount(&server)
            .await;

        let file: String = (1..=6).map(|i| format!("10.0.0.{}\n", i)).collect();
        let service = UploadService::new(client_for(&server, Some("t")), upload_config(6));
        let report = service.process(request(&file, None)).await.unwrap();

        assert!(report.success);
        assert_eq!(report.processed, 6);
        assert_eq!(report.results.len(), 6);
    }

    #[tokio::test]
    async fn candidate_count_above_ceiling_fails_without_submissions() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let file: String = (1..=7).map(|i| format!("10.0.0.{}\n", i)).collect();
        let service = UploadService::new(client_for(&server, Some("t")), upload_config(6));
        let result = service.process(request(&file, None)).await;

        match result {
            Err(GatewayError::TooManyEntries { count, limit }) => {
                assert_eq!(count, 7);
                assert_eq!(limit, 6);
            }
            other => panic!("expected TooManyEntries, got {:?}", other.map(|r| r.processed)),
        }
    }

    #[tokio::test]
    async fn ceiling_counts_invalid_candidates_too() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        // 2 valid + 2 invalid = 4 candidates against a ceiling of 3: the
        // capacity check runs on candidates, not on valid entries.
        let service = UploadService::new(client_for(&server, Some("t")), upload_config(3));
        let result = service
            .process(request("10.0.0.1\nbogus\n10.0.0.2\nworse\n", None))
            .await;

        assert!(matches!(
            result,
            Err(GatewayError::TooManyEntries { count: 4, limit: 3 })
        ));
    }

    #[tokio::test]
    async fn absent_comment_falls_back_to_default() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("comment=Bulk+upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(2)
            .mount(&server)
            .await;

        let service = UploadService::new(client_for(&server, Some("t")), upload_config(1000));
        // Absent and empty comments both fall back.
        service.process(request("10.0.0.1\n", None)).await.unwrap();
        service
            .process(request("10.0.0.1\n", Some("")))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn caller_comment_is_forwarded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("comment=office+range"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let service = UploadService::new(client_for(&server, Some("t")), upload_config(1000));
        service
            .process(request("10.0.0.1\n", Some("office range")))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn mixed_file_reports_every_candidate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(2)
            .mount(&server)
            .await;

        let service = UploadService::new(client_for(&server, Some("t")), upload_config(1000));
        let report = service
            .process(request("# office\n10.0.0.1\nnonsense\n\n!10.0.0.0/8\n", None))
            .await
            .unwrap();

        assert_eq!(report.processed, 3);
        assert_eq!(report.results[0].original, "10.0.0.1");
        assert_eq!(report.results[1].status, EntryStatus::Invalid);
        assert_eq!(report.results[2].original, "!10.0.0.0/8");
        assert!(report.results[2].ok);
    }

    #[tokio::test]
    async fn empty_file_reports_zero_processed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let service = UploadService::new(client_for(&server, Some("t")), upload_config(1000));
        let report = service
            .process(request("# only comments\n\n", None))
            .await
            .unwrap();

        assert!(report.success);
        assert_eq!(report.processed, 0);
        assert!(report.results.is_empty());
    }
}
