//! Correction service client
//!
//! Sends transformation requests to the correction service and maps the
//! outcome into a small typed taxonomy. The service is an opaque
//! text-in/text-out oracle: `POST <base>/api/correct` with
//! `{ text, instruction, temperature }`, answering `{ corrected: string }`.
//!
//! The client never retries on its own - re-submitting is the caller's (and
//! ultimately the user's) decision.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ServiceConfig;

/// One transformation request
///
/// `text` is trimmed and non-empty by the time a request is constructed;
/// the session guards this before calling [`CorrectionClient::submit`].
#[derive(Debug, Clone, Serialize)]
pub struct CorrectionRequest {
    pub text: String,
    pub instruction: String,
    pub temperature: f32,
}

/// Errors surfaced by the correction service
#[derive(Debug, Error)]
pub enum CorrectionError {
    /// A response arrived with a non-success status
    #[error("service error {status}")]
    Service { status: u16 },

    /// No response reached the client at all (DNS, refused, aborted).
    /// Deliberately carries no status code.
    #[error("communication failure: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Outcome of an accepted or rejected submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The service returned usable corrected text
    Corrected(String),
    /// Success status, but no usable output: empty/whitespace-only text or a
    /// missing/non-string `corrected` field. Silent by current design - the
    /// previous output stays in place.
    NoUsableOutput,
    /// A request was already in flight; this one was not sent
    Rejected,
}

/// The wire-level correction call, behind a trait so tests can substitute a
/// counting mock
#[async_trait]
pub trait CorrectionApi: Send + Sync {
    async fn correct(&self, request: &CorrectionRequest) -> Result<SubmitOutcome, CorrectionError>;
}

/// HTTP implementation of [`CorrectionApi`]
pub struct HttpCorrectionApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCorrectionApi {
    /// Build from service configuration
    pub fn from_config(config: &ServiceConfig) -> Result<Self, CorrectionError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    #[cfg(test)]
    fn with_base_url(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CorrectionApi for HttpCorrectionApi {
    async fn correct(&self, request: &CorrectionRequest) -> Result<SubmitOutcome, CorrectionError> {
        let url = format!("{}/api/correct", self.base_url);
        debug!(%url, instruction_len = request.instruction.len(), "correct: sending request");

        let response = self.http.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "correct: service returned error status");
            return Err(CorrectionError::Service {
                status: status.as_u16(),
            });
        }

        // A success status with an undecodable body or a non-string
        // `corrected` field counts as "no usable output", not an error.
        let body: serde_json::Value = match response.json().await {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "correct: undecodable response body");
                return Ok(SubmitOutcome::NoUsableOutput);
            }
        };

        match body.get("corrected").and_then(|v| v.as_str()) {
            Some(corrected) if !corrected.trim().is_empty() => {
                debug!(len = corrected.len(), "correct: received corrected text");
                Ok(SubmitOutcome::Corrected(corrected.to_string()))
            }
            _ => {
                debug!("correct: missing, non-string, or empty corrected field");
                Ok(SubmitOutcome::NoUsableOutput)
            }
        }
    }
}

/// Single-flight wrapper around a [`CorrectionApi`]
///
/// The in-flight flag is set synchronously before the first suspension point
/// and cleared on every exit path, so a submission attempted while another
/// is pending is rejected rather than queued or raced.
pub struct CorrectionClient {
    api: Arc<dyn CorrectionApi>,
    in_flight: AtomicBool,
}

impl CorrectionClient {
    pub fn new(api: Arc<dyn CorrectionApi>) -> Self {
        Self {
            api,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether a submission is currently pending
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Submit one request, enforcing single-flight
    pub async fn submit(&self, request: &CorrectionRequest) -> Result<SubmitOutcome, CorrectionError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("submit: request already in flight, rejecting");
            return Ok(SubmitOutcome::Rejected);
        }

        let result = self.api.correct(request).await;
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    /// Mock correction API with call counting and an optional gate that
    /// holds the call open until released
    pub struct MockCorrectionApi {
        outcome: SubmitOutcome,
        call_count: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl MockCorrectionApi {
        pub fn new(outcome: SubmitOutcome) -> Self {
            Self {
                outcome,
                call_count: AtomicUsize::new(0),
                gate: None,
            }
        }

        pub fn gated(outcome: SubmitOutcome, gate: Arc<Notify>) -> Self {
            Self {
                outcome,
                call_count: AtomicUsize::new(0),
                gate: Some(gate),
            }
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CorrectionApi for MockCorrectionApi {
        async fn correct(&self, _request: &CorrectionRequest) -> Result<SubmitOutcome, CorrectionError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            Ok(self.outcome.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockCorrectionApi;
    use super::*;
    use tokio::sync::Notify;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> CorrectionRequest {
        CorrectionRequest {
            text: "ahoj jak sa mas".to_string(),
            instruction: "Použi neutrálny, formálny a profesionálny štýl.".to_string(),
            temperature: 0.3,
        }
    }

    #[tokio::test]
    async fn test_success_returns_corrected_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/correct"))
            .and(body_partial_json(serde_json::json!({
                "text": "ahoj jak sa mas",
                "temperature": 0.3,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "corrected": "Ahoj, ako sa máš?"
            })))
            .mount(&server)
            .await;

        let api = HttpCorrectionApi::with_base_url(&server.uri());
        let outcome = api.correct(&request()).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Corrected("Ahoj, ako sa máš?".to_string()));
    }

    #[tokio::test]
    async fn test_error_status_maps_to_service_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/correct"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let api = HttpCorrectionApi::with_base_url(&server.uri());
        let err = api.correct(&request()).await.unwrap_err();

        assert!(matches!(err, CorrectionError::Service { status: 503 }));
    }

    #[tokio::test]
    async fn test_non_string_corrected_is_no_usable_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/correct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "corrected": 42 })))
            .mount(&server)
            .await;

        let api = HttpCorrectionApi::with_base_url(&server.uri());
        let outcome = api.correct(&request()).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::NoUsableOutput);
    }

    #[tokio::test]
    async fn test_whitespace_only_corrected_is_no_usable_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/correct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "corrected": "   " })))
            .mount(&server)
            .await;

        let api = HttpCorrectionApi::with_base_url(&server.uri());
        let outcome = api.correct(&request()).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::NoUsableOutput);
    }

    #[tokio::test]
    async fn test_undecodable_body_is_no_usable_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/correct"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let api = HttpCorrectionApi::with_base_url(&server.uri());
        let outcome = api.correct(&request()).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::NoUsableOutput);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_failure() {
        // Port 1 on loopback refuses connections
        let api = HttpCorrectionApi {
            http: reqwest::Client::builder()
                .timeout(Duration::from_millis(500))
                .build()
                .unwrap(),
            base_url: "http://127.0.0.1:1".to_string(),
        };

        let err = api.correct(&request()).await.unwrap_err();
        assert!(matches!(err, CorrectionError::Transport(_)));
    }

    #[tokio::test]
    async fn test_single_flight_rejects_second_submit() {
        let gate = Arc::new(Notify::new());
        let api = Arc::new(MockCorrectionApi::gated(
            SubmitOutcome::Corrected("done".to_string()),
            gate.clone(),
        ));
        let client = Arc::new(CorrectionClient::new(api.clone()));

        let first = {
            let client = client.clone();
            tokio::spawn(async move { client.submit(&request()).await })
        };

        // Wait until the first call is inside the API before submitting again
        while api.call_count() == 0 {
            tokio::task::yield_now().await;
        }
        assert!(client.is_busy());

        let second = client.submit(&request()).await.unwrap();
        assert_eq!(second, SubmitOutcome::Rejected);

        gate.notify_one();
        let first = first.await.unwrap().unwrap();
        assert_eq!(first, SubmitOutcome::Corrected("done".to_string()));

        // Exactly one call reached the wire
        assert_eq!(api.call_count(), 1);
        assert!(!client.is_busy());
    }

    #[tokio::test]
    async fn test_flag_cleared_after_failure() {
        struct FailingApi;

        #[async_trait]
        impl CorrectionApi for FailingApi {
            async fn correct(&self, _request: &CorrectionRequest) -> Result<SubmitOutcome, CorrectionError> {
                Err(CorrectionError::Service { status: 500 })
            }
        }

        let client = CorrectionClient::new(Arc::new(FailingApi));
        assert!(client.submit(&request()).await.is_err());
        assert!(!client.is_busy());

        // A later submit is accepted again
        assert!(client.submit(&request()).await.is_err());
    }
}
