//! HTTP contract of the spreadsheet-backed registration endpoint.

use crate::error::{RegistrationError, RegistrationErrorExt};
use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};
use vreg_domain::config::RegistrationConfig;
use vreg_domain::model::RegistrationRequest;

/// Substring of a submit reply that marks a failed write.
const ERROR_MARKER: &str = "Error";

/// Outcome of the duplicate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateCheck {
    Unique,
    Duplicate,
    /// The endpoint has no rows yet (first registration ever); treated as unique.
    EmptyDataset,
}

impl DuplicateCheck {
    #[must_use]
    pub const fn is_duplicate(self) -> bool {
        matches!(self, Self::Duplicate)
    }
}

/// Reply of the submit call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    /// HTTP 200 and no `Error` in the body.
    pub success: bool,
    pub raw_body: String,
}

/// Remote registration service. One attempt per call, never retried.
pub trait RegistrationClient: Debug + Send + Sync + 'static {
    /// Asks whether `plate` is already registered.
    fn check_duplicate(
        &self,
        plate: &str,
    ) -> impl Future<Output = Result<DuplicateCheck, RegistrationError>> + Send;

    /// Stores one registration.
    fn submit(
        &self,
        request: &RegistrationRequest,
    ) -> impl Future<Output = Result<SubmitReceipt, RegistrationError>> + Send;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DuplicateReply {
    is_duplicate: bool,
}

/// [`RegistrationClient`] over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpRegistrationClient {
    http: reqwest::Client,
    endpoint: String,
    empty_dataset_marker: String,
}

impl HttpRegistrationClient {
    /// # Errors
    /// Returns [`RegistrationError::Transport`] if the HTTP client cannot be built (TLS backend).
    pub fn new(config: &RegistrationConfig) -> Result<Self, RegistrationError> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if config.timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_seconds));
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            empty_dataset_marker: config.empty_dataset_marker.clone(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Classifies a duplicate-check reply. The empty-dataset text wins over the status code.
    fn classify(&self, status: StatusCode, body: &str) -> Result<DuplicateCheck, RegistrationError> {
        if !self.empty_dataset_marker.is_empty() && body.contains(&self.empty_dataset_marker) {
            debug!("Remote dataset is empty, treating plate as unique");
            return Ok(DuplicateCheck::EmptyDataset);
        }

        if status != StatusCode::OK {
            warn!(%status, "Duplicate check rejected");
            return Err(RegistrationError::Remote {
                message: crate::messages::REMOTE_FAILED.into(),
                context: Some(format!("duplicate check returned HTTP {status}").into()),
            });
        }

        let reply: DuplicateReply =
            serde_json::from_str(body).context("Unexpected duplicate check reply")?;
        Ok(if reply.is_duplicate { DuplicateCheck::Duplicate } else { DuplicateCheck::Unique })
    }
}

impl RegistrationClient for HttpRegistrationClient {
    async fn check_duplicate(&self, plate: &str) -> Result<DuplicateCheck, RegistrationError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("action", "checkDuplicate"), ("carNumber", plate)])
            .send()
            .await
            .context("Duplicate check request failed")?;

        let status = response.status();
        let body = response.text().await.context("Duplicate check body unreadable")?;
        let outcome = self.classify(status, &body);
        debug!(plate, ?outcome, "Duplicate check finished");
        outcome
    }

    async fn submit(&self, request: &RegistrationRequest) -> Result<SubmitReceipt, RegistrationError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .context("Registration request failed")?;

        let status = response.status();
        let raw_body = response.text().await.context("Registration reply unreadable")?;
        let success = status == StatusCode::OK && !raw_body.contains(ERROR_MARKER);
        if !success {
            warn!(%status, body_len = raw_body.len(), "Registration rejected by remote");
        }

        Ok(SubmitReceipt { success, raw_body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HttpRegistrationClient {
        HttpRegistrationClient::new(&RegistrationConfig::default()).unwrap()
    }

    #[test]
    fn empty_dataset_marker_wins_over_status() {
        let body = "Exception: The number of rows in the range must be at least 1";
        let outcome = client().classify(StatusCode::INTERNAL_SERVER_ERROR, body).unwrap();
        assert_eq!(outcome, DuplicateCheck::EmptyDataset);
        assert!(!outcome.is_duplicate());
    }

    #[test]
    fn non_ok_status_is_remote_error() {
        let err = client().classify(StatusCode::NOT_FOUND, "{}").unwrap_err();
        assert_eq!(err.kind(), "remote");
    }

    #[test]
    fn other_error_text_is_decode_error() {
        let err = client().classify(StatusCode::OK, "Exception: quota exceeded").unwrap_err();
        assert_eq!(err.kind(), "decode");
    }

    #[test]
    fn json_reply_is_parsed() {
        let client = client();
        assert_eq!(
            client.classify(StatusCode::OK, r#"{"isDuplicate":true}"#).unwrap(),
            DuplicateCheck::Duplicate
        );
        assert_eq!(
            client.classify(StatusCode::OK, r#"{"isDuplicate":false}"#).unwrap(),
            DuplicateCheck::Unique
        );
    }
}
