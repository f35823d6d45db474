//! One authenticated query/response exchange with the answering service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::models::ResourceRecord;

/// The answering service's response to one query: the answer text plus zero
/// or more raw resource records, still unvalidated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Answer {
    pub text: String,
    pub resources: Vec<ResourceRecord>,
}

/// Seam to the answering service.
#[async_trait]
pub trait AnsweringService: Send + Sync {
    async fn ask(&self, query: &str, token: &str) -> Result<Answer, QueryError>;
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct AskResponse {
    answer: String,
    #[serde(default)]
    resources: Vec<ResourceRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct AskErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

/// HTTP client for the ask-jiji endpoint.
///
/// Executes exactly one attempt per call, no retries; the only timeout is
/// the request timeout set at construction.
pub struct QueryService {
    client: Client,
    base_url: String,
}

impl QueryService {
    /// Create a client for the answering service at `base_url`.
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl AnsweringService for QueryService {
    async fn ask(&self, query: &str, token: &str) -> Result<Answer, QueryError> {
        let url = format!("{}/ask-jiji", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", "application/json")
            .json(&AskRequest { query })
            .send()
            .await
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(rejection(status, &body));
        }

        decode_answer(&body)
    }
}

/// Map a non-success response to the failure taxonomy. The body's `detail`
/// field is surfaced verbatim when present.
fn rejection(status: StatusCode, body: &str) -> QueryError {
    if status == StatusCode::UNAUTHORIZED {
        return QueryError::Unauthenticated;
    }

    let parsed: AskErrorBody = serde_json::from_str(body).unwrap_or_default();
    match parsed.detail {
        Some(detail) => QueryError::ServerRejected(detail),
        None => QueryError::ServerRejected(format!("Request failed ({status})")),
    }
}

fn decode_answer(body: &str) -> Result<Answer, QueryError> {
    let parsed: AskResponse = serde_json::from_str(body).map_err(|_| QueryError::Malformed)?;
    Ok(Answer {
        text: parsed.answer,
        resources: parsed.resources,
    })
}
