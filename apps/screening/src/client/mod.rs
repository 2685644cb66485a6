//! Analysis Client — the single point of entry for all calls to the remote
//! inference service.
//!
//! ARCHITECTURAL RULE: no other module may talk to the service directly.
//! Every operation is one POST with a JSON body: a failed call surfaces
//! immediately (no retry, no timeout); a non-2xx status captures the verbatim
//! response body into the error so the caller can show it to the user.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use crate::models::QuestionnaireAnswers;

/// Where the inference service listens unless `API_BASE_URL` overrides it.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx status. `message` is the raw response body text.
    #[error("{method} failed: {message}")]
    Api {
        method: &'static str,
        message: String,
    },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The five remote operations the screening flow depends on. A trait seam so
/// the pipeline can be driven by a scripted fake in tests.
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    /// Turns questionnaire answers into a full job description object.
    async fn generate_job_description(
        &self,
        answers: &QuestionnaireAnswers,
    ) -> Result<Value, ApiError>;

    /// Extracts a structured job analysis from free job description text.
    async fn analyze_job_description(&self, job_description: &str) -> Result<Value, ApiError>;

    /// Redacts identity-revealing content from a CV. Returns `{anonymizedCV}`.
    async fn anonymize_cv(&self, cv: &str) -> Result<Value, ApiError>;

    /// Analyzes one CV against a job analysis. Returns a candidate-analysis
    /// object.
    async fn analyze_candidate_cv(
        &self,
        job_analysis: &Value,
        candidate_cv: &str,
    ) -> Result<Value, ApiError>;

    /// Generates tailored interview questions. Returns `{questions}`.
    async fn generate_interview_questions(
        &self,
        job_analysis: &Value,
        candidate_cv: &str,
        number_of_questions: u32,
    ) -> Result<Value, ApiError>;
}

#[derive(Debug, Serialize)]
struct AnalyzeJobRequest<'a> {
    #[serde(rename = "jobDescription")]
    job_description: &'a str,
}

#[derive(Debug, Serialize)]
struct AnonymizeCvRequest<'a> {
    cv: &'a str,
}

#[derive(Debug, Serialize)]
struct AnalyzeCandidateRequest<'a> {
    /// The job analysis goes over the wire as a JSON-encoded string, not as a
    /// structured object. The service contract expects it that way.
    #[serde(rename = "jobAnalysis")]
    job_analysis: String,
    #[serde(rename = "candidateCV")]
    candidate_cv: &'a str,
}

#[derive(Debug, Serialize)]
struct InterviewQuestionsRequest<'a> {
    #[serde(rename = "jobAnalysis")]
    job_analysis: String,
    #[serde(rename = "candidateCV")]
    candidate_cv: &'a str,
    #[serde(rename = "numberOfQuestions")]
    number_of_questions: u32,
}

/// Concrete client over `reqwest`. Cheap to clone; connections are pooled by
/// the inner client.
#[derive(Clone)]
pub struct AnalysisClient {
    client: Client,
    base_url: String,
}

impl AnalysisClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Issues one POST to `<base>/api/<path>` and returns the parsed response
    /// body.
    async fn post<B: Serialize>(
        &self,
        method: &'static str,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let url = format!("{}/api/{path}", self.base_url);
        debug!(method, %url, "calling analysis service");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(method, status = status.as_u16(), "{method} failed: {message}");
            return Err(ApiError::Api { method, message });
        }

        let text = response.text().await?;
        let parsed = serde_json::from_str(&text)?;
        debug!(method, "analysis service call succeeded");
        Ok(parsed)
    }
}

#[async_trait]
impl AnalysisApi for AnalysisClient {
    async fn generate_job_description(
        &self,
        answers: &QuestionnaireAnswers,
    ) -> Result<Value, ApiError> {
        self.post("generateJobDescription", "generateJobDescription", answers)
            .await
    }

    async fn analyze_job_description(&self, job_description: &str) -> Result<Value, ApiError> {
        self.post(
            "analyzeJobDescription",
            "analyzeJob",
            &AnalyzeJobRequest { job_description },
        )
        .await
    }

    async fn anonymize_cv(&self, cv: &str) -> Result<Value, ApiError> {
        self.post("anonymizeCV", "anonymizeCV", &AnonymizeCvRequest { cv })
            .await
    }

    async fn analyze_candidate_cv(
        &self,
        job_analysis: &Value,
        candidate_cv: &str,
    ) -> Result<Value, ApiError> {
        self.post(
            "analyzeCandidateCV",
            "analyzeCandidate",
            &AnalyzeCandidateRequest {
                job_analysis: serde_json::to_string(job_analysis)?,
                candidate_cv,
            },
        )
        .await
    }

    async fn generate_interview_questions(
        &self,
        job_analysis: &Value,
        candidate_cv: &str,
        number_of_questions: u32,
    ) -> Result<Value, ApiError> {
        self.post(
            "generateInterviewQuestions",
            "generateInterviewQuestions",
            &InterviewQuestionsRequest {
                job_analysis: serde_json::to_string(job_analysis)?,
                candidate_cv,
                number_of_questions,
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    /// Serves exactly one canned HTTP response on an ephemeral port and
    /// returns the base URL to point the client at.
    async fn one_shot_server(status_line: &'static str, body: &'static str) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            // Drain the request before answering: headers, then the declared
            // body length.
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            let body_start = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = find_headers_end(&buf) {
                    break pos;
                }
                if n == 0 {
                    return;
                }
            };
            let content_length = parse_content_length(&buf[..body_start]);
            while buf.len() < body_start + content_length {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn find_headers_end(buf: &[u8]) -> Option<usize> {
        buf.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4)
    }

    fn parse_content_length(headers: &[u8]) -> usize {
        let text = String::from_utf8_lossy(headers);
        text.lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse().ok())?
            })
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn test_success_returns_parsed_body() {
        let base = one_shot_server("200 OK", r#"{"anonymizedCV": "redacted text"}"#).await;
        let client = AnalysisClient::new(base);
        let value = client.anonymize_cv("raw cv text").await.unwrap();
        assert_eq!(value, json!({"anonymizedCV": "redacted text"}));
    }

    #[tokio::test]
    async fn test_server_error_surfaces_method_and_body() {
        let base = one_shot_server("500 Internal Server Error", "internal error").await;
        let client = AnalysisClient::new(base);
        let err = client
            .analyze_job_description("some job description")
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("analyzeJobDescription"), "{message}");
        assert!(message.contains("internal error"), "{message}");
    }

    #[tokio::test]
    async fn test_client_error_status_also_fails() {
        let base = one_shot_server("400 Bad Request", "bad payload").await;
        let client = AnalysisClient::new(base);
        let err = client.anonymize_cv("cv").await.unwrap_err();
        assert!(matches!(err, ApiError::Api { method: "anonymizeCV", .. }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_parse_error() {
        let base = one_shot_server("200 OK", "not json at all").await;
        let client = AnalysisClient::new(base);
        let err = client
            .generate_interview_questions(&json!({"jobTitle": "x"}), "cv", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)), "{err}");
    }
}
