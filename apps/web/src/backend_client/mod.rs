//! Backend client: the single point of entry for calls to the portfolio service.
//!
//! No other module talks to the service directly. Each submission is exactly
//! one POST: no retries, no backoff. A timeout applies only when configured.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::portfolio::UploadResponse;
use crate::models::upload::UploadRequest;

#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The request never produced a response (connection refused, reset, timeout).
    #[error("{0}")]
    Transport(String),

    #[error("Request failed with status code {status}")]
    Status { status: u16, error: Option<String> },

    #[error("Malformed backend response: {0}")]
    Decode(String),
}

impl BackendError {
    /// The `error` field of the service's JSON body, when it sent one.
    pub fn response_error(&self) -> Option<&str> {
        match self {
            BackendError::Status { error, .. } => error.as_deref(),
            BackendError::Transport(_) | BackendError::Decode(_) => None,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        BackendError::Transport(e.to_string())
    }
}

/// Anything that can turn an upload into a portfolio response.
///
/// Carried in `AppState` as `Arc<dyn PortfolioBackend>`.
#[async_trait]
pub trait PortfolioBackend: Send + Sync {
    async fn upload(&self, request: UploadRequest) -> Result<UploadResponse, BackendError>;
}

/// Posts `multipart/form-data` to the service's upload endpoint.
#[derive(Clone)]
pub struct HttpPortfolioBackend {
    client: Client,
    upload_url: String,
}

impl HttpPortfolioBackend {
    pub fn new(upload_url: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build().context("Failed to build HTTP client")?,
            upload_url,
        })
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }
}

/// Builds the multipart body: `resume`, then `model` and `api_key` when present.
fn build_form(request: UploadRequest) -> Result<Form, BackendError> {
    let UploadRequest {
        file,
        provider,
        api_key,
    } = request;

    let mut part = Part::bytes(file.bytes.to_vec()).file_name(file.name);
    if let Some(content_type) = file.content_type.as_deref() {
        part = part.mime_str(content_type)?;
    }

    let mut form = Form::new().part("resume", part);
    if let Some(provider) = provider {
        form = form.text("model", provider.id());
    }
    if let Some(api_key) = api_key {
        form = form.text("api_key", api_key);
    }
    Ok(form)
}

#[async_trait]
impl PortfolioBackend for HttpPortfolioBackend {
    async fn upload(&self, request: UploadRequest) -> Result<UploadResponse, BackendError> {
        let form = build_form(request)?;

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // The service reports failures as `{"error": "..."}` with a 4xx/5xx status.
            let error = serde_json::from_str::<UploadResponse>(&body)
                .ok()
                .and_then(|r| r.error);
            warn!("Portfolio service returned {status}");
            return Err(BackendError::Status {
                status: status.as_u16(),
                error,
            });
        }

        let parsed: UploadResponse =
            serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))?;

        debug!(
            "Portfolio service answered: success={}, portfolio_bytes={}, message={:?}",
            parsed.success,
            parsed.portfolio.as_ref().map(String::len).unwrap_or(0),
            parsed.message
        );

        Ok(parsed)
    }
}

/// In-memory backend for tests: records every request and replays one outcome.
#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    pub struct RecordingBackend {
        outcome: Result<UploadResponse, BackendError>,
        requests: Mutex<Vec<UploadRequest>>,
    }

    impl RecordingBackend {
        pub fn new(outcome: Result<UploadResponse, BackendError>) -> Self {
            Self {
                outcome,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn succeeding(html: &str) -> Self {
            Self::new(Ok(UploadResponse {
                success: true,
                portfolio: Some(html.to_string()),
                ..Default::default()
            }))
        }

        pub fn requests(&self) -> Vec<UploadRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PortfolioBackend for RecordingBackend {
        async fn upload(&self, request: UploadRequest) -> Result<UploadResponse, BackendError> {
            self.requests.lock().unwrap().push(request);
            self.outcome.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::{Multipart, State};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;
    use tokio::sync::Mutex;

    use super::*;
    use crate::models::provider::Provider;
    use crate::models::upload::ResumeFile;

    #[derive(Debug, Clone)]
    struct CapturedField {
        name: String,
        file_name: Option<String>,
        content_type: Option<String>,
        body: String,
    }

    type Captured = Arc<Mutex<Vec<CapturedField>>>;

    async fn capture_upload(State(captured): State<Captured>, mut multipart: Multipart) -> Json<serde_json::Value> {
        while let Some(field) = multipart.next_field().await.unwrap() {
            let captured_field = CapturedField {
                name: field.name().unwrap_or_default().to_string(),
                file_name: field.file_name().map(str::to_string),
                content_type: field.content_type().map(str::to_string),
                body: String::new(),
            };
            let body = field.text().await.unwrap();
            captured.lock().await.push(CapturedField {
                body,
                ..captured_field
            });
        }
        Json(json!({"success": true, "portfolio": "<h1>Jane</h1>"}))
    }

    async fn spawn_service(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/api/upload")
    }

    fn request(provider: Option<Provider>, api_key: Option<&str>) -> UploadRequest {
        UploadRequest {
            file: ResumeFile::new(
                "jane.txt",
                Some("text/plain".to_string()),
                b"Jane Doe, Rust engineer".to_vec(),
            ),
            provider,
            api_key: api_key.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_upload_sends_documented_multipart_fields() {
        let captured: Captured = Arc::default();
        let router = Router::new()
            .route("/api/upload", post(capture_upload))
            .with_state(captured.clone());
        let url = spawn_service(router).await;
        let backend = HttpPortfolioBackend::new(url, None).unwrap();

        let response = backend
            .upload(request(Some(Provider::Gemini25Flash), Some("key-123")))
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.portfolio.as_deref(), Some("<h1>Jane</h1>"));

        let fields = captured.lock().await.clone();
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["resume", "model", "api_key"]);
        assert_eq!(fields[0].file_name.as_deref(), Some("jane.txt"));
        assert_eq!(fields[0].content_type.as_deref(), Some("text/plain"));
        assert_eq!(fields[0].body, "Jane Doe, Rust engineer");
        assert_eq!(fields[1].body, "gemini-2.5-flash");
        assert_eq!(fields[2].body, "key-123");
    }

    #[tokio::test]
    async fn test_upload_without_provider_sends_only_resume() {
        let captured: Captured = Arc::default();
        let router = Router::new()
            .route("/api/upload", post(capture_upload))
            .with_state(captured.clone());
        let url = spawn_service(router).await;
        let backend = HttpPortfolioBackend::new(url, None).unwrap();

        backend.upload(request(None, None)).await.unwrap();

        let fields = captured.lock().await.clone();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "resume");
    }

    #[tokio::test]
    async fn test_error_status_surfaces_response_error_field() {
        let router = Router::new().route(
            "/api/upload",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": "File type not allowed. Use PDF, DOC, DOCX, or TXT"})),
                )
                    .into_response()
            }),
        );
        let url = spawn_service(router).await;
        let backend = HttpPortfolioBackend::new(url, None).unwrap();

        let err = backend
            .upload(request(Some(Provider::Offline), None))
            .await
            .unwrap_err();

        assert_eq!(
            err.response_error(),
            Some("File type not allowed. Use PDF, DOC, DOCX, or TXT")
        );
        assert!(matches!(err, BackendError::Status { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_error_status_with_plain_body_has_no_response_error() {
        let router = Router::new().route(
            "/api/upload",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response() }),
        );
        let url = spawn_service(router).await;
        let backend = HttpPortfolioBackend::new(url, None).unwrap();

        let err = backend
            .upload(request(Some(Provider::Offline), None))
            .await
            .unwrap_err();

        assert_eq!(err.response_error(), None);
        assert_eq!(err.to_string(), "Request failed with status code 500");
    }

    #[tokio::test]
    async fn test_success_status_with_non_json_body_is_decode_error() {
        let router = Router::new().route("/api/upload", post(|| async { "<html>not json</html>" }));
        let url = spawn_service(router).await;
        let backend = HttpPortfolioBackend::new(url, None).unwrap();

        let err = backend
            .upload(request(Some(Provider::Offline), None))
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let backend = HttpPortfolioBackend::new(format!("http://{addr}/api/upload"), None).unwrap();
        let err = backend
            .upload(request(Some(Provider::Offline), None))
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::Transport(_)));
    }
}
