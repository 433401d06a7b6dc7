use serde::{Deserialize, Serialize};

use crate::backend_client::BackendError;

pub const FALLBACK_BACKEND_FAILURE: &str = "Failed to generate portfolio";
pub const FALLBACK_TRANSPORT_FAILURE: &str = "An error occurred";

/// JSON body returned by the portfolio service's upload endpoint.
///
/// Error responses omit `success`, so it defaults to `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub portfolio: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Outcome of the latest submission. Exactly one variant is held at a time and
/// a new outcome replaces the old one wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    Portfolio { html: String },
    Failure { error: String },
}

impl GenerationResult {
    /// Interprets a backend call.
    ///
    /// Failure messages prefer the response's `error` field, then the error's
    /// own message, then a generic fallback.
    pub fn from_outcome(outcome: Result<UploadResponse, BackendError>) -> Self {
        match outcome {
            Ok(UploadResponse {
                success: true,
                portfolio: Some(html),
                ..
            }) => GenerationResult::Portfolio { html },
            Ok(UploadResponse { success: true, .. }) => GenerationResult::Failure {
                error: "Backend response did not include a portfolio".to_string(),
            },
            Ok(response) => GenerationResult::Failure {
                error: non_blank(response.error)
                    .unwrap_or_else(|| FALLBACK_BACKEND_FAILURE.to_string()),
            },
            Err(e) => GenerationResult::Failure {
                error: non_blank(e.response_error().map(str::to_string))
                    .or_else(|| non_blank(Some(e.to_string())))
                    .unwrap_or_else(|| FALLBACK_TRANSPORT_FAILURE.to_string()),
            },
        }
    }

    #[cfg(test)]
    pub fn html(&self) -> Option<&str> {
        match self {
            GenerationResult::Portfolio { html } => Some(html),
            GenerationResult::Failure { .. } => None,
        }
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        match self {
            GenerationResult::Portfolio { .. } => None,
            GenerationResult::Failure { error } => Some(error),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
