use std::fmt;

use bytes::Bytes;

use crate::models::provider::Provider;

/// Extensions the portfolio service can extract text from.
/// Used as the file picker's `accept` hint only; nothing is rejected client-side.
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["pdf", "docx", "doc", "txt"];

/// A résumé file as received from the browser.
#[derive(Clone, PartialEq, Eq)]
pub struct ResumeFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl ResumeFile {
    pub fn new(name: impl Into<String>, content_type: Option<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content_type,
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Size formatted the way the form shows it, e.g. `12.50 KB`.
    pub fn size_label(&self) -> String {
        format!("{:.2} KB", self.size() as f64 / 1024.0)
    }

    pub fn has_accepted_extension(&self) -> bool {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| {
                let ext = ext.to_ascii_lowercase();
                ACCEPTED_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false)
    }
}

// Bytes would flood the logs.
impl fmt::Debug for ResumeFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResumeFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.size())
            .finish()
    }
}

/// `accept` attribute value for the file input: `.pdf,.docx,.doc,.txt`.
pub fn accept_attribute() -> String {
    ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// One submission's payload. Built by the form right before the backend call
/// and moved into it; nothing keeps a copy.
#[cfg_attr(test, derive(Clone))]
pub struct UploadRequest {
    pub file: ResumeFile,
    /// `None` for the file-only form, which sends no `model` field.
    pub provider: Option<Provider>,
    /// Present only when the provider needs a credential.
    pub api_key: Option<String>,
}

impl fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadRequest")
            .field("file", &self.file)
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
