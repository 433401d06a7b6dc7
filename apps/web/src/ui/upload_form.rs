//! Upload form. Collects the résumé, provider and key, enforces the
//! preconditions and performs one backend call per submission.
//!
//! The form reports through [`FormEvents`] rather than owning the result:
//! `on_loading_changed(true)` once a call starts, then exactly one of
//! `on_success` / `on_failure`, then `on_loading_changed(false)`.

use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::backend_client::BackendError;
use crate::models::portfolio::{GenerationResult, UploadResponse};
use crate::models::provider::Provider;
use crate::models::upload::{accept_attribute, ResumeFile, UploadRequest, ACCEPTED_EXTENSIONS};
use crate::ui::html::escape;

pub const PROGRESS_MESSAGE: &str = "Generating your portfolio...";
pub const SUCCESS_MESSAGE: &str = "Portfolio generated successfully!";

/// Which inputs the form offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormVariant {
    /// Provider select and API key field; sends `model` and `api_key`.
    #[default]
    WithProvider,
    /// Only the file input; sends `resume` alone.
    FileOnly,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown form variant '{0}'")]
pub struct UnknownFormVariant(pub String);

impl FromStr for FormVariant {
    type Err = UnknownFormVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "with-provider" => Ok(FormVariant::WithProvider),
            "file-only" => Ok(FormVariant::FileOnly),
            other => Err(UnknownFormVariant(other.to_string())),
        }
    }
}

/// The form's transient status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Validation(String),
    Progress(String),
    Success(String),
    Error(String),
}

impl StatusMessage {
    pub fn text(&self) -> &str {
        match self {
            StatusMessage::Validation(t)
            | StatusMessage::Progress(t)
            | StatusMessage::Success(t)
            | StatusMessage::Error(t) => t,
        }
    }

    fn css_class(&self) -> &'static str {
        match self {
            StatusMessage::Validation(_) => "warning",
            StatusMessage::Progress(_) => "progress",
            StatusMessage::Success(_) => "success",
            StatusMessage::Error(_) => "error",
        }
    }
}

/// Reasons a submission is refused before any network call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("A portfolio is already being generated")]
    AlreadySubmitting,

    #[error("Please select a resume file")]
    MissingFile,

    #[error("Please enter an API key for the selected model")]
    MissingApiKey,
}

/// Callbacks the form reports through.
pub trait FormEvents {
    fn on_success(&mut self, html: String);
    fn on_failure(&mut self, message: String);
    fn on_loading_changed(&mut self, loading: bool);
}

#[derive(Debug, Clone)]
pub struct UploadForm {
    variant: FormVariant,
    file: Option<ResumeFile>,
    provider: Provider,
    api_key: String,
    status: Option<StatusMessage>,
    in_flight: bool,
}

impl UploadForm {
    pub fn new(variant: FormVariant) -> Self {
        Self {
            variant,
            file: None,
            provider: Provider::default(),
            api_key: String::new(),
            status: None,
            in_flight: false,
        }
    }

    #[cfg(test)]
    pub fn file(&self) -> Option<&ResumeFile> {
        self.file.as_ref()
    }

    #[cfg(test)]
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Replaces any held file and clears a stale status line.
    pub fn select_file(&mut self, file: ResumeFile) {
        debug!("Selected resume file {:?}", file);
        self.file = Some(file);
        self.status = None;
    }

    /// Keeps only the first of several files (a drop, or a multi-file post).
    /// An empty drop changes nothing.
    pub fn drop_files(&mut self, files: impl IntoIterator<Item = ResumeFile>) {
        if let Some(first) = files.into_iter().next() {
            self.select_file(first);
        }
    }

    pub fn select_provider(&mut self, provider: Provider) {
        self.provider = provider;
    }

    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.api_key = api_key.into();
    }

    /// Whether the key field is shown and must be filled.
    pub fn requires_api_key(&self) -> bool {
        self.variant == FormVariant::WithProvider && self.provider.requires_credential()
    }

    /// Mirrors the submit control's enabled state.
    pub fn can_submit(&self) -> bool {
        self.validate().is_ok()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.in_flight {
            return Err(ValidationError::AlreadySubmitting);
        }
        if self.file.is_none() {
            return Err(ValidationError::MissingFile);
        }
        if self.requires_api_key() && self.api_key.trim().is_empty() {
            return Err(ValidationError::MissingApiKey);
        }
        Ok(())
    }

    /// Checks the preconditions and, if they hold, marks the form in flight and
    /// hands back the payload for the backend call. Must be followed by
    /// [`UploadForm::finish_submission`].
    pub fn begin_submission(
        &mut self,
        events: &mut dyn FormEvents,
    ) -> Result<UploadRequest, ValidationError> {
        if let Err(e) = self.validate() {
            // A refused resubmission leaves the progress line in place.
            if e != ValidationError::AlreadySubmitting {
                self.status = Some(StatusMessage::Validation(e.to_string()));
            }
            return Err(e);
        }
        let file = self.file.clone().ok_or(ValidationError::MissingFile)?;

        let request = UploadRequest {
            file,
            provider: match self.variant {
                FormVariant::WithProvider => Some(self.provider),
                FormVariant::FileOnly => None,
            },
            api_key: self
                .requires_api_key()
                .then(|| self.api_key.trim().to_string()),
        };

        self.in_flight = true;
        events.on_loading_changed(true);
        self.status = Some(StatusMessage::Progress(PROGRESS_MESSAGE.to_string()));
        Ok(request)
    }

    /// Applies the backend outcome, fires the result callback and clears loading.
    pub fn finish_submission(
        &mut self,
        outcome: Result<UploadResponse, BackendError>,
        events: &mut dyn FormEvents,
    ) -> GenerationResult {
        let result = GenerationResult::from_outcome(outcome);
        self.in_flight = false;

        match &result {
            GenerationResult::Portfolio { html } => {
                self.status = Some(StatusMessage::Success(SUCCESS_MESSAGE.to_string()));
                self.file = None;
                events.on_success(html.clone());
            }
            GenerationResult::Failure { error } => {
                self.status = Some(StatusMessage::Error(format!("Error: {error}")));
                events.on_failure(error.clone());
            }
        }

        events.on_loading_changed(false);
        result
    }

    pub fn render(&self) -> String {
        let mut html = String::new();
        html.push_str("<div class=\"resume-upload\">\n<h2>Upload Your Resume</h2>\n");
        html.push_str(&format!(
            "<form id=\"upload-form\" method=\"post\" action=\"/generate\" enctype=\"multipart/form-data\" data-held-file=\"{}\" data-in-flight=\"{}\">\n",
            self.file.is_some(),
            self.in_flight
        ));

        if self.variant == FormVariant::WithProvider {
            html.push_str(&self.render_provider_fields());
        }

        let supported = ACCEPTED_EXTENSIONS
            .iter()
            .map(|ext| ext.to_ascii_uppercase())
            .collect::<Vec<_>>()
            .join(", ");
        html.push_str(&format!(
            "<div class=\"drop-zone\">\n<p>Drag and drop your resume here or click to select</p>\n<p class=\"file-types\">Supported: {}</p>\n<input type=\"file\" name=\"resume\" accept=\"{}\" class=\"file-input\">\n</div>\n",
            supported,
            accept_attribute()
        ));

        html.push_str(&self.render_file_info());

        html.push_str(&format!(
            "<button type=\"submit\" class=\"submit-btn\"{}>Generate Portfolio</button>\n</form>\n",
            if self.can_submit() { "" } else { " disabled" }
        ));

        match &self.status {
            Some(status) => html.push_str(&format!(
                "<div id=\"status-message\" class=\"message {}\">{}</div>\n",
                status.css_class(),
                escape(status.text())
            )),
            None => html.push_str("<div id=\"status-message\" class=\"message\" hidden></div>\n"),
        }

        html.push_str("</div>\n");
        html
    }

    fn render_provider_fields(&self) -> String {
        let mut html = String::new();
        html.push_str(
            "<div class=\"form-group\">\n<label for=\"model-select\">Select LLM Provider:</label>\n<select id=\"model-select\" name=\"model\" class=\"model-select\">\n",
        );
        for provider in Provider::ALL {
            html.push_str(&format!(
                "<option value=\"{}\" data-requires-key=\"{}\" data-hint=\"{}\"{}>{}</option>\n",
                escape(provider.id()),
                provider.requires_credential(),
                escape(provider.hint()),
                if provider == self.provider { " selected" } else { "" },
                escape(provider.label())
            ));
        }
        html.push_str(&format!(
            "</select>\n<p id=\"model-hint\" class=\"model-hint\">{}</p>\n</div>\n",
            escape(self.provider.hint())
        ));

        // The key is never echoed back into the page.
        html.push_str(&format!(
            "<div id=\"api-key-group\" class=\"form-group\"{}>\n<label for=\"api-key\">API Key:</label>\n<input id=\"api-key\" name=\"api_key\" type=\"password\" autocomplete=\"off\" placeholder=\"Enter your API key for the selected provider\" class=\"api-key-input\">\n<p class=\"api-hint\">Your API key is sent only to generate your portfolio and is not stored.</p>\n</div>\n",
            if self.requires_api_key() { "" } else { " hidden" }
        ));
        html
    }

    fn render_file_info(&self) -> String {
        let Some(file) = &self.file else {
            return "<div class=\"file-info\" hidden><p class=\"file-name\"></p><p class=\"file-size\"></p></div>\n".to_string();
        };

        let mut html = format!(
            "<div class=\"file-info\"><p class=\"file-name\">{}</p><p class=\"file-size\">({})</p>",
            escape(&file.name),
            file.size_label()
        );
        if !file.has_accepted_extension() {
            html.push_str(
                "<p class=\"file-warning\">This file type may not be supported by the generator.</p>",
            );
        }
        html.push_str("</div>\n");
        html
    }
}
