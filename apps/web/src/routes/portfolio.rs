use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::backend_client::{BackendError, PortfolioBackend};
use crate::errors::AppError;
use crate::models::portfolio::GenerationResult;
use crate::models::provider::Provider;
use crate::models::upload::{ResumeFile, UploadRequest};
use crate::session::SessionHandle;
use crate::state::AppState;
use crate::ui::upload_form::{UploadForm, ValidationError};
use crate::ui::RootContainer;

pub const INTERRUPTED_MESSAGE: &str = "Portfolio generation was interrupted";

/// Fields of the browser's form post. No `Debug`: it carries the API key.
#[derive(Default)]
pub struct SubmittedFields {
    pub files: Vec<ResumeFile>,
    pub provider: Option<Provider>,
    pub api_key: Option<String>,
}

impl SubmittedFields {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut fields = SubmittedFields::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("resume") => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await?;
                    // Browsers post an empty, unnamed part when no file was chosen.
                    if !file_name.is_empty() {
                        fields
                            .files
                            .push(ResumeFile::new(file_name, content_type, bytes));
                    }
                }
                Some("model") => {
                    let id = field.text().await?;
                    let provider = id
                        .parse::<Provider>()
                        .map_err(|e| AppError::Validation(e.to_string()))?;
                    fields.provider = Some(provider);
                }
                Some("api_key") => fields.api_key = Some(field.text().await?),
                _ => {}
            }
        }

        Ok(fields)
    }

    /// Feeds the post into the form the same way the browser events would.
    /// A post without a file keeps the one the form already holds.
    pub fn apply_to(self, form: &mut UploadForm) {
        form.drop_files(self.files);
        if let Some(provider) = self.provider {
            form.select_provider(provider);
        }
        if let Some(api_key) = self.api_key {
            form.set_api_key(api_key);
        }
    }
}

fn back_to_page(session: &SessionHandle) -> Response {
    session.attach_cookie(Redirect::to("/").into_response())
}

/// GET /
pub async fn handle_index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = state.sessions.resolve(&headers).await;
    let page = session.root.lock().await.render_page();
    session.attach_cookie(Html(page).into_response())
}

/// POST /generate
///
/// Runs one submission for the caller's session and redirects back to the
/// page, which shows the outcome. Refused submissions (missing file or key,
/// already in flight) redirect too; the form's status line explains why.
pub async fn handle_generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let fields = SubmittedFields::read(multipart).await?;
    let session = state.sessions.resolve(&headers).await;

    let request = {
        let mut root = session.root.lock().await;
        // A post that arrives mid-call leaves the running submission's form alone.
        if root.is_submitting() {
            info!(
                session_id = %session.id,
                "Submission refused: {}",
                ValidationError::AlreadySubmitting
            );
            return Ok(back_to_page(&session));
        }
        fields.apply_to(root.form_mut());
        match root.begin_submission() {
            Ok(request) => request,
            Err(e) => {
                info!(session_id = %session.id, "Submission refused: {e}");
                return Ok(back_to_page(&session));
            }
        }
    };

    let submission_id = Uuid::new_v4();
    info!(
        %submission_id,
        session_id = %session.id,
        file = %request.file.name,
        size = request.file.size(),
        provider = request.provider.map(Provider::id).unwrap_or("-"),
        "Submitting resume to portfolio service"
    );

    // Spawned so a dropped browser connection cannot strand the form in flight.
    tokio::spawn(run_submission(
        state.backend.clone(),
        session.root.clone(),
        request,
        submission_id,
    ))
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Submission task failed: {e}")))?;

    Ok(back_to_page(&session))
}

/// Performs the backend call and completes the submission. A panic in the
/// call still completes it, as an interrupted failure.
async fn run_submission(
    backend: Arc<dyn PortfolioBackend>,
    root: Arc<Mutex<RootContainer>>,
    request: UploadRequest,
    submission_id: Uuid,
) {
    let call_root = root.clone();
    let call = tokio::spawn(async move {
        let outcome = backend.upload(request).await;
        call_root.lock().await.complete_submission(outcome)
    });

    let result = match call.await {
        Ok(result) => result,
        Err(e) => {
            error!(%submission_id, "Submission task failed: {e}");
            let mut root = root.lock().await;
            if !root.is_submitting() {
                return;
            }
            root.complete_submission(Err(BackendError::Transport(
                INTERRUPTED_MESSAGE.to_string(),
            )))
        }
    };

    match &result {
        GenerationResult::Portfolio { html } => {
            info!(%submission_id, bytes = html.len(), "Portfolio generated")
        }
        GenerationResult::Failure { error } => {
            warn!(%submission_id, "Portfolio generation failed: {error}")
        }
    }
}
