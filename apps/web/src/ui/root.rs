use crate::backend_client::BackendError;
use crate::models::portfolio::{GenerationResult, UploadResponse};
use crate::models::upload::UploadRequest;
use crate::ui::page::render_document;
use crate::ui::preview::PreviewPane;
use crate::ui::upload_form::{FormEvents, FormVariant, UploadForm, ValidationError};

/// The single result slot and loading flag, fed by the form's callbacks.
///
/// Once a result has arrived the slot is only ever replaced, never emptied.
#[derive(Debug, Clone, Default)]
pub struct ResultSlot {
    result: Option<GenerationResult>,
    loading: bool,
}

impl ResultSlot {
    pub fn result(&self) -> Option<&GenerationResult> {
        self.result.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

impl FormEvents for ResultSlot {
    fn on_success(&mut self, html: String) {
        self.result = Some(GenerationResult::Portfolio { html });
    }

    fn on_failure(&mut self, message: String) {
        self.result = Some(GenerationResult::Failure { error: message });
    }

    fn on_loading_changed(&mut self, loading: bool) {
        self.loading = loading;
    }
}

/// Owns the upload form and the result slot and wires one to the other.
#[derive(Debug, Clone)]
pub struct RootContainer {
    form: UploadForm,
    slot: ResultSlot,
}

impl RootContainer {
    pub fn new(variant: FormVariant) -> Self {
        Self {
            form: UploadForm::new(variant),
            slot: ResultSlot::default(),
        }
    }

    #[cfg(test)]
    pub fn form(&self) -> &UploadForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut UploadForm {
        &mut self.form
    }

    #[cfg(test)]
    pub fn slot(&self) -> &ResultSlot {
        &self.slot
    }

    pub fn is_submitting(&self) -> bool {
        self.form.is_in_flight()
    }

    pub fn begin_submission(&mut self) -> Result<UploadRequest, ValidationError> {
        self.form.begin_submission(&mut self.slot)
    }

    pub fn complete_submission(
        &mut self,
        outcome: Result<UploadResponse, BackendError>,
    ) -> GenerationResult {
        self.form.finish_submission(outcome, &mut self.slot)
    }

    pub fn preview(&self) -> PreviewPane<'_> {
        PreviewPane::for_result(self.slot.result())
    }

    pub fn render_page(&self) -> String {
        render_document(&self.form.render(), &self.preview().render(), self.slot.is_loading())
    }
}
