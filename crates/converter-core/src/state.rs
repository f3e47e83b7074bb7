//! Conversion state - the single record threaded through the pipeline
//!
//! `input_text` is fixed at construction. `structured_form` is write-once.
//! `output_text` may be rewritten; every write bumps a revision counter so
//! callers can tell which stage produced the current value.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::document::StructuredForm;

/// Fields of [`ConversionState`] that stages declare as inputs or outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateField {
    /// The request text; always present.
    InputText,
    /// The write-once intermediate form.
    StructuredForm,
    /// The current target-dialect statement.
    OutputText,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// A second write to a write-once field.
    #[error("Field {0:?} is write-once and has already been set")]
    AlreadySet(StateField),

    /// A stage read a field no earlier stage populated.
    #[error("Required field {0:?} is not populated")]
    Missing(StateField),
}

/// Per-request record owned by exactly one pipeline run.
#[derive(Debug, Clone)]
pub struct ConversionState {
    /// Identifier used as the log prefix for every stage of this request.
    request_id: Uuid,
    /// The caller's SQL, never modified after construction.
    input_text: String,
    /// Syntax tree or contained parse failure, set once by structuring.
    structured_form: Option<StructuredForm>,
    /// Latest statement in the target dialect.
    output_text: Option<String>,
    /// Number of writes to `output_text` so far.
    output_revision: u32,
}

impl ConversionState {
    pub fn new(input_text: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            input_text: input_text.into(),
            structured_form: None,
            output_text: None,
            output_revision: 0,
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn structured_form(&self) -> Option<&StructuredForm> {
        self.structured_form.as_ref()
    }

    pub fn output_text(&self) -> Option<&str> {
        self.output_text.as_deref()
    }

    /// Number of times `output_text` has been written.
    pub fn output_revision(&self) -> u32 {
        self.output_revision
    }

    pub fn has(&self, field: StateField) -> bool {
        match field {
            StateField::InputText => true,
            StateField::StructuredForm => self.structured_form.is_some(),
            StateField::OutputText => self.output_text.is_some(),
        }
    }

    pub fn require_structured_form(&self) -> Result<&StructuredForm, StateError> {
        self.structured_form
            .as_ref()
            .ok_or(StateError::Missing(StateField::StructuredForm))
    }

    pub fn require_output_text(&self) -> Result<&str, StateError> {
        self.output_text
            .as_deref()
            .ok_or(StateError::Missing(StateField::OutputText))
    }

    pub fn set_structured_form(&mut self, form: StructuredForm) -> Result<(), StateError> {
        if self.structured_form.is_some() {
            return Err(StateError::AlreadySet(StateField::StructuredForm));
        }
        self.structured_form = Some(form);
        Ok(())
    }

    pub fn set_output_text(&mut self, text: impl Into<String>) {
        self.output_text = Some(text.into());
        self.output_revision += 1;
    }

    /// Consume the state, yielding the structured form and final output.
    pub fn into_parts(self) -> (Option<StructuredForm>, Option<String>) {
        (self.structured_form, self.output_text)
    }
}
