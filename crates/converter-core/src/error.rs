use thiserror::Error;

use crate::stage::StageKind;
use crate::state::StateError;

/// Request-level failure of a conversion.
///
/// Malformed structuring responses never show up here; they are contained as
/// an `ErrorDocument` inside the state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// The request was empty or whitespace only.
    #[error("Input SQL is empty")]
    EmptyInput,

    /// The service call for `stage` failed; the request is aborted.
    #[error("Transformation service failed during {stage}: {message}")]
    ServiceUnavailable { stage: StageKind, message: String },

    /// The terminal stage left nothing to return.
    #[error("The {stage} stage produced an empty statement")]
    EmptyOutput { stage: StageKind },

    /// A stage broke the state access rules.
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// The phase machine rejected an event.
    #[error("Pipeline transition error: {0}")]
    Transition(String),
}

impl ConvertError {
    /// The stage the failure is attributed to, when there is one.
    pub fn stage(&self) -> Option<StageKind> {
        match self {
            Self::ServiceUnavailable { stage, .. } | Self::EmptyOutput { stage } => Some(*stage),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
