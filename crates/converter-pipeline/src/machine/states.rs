use converter_core::StageKind;
use serde::{Deserialize, Serialize};

/// Lifecycle of a single conversion request.
///
/// Running phases map one-to-one onto stage kinds.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PipelinePhase {
    /// State initialised with the input text; nothing has run yet.
    #[default]
    Start,

    /// Asking the service for the syntax tree of the input.
    Structuring,

    /// Asking the service for a candidate statement in the target dialect.
    Transformation,

    /// Asking the service to check and correct the candidate.
    Validation,

    /// Every planned stage completed.
    Done,

    /// A stage failed; the request is aborted.
    Failed {
        /// The stage that was running.
        stage: StageKind,
        /// Display text of the error that ended the request.
        error_message: String,
        failed_at: String, // ISO timestamp
    },
}

impl PipelinePhase {
    /// The phase in which `stage` executes.
    pub fn running(stage: StageKind) -> Self {
        match stage {
            StageKind::Structuring => Self::Structuring,
            StageKind::Transformation => Self::Transformation,
            StageKind::Validation => Self::Validation,
        }
    }

    /// The stage executing in this phase, if any.
    pub fn stage(&self) -> Option<StageKind> {
        match self {
            Self::Structuring => Some(StageKind::Structuring),
            Self::Transformation => Some(StageKind::Transformation),
            Self::Validation => Some(StageKind::Validation),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed { .. })
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Start => "Waiting to start",
            Self::Structuring => "Building syntax tree",
            Self::Transformation => "Translating to target dialect",
            Self::Validation => "Validating translation",
            Self::Done => "Done",
            Self::Failed { .. } => "Failed",
        }
    }
}
