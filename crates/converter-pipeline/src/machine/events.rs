use converter_core::StageKind;
use serde::{Deserialize, Serialize};

/// Events that move a conversion between phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineEvent {
    /// The request was accepted and the first stage may begin.
    Started,

    /// A stage wrote its outputs back to the conversion state.
    StageCompleted { stage: StageKind },

    /// A stage could not produce its outputs.
    StageFailed { stage: StageKind, error: String },
}

impl PipelineEvent {
    pub fn is_error_event(&self) -> bool {
        matches!(self, Self::StageFailed { .. })
    }
}
