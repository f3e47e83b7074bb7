use async_trait::async_trait;
use converter_core::{ConversionState, DialectPair, Result, StageKind, StateField};

use super::{PipelineStage, StageContext};
use crate::prompts;
use crate::sanitize::strip_wrapping;

/// Produces a candidate target-dialect statement from the input and its tree.
///
/// Whatever the service returns is stored after unwrapping; correctness is
/// left to validation.
pub struct TransformationStage {
    dialects: DialectPair,
    instruction: String,
}

impl TransformationStage {
    pub fn new(dialects: &DialectPair) -> Self {
        Self {
            dialects: dialects.clone(),
            instruction: prompts::transformation_instruction(dialects),
        }
    }
}

#[async_trait]
impl PipelineStage for TransformationStage {
    fn kind(&self) -> StageKind {
        StageKind::Transformation
    }

    fn requires(&self) -> &'static [StateField] {
        &[StateField::InputText, StateField::StructuredForm]
    }

    fn produces(&self) -> &'static [StateField] {
        &[StateField::OutputText]
    }

    async fn run(&self, ctx: &StageContext<'_>, state: &mut ConversionState) -> Result<()> {
        let tree = state.require_structured_form()?.to_pretty_json();
        let payload = prompts::transformation_payload(&self.dialects, state.input_text(), &tree);

        let reply = ctx.call(self.kind(), &self.instruction, &payload).await?;
        let candidate = strip_wrapping(&reply);
        if candidate.is_empty() {
            log::warn!("[{}] Transformation returned an empty candidate", ctx.request_id);
        }

        state.set_output_text(candidate);
        Ok(())
    }
}
