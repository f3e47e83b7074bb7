use async_trait::async_trait;
use converter_core::{ConversionState, DialectPair, Result, StageKind, StateField};

use super::{PipelineStage, StageContext};
use crate::extractor::StructuredExtractor;
use crate::prompts;

/// Asks the service for a JSON syntax tree of the input.
///
/// Unusable replies are kept as an `ErrorDocument`; only a failed service
/// call fails the stage.
pub struct StructuringStage {
    instruction: String,
    extractor: StructuredExtractor,
}

impl StructuringStage {
    pub fn new(dialects: &DialectPair) -> Self {
        Self {
            instruction: prompts::structuring_instruction(dialects),
            extractor: StructuredExtractor::new(),
        }
    }
}

#[async_trait]
impl PipelineStage for StructuringStage {
    fn kind(&self) -> StageKind {
        StageKind::Structuring
    }

    fn requires(&self) -> &'static [StateField] {
        &[StateField::InputText]
    }

    fn produces(&self) -> &'static [StateField] {
        &[StateField::StructuredForm]
    }

    async fn run(&self, ctx: &StageContext<'_>, state: &mut ConversionState) -> Result<()> {
        let payload = prompts::structuring_payload(state.input_text());
        let reply = ctx.call(self.kind(), &self.instruction, &payload).await?;

        let form = self.extractor.extract(&reply);
        if let Some(degraded) = form.as_error() {
            log::warn!(
                "[{}] Structuring degraded, continuing with raw reply: {}",
                ctx.request_id,
                degraded.error
            );
        }

        state.set_structured_form(form)?;
        Ok(())
    }
}
