use async_trait::async_trait;
use converter_core::{ConversionState, DialectPair, Result, StageKind, StateField};

use super::{PipelineStage, StageContext};
use crate::prompts;
use crate::sanitize::strip_wrapping;

/// Checks the candidate against the original query and rewrites
/// `output_text` with the reply, whether or not anything changed.
pub struct ValidationStage {
    dialects: DialectPair,
    instruction: String,
}

impl ValidationStage {
    pub fn new(dialects: &DialectPair) -> Self {
        Self {
            dialects: dialects.clone(),
            instruction: prompts::validation_instruction(dialects),
        }
    }
}

#[async_trait]
impl PipelineStage for ValidationStage {
    fn kind(&self) -> StageKind {
        StageKind::Validation
    }

    fn requires(&self) -> &'static [StateField] {
        &[StateField::InputText, StateField::OutputText]
    }

    fn produces(&self) -> &'static [StateField] {
        &[StateField::OutputText]
    }

    async fn run(&self, ctx: &StageContext<'_>, state: &mut ConversionState) -> Result<()> {
        let candidate = state.require_output_text()?;
        let payload = prompts::validation_payload(&self.dialects, state.input_text(), candidate);

        let reply = ctx.call(self.kind(), &self.instruction, &payload).await?;
        let validated = strip_wrapping(&reply).to_string();
        if validated != candidate {
            log::warn!("[{}] Validation corrected the candidate", ctx.request_id);
        }

        state.set_output_text(validated);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::test_support::ScriptedService;

    #[tokio::test]
    async fn unchanged_reply_still_rewrites_output() {
        let service = ScriptedService::new(["SELECT 1"]);
        let stage = ValidationStage::new(&DialectPair::default());
        let mut state = ConversionState::new("SELECT 1");
        state.set_output_text("SELECT 1");

        stage
            .run(&StageContext::new(&service, state.request_id()), &mut state)
            .await
            .unwrap();

        assert_eq!(state.output_text(), Some("SELECT 1"));
        assert_eq!(state.output_revision(), 2);
        assert_eq!(
            service.payloads(),
            vec!["Original Snowflake SQL:\nSELECT 1\n\nANSI SQL:\nSELECT 1".to_string()]
        );
    }

    #[tokio::test]
    async fn correction_supersedes_candidate() {
        let service = ScriptedService::new(["```sql\nSELECT a FROM t FETCH FIRST 5 ROWS ONLY\n```"]);
        let stage = ValidationStage::new(&DialectPair::default());
        let mut state = ConversionState::new("SELECT a FROM t LIMIT 5");
        state.set_output_text("SELECT a FROM t LIMIT 5");

        stage
            .run(&StageContext::new(&service, state.request_id()), &mut state)
            .await
            .unwrap();

        assert_eq!(
            state.output_text(),
            Some("SELECT a FROM t FETCH FIRST 5 ROWS ONLY")
        );
    }
}
