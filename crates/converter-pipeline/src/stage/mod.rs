//! Pipeline stages
//!
//! A stage declares which `ConversionState` fields it reads and which it
//! writes. The pipeline checks those declarations when it is built and again
//! around every run.

use std::time::Instant;

use async_trait::async_trait;
use converter_core::{ConvertError, ConversionState, Result, StageKind, StateField};
use converter_llm::TransformationService;
use uuid::Uuid;

pub mod structuring;
pub mod transformation;
pub mod validation;

pub use structuring::StructuringStage;
pub use transformation::TransformationStage;
pub use validation::ValidationStage;

/// Per-request collaborators handed to every stage.
pub struct StageContext<'a> {
    pub service: &'a dyn TransformationService,
    pub request_id: Uuid,
}

impl<'a> StageContext<'a> {
    pub fn new(service: &'a dyn TransformationService, request_id: Uuid) -> Self {
        Self {
            service,
            request_id,
        }
    }

    /// Invoke the service on behalf of `stage`.
    ///
    /// A failed call becomes `ServiceUnavailable`; the reply text itself is
    /// returned untouched.
    pub async fn call(&self, stage: StageKind, instruction: &str, payload: &str) -> Result<String> {
        log::debug!(
            "[{}] {} request: instruction={} chars, payload={} chars",
            self.request_id,
            stage,
            instruction.len(),
            payload.len()
        );

        let started = Instant::now();
        let reply = self
            .service
            .invoke(instruction, payload)
            .await
            .map_err(|e| {
                log::error!("[{}] {} service call failed: {}", self.request_id, stage, e);
                ConvertError::ServiceUnavailable {
                    stage,
                    message: e.to_string(),
                }
            })?;

        log::debug!(
            "[{}] {} reply: {} chars in {}ms",
            self.request_id,
            stage,
            reply.len(),
            started.elapsed().as_millis()
        );
        Ok(reply)
    }
}

#[async_trait]
pub trait PipelineStage: Send + Sync {
    fn kind(&self) -> StageKind;

    /// Fields that must be populated before the stage runs.
    fn requires(&self) -> &'static [StateField];

    /// Fields the stage populates.
    fn produces(&self) -> &'static [StateField];

    async fn run(&self, ctx: &StageContext<'_>, state: &mut ConversionState) -> Result<()>;
}
