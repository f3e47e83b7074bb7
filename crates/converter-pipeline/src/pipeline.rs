//! Pipeline engine
//!
//! Runs an ordered set of stages over a fresh `ConversionState` per request.
//! The stage list is validated once at build time; each request then owns its
//! state and phase machine exclusively, so one `Pipeline` can serve many
//! concurrent requests.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use converter_core::{
    ConversionArtifacts, ConversionOutput, ConversionState, ConvertError, DialectPair, Result,
    StageKind, StateError, StateField,
};
use converter_llm::TransformationService;
use thiserror::Error;

use crate::machine::{PipelineEvent, PipelinePhase, StateMachine, StateTransition};
use crate::stage::{
    PipelineStage, StageContext, StructuringStage, TransformationStage, ValidationStage,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineBuildError {
    #[error("Pipeline has no stages")]
    Empty,

    #[error("Stage {0} appears more than once")]
    DuplicateStage(StageKind),

    #[error("Stage {stage} requires {field:?}, which no earlier stage produces")]
    UnsatisfiedRequirement { stage: StageKind, field: StateField },
}

/// Everything a finished run leaves behind.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub state: ConversionState,
    pub transitions: Vec<StateTransition>,
    /// Whether the terminal stage replaced the previous `output_text`.
    pub corrected: bool,
}

impl PipelineRun {
    pub fn completed_stages(&self) -> Vec<StageKind> {
        self.transitions
            .iter()
            .filter_map(|t| match t.event {
                PipelineEvent::StageCompleted { stage } => Some(stage),
                _ => None,
            })
            .collect()
    }
}

pub struct PipelineBuilder {
    service: Arc<dyn TransformationService>,
    stages: Vec<Box<dyn PipelineStage>>,
}

impl PipelineBuilder {
    pub fn stage<S: PipelineStage + 'static>(mut self, stage: S) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn build(self) -> std::result::Result<Pipeline, PipelineBuildError> {
        validate_stages(&self.stages)?;
        Ok(Pipeline {
            service: self.service,
            stages: self.stages,
        })
    }
}

/// Check the stage list as a dependency graph in declared order.
fn validate_stages(stages: &[Box<dyn PipelineStage>]) -> std::result::Result<(), PipelineBuildError> {
    if stages.is_empty() {
        return Err(PipelineBuildError::Empty);
    }

    let mut seen = HashSet::new();
    let mut available: HashSet<StateField> = HashSet::from([StateField::InputText]);

    for stage in stages {
        let kind = stage.kind();
        if !seen.insert(kind) {
            return Err(PipelineBuildError::DuplicateStage(kind));
        }
        if let Some(field) = stage
            .requires()
            .iter()
            .find(|field| !available.contains(*field))
        {
            return Err(PipelineBuildError::UnsatisfiedRequirement {
                stage: kind,
                field: *field,
            });
        }
        available.extend(stage.produces().iter().copied());
    }

    Ok(())
}

pub struct Pipeline {
    service: Arc<dyn TransformationService>,
    stages: Vec<Box<dyn PipelineStage>>,
}

impl Pipeline {
    pub fn builder(service: Arc<dyn TransformationService>) -> PipelineBuilder {
        PipelineBuilder {
            service,
            stages: Vec::new(),
        }
    }

    /// Structuring, then transformation, then validation.
    pub fn standard(service: Arc<dyn TransformationService>, dialects: &DialectPair) -> Self {
        let stages: Vec<Box<dyn PipelineStage>> = vec![
            Box::new(StructuringStage::new(dialects)),
            Box::new(TransformationStage::new(dialects)),
            Box::new(ValidationStage::new(dialects)),
        ];
        debug_assert!(validate_stages(&stages).is_ok());
        Self { service, stages }
    }

    pub fn plan(&self) -> Vec<StageKind> {
        self.stages.iter().map(|stage| stage.kind()).collect()
    }

    /// Convert one request.
    ///
    /// Fails on blank input, on any service failure, and when the terminal
    /// stage leaves `output_text` empty. A degraded structured form is not a
    /// failure.
    pub async fn convert(&self, request_text: &str) -> Result<ConversionOutput> {
        let run = self.execute(ConversionState::new(request_text)).await?;
        let request_id = run.state.request_id();
        let stages = run.completed_stages();
        let corrected = run.corrected;
        let terminal = stages.last().copied().unwrap_or(StageKind::Validation);

        let (structured_form, output_text) = run.state.into_parts();
        let structured_form =
            structured_form.ok_or(StateError::Missing(StateField::StructuredForm))?;
        let result_text = output_text.ok_or(StateError::Missing(StateField::OutputText))?;

        if result_text.trim().is_empty() {
            log::error!("[{}] {} left an empty statement", request_id, terminal);
            return Err(ConvertError::EmptyOutput { stage: terminal });
        }

        Ok(ConversionOutput {
            request_id,
            result_text,
            artifacts: ConversionArtifacts { structured_form },
            corrected,
            stages,
        })
    }

    /// Drive `state` through every stage, returning the final state.
    ///
    /// Blank input is rejected before any stage runs.
    pub async fn execute(&self, mut state: ConversionState) -> Result<PipelineRun> {
        let request_id = state.request_id();
        if state.input_text().trim().is_empty() {
            log::warn!("[{}] Rejecting blank input", request_id);
            return Err(ConvertError::EmptyInput);
        }
        let ctx = StageContext::new(self.service.as_ref(), request_id);
        let mut machine = StateMachine::new(self.plan());
        let mut corrected = false;
        let run_started = Instant::now();

        log::info!(
            "[{}] Starting conversion of {} chars",
            request_id,
            state.input_text().len()
        );
        advance(&mut machine, PipelineEvent::Started)?;

        for stage in &self.stages {
            let kind = stage.kind();
            if let Some(field) = stage.requires().iter().find(|field| !state.has(**field)) {
                return Err(fail(&mut machine, kind, StateError::Missing(*field).into()));
            }

            let previous_output = state.output_text().map(str::to_owned);
            let stage_started = Instant::now();
            log::info!("[{}] {}", request_id, machine.phase().description());

            if let Err(error) = stage.run(&ctx, &mut state).await {
                return Err(fail(&mut machine, kind, error));
            }

            if let Some(field) = stage.produces().iter().find(|field| !state.has(**field)) {
                return Err(fail(&mut machine, kind, StateError::Missing(*field).into()));
            }

            if stage.produces().contains(&StateField::OutputText) {
                corrected = previous_output.is_some()
                    && previous_output.as_deref() != state.output_text();
            }

            log::info!(
                "[{}] {} completed in {}ms",
                request_id,
                kind,
                stage_started.elapsed().as_millis()
            );
            advance(&mut machine, PipelineEvent::StageCompleted { stage: kind })?;
        }

        if machine.phase() != &PipelinePhase::Done {
            return Err(ConvertError::Transition(format!(
                "pipeline ended in {:?}",
                machine.phase()
            )));
        }

        log::info!(
            "[{}] Conversion finished in {}ms",
            request_id,
            run_started.elapsed().as_millis()
        );

        Ok(PipelineRun {
            state,
            transitions: machine.history().to_vec(),
            corrected,
        })
    }
}

fn advance(machine: &mut StateMachine, event: PipelineEvent) -> Result<()> {
    machine
        .handle_event(event)
        .map(|_| ())
        .map_err(|e| ConvertError::Transition(e.to_string()))
}

/// Record the failure on the machine and hand the error back for propagation.
fn fail(machine: &mut StateMachine, stage: StageKind, error: ConvertError) -> ConvertError {
    if let Err(e) = machine.handle_event(PipelineEvent::StageFailed {
        stage,
        error: error.to_string(),
    }) {
        log::warn!("Could not record failure of {}: {}", stage, e);
    }
    error
}
