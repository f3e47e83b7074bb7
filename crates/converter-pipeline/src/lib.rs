//! converter-pipeline - Orchestrates the conversion of a source-dialect query
//!
//! A conversion runs three stages over one `ConversionState`:
//! - structuring the input into a schema-less tree (`stage::structuring`)
//! - transforming it into the target dialect (`stage::transformation`)
//! - validating and correcting the candidate (`stage::validation`)
//!
//! `Pipeline` sequences the stages and drives the phase machine in `machine`.

pub mod extractor;
pub mod machine;
pub mod pipeline;
pub mod prompts;
pub mod sanitize;
pub mod stage;

pub use extractor::StructuredExtractor;
pub use machine::{PipelineEvent, PipelinePhase, StateMachine, StateTransition, TransitionError};
pub use pipeline::{Pipeline, PipelineBuildError, PipelineBuilder, PipelineRun};
pub use stage::{
    PipelineStage, StageContext, StructuringStage, TransformationStage, ValidationStage,
};
