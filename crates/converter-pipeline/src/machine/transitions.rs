//! Phase transitions
//!
//! The machine is built from a stage plan. `Started` enters the first planned
//! stage, `StageCompleted` advances to the next one (or `Done`), and
//! `StageFailed` aborts. Everything else is rejected.

use converter_core::StageKind;
use thiserror::Error;

use super::events::PipelineEvent;
use super::states::PipelinePhase;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid transition from {from:?} with event {event}")]
    InvalidTransition { from: PipelinePhase, event: String },

    #[error("State machine is in terminal state: {0:?}")]
    TerminalState(PipelinePhase),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    pub from: PipelinePhase,
    pub to: PipelinePhase,
    pub event: PipelineEvent,
}

#[derive(Debug, Clone)]
pub struct StateMachine {
    plan: Vec<StageKind>,
    current_phase: PipelinePhase,
    history: Vec<StateTransition>,
}

impl StateMachine {
    pub fn new(plan: Vec<StageKind>) -> Self {
        Self {
            plan,
            current_phase: PipelinePhase::Start,
            history: Vec::new(),
        }
    }

    pub fn phase(&self) -> &PipelinePhase {
        &self.current_phase
    }

    pub fn plan(&self) -> &[StageKind] {
        &self.plan
    }

    pub fn history(&self) -> &[StateTransition] {
        &self.history
    }

    /// Stages that completed, in order.
    pub fn completed_stages(&self) -> Vec<StageKind> {
        self.history
            .iter()
            .filter_map(|t| match t.event {
                PipelineEvent::StageCompleted { stage } => Some(stage),
                _ => None,
            })
            .collect()
    }

    pub fn handle_event(&mut self, event: PipelineEvent) -> Result<StateTransition, TransitionError> {
        let from = self.current_phase.clone();
        let to = self.compute_next_phase(&from, &event)?;

        self.current_phase = to.clone();
        let transition = StateTransition { from, to, event };
        self.history.push(transition.clone());
        Ok(transition)
    }

    pub fn can_transition(&self, event: &PipelineEvent) -> bool {
        self.compute_next_phase(&self.current_phase, event).is_ok()
    }

    fn phase_after(&self, stage: StageKind) -> PipelinePhase {
        self.plan
            .iter()
            .position(|planned| *planned == stage)
            .and_then(|index| self.plan.get(index + 1))
            .map(|next| PipelinePhase::running(*next))
            .unwrap_or(PipelinePhase::Done)
    }

    fn compute_next_phase(
        &self,
        phase: &PipelinePhase,
        event: &PipelineEvent,
    ) -> Result<PipelinePhase, TransitionError> {
        use PipelineEvent::*;

        if phase.is_terminal() {
            return Err(TransitionError::TerminalState(phase.clone()));
        }

        match (phase, event) {
            (PipelinePhase::Start, Started) => Ok(self
                .plan
                .first()
                .map(|stage| PipelinePhase::running(*stage))
                .unwrap_or(PipelinePhase::Done)),

            (running, StageCompleted { stage }) if running.stage() == Some(*stage) => {
                Ok(self.phase_after(*stage))
            }

            (running, StageFailed { stage, error }) if running.stage() == Some(*stage) => {
                Ok(PipelinePhase::Failed {
                    stage: *stage,
                    error_message: error.clone(),
                    failed_at: chrono::Utc::now().to_rfc3339(),
                })
            }

            _ => Err(TransitionError::InvalidTransition {
                from: phase.clone(),
                event: format!("{:?}", event),
            }),
        }
    }
}
