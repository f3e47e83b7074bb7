//! Pipeline phase machine
//!
//! Tracks which stage of a conversion is running and rejects any transition
//! that leaves the planned stage order.

mod events;
mod states;
mod transitions;

pub use events::PipelineEvent;
pub use states::PipelinePhase;
pub use transitions::{StateMachine, StateTransition, TransitionError};
