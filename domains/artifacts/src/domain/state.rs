//! State machine for a single pipeline run
//!
//! Start → CheckCapability → CheckExistence → Produce → Respond.
//! Error is reachable from every non-terminal state. Respond and Error
//! are terminal.

use serde::{Deserialize, Serialize};

pub use heritage_common::StateError;

/// Pipeline run states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Start,
    CheckCapability,
    CheckExistence,
    Produce,
    Respond,
    Error,
}

impl PipelineState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Respond | Self::Error)
    }

    /// Get all valid next states from current state
    pub fn valid_transitions(&self) -> &'static [PipelineState] {
        match self {
            Self::Start => &[Self::CheckCapability, Self::Error],
            Self::CheckCapability => &[Self::CheckExistence, Self::Error],
            Self::CheckExistence => &[Self::Produce, Self::Error],
            Self::Produce => &[Self::Respond, Self::Error],
            Self::Respond | Self::Error => &[],
        }
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::CheckCapability => write!(f, "check_capability"),
            Self::CheckExistence => write!(f, "check_existence"),
            Self::Produce => write!(f, "produce"),
            Self::Respond => write!(f, "respond"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Events that move a pipeline run forward
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PipelineEvent {
    /// Request accepted, begin gating
    Begin,
    /// Capability gate answered yes
    CapabilityGranted,
    /// Referenced entity exists
    EntityFound,
    /// Producer returned an artifact
    Produced,
    /// Any classified failure
    Fail,
}

impl std::fmt::Display for PipelineEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Begin => write!(f, "begin"),
            Self::CapabilityGranted => write!(f, "capability_granted"),
            Self::EntityFound => write!(f, "entity_found"),
            Self::Produced => write!(f, "produced"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// Pipeline state machine
pub struct PipelineStateMachine;

impl PipelineStateMachine {
    /// Attempt a state transition
    pub fn transition(
        current: PipelineState,
        event: PipelineEvent,
    ) -> Result<PipelineState, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        let next = match (current, event) {
            (_, PipelineEvent::Fail) => PipelineState::Error,
            (PipelineState::Start, PipelineEvent::Begin) => PipelineState::CheckCapability,
            (PipelineState::CheckCapability, PipelineEvent::CapabilityGranted) => {
                PipelineState::CheckExistence
            }
            (PipelineState::CheckExistence, PipelineEvent::EntityFound) => PipelineState::Produce,
            (PipelineState::Produce, PipelineEvent::Produced) => PipelineState::Respond,
            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }

    /// Check if a transition is valid without performing it
    pub fn can_transition(current: PipelineState, event: &PipelineEvent) -> bool {
        Self::transition(current, *event).is_ok()
    }
}

/// States visited by one run, in order
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRun {
    state: PipelineState,
    trace: Vec<PipelineState>,
}

impl Default for PipelineRun {
    fn default() -> Self {
        Self {
            state: PipelineState::Start,
            trace: vec![PipelineState::Start],
        }
    }
}

impl PipelineRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn trace(&self) -> &[PipelineState] {
        &self.trace
    }

    /// Apply an event, recording the new state
    pub fn advance(&mut self, event: PipelineEvent) -> Result<PipelineState, StateError> {
        let next = PipelineStateMachine::transition(self.state, event)?;
        tracing::debug!(from = %self.state, to = %next, event = %event, "Pipeline transition");
        self.state = next;
        self.trace.push(next);
        Ok(next)
    }
}
