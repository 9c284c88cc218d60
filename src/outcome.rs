use crate::geometry::Point;
use crate::selection::escalation::AssistAction;
use crate::selection::two_step::SelectionPhase;
use serde::{Deserialize, Serialize};

/// One resolved pointer interaction, handed to the trial harness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptOutcome {
    pub trial: u32,
    /// `None` when no target was selected (fixed regions, misses).
    pub target: Option<usize>,
    pub value: f32,
    pub success: bool,
    /// Distance from the target center; `f32::MAX` when there is no target.
    pub distance: f32,
    pub failed_attempts: u32,
    pub elapsed_ms: u64,
    /// Whether this outcome ends the trial.
    pub completes_trial: bool,
}

impl AttemptOutcome {
    /// Index as written to logs: `-1` for no target.
    pub fn logged_index(&self) -> i64 {
        self.target.map(|i| i as i64).unwrap_or(-1)
    }
}

/// Everything the engine tells the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    TrialStarted { trial: u32, target: Option<usize> },
    PhaseChanged { from: SelectionPhase, to: SelectionPhase },
    Outcome(AttemptOutcome),
    Assist(AssistAction),
    MagnifierMoved(Point),
    MagnifierCleared,
    TargetsRegenerated { count: usize },
}

impl EngineEvent {
    pub fn as_outcome(&self) -> Option<&AttemptOutcome> {
        match self {
            EngineEvent::Outcome(o) => Some(o),
            _ => None,
        }
    }
}
