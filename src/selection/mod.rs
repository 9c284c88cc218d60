pub mod ad;
pub mod escalation;
pub mod scatter;
pub mod two_step;

pub use self::ad::{AdSession, AdTrialKind};
pub use self::escalation::{AssistAction, EscalationPolicy};
pub use self::scatter::ScatterSession;
pub use self::two_step::{SelectionPhase, TwoStepMachine};

use crate::adaptive::AdaptiveModel;
use crate::outcome::AttemptOutcome;
use crate::targets::{TargetLayout, TargetSet, Viewport};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Acquisition protocol driven by the engine.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    clap::ValueEnum,
)]
#[strum(serialize_all = "kebab-case")]
pub enum Protocol {
    /// Single tap against adaptive radii, zoom assist after repeated misses.
    Scatter,
    /// Coarse tap, then a precise tap inside a magnified view.
    TwoStep,
    /// Static rectangular hit regions.
    Ad,
}

impl Protocol {
    pub fn default_layout(&self) -> TargetLayout {
        match self {
            Protocol::Scatter => TargetLayout::PriceSeries,
            Protocol::TwoStep | Protocol::Ad => TargetLayout::Uniform,
        }
    }
}

/// Session state a protocol may read or mutate while handling one event.
pub struct TrialContext<'a> {
    pub targets: &'a mut TargetSet,
    pub adaptive: &'a mut AdaptiveModel,
    pub viewport: Viewport,
    pub now_ms: u64,
}

/// Per-trial bookkeeping shared by all protocols.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrialTimer {
    pub trial: u32,
    pub started_at: u64,
    pub failed_attempts: u32,
}

impl TrialTimer {
    pub fn begin(trial: u32, now_ms: u64) -> Self {
        Self {
            trial,
            started_at: now_ms,
            failed_attempts: 0,
        }
    }

    pub fn elapsed(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_at)
    }

    pub fn miss(&mut self) {
        self.failed_attempts += 1;
    }

    pub fn outcome(
        &self,
        now_ms: u64,
        target: Option<usize>,
        value: f32,
        success: bool,
        distance: f32,
        completes_trial: bool,
    ) -> AttemptOutcome {
        AttemptOutcome {
            trial: self.trial,
            target,
            value,
            success,
            distance,
            failed_attempts: self.failed_attempts,
            elapsed_ms: self.elapsed(now_ms),
            completes_trial,
        }
    }
}
