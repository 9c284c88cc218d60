use super::{TrialContext, TrialTimer};
use crate::config::SelectionParams;
use crate::error::{TapZoneError, TzResult};
use crate::geometry::{distance, Magnifier, Point};
use crate::outcome::EngineEvent;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum SelectionPhase {
    Idle,
    CoarseStep,
    PreciseStep,
}

/// Coarse-then-precise acquisition of one randomly chosen target.
///
/// `Idle -> CoarseStep -> PreciseStep -> Idle`. The coarse tap is tested
/// against a fixed radius around the true target position; a hit fixes the
/// zoom center. Precise taps are mapped back through the inverse zoom
/// transform and tested against the fixed precise radius.
#[derive(Debug, Clone)]
pub struct TwoStepMachine {
    params: SelectionParams,
    phase: SelectionPhase,
    target: Option<usize>,
    zoom: Option<Magnifier>,
    timer: TrialTimer,
}

impl TwoStepMachine {
    pub fn new(params: &SelectionParams) -> Self {
        Self {
            params: params.clone(),
            phase: SelectionPhase::Idle,
            target: None,
            zoom: None,
            timer: TrialTimer::default(),
        }
    }

    pub fn phase(&self) -> SelectionPhase {
        self.phase
    }

    pub fn target(&self) -> Option<usize> {
        self.target
    }

    pub fn zoom(&self) -> Option<Magnifier> {
        self.zoom
    }

    pub fn failed_attempts(&self) -> u32 {
        self.timer.failed_attempts
    }

    pub fn start_trial(
        &mut self,
        ctx: &mut TrialContext<'_>,
        rng: &mut fastrand::Rng,
        trial: u32,
    ) -> TzResult<Vec<EngineEvent>> {
        if self.phase != SelectionPhase::Idle {
            return Err(TapZoneError::TrialInProgress {
                trial: self.timer.trial,
            });
        }
        if ctx.targets.is_empty() {
            return Err(TapZoneError::NoTargets);
        }

        let target = rng.usize(..ctx.targets.len());
        self.target = Some(target);
        self.zoom = None;
        self.timer = TrialTimer::begin(trial, ctx.now_ms);

        Ok(vec![
            EngineEvent::TrialStarted {
                trial,
                target: Some(target),
            },
            self.transition(SelectionPhase::CoarseStep),
        ])
    }

    pub fn pointer_down(
        &mut self,
        ctx: &mut TrialContext<'_>,
        raw: Point,
    ) -> TzResult<Vec<EngineEvent>> {
        let target_index = match (self.phase, self.target) {
            (SelectionPhase::Idle, _) | (_, None) => return Err(TapZoneError::NoActiveTrial),
            (_, Some(t)) => t,
        };
        let target_pos = match ctx.targets.get(target_index) {
            Some(t) => t.position,
            None => return Err(TapZoneError::NoTargets),
        };

        match self.phase {
            SelectionPhase::CoarseStep => Ok(self.coarse_tap(ctx, raw, target_pos, target_index)),
            SelectionPhase::PreciseStep => Ok(self.precise_tap(ctx, raw, target_pos, target_index)),
            SelectionPhase::Idle => Err(TapZoneError::NoActiveTrial),
        }
    }

    fn coarse_tap(
        &mut self,
        ctx: &mut TrialContext<'_>,
        raw: Point,
        target_pos: Point,
        target_index: usize,
    ) -> Vec<EngineEvent> {
        let d = distance(raw, target_pos);
        if d <= self.params.coarse_radius {
            self.zoom = Some(Magnifier::new(
                raw,
                self.params.zoom_scale,
                self.params.zoom_radius,
            ));
            return vec![self.transition(SelectionPhase::PreciseStep)];
        }

        self.timer.miss();
        let outcome = self
            .timer
            .outcome(ctx.now_ms, Some(target_index), 0.0, false, d, false);
        vec![EngineEvent::Outcome(outcome)]
    }

    fn precise_tap(
        &mut self,
        ctx: &mut TrialContext<'_>,
        raw: Point,
        target_pos: Point,
        target_index: usize,
    ) -> Vec<EngineEvent> {
        let true_point = match self.zoom {
            Some(zoom) => zoom.inverse(raw),
            None => raw,
        };
        let d = distance(true_point, target_pos);
        let success = d <= self.params.precise_radius;

        let value = match ctx.targets.get_mut(target_index) {
            Some(t) => {
                ctx.adaptive.adapt(t, d, success);
                t.value
            }
            None => 0.0,
        };

        if !success {
            self.timer.miss();
        }
        let completes = success || !self.params.retry_on_precise_miss;
        let outcome = self.timer.outcome(
            ctx.now_ms,
            Some(target_index),
            value,
            success,
            d,
            completes,
        );

        let mut events = vec![EngineEvent::Outcome(outcome)];
        if completes {
            info!(
                trial = self.timer.trial,
                target = target_index,
                success,
                failed_attempts = self.timer.failed_attempts,
                "two-step trial finished"
            );
            self.zoom = None;
            self.target = None;
            events.push(self.transition(SelectionPhase::Idle));
        }
        events
    }

    /// Drops an in-flight trial without reporting it.
    pub fn abort(&mut self) -> Option<EngineEvent> {
        if self.phase == SelectionPhase::Idle {
            return None;
        }
        self.zoom = None;
        self.target = None;
        Some(self.transition(SelectionPhase::Idle))
    }

    fn transition(&mut self, to: SelectionPhase) -> EngineEvent {
        let from = self.phase;
        self.phase = to;
        debug!(%from, %to, "phase change");
        EngineEvent::PhaseChanged { from, to }
    }
}
