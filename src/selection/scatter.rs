use super::{EscalationPolicy, TrialContext, TrialTimer};
use crate::config::EscalationParams;
use crate::error::{TapZoneError, TzResult};
use crate::geometry::{Magnifier, Point};
use crate::outcome::EngineEvent;
use crate::resolver::resolve;
use tracing::{debug, info};

/// Single-tap acquisition against adaptive hit radii.
///
/// Every tap is resolved to the nearest target and fed back into the
/// adaptive model. Misses feed the escalation policy, which opens (or
/// deepens) a magnifier at the pointer instead of switching phases.
#[derive(Debug, Clone)]
pub struct ScatterSession {
    active: bool,
    timer: TrialTimer,
    escalation: EscalationPolicy,
    magnifier: Option<Magnifier>,
    magnifier_radius: f32,
}

impl ScatterSession {
    pub fn new(params: &EscalationParams) -> Self {
        Self {
            active: false,
            timer: TrialTimer::default(),
            escalation: EscalationPolicy::new(params),
            magnifier: None,
            magnifier_radius: params.magnifier_radius,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn magnifier(&self) -> Option<Magnifier> {
        self.magnifier
    }

    pub fn zoom_level(&self) -> f32 {
        self.escalation.zoom_level()
    }

    pub fn consecutive_misses(&self) -> u32 {
        self.escalation.consecutive_misses()
    }

    pub fn failed_attempts(&self) -> u32 {
        self.timer.failed_attempts
    }

    pub fn start_trial(&mut self, ctx: &mut TrialContext<'_>, trial: u32) -> TzResult<Vec<EngineEvent>> {
        if self.active {
            return Err(TapZoneError::TrialInProgress {
                trial: self.timer.trial,
            });
        }
        if ctx.targets.is_empty() {
            return Err(TapZoneError::NoTargets);
        }

        self.active = true;
        self.timer = TrialTimer::begin(trial, ctx.now_ms);
        self.escalation.reset();
        Ok(vec![EngineEvent::TrialStarted {
            trial,
            target: None,
        }])
    }

    pub fn pointer_down(&mut self, ctx: &mut TrialContext<'_>, raw: Point) -> TzResult<Vec<EngineEvent>> {
        if !self.active {
            return Err(TapZoneError::NoActiveTrial);
        }

        let resolution = resolve(raw, ctx.targets.as_slice());
        let mut events = Vec::new();

        if let Some(res) = resolution {
            if let Some(target) = ctx.targets.get_mut(res.position) {
                ctx.adaptive.adapt(target, res.distance, res.within_radius);

                if res.within_radius {
                    self.escalation.on_hit();
                    let outcome = self.timer.outcome(
                        ctx.now_ms,
                        Some(target.index),
                        target.value,
                        true,
                        res.distance,
                        true,
                    );
                    info!(
                        trial = self.timer.trial,
                        target = target.index,
                        failed_attempts = self.timer.failed_attempts,
                        elapsed_ms = outcome.elapsed_ms,
                        "scatter trial finished"
                    );
                    events.push(EngineEvent::Outcome(outcome));
                    if self.magnifier.take().is_some() {
                        events.push(EngineEvent::MagnifierCleared);
                    }
                    self.active = false;
                    return Ok(events);
                }
            }
        }

        let distance = resolution.map(|r| r.distance).unwrap_or(f32::MAX);
        self.timer.miss();
        events.push(EngineEvent::Outcome(self.timer.outcome(
            ctx.now_ms, None, 0.0, false, distance, false,
        )));

        if let Some(assist) = self.escalation.on_miss(raw) {
            debug!(zoom_level = assist.zoom_level, "escalating to magnifier");
            self.magnifier = Some(Magnifier::new(
                raw,
                assist.zoom_level,
                self.magnifier_radius,
            ));
            events.push(EngineEvent::Assist(assist));
        }
        Ok(events)
    }

    /// Re-centres an open magnifier; does nothing otherwise.
    pub fn pointer_move(&mut self, raw: Point) -> Vec<EngineEvent> {
        match self.magnifier.as_mut() {
            Some(m) => {
                m.center = raw;
                vec![EngineEvent::MagnifierMoved(raw)]
            }
            None => Vec::new(),
        }
    }

    /// Lifting the pointer always closes the magnifier and drops the zoom.
    pub fn pointer_up(&mut self) -> Vec<EngineEvent> {
        self.escalation.reset_zoom();
        match self.magnifier.take() {
            Some(_) => vec![EngineEvent::MagnifierCleared],
            None => Vec::new(),
        }
    }

    pub fn abort(&mut self) -> Option<EngineEvent> {
        let had_magnifier = self.magnifier.take().is_some();
        self.active = false;
        self.escalation.reset();
        had_magnifier.then_some(EngineEvent::MagnifierCleared)
    }
}
