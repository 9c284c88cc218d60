use crate::adaptive::{AdaptiveModel, RegionModel};
use crate::clock::{Clock, MonotonicClock};
use crate::config::Config;
use crate::error::TzResult;
use crate::geometry::{Magnifier, Point, Rect};
use crate::outcome::EngineEvent;
use crate::selection::{
    AdSession, Protocol, ScatterSession, SelectionPhase, TrialContext, TwoStepMachine,
};
use crate::targets::{TargetLayout, TargetSet, Viewport};
use tracing::{info, warn};

const DEFAULT_TARGET_COUNT: usize = 50;
const DEFAULT_VIEWPORT: Viewport = Viewport::new(1080.0, 1920.0);

enum ProtocolState {
    Scatter(ScatterSession),
    TwoStep(TwoStepMachine),
    Ad(AdSession),
}

pub struct EngineBuilder {
    config: Config,
    protocol: Protocol,
    layout: Option<TargetLayout>,
    target_count: usize,
    viewport: Viewport,
    clock: Option<Box<dyn Clock>>,
}

impl EngineBuilder {
    pub fn new(protocol: Protocol) -> Self {
        Self {
            config: Config::default(),
            protocol,
            layout: None,
            target_count: DEFAULT_TARGET_COUNT,
            viewport: DEFAULT_VIEWPORT,
            clock: None,
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn with_layout(mut self, layout: TargetLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_targets(mut self, count: usize) -> Self {
        self.target_count = count;
        self
    }

    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Viewport::new(width, height);
        self
    }

    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn build(self) -> TzResult<AcquisitionEngine> {
        self.config.validate()?;

        let mut rng = match self.config.session.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let layout = self
            .layout
            .unwrap_or_else(|| self.protocol.default_layout());
        let targets = TargetSet::generate(
            &mut rng,
            layout,
            self.target_count,
            self.viewport,
            self.config.session.viewport_padding,
            self.config.radius.base_radius,
        );
        let adaptive = AdaptiveModel::new(targets.as_slice(), &self.config.radius);

        let state = match self.protocol {
            Protocol::Scatter => ProtocolState::Scatter(ScatterSession::new(&self.config.escalation)),
            Protocol::TwoStep => ProtocolState::TwoStep(TwoStepMachine::new(&self.config.selection)),
            Protocol::Ad => ProtocolState::Ad(AdSession::new(self.config.radius.base_radius)),
        };

        info!(
            protocol = %self.protocol,
            %layout,
            targets = targets.len(),
            "acquisition engine ready"
        );

        Ok(AcquisitionEngine {
            config: self.config,
            protocol: self.protocol,
            layout,
            viewport: self.viewport,
            targets,
            adaptive,
            rng,
            clock: self
                .clock
                .unwrap_or_else(|| Box::new(MonotonicClock::new())),
            trials_started: 0,
            state,
        })
    }
}

/// Decision engine for one session. Owns every piece of mutable state and
/// processes one inbound event to completion before returning.
pub struct AcquisitionEngine {
    config: Config,
    protocol: Protocol,
    layout: TargetLayout,
    viewport: Viewport,
    targets: TargetSet,
    adaptive: AdaptiveModel,
    rng: fastrand::Rng,
    clock: Box<dyn Clock>,
    trials_started: u32,
    state: ProtocolState,
}

impl AcquisitionEngine {
    pub fn builder(protocol: Protocol) -> EngineBuilder {
        EngineBuilder::new(protocol)
    }

    pub fn start_trial(&mut self) -> TzResult<Vec<EngineEvent>> {
        let trial = self.trials_started + 1;
        let now_ms = self.clock.now_millis();
        let mut ctx = TrialContext {
            targets: &mut self.targets,
            adaptive: &mut self.adaptive,
            viewport: self.viewport,
            now_ms,
        };
        let result = match &mut self.state {
            ProtocolState::Scatter(s) => s.start_trial(&mut ctx, trial),
            ProtocolState::TwoStep(m) => m.start_trial(&mut ctx, &mut self.rng, trial),
            ProtocolState::Ad(a) => a.start_trial(&mut ctx, trial),
        };
        let events = rejecting("start_trial", result)?;
        self.trials_started = trial;
        Ok(events)
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) -> TzResult<Vec<EngineEvent>> {
        let raw = Point::new(x, y);
        let now_ms = self.clock.now_millis();
        let mut ctx = TrialContext {
            targets: &mut self.targets,
            adaptive: &mut self.adaptive,
            viewport: self.viewport,
            now_ms,
        };
        let result = match &mut self.state {
            ProtocolState::Scatter(s) => s.pointer_down(&mut ctx, raw),
            ProtocolState::TwoStep(m) => m.pointer_down(&mut ctx, raw),
            ProtocolState::Ad(a) => a.pointer_down(&mut ctx, raw),
        };
        rejecting("pointer_down", result)
    }

    /// Only meaningful while a magnifier is open; otherwise yields nothing.
    pub fn pointer_move(&mut self, x: f32, y: f32) -> Vec<EngineEvent> {
        match &mut self.state {
            ProtocolState::Scatter(s) => s.pointer_move(Point::new(x, y)),
            ProtocolState::TwoStep(_) | ProtocolState::Ad(_) => Vec::new(),
        }
    }

    pub fn pointer_up(&mut self) -> Vec<EngineEvent> {
        match &mut self.state {
            ProtocolState::Scatter(s) => s.pointer_up(),
            ProtocolState::TwoStep(_) | ProtocolState::Ad(_) => Vec::new(),
        }
    }

    /// Drops the trial in progress without emitting an outcome.
    pub fn abort_trial(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        match &mut self.state {
            ProtocolState::Scatter(s) => events.extend(s.abort()),
            ProtocolState::TwoStep(m) => events.extend(m.abort()),
            ProtocolState::Ad(a) => a.abort(),
        }
        events
    }

    /// Replaces the target set wholesale. Any trial in flight is dropped
    /// without an outcome and all performance history is cleared.
    pub fn regenerate_targets(&mut self, count: usize, width: f32, height: f32) -> Vec<EngineEvent> {
        let aborted = self.trial_in_progress();
        let mut events = self.abort_trial();
        if aborted {
            warn!("target regeneration aborted the trial in progress");
        }

        self.viewport = Viewport::new(width, height);
        self.targets = TargetSet::generate(
            &mut self.rng,
            self.layout,
            count,
            self.viewport,
            self.config.session.viewport_padding,
            self.config.radius.base_radius,
        );
        self.adaptive.reset(self.targets.as_slice());
        info!(count, width, height, "targets regenerated");

        events.push(EngineEvent::TargetsRegenerated { count });
        events
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn targets(&self) -> &TargetSet {
        &self.targets
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn regions(&self) -> &RegionModel {
        &self.adaptive.regions
    }

    pub fn region_success_rate(&self, region: usize) -> f32 {
        self.adaptive.region_success_rate(region)
    }

    pub fn distance_history(&self, target_index: usize) -> &[f32] {
        self.adaptive.tracker.history(target_index)
    }

    pub fn trials_started(&self) -> u32 {
        self.trials_started
    }

    pub fn trial_in_progress(&self) -> bool {
        match &self.state {
            ProtocolState::Scatter(s) => s.is_active(),
            ProtocolState::TwoStep(m) => m.phase() != SelectionPhase::Idle,
            ProtocolState::Ad(a) => a.is_active(),
        }
    }

    /// Phase of the two-step protocol. Other protocols report `CoarseStep`
    /// while a trial runs, as they only have a single tap phase.
    pub fn phase(&self) -> SelectionPhase {
        match &self.state {
            ProtocolState::TwoStep(m) => m.phase(),
            _ if self.trial_in_progress() => SelectionPhase::CoarseStep,
            _ => SelectionPhase::Idle,
        }
    }

    /// Target the current two-step trial is about.
    pub fn active_target(&self) -> Option<usize> {
        match &self.state {
            ProtocolState::TwoStep(m) => m.target(),
            _ => None,
        }
    }

    /// Open magnifier: the precise-step zoom or the scatter assist view.
    pub fn magnifier(&self) -> Option<Magnifier> {
        match &self.state {
            ProtocolState::Scatter(s) => s.magnifier(),
            ProtocolState::TwoStep(m) => m.zoom(),
            ProtocolState::Ad(_) => None,
        }
    }

    /// Hit region of the current fixed-region trial.
    pub fn fixed_region(&self) -> Option<Rect> {
        match &self.state {
            ProtocolState::Ad(a) => a.region(),
            _ => None,
        }
    }

    pub fn zoom_level(&self) -> f32 {
        match &self.state {
            ProtocolState::Scatter(s) => s.zoom_level(),
            ProtocolState::TwoStep(m) if m.zoom().is_some() => self.config.selection.zoom_scale,
            _ => self.config.escalation.min_zoom_level,
        }
    }

    pub fn failed_attempts(&self) -> u32 {
        match &self.state {
            ProtocolState::Scatter(s) => s.failed_attempts(),
            ProtocolState::TwoStep(m) => m.failed_attempts(),
            ProtocolState::Ad(a) => a.failed_attempts(),
        }
    }
}

fn rejecting<T>(op: &'static str, result: TzResult<T>) -> TzResult<T> {
    if let Err(e) = &result {
        if e.is_invalid_call() {
            warn!(op, error = %e, "invalid call ignored");
        }
    }
    result
}
