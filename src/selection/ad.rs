use super::{TrialContext, TrialTimer};
use crate::error::{TapZoneError, TzResult};
use crate::geometry::{Point, Rect, Shape};
use crate::outcome::EngineEvent;
use crate::resolver::resolve;
use crate::targets::{Target, Viewport};
use serde::{Deserialize, Serialize};
use std::slice;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};
use tracing::info;

const CLOSE_BUTTON_INSET: f32 = 30.0;
const CLOSE_BUTTON_SIZE: f32 = 80.0;
const CLICKABLE_AREA_SIZE: f32 = 200.0;
const CLICKABLE_AREA_OFFSET: f32 = 250.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
pub enum AdTrialKind {
    /// Dismiss via the close button in the top-right corner.
    Standard,
    ImageLink,
    Highlighted,
}

impl AdTrialKind {
    /// Kinds rotate with the 1-based trial number, starting at `Standard`.
    pub fn for_trial(trial: u32) -> Self {
        let kinds: Vec<AdTrialKind> = AdTrialKind::iter().collect();
        kinds[trial.saturating_sub(1) as usize % kinds.len()]
    }

    pub fn hit_region(&self, viewport: Viewport) -> Rect {
        match self {
            AdTrialKind::Standard => Rect::new(
                viewport.width - CLOSE_BUTTON_INSET - CLOSE_BUTTON_SIZE,
                CLOSE_BUTTON_INSET,
                viewport.width - CLOSE_BUTTON_INSET,
                CLOSE_BUTTON_INSET + CLOSE_BUTTON_SIZE,
            ),
            AdTrialKind::ImageLink | AdTrialKind::Highlighted => {
                let c = viewport.center();
                let top = c.y - CLICKABLE_AREA_OFFSET;
                Rect::new(
                    c.x - CLICKABLE_AREA_SIZE / 2.0,
                    top,
                    c.x + CLICKABLE_AREA_SIZE / 2.0,
                    top + CLICKABLE_AREA_SIZE,
                )
            }
        }
    }
}

/// Fixed rectangular hit regions; the degenerate, non-adaptive case.
#[derive(Debug, Clone)]
pub struct AdSession {
    base_radius: f32,
    active: Option<(AdTrialKind, Target)>,
    timer: TrialTimer,
}

impl AdSession {
    /// `base_radius` is carried by the region target but never consulted.
    pub fn new(base_radius: f32) -> Self {
        Self {
            base_radius,
            active: None,
            timer: TrialTimer::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn kind(&self) -> Option<AdTrialKind> {
        self.active.as_ref().map(|(k, _)| *k)
    }

    pub fn target(&self) -> Option<&Target> {
        self.active.as_ref().map(|(_, t)| t)
    }

    pub fn failed_attempts(&self) -> u32 {
        self.timer.failed_attempts
    }

    pub fn region(&self) -> Option<Rect> {
        self.active.as_ref().and_then(|(_, t)| match t.shape {
            Shape::Rect(r) => Some(r),
            Shape::Circle => None,
        })
    }

    pub fn start_trial(&mut self, ctx: &mut TrialContext<'_>, trial: u32) -> TzResult<Vec<EngineEvent>> {
        if self.active.is_some() {
            return Err(TapZoneError::TrialInProgress {
                trial: self.timer.trial,
            });
        }

        let kind = AdTrialKind::for_trial(trial);
        let rect = kind.hit_region(ctx.viewport);
        let mut target = Target::new(0, rect.center(), self.base_radius);
        target.shape = Shape::Rect(rect);
        target.label = kind.to_string();

        self.active = Some((kind, target));
        self.timer = TrialTimer::begin(trial, ctx.now_ms);
        Ok(vec![EngineEvent::TrialStarted {
            trial,
            target: None,
        }])
    }

    pub fn pointer_down(&mut self, ctx: &mut TrialContext<'_>, raw: Point) -> TzResult<Vec<EngineEvent>> {
        let (kind, target) = match &self.active {
            Some((k, t)) => (*k, t),
            None => return Err(TapZoneError::NoActiveTrial),
        };

        let (distance, hit) = match resolve(raw, slice::from_ref(target)) {
            Some(res) => (res.distance, res.within_radius),
            None => (f32::MAX, false),
        };

        if hit {
            let outcome = self
                .timer
                .outcome(ctx.now_ms, None, 0.0, true, distance, true);
            info!(
                trial = self.timer.trial,
                %kind,
                failed_attempts = self.timer.failed_attempts,
                "ad trial finished"
            );
            self.active = None;
            return Ok(vec![EngineEvent::Outcome(outcome)]);
        }

        self.timer.miss();
        Ok(vec![EngineEvent::Outcome(self.timer.outcome(
            ctx.now_ms, None, 0.0, false, distance, false,
        ))])
    }

    pub fn abort(&mut self) {
        self.active = None;
    }
}
