use crate::config::EscalationParams;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssistAction {
    pub zoom_level: f32,
    pub clamped_at_max_zoom: bool,
    /// Where the assist view is centred (the pointer of the triggering miss).
    pub center: Point,
}

/// Counts consecutive misses on one acquisition task and raises the zoom
/// level once the threshold is reached.
#[derive(Debug, Clone)]
pub struct EscalationPolicy {
    max_failed_attempts: u32,
    zoom_step: f32,
    min_zoom: f32,
    max_zoom: f32,
    consecutive: u32,
    zoom_level: f32,
}

impl EscalationPolicy {
    pub fn new(params: &EscalationParams) -> Self {
        Self {
            max_failed_attempts: params.max_failed_attempts.max(1),
            zoom_step: params.zoom_step,
            min_zoom: params.min_zoom_level,
            max_zoom: params.max_zoom_level,
            consecutive: 0,
            zoom_level: params.min_zoom_level,
        }
    }

    /// Registers a miss at `pointer`. Fires at most once per
    /// `max_failed_attempts` misses; the counter is zero again afterwards.
    pub fn on_miss(&mut self, pointer: Point) -> Option<AssistAction> {
        self.consecutive += 1;
        if self.consecutive < self.max_failed_attempts {
            return None;
        }
        self.consecutive = 0;

        let raised = self.zoom_level + self.zoom_step;
        let clamped = raised >= self.max_zoom;
        self.zoom_level = raised.min(self.max_zoom).max(self.min_zoom);

        Some(AssistAction {
            zoom_level: self.zoom_level,
            clamped_at_max_zoom: clamped,
            center: pointer,
        })
    }

    pub fn on_hit(&mut self) {
        self.consecutive = 0;
    }

    /// New acquisition task: counter and zoom both start over.
    pub fn reset(&mut self) {
        self.consecutive = 0;
        self.zoom_level = self.min_zoom;
    }

    pub fn reset_zoom(&mut self) {
        self.zoom_level = self.min_zoom;
    }

    pub fn consecutive_misses(&self) -> u32 {
        self.consecutive
    }

    pub fn zoom_level(&self) -> f32 {
        self.zoom_level
    }
}
