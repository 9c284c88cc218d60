use std::collections::HashMap;

/// Success-rate prior for a region with no observations.
pub const INITIAL_SUCCESS_RATE: f32 = 0.5;
/// EMA weight kept from the previous rate; the new observation gets the rest.
pub const SUCCESS_RATE_RETENTION: f32 = 0.7;

/// Snapshot taken while recording one attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttemptStats {
    /// Mean of the target's distance history, current attempt included.
    pub mean_distance: f32,
    /// Region success rate before this attempt was folded in.
    pub prior_success_rate: f32,
    pub updated_success_rate: f32,
}

#[derive(Debug, Clone, Default)]
pub struct PerformanceTracker {
    history: HashMap<usize, Vec<f32>>,
    region_success: HashMap<usize, f32>,
    attempts: usize,
}

impl PerformanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_attempt(
        &mut self,
        target_index: usize,
        region: usize,
        distance: f32,
        success: bool,
    ) -> AttemptStats {
        let history = self.history.entry(target_index).or_default();
        history.push(distance);
        let mean_distance = history.iter().sum::<f32>() / history.len() as f32;

        let prior = self.region_success_rate(region);
        let observed = if success { 1.0 } else { 0.0 };
        let updated = (prior * SUCCESS_RATE_RETENTION + observed * (1.0 - SUCCESS_RATE_RETENTION))
            .clamp(0.0, 1.0);
        self.region_success.insert(region, updated);
        self.attempts += 1;

        AttemptStats {
            mean_distance,
            prior_success_rate: prior,
            updated_success_rate: updated,
        }
    }

    pub fn region_success_rate(&self, region: usize) -> f32 {
        self.region_success
            .get(&region)
            .copied()
            .unwrap_or(INITIAL_SUCCESS_RATE)
    }

    pub fn history(&self, target_index: usize) -> &[f32] {
        self.history
            .get(&target_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn mean_distance(&self, target_index: usize) -> Option<f32> {
        let h = self.history(target_index);
        if h.is_empty() {
            None
        } else {
            Some(h.iter().sum::<f32>() / h.len() as f32)
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.region_success.clear();
        self.attempts = 0;
    }
}
