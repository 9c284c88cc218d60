pub mod density;
pub mod performance;
pub mod radius;

pub use self::density::{compute_density, RegionModel};
pub use self::performance::{AttemptStats, PerformanceTracker};
pub use self::radius::RadiusController;

use crate::config::RadiusParams;
use crate::targets::Target;
use tracing::debug;

/// Result of feeding one attempt through the closed loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusUpdate {
    pub target_index: usize,
    pub region: usize,
    pub old_radius: f32,
    pub new_radius: f32,
    pub stats: AttemptStats,
}

/// Region statistics, distance history and radius control for one target set.
#[derive(Debug, Clone)]
pub struct AdaptiveModel {
    pub regions: RegionModel,
    pub tracker: PerformanceTracker,
    pub controller: RadiusController,
}

impl AdaptiveModel {
    pub fn new(targets: &[Target], params: &RadiusParams) -> Self {
        Self {
            regions: RegionModel::new(targets, params.region_count),
            tracker: PerformanceTracker::new(),
            controller: RadiusController::new(params),
        }
    }

    /// Drops all history and recomputes densities for a new target set.
    pub fn reset(&mut self, targets: &[Target]) {
        self.regions = RegionModel::new(targets, self.regions.region_count());
        self.tracker.clear();
    }

    /// Records the attempt and applies the resulting radius to `target`.
    ///
    /// Static (rectangular) targets are recorded but keep their radius.
    pub fn adapt(&mut self, target: &mut Target, distance: f32, success: bool) -> RadiusUpdate {
        let region = self.regions.region_of(target.index);
        let density = self.regions.density(region);
        let stats = self
            .tracker
            .record_attempt(target.index, region, distance, success);

        let old_radius = target.hit_radius;
        if target.shape.is_adaptive() {
            target.hit_radius = self.controller.update_radius(
                old_radius,
                stats.mean_distance,
                success,
                density,
                stats.prior_success_rate,
            );
        }

        debug!(
            target = target.index,
            region,
            success,
            distance,
            old_radius,
            new_radius = target.hit_radius,
            "radius updated"
        );

        RadiusUpdate {
            target_index: target.index,
            region,
            old_radius,
            new_radius: target.hit_radius,
            stats,
        }
    }

    pub fn region_success_rate(&self, region: usize) -> f32 {
        self.tracker.region_success_rate(region)
    }
}
