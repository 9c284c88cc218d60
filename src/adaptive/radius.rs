use crate::config::RadiusParams;

const SHRINK_RATE: f32 = 0.1;
const DENSITY_DIVISOR: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusController {
    pub base_radius: f32,
    pub min_radius: f32,
    pub max_radius: f32,
}

impl RadiusController {
    pub fn new(params: &RadiusParams) -> Self {
        Self {
            base_radius: params.base_radius,
            min_radius: params.min_radius,
            max_radius: params.max_radius,
        }
    }

    /// Next hit radius after one attempt. The result is always inside
    /// `[min_radius, max_radius]`.
    ///
    /// Success contracts by a fraction of the mean attempt distance relative
    /// to `max_radius`. Failure grows by a density factor (`1 + d/10`) times
    /// a performance factor (`2 - success_rate`).
    pub fn update_radius(
        &self,
        current: f32,
        mean_distance: f32,
        success: bool,
        density: f32,
        region_success_rate: f32,
    ) -> f32 {
        let next = if success {
            current * (1.0 - (mean_distance / self.max_radius) * SHRINK_RATE)
        } else {
            let density_factor = 1.0 + density / DENSITY_DIVISOR;
            let performance_factor = 1.0 + (1.0 - region_success_rate);
            current * density_factor * performance_factor
        };
        self.clamp(next)
    }

    pub fn clamp(&self, radius: f32) -> f32 {
        if radius.is_nan() {
            return self.min_radius;
        }
        radius.clamp(self.min_radius, self.max_radius)
    }
}

impl Default for RadiusController {
    fn default() -> Self {
        Self::new(&RadiusParams::default())
    }
}
