use crate::targets::Target;
use serde::{Deserialize, Serialize};

/// Fixed partition of the target index domain into equal-width bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionModel {
    region_count: usize,
    width: f32,
    densities: Vec<f32>,
}

impl RegionModel {
    pub fn new(targets: &[Target], region_count: usize) -> Self {
        let region_count = region_count.max(1);
        let width = targets.len() as f32 / region_count as f32;
        let mut model = Self {
            region_count,
            width,
            densities: vec![0.0; region_count],
        };

        if width > 0.0 {
            let mut counts = vec![0usize; region_count];
            for t in targets {
                counts[model.region_of(t.index)] += 1;
            }
            model.densities = counts.iter().map(|&c| c as f32 / width).collect();
        }
        model
    }

    /// Band of a target index. Indices past the last band fold into it.
    #[inline(always)]
    pub fn region_of(&self, index: usize) -> usize {
        if self.width <= 0.0 {
            return 0;
        }
        let band = (index as f32 / self.width).floor() as usize;
        band.min(self.region_count - 1)
    }

    pub fn density(&self, region: usize) -> f32 {
        self.densities.get(region).copied().unwrap_or(0.0)
    }

    pub fn densities(&self) -> &[f32] {
        &self.densities
    }

    pub fn region_count(&self) -> usize {
        self.region_count
    }

    pub fn band_width(&self) -> f32 {
        self.width
    }
}

/// Targets-per-unit-index-width for each band.
pub fn compute_density(targets: &[Target], region_count: usize) -> Vec<f32> {
    RegionModel::new(targets, region_count).densities
}
