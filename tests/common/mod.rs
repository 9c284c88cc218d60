#![allow(dead_code)]

use tapzone::adaptive::AdaptiveModel;
use tapzone::clock::ManualClock;
use tapzone::config::{Config, RadiusParams};
use tapzone::geometry::Point;
use tapzone::selection::TrialContext;
use tapzone::targets::{Target, TargetSet, Viewport};
use tapzone::{AcquisitionEngine, Protocol};

pub const VIEWPORT: Viewport = Viewport::new(1080.0, 1920.0);

/// Target set with explicit positions, all at `radius`.
pub fn targets_at(points: &[(f32, f32)], radius: f32) -> TargetSet {
    TargetSet::from_targets(
        points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Target::new(i, Point::new(x, y), radius))
            .collect(),
    )
}

/// Evenly spaced row of `n` targets at the default base radius.
pub fn row_of(n: usize) -> TargetSet {
    let points: Vec<(f32, f32)> = (0..n).map(|i| (100.0 + i as f32 * 80.0, 500.0)).collect();
    targets_at(&points, RadiusParams::default().base_radius)
}

/// Owned pieces a protocol needs, so tests can build a `TrialContext`.
pub struct Harness {
    pub targets: TargetSet,
    pub adaptive: AdaptiveModel,
    pub now_ms: u64,
}

impl Harness {
    pub fn new(targets: TargetSet) -> Self {
        let adaptive = AdaptiveModel::new(targets.as_slice(), &RadiusParams::default());
        Self {
            targets,
            adaptive,
            now_ms: 0,
        }
    }

    pub fn ctx(&mut self) -> TrialContext<'_> {
        TrialContext {
            targets: &mut self.targets,
            adaptive: &mut self.adaptive,
            viewport: VIEWPORT,
            now_ms: self.now_ms,
        }
    }
}

pub fn seeded_config(seed: u64) -> Config {
    let mut config = Config::default();
    config.session.seed = Some(seed);
    config
}

pub fn engine(protocol: Protocol, seed: u64, clock: ManualClock) -> AcquisitionEngine {
    AcquisitionEngine::builder(protocol)
        .with_config(seeded_config(seed))
        .with_targets(20)
        .with_viewport(VIEWPORT.width, VIEWPORT.height)
        .with_clock(clock)
        .build()
        .expect("engine builds with default config")
}
