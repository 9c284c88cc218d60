use crate::geometry::{Point, Shape};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

const SERIES_START_VALUE: f32 = 100.0;
const SERIES_STEP: f32 = 5.0;
const SERIES_MIN_VALUE: f32 = 50.0;
const SERIES_MAX_VALUE: f32 = 150.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub index: usize,
    pub position: Point,
    /// Presentation-only label, passed through untouched.
    pub label: String,
    /// Presentation-only payload (e.g. a price), reported with outcomes.
    pub value: f32,
    pub shape: Shape,
    pub(crate) hit_radius: f32,
}

impl Target {
    pub fn new(index: usize, position: Point, radius: f32) -> Self {
        Self {
            index,
            position,
            label: format!("P{}", index + 1),
            value: 0.0,
            shape: Shape::Circle,
            hit_radius: radius,
        }
    }

    pub fn hit_radius(&self) -> f32 {
        self.hit_radius
    }

    /// Whether a pointer at `distance` (from `pointer`) acquires this target.
    pub fn accepts(&self, pointer: Point, distance: f32) -> bool {
        match self.shape {
            Shape::Circle => distance <= self.hit_radius,
            Shape::Rect(rect) => rect.contains(pointer),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum TargetLayout {
    /// Chart-like random walk spread across the viewport width.
    PriceSeries,
    /// Independent uniform positions inside the padded viewport.
    Uniform,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// The live target set of one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetSet {
    targets: Vec<Target>,
}

impl TargetSet {
    pub fn from_targets(targets: Vec<Target>) -> Self {
        Self { targets }
    }

    pub fn generate(
        rng: &mut fastrand::Rng,
        layout: TargetLayout,
        count: usize,
        viewport: Viewport,
        padding: f32,
        base_radius: f32,
    ) -> Self {
        let targets = match layout {
            TargetLayout::PriceSeries => price_series(rng, count, viewport, padding, base_radius),
            TargetLayout::Uniform => uniform(rng, count, viewport, padding, base_radius),
        };
        Self { targets }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Target> {
        self.targets.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Target> {
        self.targets.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Target> {
        self.targets.iter()
    }

    pub fn as_slice(&self) -> &[Target] {
        &self.targets
    }
}

fn usable_span(extent: f32, padding: f32) -> f32 {
    (extent - 2.0 * padding).max(0.0)
}

fn price_series(
    rng: &mut fastrand::Rng,
    count: usize,
    viewport: Viewport,
    padding: f32,
    base_radius: f32,
) -> Vec<Target> {
    let mut values = Vec::with_capacity(count);
    let mut current = SERIES_START_VALUE;
    for _ in 0..count {
        let change = rng.f32() * 2.0 * SERIES_STEP - SERIES_STEP;
        current = (current + change).clamp(SERIES_MIN_VALUE, SERIES_MAX_VALUE);
        values.push(current);
    }

    let min = values.iter().copied().fold(f32::INFINITY, f32::min);
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let range = max - min;

    let span_x = usable_span(viewport.width, padding);
    let span_y = usable_span(viewport.height, padding);
    let step_x = if count > 1 {
        span_x / (count - 1) as f32
    } else {
        0.0
    };
    let bottom = padding + span_y;

    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            let y = if range > 0.0 {
                bottom - (value - min) * span_y / range
            } else {
                bottom
            };
            let mut t = Target::new(i, Point::new(padding + i as f32 * step_x, y), base_radius);
            t.label = format!("T{}", i + 1);
            t.value = value;
            t
        })
        .collect()
}

fn uniform(
    rng: &mut fastrand::Rng,
    count: usize,
    viewport: Viewport,
    padding: f32,
    base_radius: f32,
) -> Vec<Target> {
    let span_x = usable_span(viewport.width, padding);
    let span_y = usable_span(viewport.height, padding);
    (0..count)
        .map(|i| {
            let p = Point::new(padding + rng.f32() * span_x, padding + rng.f32() * span_y);
            Target::new(i, p, base_radius)
        })
        .collect()
}
