use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline(always)]
    pub fn distance_to(&self, other: Point) -> f32 {
        distance(*self, other)
    }
}

/// Euclidean distance. Coincident points yield 0.
#[inline(always)]
pub fn distance(a: Point, b: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Axis-aligned rectangle. `contains` is inclusive on all edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    pub fn center(&self) -> Point {
        Point::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Hit-test capability of a target.
///
/// `Circle` targets are tested against their (adaptive) hit radius,
/// `Rect` targets against a static rectangle and never adapt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle,
    Rect(Rect),
}

impl Shape {
    pub fn is_adaptive(&self) -> bool {
        matches!(self, Shape::Circle)
    }
}

/// Magnification transform around a fixed zoom center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Magnifier {
    pub center: Point,
    pub scale: f32,
    pub radius: f32,
}

impl Magnifier {
    pub fn new(center: Point, scale: f32, radius: f32) -> Self {
        Self {
            center,
            scale,
            radius,
        }
    }

    /// True space -> magnified screen space.
    pub fn forward(&self, p: Point) -> Point {
        Point::new(
            self.center.x + (p.x - self.center.x) * self.scale,
            self.center.y + (p.y - self.center.y) * self.scale,
        )
    }

    /// Magnified screen space -> true space.
    pub fn inverse(&self, raw: Point) -> Point {
        Point::new(
            self.center.x + (raw.x - self.center.x) / self.scale,
            self.center.y + (raw.y - self.center.y) / self.scale,
        )
    }

    /// Whether a screen-space point falls inside the circular clip region.
    pub fn clips(&self, raw: Point) -> bool {
        distance(self.center, raw) <= self.radius
    }

    /// Square window of true space shown inside the clip region.
    pub fn source_window(&self) -> Rect {
        let half = self.radius / self.scale;
        Rect::new(
            self.center.x - half,
            self.center.y - half,
            self.center.x + half,
            self.center.y + half,
        )
    }
}
