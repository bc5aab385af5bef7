//! Plain 2D geometry shared by the graph model and the canvas controller.
//!
//! The core stays independent of the GUI toolkit; the front end converts
//! these to `egui` types at the paint boundary.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub};

/// A position, either in world (graph) space or in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn to_vec(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn distance(self, other: Point) -> f32 {
        (self - other).length()
    }
}

/// A displacement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Add<Vec2> for Point {
    type Output = Point;
    fn add(self, rhs: Vec2) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<Vec2> for Point {
    type Output = Point;
    fn sub(self, rhs: Vec2) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Sub for Point {
    type Output = Vec2;
    fn sub(self, rhs: Point) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn from_min_size(min: Point, size: Vec2) -> Self {
        Self {
            min,
            max: min + size,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn left_center(&self) -> Point {
        Point::new(self.min.x, (self.min.y + self.max.y) * 0.5)
    }

    pub fn right_center(&self) -> Point {
        Point::new(self.max.x, (self.min.y + self.max.y) * 0.5)
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }
}

/// Cubic Bezier curve used for connection routing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl CubicBezier {
    /// Flow-chart S-curve: control points sit on the horizontal midpoint,
    /// each pinned to its own endpoint's y.
    pub fn s_curve(from: Point, to: Point) -> Self {
        let mid_x = (from.x + to.x) * 0.5;
        Self {
            p0: from,
            p1: Point::new(mid_x, from.y),
            p2: Point::new(mid_x, to.y),
            p3: to,
        }
    }

    pub fn at(&self, t: f32) -> Point {
        let u = 1.0 - t;
        let tt = t * t;
        let uu = u * u;
        let uuu = uu * u;
        let ttt = tt * t;
        Point::new(
            uuu * self.p0.x + 3.0 * uu * t * self.p1.x + 3.0 * u * tt * self.p2.x + ttt * self.p3.x,
            uuu * self.p0.y + 3.0 * uu * t * self.p1.y + 3.0 * u * tt * self.p2.y + ttt * self.p3.y,
        )
    }

    /// Compute `segments + 1` points along the curve.
    pub fn sample(&self, segments: usize) -> Vec<Point> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.at(i as f32 / segments as f32))
            .collect()
    }

    /// Approximate distance from `p` to the curve, using its polyline.
    pub fn distance_to(&self, p: Point, segments: usize) -> f32 {
        self.sample(segments)
            .windows(2)
            .map(|w| distance_to_segment(p, w[0], w[1]))
            .fold(f32::INFINITY, f32::min)
    }
}

/// Split the straight line `from → to` into dash segments.
pub fn dashed_segments(from: Point, to: Point, dash: f32, gap: f32) -> Vec<(Point, Point)> {
    let delta = to - from;
    let length = delta.length();
    if length <= f32::EPSILON || dash <= 0.0 {
        return Vec::new();
    }
    let dir = delta * (1.0 / length);
    let mut segments = Vec::new();
    let mut travelled = 0.0;
    while travelled < length {
        let end = (travelled + dash).min(length);
        segments.push((from + dir * travelled, from + dir * end));
        travelled = end + gap.max(0.0);
    }
    segments
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let ab = b - a;
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let ap = p - a;
    let t = ((ap.x * ab.x + ap.y * ab.y) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
