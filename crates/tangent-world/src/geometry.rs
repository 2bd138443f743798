//! 2D shapes backing fixtures.
//!
//! World space is y-up. A [`Rect`] is anchored at its bottom-left corner.
//! Cheap axis-aligned cases (rect/rect, rect/circle, circle/circle) are tested
//! directly; every other pairing goes through the parry narrow phase bundled
//! with rapier2d.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use rapier2d::parry::query;
use rapier2d::prelude::{Isometry, Point, Real, SharedShape};
use serde::{Deserialize, Serialize};

/// Distance under which a point counts as lying on a line segment.
const LINE_EPSILON: f32 = 1e-3;

// ---------------------------------------------------------------------------
// Vec2
// ---------------------------------------------------------------------------

/// A 2D vector or point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn cross(self, other: Vec2) -> f32 {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    fn to_point(self) -> Point<Real> {
        Point::new(self.x as Real, self.y as Real)
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

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

// ---------------------------------------------------------------------------
// Anchor
// ---------------------------------------------------------------------------

/// One of the nine reference points of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Anchor {
    BottomLeft,
    BottomCenter,
    BottomRight,
    CenterLeft,
    Center,
    CenterRight,
    TopLeft,
    TopCenter,
    TopRight,
}

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// Axis-aligned rectangle anchored at its bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle of the given size centered on `center`.
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.x = center.x - self.width / 2.0;
        self.y = center.y - self.height / 2.0;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// The reference point named by `anchor`.
    pub fn point(&self, anchor: Anchor) -> Vec2 {
        let (cx, cy) = (self.x + self.width / 2.0, self.y + self.height / 2.0);
        match anchor {
            Anchor::BottomLeft => Vec2::new(self.x, self.y),
            Anchor::BottomCenter => Vec2::new(cx, self.y),
            Anchor::BottomRight => Vec2::new(self.right(), self.y),
            Anchor::CenterLeft => Vec2::new(self.x, cy),
            Anchor::Center => Vec2::new(cx, cy),
            Anchor::CenterRight => Vec2::new(self.right(), cy),
            Anchor::TopLeft => Vec2::new(self.x, self.top()),
            Anchor::TopCenter => Vec2::new(cx, self.top()),
            Anchor::TopRight => Vec2::new(self.right(), self.top()),
        }
    }

    /// Inclusive point containment; points on the border count.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.top()
    }

    /// Strict overlap; rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.top()
            && self.top() > other.y
    }

    /// The overlapping region, if any.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.overlaps(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let top = self.top().min(other.top());
        Some(Rect::new(x, y, right - x, top - y))
    }

    /// Points where `line` crosses the rectangle's border, in edge order
    /// (bottom, right, top, left) with duplicates at corners removed.
    pub fn line_intersections(&self, line: &Line) -> Vec<Vec2> {
        let corners = [
            self.point(Anchor::BottomLeft),
            self.point(Anchor::BottomRight),
            self.point(Anchor::TopRight),
            self.point(Anchor::TopLeft),
        ];
        let mut out: Vec<Vec2> = Vec::new();
        for i in 0..4 {
            let edge = Line::new(corners[i], corners[(i + 1) % 4]);
            if let Some(p) = line.intersection(&edge) {
                if !out.iter().any(|q| (*q - p).length() < LINE_EPSILON) {
                    out.push(p);
                }
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Circle, Line, Polygon
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        (p - self.center).length() <= self.radius
    }
}

/// A line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub a: Vec2,
    pub b: Vec2,
}

impl Line {
    pub const fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    /// Shortest distance from `p` to the segment.
    pub fn distance_to(&self, p: Vec2) -> f32 {
        let ab = self.b - self.a;
        let len_sq = ab.dot(ab);
        if len_sq == 0.0 {
            return (p - self.a).length();
        }
        let t = ((p - self.a).dot(ab) / len_sq).clamp(0.0, 1.0);
        (p - (self.a + ab * t)).length()
    }

    /// Crossing point of two segments; parallel segments never intersect.
    pub fn intersection(&self, other: &Line) -> Option<Vec2> {
        let r = self.b - self.a;
        let s = other.b - other.a;
        let denom = r.cross(s);
        if denom.abs() < f32::EPSILON {
            return None;
        }
        let qp = other.a - self.a;
        let t = qp.cross(s) / denom;
        let u = qp.cross(r) / denom;
        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
            Some(self.a + r * t)
        } else {
            None
        }
    }
}

/// A convex polygon in world coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Vec2>,
}

impl Polygon {
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self { vertices }
    }

    /// Even-odd ray crossing test.
    pub fn contains(&self, p: Vec2) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (vi, vj) = (self.vertices[i], self.vertices[j]);
            if (vi.y > p.y) != (vj.y > p.y)
                && p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    pub fn bounding_rect(&self) -> Rect {
        let Some(first) = self.vertices.first() else {
            return Rect::default();
        };
        let (mut min, mut max) = (*first, *first);
        for v in &self.vertices[1..] {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
        }
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }
}

// ---------------------------------------------------------------------------
// Shape
// ---------------------------------------------------------------------------

/// The geometric shape of a fixture, in world coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect(Rect),
    Circle(Circle),
    Line(Line),
    Polygon(Polygon),
}

impl Shape {
    pub fn bounding_rect(&self) -> Rect {
        match self {
            Shape::Rect(r) => *r,
            Shape::Circle(c) => Rect::from_center(c.center, c.radius * 2.0, c.radius * 2.0),
            Shape::Line(l) => {
                let x = l.a.x.min(l.b.x);
                let y = l.a.y.min(l.b.y);
                Rect::new(x, y, (l.a.x - l.b.x).abs(), (l.a.y - l.b.y).abs())
            }
            Shape::Polygon(p) => p.bounding_rect(),
        }
    }

    pub fn center(&self) -> Vec2 {
        match self {
            Shape::Circle(c) => c.center,
            other => other.bounding_rect().center(),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Shape::Rect(r) => r.translate(delta),
            Shape::Circle(c) => c.center += delta,
            Shape::Line(l) => {
                l.a += delta;
                l.b += delta;
            }
            Shape::Polygon(p) => p.vertices.iter_mut().for_each(|v| *v += delta),
        }
    }

    /// Move the shape so its center lands on `center`.
    pub fn set_center(&mut self, center: Vec2) {
        let delta = center - self.center();
        if !delta.is_zero() {
            self.translate(delta);
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        match self {
            Shape::Rect(r) => r.contains(p),
            Shape::Circle(c) => c.contains(p),
            Shape::Line(l) => l.distance_to(p) <= LINE_EPSILON,
            Shape::Polygon(poly) => poly.contains(p),
        }
    }

    /// Narrow-phase overlap test.
    ///
    /// Unsupported parry pairings are reported as non-overlapping.
    pub fn overlaps(&self, other: &Shape) -> bool {
        match (self, other) {
            (Shape::Rect(a), Shape::Rect(b)) => a.overlaps(b),
            (Shape::Circle(a), Shape::Circle(b)) => {
                (a.center - b.center).length() < a.radius + b.radius
            }
            (Shape::Rect(r), Shape::Circle(c)) | (Shape::Circle(c), Shape::Rect(r)) => {
                let nearest = Vec2::new(
                    c.center.x.clamp(r.x, r.right()),
                    c.center.y.clamp(r.y, r.top()),
                );
                (c.center - nearest).length() < c.radius
            }
            _ => {
                if !self.bounding_rect_inclusive_overlap(other) {
                    return false;
                }
                let (Some((iso_a, a)), Some((iso_b, b))) = (self.to_parry(), other.to_parry())
                else {
                    return false;
                };
                match query::intersection_test(&iso_a, &*a, &iso_b, &*b) {
                    Ok(hit) => hit,
                    Err(_) => {
                        tracing::warn!(
                            shape_a = ?self,
                            shape_b = ?other,
                            "overlap test unsupported for this shape pairing"
                        );
                        false
                    }
                }
            }
        }
    }

    /// Broad-phase check; inclusive so degenerate line bounds still qualify.
    fn bounding_rect_inclusive_overlap(&self, other: &Shape) -> bool {
        let (a, b) = (self.bounding_rect(), other.bounding_rect());
        a.x <= b.right() && a.right() >= b.x && a.y <= b.top() && a.top() >= b.y
    }

    fn to_parry(&self) -> Option<(Isometry<Real>, SharedShape)> {
        match self {
            Shape::Rect(r) => {
                let c = r.center();
                Some((
                    Isometry::translation(c.x as Real, c.y as Real),
                    SharedShape::cuboid(r.width as Real / 2.0, r.height as Real / 2.0),
                ))
            }
            Shape::Circle(c) => Some((
                Isometry::translation(c.center.x as Real, c.center.y as Real),
                SharedShape::ball(c.radius as Real),
            )),
            Shape::Line(l) => Some((
                Isometry::identity(),
                SharedShape::segment(l.a.to_point(), l.b.to_point()),
            )),
            Shape::Polygon(p) => {
                let points: Vec<Point<Real>> = p.vertices.iter().map(|v| v.to_point()).collect();
                SharedShape::convex_hull(&points).map(|s| (Isometry::identity(), s))
            }
        }
    }
}

impl From<Rect> for Shape {
    fn from(r: Rect) -> Self {
        Shape::Rect(r)
    }
}

impl From<Circle> for Shape {
    fn from(c: Circle) -> Self {
        Shape::Circle(c)
    }
}

impl From<Line> for Shape {
    fn from(l: Line) -> Self {
        Shape::Line(l)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_anchor_points() {
        let r = Rect::new(0.0, 0.0, 16.0, 8.0);
        assert_eq!(r.point(Anchor::BottomCenter), Vec2::new(8.0, 0.0));
        assert_eq!(r.point(Anchor::TopRight), Vec2::new(16.0, 8.0));
        assert_eq!(r.point(Anchor::CenterLeft), Vec2::new(0.0, 4.0));
    }

    #[test]
    fn edge_touching_rects_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&Rect::new(9.0, 9.0, 2.0, 2.0)));
    }

    #[test]
    fn intersection_region() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 6.0, 10.0, 10.0);
        assert_eq!(a.intersection(&b), Some(Rect::new(5.0, 6.0, 5.0, 4.0)));
    }

    #[test]
    fn rect_circle_overlap() {
        let r = Shape::Rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        let near = Shape::Circle(Circle::new(Vec2::new(12.0, 5.0), 3.0));
        let far = Shape::Circle(Circle::new(Vec2::new(20.0, 5.0), 3.0));
        assert!(r.overlaps(&near));
        assert!(!r.overlaps(&far));
    }

    #[test]
    fn line_crossing_rect_uses_narrow_phase() {
        let r = Shape::Rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        let crossing = Shape::Line(Line::new(Vec2::new(-5.0, 5.0), Vec2::new(15.0, 5.0)));
        let missing = Shape::Line(Line::new(Vec2::new(-5.0, 20.0), Vec2::new(15.0, 20.0)));
        assert!(r.overlaps(&crossing));
        assert!(!r.overlaps(&missing));
    }

    #[test]
    fn polygon_containment() {
        let tri = Polygon::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
        ]);
        assert!(tri.contains(Vec2::new(2.0, 2.0)));
        assert!(!tri.contains(Vec2::new(8.0, 8.0)));
    }

    #[test]
    fn line_rect_intersection_points() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let hits = r.line_intersections(&Line::new(Vec2::new(-5.0, 5.0), Vec2::new(15.0, 5.0)));
        assert_eq!(hits.len(), 2);
        assert!(hits.contains(&Vec2::new(10.0, 5.0)));
        assert!(hits.contains(&Vec2::new(0.0, 5.0)));
    }

    #[test]
    fn set_center_moves_every_shape_kind() {
        let mut line = Shape::Line(Line::new(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0)));
        line.set_center(Vec2::new(10.0, 10.0));
        assert_eq!(line, Shape::Line(Line::new(Vec2::new(8.0, 10.0), Vec2::new(12.0, 10.0))));

        let mut rect = Shape::Rect(Rect::new(0.0, 0.0, 4.0, 4.0));
        rect.set_center(Vec2::new(0.0, 0.0));
        assert_eq!(rect, Shape::Rect(Rect::new(-2.0, -2.0, 4.0, 4.0)));
    }
}
