//! Plane geometry for drawn puzzle edges.
//!
//! The segment intersection test is the classic orientation-based one: two
//! segments intersect iff their endpoints straddle each other, plus the
//! collinear special cases where an endpoint lies on the other segment.

use serde::{Deserialize, Serialize};

/// A point in the plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    #[must_use]
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the squared Euclidean distance to `other`.
    #[must_use]
    #[inline]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Returns the Euclidean distance to `other`.
    #[must_use]
    #[inline]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

/// Turn direction of an ordered point triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// The three points lie on one line.
    Collinear,
    /// `p -> q -> r` turns clockwise (in a y-down screen frame, counter-clockwise in a y-up frame).
    Clockwise,
    /// `p -> q -> r` turns the other way.
    CounterClockwise,
}

/// Returns the orientation of the ordered triple `(p, q, r)`.
#[must_use]
pub fn orientation(p: Point, q: Point, r: Point) -> Orientation {
    let cross = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);
    if cross > 0.0 {
        Orientation::Clockwise
    } else if cross < 0.0 {
        Orientation::CounterClockwise
    } else {
        Orientation::Collinear
    }
}

/// Returns `true` if `q` lies within the bounding box of `p` and `r`.
///
/// Only meaningful when the three points are collinear.
fn on_segment(p: Point, q: Point, r: Point) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// A line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// First endpoint.
    pub start: Point,
    /// Second endpoint.
    pub end: Point,
}

impl Segment {
    /// Creates a segment.
    #[must_use]
    #[inline]
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Returns the length of the segment.
    #[must_use]
    #[inline]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Returns `true` if the two segments have an endpoint in common.
    #[must_use]
    pub fn shares_endpoint(&self, other: &Self) -> bool {
        self.start == other.start
            || self.start == other.end
            || self.end == other.start
            || self.end == other.end
    }

    /// Returns `true` if the two segments have at least one point in common.
    ///
    /// Touching endpoints and collinear overlaps count as intersections. Callers
    /// that treat edges sharing a graph endpoint as non-crossing must filter those
    /// pairs out before calling this.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        segments_intersect(self, other)
    }
}

/// Returns `true` if segments `a` and `b` intersect.
#[must_use]
pub fn segments_intersect(a: &Segment, b: &Segment) -> bool {
    let (p1, q1) = (a.start, a.end);
    let (p2, q2) = (b.start, b.end);

    let o1 = orientation(p1, q1, p2);
    let o2 = orientation(p1, q1, q2);
    let o3 = orientation(p2, q2, p1);
    let o4 = orientation(p2, q2, q1);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == Orientation::Collinear && on_segment(p1, p2, q1))
        || (o2 == Orientation::Collinear && on_segment(p1, q2, q1))
        || (o3 == Orientation::Collinear && on_segment(p2, p1, q2))
        || (o4 == Orientation::Collinear && on_segment(p2, q1, q2))
}
