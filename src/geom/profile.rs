//! Planar face profiles: an outer boundary with holes.
//!
//! Flange faces are described as a [`FaceProfile`] in the flange's local XY plane:
//! the outline circle as the outer loop, and the bore and each bolt hole as hole
//! loops. The profile is validated here and triangulated by
//! [`triangulate_profile`](super::triangulate_profile).
//!
//! # Main Types
//! - [`PlanarPoint`]: a point in the face plane
//! - [`ProfileLoop`]: a closed, non-self-intersecting loop
//! - [`FaceProfile`]: outer loop (CCW) plus holes (CW)
//! - [`ProfileError`]: why a profile was rejected

use std::f64::consts::TAU;

use super::core::Tolerance;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("profile loop points must be finite")]
    NonFinitePoints,
    #[error("profile loop requires at least 3 points, got {count}")]
    InsufficientPoints { count: usize },
    #[error("profile loop self-intersects")]
    SelfIntersection,
    #[error("profile hole {hole} crosses the outer boundary")]
    HoleIntersectsOuter { hole: usize },
    #[error("profile hole {hole} lies outside the outer boundary")]
    HoleOutsideBoundary { hole: usize },
    #[error("profile holes {first} and {second} overlap")]
    HolesIntersect { first: usize, second: usize },
    #[error("profile triangulation failed: {0}")]
    Triangulation(String),
}

/// A point in a face's local plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// `segments` points on a circle, counter-clockwise from angle zero.
#[must_use]
pub fn circle_loop_points(center: PlanarPoint, radius: f64, segments: usize) -> Vec<PlanarPoint> {
    #[allow(clippy::cast_precision_loss)]
    let denom = segments as f64;
    (0..segments)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let (sin, cos) = (TAU * (i as f64 / denom)).sin_cos();
            PlanarPoint::new(center.x + radius * cos, center.y + radius * sin)
        })
        .collect()
}

fn approx_eq_planar(tol: Tolerance, a: PlanarPoint, b: PlanarPoint) -> bool {
    (a.x - b.x).abs() <= tol.eps && (a.y - b.y).abs() <= tol.eps
}

fn signed_area(points: &[PlanarPoint]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        area += a.x * b.y - b.x * a.y;
    }
    0.5 * area
}

pub(crate) fn orient2d(a: PlanarPoint, b: PlanarPoint, c: PlanarPoint) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn within_box(a: PlanarPoint, p: PlanarPoint, b: PlanarPoint, tol: Tolerance) -> bool {
    p.x >= a.x.min(b.x) - tol.eps
        && p.x <= a.x.max(b.x) + tol.eps
        && p.y >= a.y.min(b.y) - tol.eps
        && p.y <= a.y.max(b.y) + tol.eps
}

pub(crate) fn segments_intersect(
    a: PlanarPoint,
    b: PlanarPoint,
    c: PlanarPoint,
    d: PlanarPoint,
    tol: Tolerance,
) -> bool {
    let o1 = orient2d(a, b, c);
    let o2 = orient2d(a, b, d);
    let o3 = orient2d(c, d, a);
    let o4 = orient2d(c, d, b);

    if o1.abs() <= tol.eps && within_box(a, c, b, tol) {
        return true;
    }
    if o2.abs() <= tol.eps && within_box(a, d, b, tol) {
        return true;
    }
    if o3.abs() <= tol.eps && within_box(c, a, d, tol) {
        return true;
    }
    if o4.abs() <= tol.eps && within_box(c, b, d, tol) {
        return true;
    }

    let ab = (o1 > tol.eps && o2 < -tol.eps) || (o1 < -tol.eps && o2 > tol.eps);
    let cd = (o3 > tol.eps && o4 < -tol.eps) || (o3 < -tol.eps && o4 > tol.eps);
    ab && cd
}

fn loop_self_intersects(points: &[PlanarPoint], tol: Tolerance) -> bool {
    let n = points.len();
    if n < 4 {
        return false;
    }
    for i in 0..n {
        let a0 = points[i];
        let a1 = points[(i + 1) % n];
        for j in (i + 1)..n {
            let j_next = (j + 1) % n;
            if j == (i + 1) % n || j_next == i {
                continue;
            }
            if segments_intersect(a0, a1, points[j], points[j_next], tol) {
                return true;
            }
        }
    }
    false
}

fn loops_intersect(a: &[PlanarPoint], b: &[PlanarPoint], tol: Tolerance) -> bool {
    (0..a.len()).any(|i| {
        let a0 = a[i];
        let a1 = a[(i + 1) % a.len()];
        (0..b.len()).any(|j| segments_intersect(a0, a1, b[j], b[(j + 1) % b.len()], tol))
    })
}

/// Even-odd point-in-polygon test.
fn contains_point(p: PlanarPoint, points: &[PlanarPoint]) -> bool {
    let mut inside = false;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        if (a.y > p.y) == (b.y > p.y) {
            continue;
        }
        let t = (p.y - a.y) / (b.y - a.y);
        if p.x < a.x + t * (b.x - a.x) {
            inside = !inside;
        }
    }
    inside
}

/// A closed loop with at least three distinct points and no self-crossings.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileLoop {
    points: Vec<PlanarPoint>,
}

impl ProfileLoop {
    /// Validate and clean a loop: a repeated closing point and consecutive
    /// duplicates are dropped.
    ///
    /// # Errors
    /// Returns `ProfileError` for non-finite, too-short or self-intersecting loops.
    pub fn new(mut points: Vec<PlanarPoint>, tol: Tolerance) -> Result<Self, ProfileError> {
        if points.iter().any(|p| !p.is_finite()) {
            return Err(ProfileError::NonFinitePoints);
        }

        if points.len() > 2
            && points
                .first()
                .zip(points.last())
                .is_some_and(|(first, last)| approx_eq_planar(tol, *first, *last))
        {
            points.pop();
        }

        let mut cleaned: Vec<PlanarPoint> = Vec::with_capacity(points.len());
        for p in points {
            if cleaned.last().is_some_and(|prev| approx_eq_planar(tol, *prev, p)) {
                continue;
            }
            cleaned.push(p);
        }

        if cleaned.len() < 3 {
            return Err(ProfileError::InsufficientPoints { count: cleaned.len() });
        }
        if loop_self_intersects(&cleaned, tol) {
            return Err(ProfileError::SelfIntersection);
        }

        Ok(Self { points: cleaned })
    }

    #[must_use]
    pub fn points(&self) -> &[PlanarPoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Positive area = counter-clockwise, negative = clockwise.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.points)
    }

    #[must_use]
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    #[must_use]
    pub fn contains(&self, point: PlanarPoint) -> bool {
        contains_point(point, &self.points)
    }
}

/// Outer loop with holes, orientation normalized (outer CCW, holes CW).
#[derive(Debug, Clone, PartialEq)]
pub struct FaceProfile {
    pub outer: ProfileLoop,
    pub holes: Vec<ProfileLoop>,
}

impl FaceProfile {
    /// # Errors
    /// Returns `ProfileError` when a hole crosses the outline, lies outside it, or
    /// overlaps another hole. Nested holes count as overlapping.
    pub fn new(outer: ProfileLoop, holes: Vec<ProfileLoop>, tol: Tolerance) -> Result<Self, ProfileError> {
        let outer = if outer.is_ccw() { outer } else { outer.reversed() };

        let mut accepted: Vec<ProfileLoop> = Vec::with_capacity(holes.len());
        for (index, hole) in holes.into_iter().enumerate() {
            let hole = if hole.is_ccw() { hole.reversed() } else { hole };

            if loops_intersect(outer.points(), hole.points(), tol) {
                return Err(ProfileError::HoleIntersectsOuter { hole: index });
            }
            let probe = hole.points()[0];
            if !outer.contains(probe) {
                return Err(ProfileError::HoleOutsideBoundary { hole: index });
            }
            for (other_index, existing) in accepted.iter().enumerate() {
                let nested = existing.contains(probe) || hole.contains(existing.points()[0]);
                if nested || loops_intersect(existing.points(), hole.points(), tol) {
                    return Err(ProfileError::HolesIntersect {
                        first: other_index,
                        second: index,
                    });
                }
            }
            accepted.push(hole);
        }

        Ok(Self {
            outer,
            holes: accepted,
        })
    }

    /// Inside the outline and outside every hole.
    #[must_use]
    pub fn contains(&self, point: PlanarPoint) -> bool {
        self.outer.contains(point) && !self.holes.iter().any(|hole| hole.contains(point))
    }

    /// Enclosed area (outline minus holes).
    #[must_use]
    pub fn area(&self) -> f64 {
        self.outer.signed_area().abs()
            - self
                .holes
                .iter()
                .map(|hole| hole.signed_area().abs())
                .sum::<f64>()
    }
}
