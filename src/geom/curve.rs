use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use super::{Point3, Vec3};

/// Numeric step used by the default derivative, relative to the unit domain.
const DERIVATIVE_STEP: f64 = 1e-6;

/// A parametric curve on the normalized domain `[0, 1]`.
pub trait Curve3 {
    fn point_at(&self, t: f64) -> Point3;

    #[must_use]
    fn is_closed(&self) -> bool {
        false
    }

    /// Central difference, one-sided at the ends of an open curve.
    #[must_use]
    fn derivative_at(&self, t: f64) -> Vec3 {
        let (t0, t1) = if self.is_closed() {
            (t - DERIVATIVE_STEP, t + DERIVATIVE_STEP)
        } else {
            ((t - DERIVATIVE_STEP).max(0.0), (t + DERIVATIVE_STEP).min(1.0))
        };
        if t1 == t0 {
            return Vec3::ZERO;
        }
        self.point_at(t1)
            .sub_point(self.point_at(t0))
            .mul_scalar(1.0 / (t1 - t0))
    }
}

/// `steps` uniform samples; open curves include the end point (`steps + 1`
/// points), closed curves do not repeat the start.
pub fn tessellate_curve_uniform(curve: &impl Curve3, steps: usize) -> Vec<Point3> {
    let steps = steps.max(1);
    let count = if curve.is_closed() { steps } else { steps + 1 };
    #[allow(clippy::cast_precision_loss)]
    let denom = steps as f64;
    (0..count)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64 / denom;
            curve.point_at(t)
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// ArcCurve
// ─────────────────────────────────────────────────────────────────────────────

/// Circular arc in the XZ plane, used as a bend centerline.
///
/// `point_at(t) = center + radius·(cos a, 0, sin a)` with `a` interpolated from
/// `start_angle` to `end_angle`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcCurve {
    pub center: Point3,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl ArcCurve {
    #[must_use]
    pub const fn new(center: Point3, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            center,
            radius,
            start_angle,
            end_angle,
        }
    }

    /// Angle at parameter `t`; exact at both ends.
    #[must_use]
    pub fn angle_at(&self, t: f64) -> f64 {
        let u = t.clamp(0.0, 1.0);
        self.start_angle * (1.0 - u) + self.end_angle * u
    }

    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Unit vector from the center toward the curve at `angle`.
    #[must_use]
    pub fn radial_at_angle(angle: f64) -> Vec3 {
        let (sin, cos) = angle.sin_cos();
        Vec3::new(cos, 0.0, sin)
    }

    #[must_use]
    pub fn point_at_angle(&self, angle: f64) -> Point3 {
        self.center
            .add_vec(Self::radial_at_angle(angle).mul_scalar(self.radius))
    }

    /// Unit tangent in the direction of increasing `t`.
    #[must_use]
    pub fn tangent_at_angle(&self, angle: f64) -> Vec3 {
        let (sin, cos) = angle.sin_cos();
        let forward = Vec3::new(-sin, 0.0, cos);
        if self.sweep() < 0.0 { -forward } else { forward }
    }
}

impl Curve3 for ArcCurve {
    fn point_at(&self, t: f64) -> Point3 {
        self.point_at_angle(self.angle_at(t))
    }

    fn derivative_at(&self, t: f64) -> Vec3 {
        let (sin, cos) = self.angle_at(t).sin_cos();
        Vec3::new(-sin, 0.0, cos).mul_scalar(self.radius * self.sweep())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SaddleCurve
// ─────────────────────────────────────────────────────────────────────────────

/// Which local axis of the stub frame the main pipe runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaddleAxis {
    #[default]
    X,
    Y,
}

/// Intersection of a branch cylinder (axis +Z through the origin) with the wall
/// of a main cylinder whose axis lies along [`SaddleAxis`] through the origin.
///
/// For angle θ on the stub circle, `c(θ)` is the circle coordinate across the main
/// pipe and `z(θ) = sqrt(max(0, R² − c²))`. The clamp keeps the curve finite when
/// the stub is wider than the main pipe; those points sit on the main pipe axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaddleCurve {
    pub stub_radius: f64,
    pub main_radius: f64,
    pub axis: SaddleAxis,
}

impl SaddleCurve {
    #[must_use]
    pub const fn new(stub_radius: f64, main_radius: f64, axis: SaddleAxis) -> Self {
        Self {
            stub_radius,
            main_radius,
            axis,
        }
    }

    /// `false` when the branch is wider than the run and the clamp is active.
    #[must_use]
    pub fn is_well_defined(&self) -> bool {
        self.stub_radius <= self.main_radius
    }

    /// Stub-circle coordinate perpendicular to the main pipe axis.
    #[must_use]
    pub fn cross_coordinate(&self, theta: f64) -> f64 {
        match self.axis {
            SaddleAxis::X => self.stub_radius * theta.sin(),
            SaddleAxis::Y => self.stub_radius * theta.cos(),
        }
    }

    /// Height of the main pipe's wall above its axis at stub angle `theta`.
    #[must_use]
    pub fn height_at_angle(&self, theta: f64) -> f64 {
        let c = self.cross_coordinate(theta);
        (self.main_radius * self.main_radius - c * c).max(0.0).sqrt()
    }

    #[must_use]
    pub fn point_at_angle(&self, theta: f64) -> Point3 {
        let (sin, cos) = theta.sin_cos();
        Point3::new(
            self.stub_radius * cos,
            self.stub_radius * sin,
            self.height_at_angle(theta),
        )
    }
}

impl Curve3 for SaddleCurve {
    fn point_at(&self, t: f64) -> Point3 {
        self.point_at_angle(TAU * t)
    }

    fn is_closed(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arc_derivative_matches_numeric() {
        let arc = ArcCurve::new(Point3::ORIGIN, 100.0, 0.0, std::f64::consts::FRAC_PI_2);
        let analytic = arc.derivative_at(0.3);
        let h = 1e-6;
        let numeric = arc
            .point_at(0.3 + h)
            .sub_point(arc.point_at(0.3 - h))
            .mul_scalar(1.0 / (2.0 * h));
        assert!(analytic.sub(numeric).length() < 1e-4);
    }

    #[test]
    fn closed_curve_samples_do_not_repeat_start() {
        let saddle = SaddleCurve::new(10.0, 20.0, SaddleAxis::X);
        let points = tessellate_curve_uniform(&saddle, 64);
        assert_eq!(points.len(), 64);

        let arc = ArcCurve::new(Point3::ORIGIN, 1.0, 0.0, 1.0);
        assert_eq!(tessellate_curve_uniform(&arc, 8).len(), 9);
    }
}
