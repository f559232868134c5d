//! Orthonormal frames used to place circular cross-sections.
//!
//! Every frame is right-handed with `binormal = tangent × normal`, so a ring point
//! `origin + r·(normal·cos ψ + binormal·sin ψ)` runs counter-clockwise when seen
//! from the tip of the tangent.

use super::{Point3, Tolerance, Transform, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrenetFrame {
    /// Unit vector pointing along the local axis.
    pub tangent: Vec3,
    /// Unit vector perpendicular to the tangent; angle zero of a ring.
    pub normal: Vec3,
    /// `tangent × normal`; angle π/2 of a ring.
    pub binormal: Vec3,
}

impl FrenetFrame {
    /// The canonical frame every fitting is modelled in: axis +Z, ring start +X.
    pub const CANONICAL: Self = Self {
        tangent: Vec3::Z,
        normal: Vec3::X,
        binormal: Vec3::Y,
    };

    /// Frame whose tangent is `axis`, obtained by rotating [`Self::CANONICAL`]
    /// with [`Transform::from_unit_vectors`]. `None` for a zero axis.
    #[must_use]
    pub fn aligned_to(axis: Vec3) -> Option<Self> {
        let rotation = Transform::from_unit_vectors(Vec3::Z, axis)?;
        Some(Self::CANONICAL.transformed(rotation))
    }

    /// Frame with the normal as close as possible to `reference` while remaining
    /// perpendicular to the tangent. Falls back to [`Self::aligned_to`] when the
    /// reference is zero or within [`Tolerance::ANGLE`] of the tangent.
    #[must_use]
    pub fn from_tangent_with_reference(tangent: Vec3, reference: Vec3) -> Option<Self> {
        let tangent = tangent.normalized()?;
        let projected = reference.sub(tangent.mul_scalar(reference.dot(tangent)));
        if projected.length_squared() <= Tolerance::ANGLE.eps_squared() * reference.length_squared() {
            return Self::aligned_to(tangent);
        }
        let normal = projected.normalized()?;
        Some(Self {
            tangent,
            normal,
            binormal: tangent.cross(normal),
        })
    }

    #[must_use]
    pub fn transformed(self, transform: Transform) -> Self {
        Self {
            tangent: transform.apply_vec(self.tangent),
            normal: transform.apply_vec(self.normal),
            binormal: transform.apply_vec(self.binormal),
        }
    }

    /// Point at `angle` on the circle of `radius` around `origin` in the
    /// normal/binormal plane.
    #[must_use]
    pub fn ring_point(&self, origin: Point3, radius: f64, angle: f64) -> Point3 {
        let (sin, cos) = angle.sin_cos();
        origin
            .add_vec(self.normal.mul_scalar(radius * cos))
            .add_vec(self.binormal.mul_scalar(radius * sin))
    }
}
