//! Pipe bends around a center point in the XZ plane.
//!
//! Two constructions are supported:
//! - continuous: both shells swept along an [`ArcCurve`]
//! - mitered: straight chords joined by weld rings, as fabricated from cut pipe

use serde::{Deserialize, Serialize};

use super::config::GeometryConfig;
use super::dimensions::PipeCrossSection;
use super::error::{FittingError, require_positive};
use super::straight::{CylinderCaps, build_hollow_cylinder};
use super::weld::build_weld_ring;
use crate::geom::{
    ArcCurve, Curve3, FrenetFrame, GeomMesh, MeshBuilder, Point3, RingStation, ShellFacing,
    SurfaceKind, emit_tube_shell,
};

/// Bend centerline and, for mitered bends, the number of chords.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BendParameters {
    pub center: Point3,
    /// Centerline radius.
    pub radius: f64,
    /// Radians, measured from +X toward +Z.
    pub start_angle: f64,
    pub end_angle: f64,
    /// Mitered chords; continuous bends ignore it.
    pub segment_count: usize,
}

impl BendParameters {
    #[must_use]
    pub fn arc(&self) -> ArcCurve {
        ArcCurve::new(self.center, self.radius, self.start_angle, self.end_angle)
    }

    /// # Errors
    /// `InvalidDimension` for a non-positive radius or a zero or non-finite sweep.
    pub fn validate(&self) -> Result<(), FittingError> {
        require_positive("bend radius", self.radius)?;
        let sweep = self.end_angle - self.start_angle;
        if !(sweep.is_finite() && sweep != 0.0) || !self.center.is_finite() {
            return Err(FittingError::InvalidDimension {
                name: "bend sweep",
                value: sweep,
            });
        }
        Ok(())
    }

    fn check_section(&self, section: &PipeCrossSection) -> Result<(), FittingError> {
        section.validate()?;
        if section.outer_radius >= self.radius {
            log::warn!(
                "pipe outer radius {} reaches bend radius {}; the inside of the bend self-intersects",
                section.outer_radius,
                self.radius
            );
        }
        Ok(())
    }
}

/// Outer and inner shells swept along the bend arc with `config.bend_samples`
/// longitudinal steps. The ends are left open.
///
/// # Errors
/// Invalid bend parameters, cross-section or config.
pub fn build_continuous_bend(
    params: &BendParameters,
    section: &PipeCrossSection,
    config: &GeometryConfig,
) -> Result<GeomMesh, FittingError> {
    config.validate()?;
    params.validate()?;
    params.check_section(section)?;

    let arc = params.arc();
    let samples = config.bend_samples;
    let mut spine = Vec::with_capacity(samples + 1);
    for i in 0..=samples {
        #[allow(clippy::cast_precision_loss)]
        let angle = arc.angle_at(i as f64 / samples as f64);
        let frame = FrenetFrame::from_tangent_with_reference(
            arc.tangent_at_angle(angle),
            ArcCurve::radial_at_angle(angle),
        )
        .ok_or(FittingError::InvalidDimension {
            name: "bend tangent length",
            value: 0.0,
        })?;
        spine.push((arc.point_at_angle(angle), frame));
    }

    let stations = |radius: f64| -> Vec<RingStation> {
        spine
            .iter()
            .map(|&(origin, frame)| RingStation { origin, frame, radius })
            .collect()
    };

    let mut builder = MeshBuilder::new();
    emit_tube_shell(
        &mut builder,
        SurfaceKind::OuterWall,
        &stations(section.outer_radius),
        config.radial_segments,
        false,
        ShellFacing::Outward,
    );
    emit_tube_shell(
        &mut builder,
        SurfaceKind::InnerWall,
        &stations(section.inner_radius),
        config.radial_segments,
        false,
        ShellFacing::Inward,
    );
    let mesh = builder.finish();
    log::debug!(
        "continuous bend: radius {}, sweep {:.4} rad, V:{} T:{}",
        params.radius,
        arc.sweep(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// `segment_count` straight chords between equally spaced arc points, with a
/// weld ring at each internal joint facing along the arc tangent there.
///
/// # Errors
/// `InvalidSegmentCount` for zero chords, otherwise as [`build_continuous_bend`].
pub fn build_mitered_bend(
    params: &BendParameters,
    section: &PipeCrossSection,
    config: &GeometryConfig,
) -> Result<GeomMesh, FittingError> {
    config.validate()?;
    params.validate()?;
    if params.segment_count == 0 {
        return Err(FittingError::InvalidSegmentCount(0));
    }
    params.check_section(section)?;

    let arc = params.arc();
    let n = params.segment_count;
    #[allow(clippy::cast_precision_loss)]
    let joints: Vec<Point3> = (0..=n).map(|i| arc.point_at(i as f64 / n as f64)).collect();

    let mut mesh = GeomMesh::default();
    for chord in joints.windows(2) {
        let piece = build_hollow_cylinder(
            chord[0],
            chord[1],
            section.outer_radius,
            section.inner_radius,
            CylinderCaps::NONE,
            config,
        )?;
        mesh.append(&piece);
    }

    let ring_radius = section.outer_radius * config.weld_ring_oversize;
    let tube_radius = section.outer_radius * config.weld_tube_ratio;
    for i in 1..n {
        #[allow(clippy::cast_precision_loss)]
        let angle = arc.angle_at(i as f64 / n as f64);
        let ring = build_weld_ring(
            joints[i],
            arc.tangent_at_angle(angle),
            ring_radius,
            tube_radius,
            config,
        )?;
        mesh.append(&ring);
    }

    log::debug!(
        "mitered bend: {n} chords, {} welds, V:{} T:{}",
        n - 1,
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}
