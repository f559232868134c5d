//! Straight pipe runs.

use super::config::GeometryConfig;
use super::dimensions::PipeCrossSection;
use super::error::FittingError;
use crate::geom::{
    CapFacing, FrenetFrame, GeomMesh, MeshBuilder, Point3, RingStation, ShellFacing, SurfaceKind,
    emit_annulus, emit_tube_shell,
};

/// Which ends of a run receive an annular cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CylinderCaps {
    pub start: bool,
    pub end: bool,
}

impl CylinderCaps {
    pub const NONE: Self = Self { start: false, end: false };
    pub const START: Self = Self { start: true, end: false };
    pub const END: Self = Self { start: false, end: true };
    pub const BOTH: Self = Self { start: true, end: true };
}

impl Default for CylinderCaps {
    fn default() -> Self {
        Self::NONE
    }
}

/// Hollow cylinder from `start` to `end`: outer wall facing out, bore wall
/// facing in, and optional annular caps facing away from the run.
///
/// # Errors
/// `InvalidCrossSection` unless `outer_radius > inner_radius > 0`,
/// `DegenerateAxis` when the end points coincide, or a config error.
pub fn build_hollow_cylinder(
    start: Point3,
    end: Point3,
    outer_radius: f64,
    inner_radius: f64,
    caps: CylinderCaps,
    config: &GeometryConfig,
) -> Result<GeomMesh, FittingError> {
    config.validate()?;
    let section = PipeCrossSection::new(outer_radius, inner_radius)?;
    if !(start.is_finite() && end.is_finite()) {
        return Err(FittingError::DegenerateAxis);
    }
    let frame = FrenetFrame::aligned_to(end.sub_point(start)).ok_or(FittingError::DegenerateAxis)?;

    let mut builder = MeshBuilder::new();
    append_hollow_cylinder(&mut builder, start, end, frame, section, caps, config.radial_segments);
    let mesh = builder.finish();
    log::debug!(
        "hollow cylinder: length {:.3}, V:{} T:{}",
        start.distance_to(end),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Shells and caps of a straight run into an existing builder; inputs are
/// already validated.
pub(crate) fn append_hollow_cylinder(
    builder: &mut MeshBuilder,
    start: Point3,
    end: Point3,
    frame: FrenetFrame,
    section: PipeCrossSection,
    caps: CylinderCaps,
    radial_segments: usize,
) {
    let stations = |radius| {
        [
            RingStation { origin: start, frame, radius },
            RingStation { origin: end, frame, radius },
        ]
    };

    emit_tube_shell(
        builder,
        SurfaceKind::OuterWall,
        &stations(section.outer_radius),
        radial_segments,
        false,
        ShellFacing::Outward,
    );
    emit_tube_shell(
        builder,
        SurfaceKind::InnerWall,
        &stations(section.inner_radius),
        radial_segments,
        false,
        ShellFacing::Inward,
    );

    if caps.start {
        emit_annulus(
            builder,
            SurfaceKind::EndCap,
            start,
            frame,
            section.outer_radius,
            section.inner_radius,
            radial_segments,
            CapFacing::Backward,
        );
    }
    if caps.end {
        emit_annulus(
            builder,
            SurfaceKind::EndCap,
            end,
            frame,
            section.outer_radius,
            section.inner_radius,
            radial_segments,
            CapFacing::Forward,
        );
    }
}
