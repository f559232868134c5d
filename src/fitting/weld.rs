//! Weld beads: circumferential rings and the saddle loop of a branch joint.

use super::config::GeometryConfig;
use super::error::{FittingError, require_positive};
use crate::geom::{
    FrenetFrame, GeomMesh, MeshBuilder, Point3, RingStation, SaddleAxis, SaddleCurve,
    ShellFacing, SurfaceKind, Vec3, emit_tube_shell, rail_frames, ring_angle,
    tessellate_curve_uniform,
};

/// Branch-to-run junction: a stub of `stub_radius` standing on a main pipe of
/// `main_radius`, both axes intersecting. The stub axis is the local +Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaddleJoin {
    pub stub_radius: f64,
    pub main_radius: f64,
    pub axis: SaddleAxis,
}

impl SaddleJoin {
    #[must_use]
    pub const fn new(stub_radius: f64, main_radius: f64, axis: SaddleAxis) -> Self {
        Self {
            stub_radius,
            main_radius,
            axis,
        }
    }

    /// `false` when the branch is wider than the run; the saddle height is then
    /// clamped to the run's axis over part of the loop.
    #[must_use]
    pub fn is_well_defined(&self) -> bool {
        self.curve().is_well_defined()
    }

    #[must_use]
    pub fn curve(&self) -> SaddleCurve {
        SaddleCurve::new(self.stub_radius, self.main_radius, self.axis)
    }

    pub(crate) fn warn_if_ill_defined(&self) {
        if !self.is_well_defined() {
            log::warn!(
                "branch radius {} exceeds run radius {}; saddle height clamped",
                self.stub_radius,
                self.main_radius
            );
        }
    }
}

/// Torus bead around `center` in the plane perpendicular to `normal`.
///
/// # Errors
/// `InvalidDimension` for a non-positive radius, a tube at least as thick as
/// the ring, or a zero normal.
pub fn build_weld_ring(
    center: Point3,
    normal: Vec3,
    radius: f64,
    tube_radius: f64,
    config: &GeometryConfig,
) -> Result<GeomMesh, FittingError> {
    config.validate()?;
    require_positive("weld ring radius", radius)?;
    require_positive("weld tube radius", tube_radius)?;
    if tube_radius >= radius {
        return Err(FittingError::InvalidDimension {
            name: "weld tube radius (must be below ring radius)",
            value: tube_radius,
        });
    }
    let axis_frame = FrenetFrame::aligned_to(normal).ok_or(FittingError::InvalidDimension {
        name: "weld ring normal length",
        value: normal.length(),
    })?;

    let mut builder = MeshBuilder::new();
    append_torus(
        &mut builder,
        SurfaceKind::WeldBead,
        center,
        axis_frame,
        radius,
        tube_radius,
        config.weld_ring_segments,
        config.weld_tube_segments,
    );
    Ok(builder.finish())
}

/// Closed torus: `ring_segments` stations around `axis_frame.tangent`, each a
/// tube circle of `tube_radius`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn append_torus(
    builder: &mut MeshBuilder,
    kind: SurfaceKind,
    center: Point3,
    axis_frame: FrenetFrame,
    radius: f64,
    tube_radius: f64,
    ring_segments: usize,
    tube_segments: usize,
) {
    let stations: Vec<RingStation> = (0..ring_segments)
        .filter_map(|j| {
            let (sin, cos) = ring_angle(j, ring_segments).sin_cos();
            let radial = axis_frame.normal.mul_scalar(cos).add(axis_frame.binormal.mul_scalar(sin));
            let tangent = axis_frame.binormal.mul_scalar(cos).sub(axis_frame.normal.mul_scalar(sin));
            Some(RingStation {
                origin: center.add_vec(radial.mul_scalar(radius)),
                frame: FrenetFrame::from_tangent_with_reference(tangent, radial)?,
                radius: tube_radius,
            })
        })
        .collect();
    emit_tube_shell(builder, kind, &stations, tube_segments, true, ShellFacing::Outward);
}

/// Tube of `tube_radius` swept around the closed saddle loop, in the stub's
/// local frame (stub axis +Z, main pipe axis along `join.axis`).
///
/// # Errors
/// `InvalidDimension` for non-positive radii.
pub fn build_saddle_weld(
    join: &SaddleJoin,
    tube_radius: f64,
    config: &GeometryConfig,
) -> Result<GeomMesh, FittingError> {
    config.validate()?;
    require_positive("stub radius", join.stub_radius)?;
    require_positive("main radius", join.main_radius)?;
    require_positive("weld tube radius", tube_radius)?;
    join.warn_if_ill_defined();

    let samples = config.saddle_weld_samples;
    let rail = tessellate_curve_uniform(&join.curve(), samples);
    let frames = rail_frames(&rail, true, |i| {
        let (sin, cos) = ring_angle(i, samples).sin_cos();
        Vec3::new(cos, sin, 0.0)
    })
    .ok_or(FittingError::InvalidDimension {
        name: "saddle loop length",
        value: 0.0,
    })?;

    let stations: Vec<RingStation> = rail
        .iter()
        .zip(frames)
        .map(|(&origin, frame)| RingStation {
            origin,
            frame,
            radius: tube_radius,
        })
        .collect();

    let mut builder = MeshBuilder::new();
    emit_tube_shell(
        &mut builder,
        SurfaceKind::WeldBead,
        &stations,
        config.saddle_weld_tube_segments,
        true,
        ShellFacing::Outward,
    );
    let mesh = builder.finish();
    log::debug!(
        "saddle weld: stub {} on main {}, V:{} T:{}",
        join.stub_radius,
        join.main_radius,
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}
