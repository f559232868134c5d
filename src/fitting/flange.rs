//! Bolted flanges and the retaining ring of a rotating flange.
//!
//! A flange is modelled in a canonical frame (axis +Z, centered on the origin,
//! faces at ±thickness/2) and placed afterwards with [`FlangeMesh::placed`].
//! The bore and bolt holes are hole loops in the face profile plus inward-facing
//! wall cylinders; nothing is subtracted.

use serde::{Deserialize, Serialize};

use super::catalog::FlangeSpec;
use super::config::GeometryConfig;
use super::error::{FittingError, require_positive};
use super::weld::append_torus;
use crate::geom::{
    FaceProfile, FrenetFrame, GeomMesh, MeshBuilder, PlanarPoint, Point3, ProfileLoop, RingStation,
    ShellFacing, SurfaceKind, Tolerance, Transform, Vec3, circle_loop_points, emit_tube_shell,
    ring_angle, triangulate_profile,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlangeKind {
    /// Welded to the pipe: bore plus hub weld beads.
    #[default]
    Standard,
    /// Isolation plate without a bore.
    Blank,
    /// Loose flange over a retaining ring: wider bore, no welds.
    Rotating,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoltHole {
    /// Hole axis point on the flange mid-plane.
    pub center: Point3,
    pub radius: f64,
    /// Position on the bolt circle, radians from the local +X.
    pub angle: f64,
}

/// A built flange and the layout it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct FlangeMesh {
    pub mesh: GeomMesh,
    pub kind: FlangeKind,
    pub spec: FlangeSpec,
    pub outer_radius: f64,
    /// `None` for a blank flange.
    pub bore_radius: Option<f64>,
    pub thickness: f64,
    pub bolt_holes: Vec<BoltHole>,
    /// Canonical-to-world placement applied so far.
    pub placement: Transform,
}

impl FlangeMesh {
    /// Move the flange; bolt hole centers follow the mesh.
    #[must_use]
    pub fn placed(&self, transform: Transform) -> Self {
        Self {
            mesh: self.mesh.transformed(transform),
            bolt_holes: self
                .bolt_holes
                .iter()
                .map(|hole| BoltHole {
                    center: transform.apply_point(hole.center),
                    ..*hole
                })
                .collect(),
            placement: transform * self.placement,
            ..self.clone()
        }
    }

    /// Flange axis in world space.
    #[must_use]
    pub fn axis(&self) -> Vec3 {
        self.placement.apply_vec(Vec3::Z)
    }
}

/// Build a flange for a pipe of `pipe_outer_radius` whose bore (inner radius)
/// is `pipe_bore_radius`.
///
/// # Errors
/// - `InvalidDimension` for non-positive radii
/// - `BoreExceedsFlange` when the cleared bore reaches the flange outline
/// - `InvalidFlangeLayout` when bolt holes overlap the bore, the outline or each other
pub fn build_flange(
    pipe_outer_radius: f64,
    pipe_bore_radius: f64,
    spec: &FlangeSpec,
    kind: FlangeKind,
    config: &GeometryConfig,
) -> Result<FlangeMesh, FittingError> {
    config.validate()?;
    require_positive("pipe outer radius", pipe_outer_radius)?;
    require_positive("pipe bore radius", pipe_bore_radius)?;
    require_positive("flange outer diameter", spec.flange_od)?;

    let outer_radius = spec.outer_radius();
    let thickness = spec.flange_od * config.flange_thickness_ratio;
    let half = thickness * 0.5;

    let bore_radius = match kind {
        FlangeKind::Standard => Some(pipe_bore_radius * config.bore_clearance),
        FlangeKind::Rotating => Some(pipe_bore_radius * config.rotating_bore_clearance),
        FlangeKind::Blank => None,
    };
    if let Some(bore) = bore_radius {
        if bore >= outer_radius {
            return Err(FittingError::BoreExceedsFlange {
                bore_radius: bore,
                flange_radius: outer_radius,
            });
        }
    }

    let bolt_circle = spec.bolt_circle_radius();
    let hole_radius = spec.bolt_hole_radius();
    let bolt_holes: Vec<BoltHole> = (0..spec.bolt_hole_count)
        .map(|i| {
            let angle = ring_angle(i, spec.bolt_hole_count);
            let (sin, cos) = angle.sin_cos();
            BoltHole {
                center: Point3::new(bolt_circle * cos, bolt_circle * sin, 0.0),
                radius: hole_radius,
                angle,
            }
        })
        .collect();

    let profile = face_profile(outer_radius, bore_radius, &bolt_holes, config)
        .map_err(FittingError::InvalidFlangeLayout)?;
    let faces = triangulate_profile(&profile, Tolerance::DEFAULT).map_err(FittingError::InvalidFlangeLayout)?;

    let bottom = Point3::new(0.0, 0.0, -half);
    let top = Point3::new(0.0, 0.0, half);
    let axis_stations = |origin_x: f64, origin_y: f64, radius: f64| {
        [
            RingStation {
                origin: Point3::new(origin_x, origin_y, bottom.z),
                frame: FrenetFrame::CANONICAL,
                radius,
            },
            RingStation {
                origin: Point3::new(origin_x, origin_y, top.z),
                frame: FrenetFrame::CANONICAL,
                radius,
            },
        ]
    };

    let mut builder = MeshBuilder::new();
    emit_tube_shell(
        &mut builder,
        SurfaceKind::FlangeRim,
        &axis_stations(0.0, 0.0, outer_radius),
        config.radial_segments,
        false,
        ShellFacing::Outward,
    );
    if let Some(bore) = bore_radius {
        emit_tube_shell(
            &mut builder,
            SurfaceKind::FlangeBore,
            &axis_stations(0.0, 0.0, bore),
            config.radial_segments,
            false,
            ShellFacing::Inward,
        );
    }
    for hole in &bolt_holes {
        emit_tube_shell(
            &mut builder,
            SurfaceKind::BoltHole,
            &axis_stations(hole.center.x, hole.center.y, hole.radius),
            config.bolt_hole_segments,
            false,
            ShellFacing::Inward,
        );
    }

    for (z, flip) in [(top.z, false), (bottom.z, true)] {
        builder.begin(SurfaceKind::FlangeFace);
        let base = u32::try_from(builder.vertex_count()).unwrap_or(u32::MAX);
        for p in &faces.vertices {
            builder.vertex(Point3::new(p.x, p.y, z));
        }
        for tri in faces.indices.chunks_exact(3) {
            if flip {
                builder.triangle(base + tri[0], base + tri[2], base + tri[1]);
            } else {
                builder.triangle(base + tri[0], base + tri[1], base + tri[2]);
            }
        }
    }

    if kind == FlangeKind::Standard {
        let tube = pipe_outer_radius * config.weld_tube_ratio;
        let hub_rings = [
            pipe_outer_radius * config.weld_ring_oversize,
            pipe_bore_radius * (2.0 - config.weld_ring_oversize),
        ];
        for ring_radius in hub_rings {
            if tube >= ring_radius {
                return Err(FittingError::InvalidDimension {
                    name: "hub weld ring radius",
                    value: ring_radius,
                });
            }
            append_torus(
                &mut builder,
                SurfaceKind::WeldBead,
                bottom,
                FrenetFrame::CANONICAL,
                ring_radius,
                tube,
                config.weld_ring_segments,
                config.weld_tube_segments,
            );
        }
    }

    let mesh = builder.finish();
    log::debug!(
        "{kind:?} flange: OD {}, {} bolt holes, V:{} T:{}",
        spec.flange_od,
        spec.bolt_hole_count,
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    Ok(FlangeMesh {
        mesh,
        kind,
        spec: *spec,
        outer_radius,
        bore_radius,
        thickness,
        bolt_holes,
        placement: Transform::identity(),
    })
}

fn face_profile(
    outer_radius: f64,
    bore_radius: Option<f64>,
    bolt_holes: &[BoltHole],
    config: &GeometryConfig,
) -> Result<FaceProfile, crate::geom::ProfileError> {
    let tol = Tolerance::DEFAULT;
    let origin = PlanarPoint::new(0.0, 0.0);
    let outer = ProfileLoop::new(circle_loop_points(origin, outer_radius, config.radial_segments), tol)?;

    let mut holes = Vec::with_capacity(bolt_holes.len() + 1);
    if let Some(bore) = bore_radius {
        holes.push(ProfileLoop::new(circle_loop_points(origin, bore, config.radial_segments), tol)?);
    }
    for hole in bolt_holes {
        let center = PlanarPoint::new(hole.center.x, hole.center.y);
        holes.push(ProfileLoop::new(
            circle_loop_points(center, hole.radius, config.bolt_hole_segments),
            tol,
        )?);
    }
    FaceProfile::new(outer, holes, tol)
}

/// Plain torus securing a rotating flange; sized from the pipe, not the
/// catalog. Its outer edge sits at `pipe_outer_radius × retaining_ring_ratio`.
///
/// # Errors
/// `InvalidDimension` for a non-positive radius or a ratio that leaves no ring.
pub fn build_retaining_ring(pipe_outer_radius: f64, config: &GeometryConfig) -> Result<GeomMesh, FittingError> {
    config.validate()?;
    require_positive("pipe outer radius", pipe_outer_radius)?;
    let ring_outer = pipe_outer_radius * config.retaining_ring_ratio;
    let tube = require_positive("retaining ring tube radius", (ring_outer - pipe_outer_radius) * 0.5)?;

    let mut builder = MeshBuilder::new();
    append_torus(
        &mut builder,
        SurfaceKind::RetainingRing,
        Point3::ORIGIN,
        FrenetFrame::CANONICAL,
        pipe_outer_radius + tube,
        tube,
        config.radial_segments,
        config.retaining_ring_tube_segments,
    );
    Ok(builder.finish())
}
