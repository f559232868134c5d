//! Branch stubs standing on a main pipe.
//!
//! The stub is built in a local frame whose origin is the point on the main
//! pipe's axis under the stub, with the stub axis along +Z and the main pipe
//! along the local axis named by [`SaddleAxis`]. Its base follows the saddle
//! curve where the two cylinders meet; its tip is flat and carries a flange or
//! an annular cap. Everything is placed into world space by one transform.

use serde::{Deserialize, Serialize};

use super::catalog::{CatalogMatch, FlangeCatalog};
use super::config::GeometryConfig;
use super::dimensions::PipeCrossSection;
use super::error::{FittingError, require_positive};
use super::flange::{FlangeKind, FlangeMesh, build_flange};
use super::straight::{CylinderCaps, append_hollow_cylinder};
use super::weld::{SaddleJoin, append_torus, build_saddle_weld};
use crate::geom::{
    CapFacing, FrenetFrame, GeomMesh, MeshBuilder, Point3, SaddleAxis, SaddleCurve, ShellFacing,
    SurfaceKind, Transform, Vec3, emit_annulus, emit_grid, ring_angle,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BranchStub {
    /// Point on the main pipe's axis where the stub axis crosses it.
    pub base_center: Point3,
    /// Stub axis, pointing away from the main pipe.
    pub direction: Vec3,
    /// Main pipe direction; fixes the saddle's roll about the stub axis.
    #[serde(default)]
    pub main_axis: Option<Vec3>,
    #[serde(default)]
    pub saddle_axis: SaddleAxis,
    /// Main pipe outer radius. `None` builds a free-standing nozzle.
    pub main_radius: Option<f64>,
    pub stub: PipeCrossSection,
    /// Stub length beyond the main pipe's outer surface.
    pub length: f64,
    pub has_flange: bool,
    #[serde(default)]
    pub flange_kind: FlangeKind,
    /// Used to pick the tip flange from the catalog.
    pub nominal_bore: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StubTip {
    Flange(FlangeMesh),
    Cap(GeomMesh),
}

impl StubTip {
    #[must_use]
    pub fn mesh(&self) -> &GeomMesh {
        match self {
            Self::Flange(flange) => &flange.mesh,
            Self::Cap(cap) => cap,
        }
    }
}

/// A built stub, in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchStubMesh {
    /// Outer and inner walls.
    pub shell: GeomMesh,
    /// Saddle weld, or the base weld ring of a nozzle.
    pub weld: GeomMesh,
    pub tip: StubTip,
    pub catalog_match: Option<CatalogMatch>,
    /// Local stub frame to world.
    pub placement: Transform,
    /// Vertices per ring of the shell.
    pub ring_segments: usize,
}

impl BranchStubMesh {
    /// Shell, weld and tip in one mesh.
    #[must_use]
    pub fn combined(&self) -> GeomMesh {
        GeomMesh::merged([&self.shell, &self.weld, self.tip.mesh()])
    }

    /// The outer wall's base ring, where the stub meets the main pipe.
    #[must_use]
    pub fn base_ring(&self) -> Vec<Point3> {
        self.shell
            .groups_of(SurfaceKind::OuterWall)
            .next()
            .map(|group| {
                let start = group.vertices.start;
                let end = (start + self.ring_segments).min(group.vertices.end);
                self.shell.positions[start..end]
                    .iter()
                    .copied()
                    .map(Point3::from_array)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Local-frame walls and weld of a stub, before its tip is attached.
struct StubBody {
    shell: GeomMesh,
    weld: GeomMesh,
    tip_z: f64,
    ring_segments: usize,
}

/// Build a branch stub with its weld and tip.
///
/// # Errors
/// Invalid cross-section or dimensions, a zero direction, a main axis parallel
/// to the stub, or any error from the tip flange or catalog.
pub fn build_branch_stub(
    stub: &BranchStub,
    catalog: &FlangeCatalog,
    config: &GeometryConfig,
) -> Result<BranchStubMesh, FittingError> {
    config.validate()?;
    stub.stub.validate()?;
    require_positive("stub length", stub.length)?;
    let placement = stub_placement(stub)?;

    let body = match stub.main_radius {
        Some(main_radius) => saddle_body(stub, require_positive("main radius", main_radius)?, config)?,
        None => nozzle_body(stub, config),
    };

    let section = stub.stub;
    let tip_center = Point3::new(0.0, 0.0, body.tip_z);
    let (tip, catalog_match) = if stub.has_flange {
        let matched = catalog.resolve(stub.nominal_bore)?;
        let flange = build_flange(
            section.outer_radius,
            section.inner_radius,
            &matched.spec,
            stub.flange_kind,
            config,
        )?;
        let seat = Transform::translate(Vec3::new(0.0, 0.0, body.tip_z + flange.thickness * 0.5));
        (StubTip::Flange(flange.placed(placement * seat)), Some(matched))
    } else {
        let mut cap = MeshBuilder::new();
        emit_annulus(
            &mut cap,
            SurfaceKind::EndCap,
            tip_center,
            FrenetFrame::CANONICAL,
            section.outer_radius,
            section.inner_radius,
            body.ring_segments,
            CapFacing::Forward,
        );
        (StubTip::Cap(cap.finish().transformed(placement)), None)
    };

    let built = BranchStubMesh {
        shell: body.shell.transformed(placement),
        weld: body.weld.transformed(placement),
        tip,
        catalog_match,
        placement,
        ring_segments: body.ring_segments,
    };
    log::debug!(
        "branch stub: r {} on {:?}, length {}, flange {}, V:{}",
        section.outer_radius,
        stub.main_radius,
        stub.length,
        stub.has_flange,
        built.shell.vertex_count() + built.weld.vertex_count() + built.tip.mesh().vertex_count()
    );
    Ok(built)
}

/// Local frame to world: +Z onto `direction`, and the saddle axis onto the main
/// pipe direction when one is given.
fn stub_placement(stub: &BranchStub) -> Result<Transform, FittingError> {
    let z = stub.direction.normalized().ok_or(FittingError::DegenerateAxis)?;
    let Some(main_axis) = stub.main_axis else {
        return Transform::placement(stub.base_center, z).ok_or(FittingError::DegenerateAxis);
    };

    let along = main_axis
        .sub(z.mul_scalar(main_axis.dot(z)))
        .normalized()
        .ok_or(FittingError::DegenerateAxis)?;
    let (x, y) = match stub.saddle_axis {
        SaddleAxis::X => (along, z.cross(along)),
        SaddleAxis::Y => (along.cross(z), along),
    };
    Ok(Transform::from_axes(stub.base_center, x, y, z))
}

fn saddle_body(stub: &BranchStub, main_radius: f64, config: &GeometryConfig) -> Result<StubBody, FittingError> {
    let section = stub.stub;
    SaddleJoin::new(section.outer_radius, main_radius, stub.saddle_axis).warn_if_ill_defined();

    let tip_z = main_radius + stub.length;
    let segments = config.stub_grid_segments;
    let mut builder = MeshBuilder::new();
    for (radius, kind, facing) in [
        (section.outer_radius, SurfaceKind::OuterWall, ShellFacing::Outward),
        (section.inner_radius, SurfaceKind::InnerWall, ShellFacing::Inward),
    ] {
        let grid = saddle_grid(SaddleCurve::new(radius, main_radius, stub.saddle_axis), tip_z, segments);
        emit_grid(&mut builder, kind, &grid, segments, false, facing);
    }

    let weld_join = SaddleJoin::new(
        section.outer_radius * config.saddle_weld_oversize,
        main_radius,
        stub.saddle_axis,
    );
    let weld = build_saddle_weld(&weld_join, section.outer_radius * config.weld_tube_ratio, config)?;

    Ok(StubBody {
        shell: builder.finish(),
        weld,
        tip_z,
        ring_segments: segments,
    })
}

/// `segments` rings from the saddle base (`v = 0`) to the flat tip (`v = 1`).
fn saddle_grid(saddle: SaddleCurve, tip_z: f64, segments: usize) -> Vec<Point3> {
    let rows = segments.max(2);
    let mut points = Vec::with_capacity(rows * segments);
    for row in 0..rows {
        #[allow(clippy::cast_precision_loss)]
        let v = row as f64 / (rows - 1) as f64;
        for i in 0..segments {
            let theta = ring_angle(i, segments);
            let (sin, cos) = theta.sin_cos();
            let z = saddle.height_at_angle(theta) * (1.0 - v) + tip_z * v;
            points.push(Point3::new(saddle.stub_radius * cos, saddle.stub_radius * sin, z));
        }
    }
    points
}

/// Straight stub with a flat weld ring at its base.
fn nozzle_body(stub: &BranchStub, config: &GeometryConfig) -> StubBody {
    let section = stub.stub;
    let mut builder = MeshBuilder::new();
    append_hollow_cylinder(
        &mut builder,
        Point3::ORIGIN,
        Point3::new(0.0, 0.0, stub.length),
        FrenetFrame::CANONICAL,
        section,
        CylinderCaps::NONE,
        config.radial_segments,
    );

    let mut weld = MeshBuilder::new();
    append_torus(
        &mut weld,
        SurfaceKind::WeldBead,
        Point3::ORIGIN,
        FrenetFrame::CANONICAL,
        section.outer_radius * config.weld_ring_oversize,
        section.outer_radius * config.weld_tube_ratio,
        config.weld_ring_segments,
        config.weld_tube_segments,
    );

    StubBody {
        shell: builder.finish(),
        weld: weld.finish(),
        tip_z: stub.length,
        ring_segments: config.radial_segments,
    }
}
