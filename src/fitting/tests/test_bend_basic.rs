use std::f64::consts::FRAC_PI_2;

use super::group_count;
use crate::fitting::{BendParameters, FittingError, GeometryConfig, PipeCrossSection, build_continuous_bend, build_mitered_bend};
use crate::geom::{Curve3, Point3, SurfaceKind, Vec3};

fn quarter_bend(segment_count: usize) -> BendParameters {
    BendParameters {
        center: Point3::ORIGIN,
        radius: 500.0,
        start_angle: 0.0,
        end_angle: FRAC_PI_2,
        segment_count,
    }
}

fn section() -> PipeCrossSection {
    PipeCrossSection::new(50.0, 45.0).expect("section")
}

/// Closest point on the bend centerline (the XZ circle of radius 500).
fn centerline_point(p: Point3) -> Point3 {
    let rho = p.x.hypot(p.z);
    Point3::new(500.0 * p.x / rho, 0.0, 500.0 * p.z / rho)
}

#[test]
fn continuous_bend_follows_the_arc() {
    let config = GeometryConfig::default();
    let mesh = build_continuous_bend(&quarter_bend(1), &section(), &config).expect("bend");

    let rings = config.bend_samples + 1;
    assert_eq!(mesh.vertex_count(), 2 * rings * config.radial_segments);
    assert_eq!(group_count(&mesh, SurfaceKind::OuterWall), 1);
    assert_eq!(group_count(&mesh, SurfaceKind::InnerWall), 1);

    for (kind, radius, sign) in [(SurfaceKind::OuterWall, 50.0, 1.0), (SurfaceKind::InnerWall, 45.0, -1.0)] {
        for (p, n) in mesh.vertices_of(kind) {
            let offset = p.sub_point(centerline_point(p));
            assert!((offset.length() - radius).abs() < 1e-9, "{kind:?} at {p:?}");
            assert!(sign * offset.dot(Vec3::from(n)) > 0.0);
        }
    }

    let diag = mesh.diagnostics();
    assert_eq!(diag.degenerate_triangle_count, 0);
    assert_eq!(diag.non_manifold_edge_count, 0);
    assert_eq!(diag.open_edge_count, 4 * config.radial_segments);
}

#[test]
fn continuous_bend_ends_match_the_arc_ends() {
    let config = GeometryConfig::default();
    let mesh = build_continuous_bend(&quarter_bend(1), &section(), &config).expect("bend");

    let n = config.radial_segments;
    let first_ring = &mesh.positions[..n];
    let last_ring = &mesh.positions[config.bend_samples * n..(config.bend_samples + 1) * n];
    for p in first_ring {
        assert!(p[2].abs() < 1e-9);
    }
    for p in last_ring {
        assert!(p[0].abs() < 1e-9);
    }
}

#[test]
fn mitered_bend_welds_internal_joints() {
    let config = GeometryConfig::default();
    let params = quarter_bend(4);
    let mesh = build_mitered_bend(&params, &section(), &config).expect("bend");

    assert_eq!(group_count(&mesh, SurfaceKind::OuterWall), 4);
    assert_eq!(group_count(&mesh, SurfaceKind::InnerWall), 4);
    assert_eq!(group_count(&mesh, SurfaceKind::WeldBead), 3);

    let arc = params.arc();
    let tube = 50.0 * config.weld_tube_ratio;
    for (i, group) in mesh.groups_of(SurfaceKind::WeldBead).enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let t = (i + 1) as f64 / 4.0;
        let joint = arc.point_at(t);
        let tangent = arc.tangent_at_angle(arc.angle_at(t));

        let points: Vec<Point3> = group
            .vertices
            .clone()
            .map(|v| Point3::from_array(mesh.positions[v]))
            .collect();
        #[allow(clippy::cast_precision_loss)]
        let count = points.len() as f64;
        let centroid = points
            .iter()
            .fold(Vec3::ZERO, |acc, p| acc.add(p.sub_point(Point3::ORIGIN)))
            .mul_scalar(1.0 / count);
        assert!(centroid.sub(joint.sub_point(Point3::ORIGIN)).length() < 1e-6);

        for p in points {
            assert!(p.sub_point(joint).dot(tangent).abs() <= tube + 1e-9);
        }
    }
}

#[test]
fn single_chord_has_no_weld() {
    let mesh = build_mitered_bend(&quarter_bend(1), &section(), &GeometryConfig::default()).expect("bend");
    assert_eq!(group_count(&mesh, SurfaceKind::WeldBead), 0);
    assert_eq!(group_count(&mesh, SurfaceKind::OuterWall), 1);
}

#[test]
fn rejects_invalid_bends() {
    let config = GeometryConfig::default();
    assert_eq!(
        build_mitered_bend(&quarter_bend(0), &section(), &config),
        Err(FittingError::InvalidSegmentCount(0))
    );

    let flat = BendParameters {
        end_angle: 0.0,
        ..quarter_bend(2)
    };
    assert!(matches!(
        build_continuous_bend(&flat, &section(), &config),
        Err(FittingError::InvalidDimension { .. })
    ));

    let no_radius = BendParameters {
        radius: 0.0,
        ..quarter_bend(2)
    };
    assert!(matches!(
        build_mitered_bend(&no_radius, &section(), &config),
        Err(FittingError::InvalidDimension { .. })
    ));
}

#[test]
fn reversed_sweep_keeps_outward_normals() {
    let params = BendParameters {
        start_angle: FRAC_PI_2,
        end_angle: 0.0,
        ..quarter_bend(1)
    };
    let mesh = build_continuous_bend(&params, &section(), &GeometryConfig::default()).expect("bend");
    for (p, n) in mesh.vertices_of(SurfaceKind::OuterWall) {
        assert!(p.sub_point(centerline_point(p)).dot(Vec3::from(n)) > 0.0);
    }
}
