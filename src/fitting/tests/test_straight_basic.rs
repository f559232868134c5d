use super::{group_count, radial};
use crate::fitting::{CylinderCaps, FittingError, GeometryConfig, build_hollow_cylinder};
use crate::geom::{Point3, SurfaceKind, Vec3};

fn run_along_y(caps: CylinderCaps) -> crate::geom::GeomMesh {
    build_hollow_cylinder(
        Point3::ORIGIN,
        Point3::new(0.0, 1000.0, 0.0),
        30.0,
        25.0,
        caps,
        &GeometryConfig::default(),
    )
    .expect("cylinder")
}

#[test]
fn capped_run_along_y() {
    let mesh = run_along_y(CylinderCaps::BOTH);

    assert_eq!(group_count(&mesh, SurfaceKind::OuterWall), 1);
    assert_eq!(group_count(&mesh, SurfaceKind::InnerWall), 1);
    assert_eq!(group_count(&mesh, SurfaceKind::EndCap), 2);

    let bbox = mesh.bbox().expect("bbox");
    let size = bbox.size();
    assert!((size.y - 1000.0).abs() < 1e-9);
    assert!((size.x - 60.0).abs() < 1e-9);

    for (p, _) in mesh.vertices_of(SurfaceKind::EndCap) {
        let r = radial(p, Point3::ORIGIN, Vec3::Y).length();
        assert!((r - 25.0).abs() < 1e-9 || (r - 30.0).abs() < 1e-9, "cap radius {r}");
        assert!(p.y.abs() < 1e-9 || (p.y - 1000.0).abs() < 1e-9);
    }

    let diag = mesh.diagnostics();
    assert!(diag.is_valid_solid(), "{diag}");
    assert_eq!(diag.degenerate_triangle_count, 0);
}

#[test]
fn shells_face_opposite_ways() {
    let mesh = run_along_y(CylinderCaps::NONE);
    for (p, n) in mesh.vertices_of(SurfaceKind::OuterWall) {
        assert!(radial(p, Point3::ORIGIN, Vec3::Y).dot(Vec3::from(n)) > 0.0);
    }
    for (p, n) in mesh.vertices_of(SurfaceKind::InnerWall) {
        assert!(radial(p, Point3::ORIGIN, Vec3::Y).dot(Vec3::from(n)) < 0.0);
    }
}

#[test]
fn cap_normals_point_away_from_the_run() {
    let mesh = run_along_y(CylinderCaps::BOTH);
    for (p, n) in mesh.vertices_of(SurfaceKind::EndCap) {
        if p.y < 500.0 {
            assert!(n[1] < -0.99);
        } else {
            assert!(n[1] > 0.99);
        }
    }
}

#[test]
fn open_run_has_four_open_rings() {
    let mesh = run_along_y(CylinderCaps::NONE);
    assert_eq!(mesh.diagnostics().open_edge_count, 4 * 32);

    let start_only = run_along_y(CylinderCaps::START);
    assert_eq!(group_count(&start_only, SurfaceKind::EndCap), 1);
    assert_eq!(start_only.diagnostics().open_edge_count, 2 * 32);
}

#[test]
fn rejects_invalid_input() {
    let config = GeometryConfig::default();
    let a = Point3::ORIGIN;
    let b = Point3::new(0.0, 0.0, 10.0);

    assert!(matches!(
        build_hollow_cylinder(a, b, 25.0, 30.0, CylinderCaps::NONE, &config),
        Err(FittingError::InvalidCrossSection { .. })
    ));
    assert!(matches!(
        build_hollow_cylinder(a, b, 30.0, 0.0, CylinderCaps::NONE, &config),
        Err(FittingError::InvalidCrossSection { .. })
    ));
    assert_eq!(
        build_hollow_cylinder(a, a, 30.0, 25.0, CylinderCaps::NONE, &config),
        Err(FittingError::DegenerateAxis)
    );

    let coarse = GeometryConfig {
        radial_segments: 2,
        ..GeometryConfig::default()
    };
    assert!(matches!(
        build_hollow_cylinder(a, b, 30.0, 25.0, CylinderCaps::NONE, &coarse),
        Err(FittingError::Config(_))
    ));
}

#[test]
fn arbitrary_axis_keeps_radii() {
    let start = Point3::new(10.0, -5.0, 3.0);
    let end = Point3::new(-40.0, 80.0, 120.0);
    let axis = end.sub_point(start).normalized().expect("axis");
    let mesh = build_hollow_cylinder(start, end, 12.0, 10.0, CylinderCaps::BOTH, &GeometryConfig::default())
        .expect("cylinder");

    for (p, _) in mesh.vertices_of(SurfaceKind::OuterWall) {
        assert!((radial(p, start, axis).length() - 12.0).abs() < 1e-9);
    }
    for (p, _) in mesh.vertices_of(SurfaceKind::InnerWall) {
        assert!((radial(p, start, axis).length() - 10.0).abs() < 1e-9);
    }
    assert!(mesh.diagnostics().is_watertight());
}
