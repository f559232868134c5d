use std::f64::consts::TAU;

use super::group_count;
use crate::fitting::{
    FittingError, FlangeCatalog, FlangeKind, FlangeSpec, GeometryConfig, PipeCrossSection, build_flange,
    build_retaining_ring,
};
use crate::geom::{Point3, SurfaceKind, Transform, Vec3};

fn nb150() -> (FlangeSpec, PipeCrossSection) {
    let config = GeometryConfig::default();
    let spec = FlangeCatalog::default().get(150.0).expect("NB150 in catalog");
    let section = PipeCrossSection::from_nominal_bore(150.0, None, &config).expect("section");
    (spec, section)
}

#[test]
fn standard_flange_layout() {
    let config = GeometryConfig::default();
    let (spec, section) = nb150();
    let flange = build_flange(section.outer_radius, section.inner_radius, &spec, FlangeKind::Standard, &config)
        .expect("flange");

    assert!((flange.outer_radius - 142.5).abs() < 1e-12);
    assert!((flange.thickness - 21.375).abs() < 1e-9);
    let bore = flange.bore_radius.expect("standard flange has a bore");
    assert!((bore - section.inner_radius * config.bore_clearance).abs() < 1e-12);
    assert!(bore < flange.outer_radius);

    assert_eq!(flange.bolt_holes.len(), 8);
    for pair in flange.bolt_holes.windows(2) {
        assert!((pair[1].angle - pair[0].angle - TAU / 8.0).abs() < 1e-12);
    }
    for hole in &flange.bolt_holes {
        assert!((hole.center.x.hypot(hole.center.y) - 120.0).abs() < 1e-9);
        assert!((hole.radius - 11.0).abs() < 1e-12);
    }

    let mesh = &flange.mesh;
    assert_eq!(group_count(mesh, SurfaceKind::FlangeRim), 1);
    assert_eq!(group_count(mesh, SurfaceKind::FlangeBore), 1);
    assert_eq!(group_count(mesh, SurfaceKind::FlangeFace), 2);
    assert_eq!(group_count(mesh, SurfaceKind::BoltHole), 8);
    assert_eq!(group_count(mesh, SurfaceKind::WeldBead), 2);
    assert!(mesh.diagnostics().is_valid_solid());
}

#[test]
fn faces_point_away_from_the_plate() {
    let (spec, section) = nb150();
    let flange = build_flange(
        section.outer_radius,
        section.inner_radius,
        &spec,
        FlangeKind::Standard,
        &GeometryConfig::default(),
    )
    .expect("flange");

    for (p, n) in flange.mesh.vertices_of(SurfaceKind::FlangeFace) {
        if p.z > 0.0 {
            assert!(n[2] > 0.99);
        } else {
            assert!(n[2] < -0.99);
        }
    }
    for (p, n) in flange.mesh.vertices_of(SurfaceKind::FlangeRim) {
        assert!(p.x * n[0] + p.y * n[1] > 0.0);
    }
    for (p, n) in flange.mesh.vertices_of(SurfaceKind::FlangeBore) {
        assert!(p.x * n[0] + p.y * n[1] < 0.0);
    }
}

#[test]
fn blank_and_rotating_flanges() {
    let config = GeometryConfig::default();
    let (spec, section) = nb150();

    let blank = build_flange(section.outer_radius, section.inner_radius, &spec, FlangeKind::Blank, &config)
        .expect("blank");
    assert_eq!(blank.bore_radius, None);
    assert_eq!(group_count(&blank.mesh, SurfaceKind::FlangeBore), 0);
    assert_eq!(group_count(&blank.mesh, SurfaceKind::WeldBead), 0);
    assert!(blank.mesh.diagnostics().is_valid_solid());

    let rotating = build_flange(section.outer_radius, section.inner_radius, &spec, FlangeKind::Rotating, &config)
        .expect("rotating");
    let bore = rotating.bore_radius.expect("bore");
    assert!((bore - section.inner_radius * config.rotating_bore_clearance).abs() < 1e-12);
    assert_eq!(group_count(&rotating.mesh, SurfaceKind::WeldBead), 0);
    assert!(rotating.mesh.diagnostics().is_valid_solid());
}

#[test]
fn every_catalog_flange_is_a_closed_solid() {
    let config = GeometryConfig::default();
    let catalog = FlangeCatalog::default();
    for entry in catalog.entries() {
        let section = PipeCrossSection::from_nominal_bore(entry.nominal_bore, None, &config).expect("section");
        for kind in [FlangeKind::Standard, FlangeKind::Blank, FlangeKind::Rotating] {
            let flange = build_flange(section.outer_radius, section.inner_radius, &entry.spec, kind, &config)
                .unwrap_or_else(|err| panic!("NB{} {kind:?}: {err}", entry.nominal_bore));
            let diag = flange.mesh.diagnostics();
            assert!(diag.is_valid_solid(), "NB{} {kind:?}: {diag}", entry.nominal_bore);
            assert_eq!(group_count(&flange.mesh, SurfaceKind::FlangeFace), 2);
        }
    }
}

#[test]
fn rejects_bores_that_do_not_fit() {
    let config = GeometryConfig::default();
    let (spec, _) = nb150();

    assert!(matches!(
        build_flange(160.0, 140.0, &spec, FlangeKind::Rotating, &config),
        Err(FittingError::BoreExceedsFlange { .. })
    ));
    // Clears the outline but cuts into the bolt holes.
    assert!(matches!(
        build_flange(115.0, 110.0, &spec, FlangeKind::Standard, &config),
        Err(FittingError::InvalidFlangeLayout(_))
    ));
    assert!(matches!(
        build_flange(0.0, 110.0, &spec, FlangeKind::Standard, &config),
        Err(FittingError::InvalidDimension { .. })
    ));
}

#[test]
fn placement_moves_bolt_holes_with_the_mesh() {
    let (spec, section) = nb150();
    let flange = build_flange(
        section.outer_radius,
        section.inner_radius,
        &spec,
        FlangeKind::Blank,
        &GeometryConfig::default(),
    )
    .expect("flange");
    let placement = Transform::placement(Point3::new(100.0, 0.0, 0.0), Vec3::X).expect("placement");
    let placed = flange.placed(placement);

    assert!(placed.axis().sub(Vec3::X).length() < 1e-9);
    for hole in &placed.bolt_holes {
        assert!((hole.center.x - 100.0).abs() < 1e-9);
    }
    let bbox = placed.mesh.bbox().expect("bbox");
    assert!((bbox.size().x - placed.thickness).abs() < 1e-9);
}

#[test]
fn retaining_ring_hugs_the_pipe() {
    let config = GeometryConfig::default();
    let mesh = build_retaining_ring(50.0, &config).expect("ring");

    assert_eq!(group_count(&mesh, SurfaceKind::RetainingRing), 1);
    assert_eq!(
        mesh.vertex_count(),
        config.radial_segments * config.retaining_ring_tube_segments
    );
    for p in &mesh.positions {
        let r = p[0].hypot(p[1]);
        assert!(r >= 50.0 - 1e-9 && r <= 57.5 + 1e-9);
    }
    assert!(mesh.diagnostics().is_valid_solid());
    assert!(build_retaining_ring(0.0, &config).is_err());
}
