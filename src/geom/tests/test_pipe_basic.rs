use std::f64::consts::TAU;

use crate::geom::{
    CapFacing, FrenetFrame, MeshBuilder, Point3, RingStation, ShellFacing, SurfaceKind, Vec3,
    emit_annulus, emit_tube_shell, rail_frames, ring_angle,
};

fn stations(radius: f64) -> [RingStation; 2] {
    let frame = FrenetFrame::aligned_to(Vec3::new(0.0, 1.0, 0.0)).expect("frame");
    [
        RingStation { origin: Point3::ORIGIN, frame, radius },
        RingStation { origin: Point3::new(0.0, 10.0, 0.0), frame, radius },
    ]
}

/// Component of `p` perpendicular to the Y axis.
fn radial_from_y_axis(p: Point3) -> Vec3 {
    Vec3::new(p.x, 0.0, p.z)
}

#[test]
fn shell_facing_controls_normal_side() {
    let mut builder = MeshBuilder::new();
    emit_tube_shell(&mut builder, SurfaceKind::OuterWall, &stations(3.0), 24, false, ShellFacing::Outward);
    emit_tube_shell(&mut builder, SurfaceKind::InnerWall, &stations(2.0), 24, false, ShellFacing::Inward);
    let mesh = builder.finish();

    assert_eq!(mesh.triangle_count(), 2 * 24 * 2);
    for (p, n) in mesh.vertices_of(SurfaceKind::OuterWall) {
        assert!(radial_from_y_axis(p).dot(Vec3::from(n)) > 0.0);
    }
    for (p, n) in mesh.vertices_of(SurfaceKind::InnerWall) {
        assert!(radial_from_y_axis(p).dot(Vec3::from(n)) < 0.0);
    }
}

#[test]
fn annulus_faces_along_or_against_tangent() {
    let frame = FrenetFrame::CANONICAL;
    let mut builder = MeshBuilder::new();
    emit_annulus(&mut builder, SurfaceKind::EndCap, Point3::ORIGIN, frame, 3.0, 2.0, 16, CapFacing::Forward);
    let forward = builder.finish();
    assert_eq!(forward.triangle_count(), 32);
    assert!(forward.normals.iter().all(|n| n[2] > 0.99));

    let mut builder = MeshBuilder::new();
    emit_annulus(&mut builder, SurfaceKind::EndCap, Point3::ORIGIN, frame, 3.0, 2.0, 16, CapFacing::Backward);
    let backward = builder.finish();
    assert!(backward.normals.iter().all(|n| n[2] < -0.99));
}

#[test]
fn capped_shells_close_into_a_solid() {
    let frame = FrenetFrame::CANONICAL;
    let top = Point3::new(0.0, 0.0, 5.0);
    let mut builder = MeshBuilder::new();
    for (radius, kind, facing) in [
        (3.0, SurfaceKind::OuterWall, ShellFacing::Outward),
        (2.0, SurfaceKind::InnerWall, ShellFacing::Inward),
    ] {
        let rings = [
            RingStation { origin: Point3::ORIGIN, frame, radius },
            RingStation { origin: top, frame, radius },
        ];
        emit_tube_shell(&mut builder, kind, &rings, 20, false, facing);
    }
    emit_annulus(&mut builder, SurfaceKind::EndCap, Point3::ORIGIN, frame, 3.0, 2.0, 20, CapFacing::Backward);
    emit_annulus(&mut builder, SurfaceKind::EndCap, top, frame, 3.0, 2.0, 20, CapFacing::Forward);

    let diag = builder.finish().diagnostics();
    assert!(diag.is_valid_solid(), "{diag}");
}

#[test]
fn ring_angles_are_evenly_spaced() {
    for n in [3usize, 8, 32] {
        assert_eq!(ring_angle(0, n), 0.0);
        #[allow(clippy::cast_precision_loss)]
        let step = TAU / n as f64;
        for i in 1..n {
            let delta = ring_angle(i, n) - ring_angle(i - 1, n);
            assert!((delta - step).abs() < 1e-12);
        }
    }
}

#[test]
fn rail_frames_are_orthonormal_on_closed_loop() {
    let n = 48;
    let points: Vec<Point3> = (0..n)
        .map(|i| {
            let (s, c) = ring_angle(i, n).sin_cos();
            Point3::new(10.0 * c, 10.0 * s, 2.0 * (2.0 * ring_angle(i, n)).cos())
        })
        .collect();
    let frames = rail_frames(&points, true, |i| {
        let (s, c) = ring_angle(i, n).sin_cos();
        Vec3::new(c, s, 0.0)
    })
    .expect("frames");

    assert_eq!(frames.len(), n);
    for frame in &frames {
        assert!((frame.tangent.length() - 1.0).abs() < 1e-12);
        assert!((frame.normal.length() - 1.0).abs() < 1e-12);
        assert!(frame.tangent.dot(frame.normal).abs() < 1e-12);
        assert!(frame.tangent.cross(frame.normal).sub(frame.binormal).length() < 1e-12);
        assert!(frame.normal.z.abs() < 0.5, "normal should stay close to the radial reference");
    }
}

#[test]
fn rail_frames_need_two_points() {
    assert!(rail_frames(&[Point3::ORIGIN], false, |_| Vec3::X).is_none());
}
