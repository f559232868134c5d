use std::collections::HashMap;

use crate::geom::profile::orient2d;
use crate::geom::{
    FaceProfile, PlanarPoint, ProfileError, ProfileLoop, ProfileTriangulation, Tolerance,
    circle_loop_points, reverse_winding, triangulate_grid_wrapped, triangulate_profile,
};

fn circle(cx: f64, cy: f64, r: f64, n: usize) -> ProfileLoop {
    ProfileLoop::new(circle_loop_points(PlanarPoint::new(cx, cy), r, n), Tolerance::DEFAULT).expect("loop")
}

#[test]
fn wrapped_grid_counts_and_bounds() {
    let open = triangulate_grid_wrapped(8, 3, true, false);
    assert_eq!(open.len(), 8 * 2 * 2 * 3);
    assert!(open.iter().all(|&i| (i as usize) < 8 * 3));

    let closed = triangulate_grid_wrapped(8, 3, true, true);
    assert_eq!(closed.len(), 8 * 3 * 2 * 3);
}

#[test]
fn reverse_winding_swaps_two_corners() {
    let mut indices = vec![0, 1, 2, 2, 1, 3];
    reverse_winding(&mut indices);
    assert_eq!(indices, vec![0, 2, 1, 2, 3, 1]);
}

#[test]
fn flange_like_profile_triangulates_exactly() {
    let tol = Tolerance::DEFAULT;
    let mut holes = vec![circle(0.0, 0.0, 60.0, 32)];
    for i in 0..8 {
        let angle = std::f64::consts::TAU * f64::from(i) / 8.0;
        holes.push(circle(120.0 * angle.cos(), 120.0 * angle.sin(), 11.0, 16));
    }
    let profile = FaceProfile::new(circle(0.0, 0.0, 142.5, 32), holes, tol).expect("profile");

    let result = triangulate_profile(&profile, tol).expect("triangulation");
    assert_eq!(result.vertices.len(), 32 + 32 + 8 * 16);
    assert_exact_cover(&profile, &result);
}

/// Bolt holes on a circle, each with `hole_segments` points.
fn bolt_circle(count: u32, pitch_radius: f64, hole_radius: f64, hole_segments: usize) -> Vec<ProfileLoop> {
    (0..count)
        .map(|i| {
            let angle = std::f64::consts::TAU * f64::from(i) / f64::from(count);
            circle(pitch_radius * angle.cos(), pitch_radius * angle.sin(), hole_radius, hole_segments)
        })
        .collect()
}

/// Counter-clockwise triangles covering exactly the profile area, with every
/// loop edge used once and every interior edge twice.
fn assert_exact_cover(profile: &FaceProfile, result: &ProfileTriangulation) {
    let vertices = &result.vertices;
    let mut area = 0.0;
    for tri in result.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| vertices[i as usize]);
        let doubled = orient2d(a, b, c);
        assert!(doubled > 0.0, "triangle is not counter-clockwise");
        area += 0.5 * doubled;
    }
    assert!((area - profile.area()).abs() < 1e-6 * profile.area());

    let mut edges: HashMap<(u32, u32), usize> = HashMap::new();
    for tri in result.indices.chunks_exact(3) {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            *edges.entry((a.min(b), a.max(b))).or_default() += 1;
        }
    }
    let boundary = edges.values().filter(|&&count| count == 1).count();
    assert_eq!(boundary, vertices.len());
    assert!(edges.values().all(|&count| count <= 2));
}

#[test]
fn bore_fenced_in_by_bolt_holes() {
    // Every outline vertex sits just outside a bolt hole, so the bore can only
    // reach the outline through the bolt holes.
    let tol = Tolerance::DEFAULT;
    let mut holes = vec![circle(0.0, 0.0, 57.6, 12)];
    holes.extend(bolt_circle(12, 205.0, 13.0, 12));
    let profile = FaceProfile::new(circle(0.0, 0.0, 230.0, 12), holes, tol).expect("profile");

    let result = triangulate_profile(&profile, tol).expect("triangulation");
    assert_exact_cover(&profile, &result);
}

#[test]
fn bridges_may_share_an_outline_vertex() {
    // NB450 layout: several holes pick the outline vertex the bore bridged to.
    let tol = Tolerance::DEFAULT;
    let mut holes = vec![circle(0.0, 0.0, 229.092, 32)];
    holes.extend(bolt_circle(20, 292.5, 15.0, 16));
    let profile = FaceProfile::new(circle(0.0, 0.0, 320.0, 32), holes, tol).expect("profile");

    let result = triangulate_profile(&profile, tol).expect("triangulation");
    assert_exact_cover(&profile, &result);
}

#[test]
fn profile_normalizes_orientation() {
    let tol = Tolerance::DEFAULT;
    let outer = circle(0.0, 0.0, 10.0, 12).reversed();
    assert!(!outer.is_ccw());
    let profile = FaceProfile::new(outer, vec![circle(0.0, 0.0, 4.0, 12)], tol).expect("profile");
    assert!(profile.outer.is_ccw());
    assert!(!profile.holes[0].is_ccw());
    assert!(profile.contains(PlanarPoint::new(7.0, 0.0)));
    assert!(!profile.contains(PlanarPoint::new(1.0, 0.0)));
}

#[test]
fn profile_rejects_bad_holes() {
    let tol = Tolerance::DEFAULT;
    let outer = || circle(0.0, 0.0, 10.0, 24);

    let crossing = FaceProfile::new(outer(), vec![circle(9.0, 0.0, 2.0, 12)], tol);
    assert_eq!(crossing, Err(ProfileError::HoleIntersectsOuter { hole: 0 }));

    let outside = FaceProfile::new(outer(), vec![circle(30.0, 0.0, 2.0, 12)], tol);
    assert_eq!(outside, Err(ProfileError::HoleOutsideBoundary { hole: 0 }));

    let overlapping = FaceProfile::new(
        outer(),
        vec![circle(0.0, 0.0, 3.0, 12), circle(2.5, 0.0, 1.0, 12)],
        tol,
    );
    assert_eq!(overlapping, Err(ProfileError::HolesIntersect { first: 0, second: 1 }));
}

#[test]
fn loop_validation() {
    let tol = Tolerance::DEFAULT;
    let two = ProfileLoop::new(vec![PlanarPoint::new(0.0, 0.0), PlanarPoint::new(1.0, 0.0)], tol);
    assert_eq!(two, Err(ProfileError::InsufficientPoints { count: 2 }));

    let bowtie = ProfileLoop::new(
        vec![
            PlanarPoint::new(0.0, 0.0),
            PlanarPoint::new(1.0, 1.0),
            PlanarPoint::new(1.0, 0.0),
            PlanarPoint::new(0.0, 1.0),
        ],
        tol,
    );
    assert_eq!(bowtie, Err(ProfileError::SelfIntersection));

    let nan = ProfileLoop::new(
        vec![PlanarPoint::new(f64::NAN, 0.0), PlanarPoint::new(1.0, 0.0), PlanarPoint::new(0.0, 1.0)],
        tol,
    );
    assert_eq!(nan, Err(ProfileError::NonFinitePoints));
}
