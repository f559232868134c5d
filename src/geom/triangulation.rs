use std::ops::Range;

use super::profile::{FaceProfile, PlanarPoint, ProfileError, orient2d, segments_intersect};
use super::Tolerance;

/// Index buffer for a `u_count × v_count` vertex grid stored row by row
/// (`index = v * u_count + u`).
///
/// With `u` running counter-clockwise around a ring and `v` along the ring's
/// axis, the triangles face away from the axis.
#[must_use]
pub fn triangulate_grid_wrapped(
    u_count: usize,
    v_count: usize,
    wrap_u: bool,
    wrap_v: bool,
) -> Vec<u32> {
    let u_count = if wrap_u { u_count.max(3) } else { u_count.max(2) };
    let v_count = if wrap_v { v_count.max(3) } else { v_count.max(2) };

    let quad_u = if wrap_u { u_count } else { u_count - 1 };
    let quad_v = if wrap_v { v_count } else { v_count - 1 };
    let mut indices = Vec::with_capacity(quad_u * quad_v * 6);

    let stride = u_count;
    for v in 0..quad_v {
        let v0 = v;
        let v1 = if wrap_v { (v + 1) % v_count } else { v + 1 };

        for u in 0..quad_u {
            let u0 = u;
            let u1 = if wrap_u { (u + 1) % u_count } else { u + 1 };

            let i0 = to_index(v0 * stride + u0);
            let i1 = to_index(v0 * stride + u1);
            let i2 = to_index(v1 * stride + u0);
            let i3 = to_index(v1 * stride + u1);

            indices.extend_from_slice(&[i0, i1, i2]);
            indices.extend_from_slice(&[i2, i1, i3]);
        }
    }

    indices
}

fn to_index(i: usize) -> u32 {
    u32::try_from(i).unwrap_or(u32::MAX)
}

/// Flip every triangle of an index buffer.
pub fn reverse_winding(indices: &mut [u32]) {
    for tri in indices.chunks_exact_mut(3) {
        tri.swap(1, 2);
    }
}

/// Triangles over a face profile, indexed into `vertices`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileTriangulation {
    /// Outer loop points followed by each hole's points, as stored in the profile.
    pub vertices: Vec<PlanarPoint>,
    /// Counter-clockwise triangles (normal +Z for an XY profile).
    pub indices: Vec<u32>,
}

/// Triangulate a face whose loops are convex: a circular outline around the
/// bore and bolt-hole circles of a flange.
///
/// Holes are spliced into the outline one at a time, each through its shortest
/// bridge that stays inside the face. A hole that cannot see the outline yet
/// (a bore fenced in by bolt holes) waits until its neighbours are merged. The
/// single polygon left over is clipped ear by ear.
///
/// # Errors
/// `ProfileError::Triangulation` when some hole has no clear bridge or no ear
/// remains.
pub fn triangulate_profile(profile: &FaceProfile, tol: Tolerance) -> Result<ProfileTriangulation, ProfileError> {
    let mut vertices = profile.outer.points().to_vec();
    let mut pending: Vec<Range<usize>> = Vec::with_capacity(profile.holes.len());
    for hole in &profile.holes {
        let start = vertices.len();
        vertices.extend_from_slice(hole.points());
        pending.push(start..vertices.len());
    }

    let mut polygon: Vec<u32> = (0..profile.outer.len()).map(to_index).collect();
    while !pending.is_empty() {
        let (slot, at, entry) = pending
            .iter()
            .enumerate()
            .find_map(|(slot, hole)| {
                shortest_bridge(profile, &vertices, &polygon, hole.clone(), &pending, tol)
                    .map(|(at, entry)| (slot, at, entry))
            })
            .ok_or_else(|| {
                ProfileError::Triangulation(format!("{} holes have no clear bridge to the outline", pending.len()))
            })?;
        let hole = pending.remove(slot);
        polygon = splice_hole(&polygon, at, hole, entry);
    }

    let indices = clip_ears(polygon, &vertices, tol)?;
    Ok(ProfileTriangulation { vertices, indices })
}

/// `(polygon position, hole vertex)` of the shortest bridge from `hole` into
/// `polygon`. The bridge must leave through the polygon corner's interior
/// angle, stay inside the face, and cross no edge of the polygon or of any
/// `pending` hole.
fn shortest_bridge(
    profile: &FaceProfile,
    vertices: &[PlanarPoint],
    polygon: &[u32],
    hole: Range<usize>,
    pending: &[Range<usize>],
    tol: Tolerance,
) -> Option<(usize, usize)> {
    let n = polygon.len();
    let mut candidates: Vec<(f64, usize, usize)> = Vec::with_capacity(hole.len() * n);
    for entry in hole {
        let h = vertices[entry];
        for (at, &v) in polygon.iter().enumerate() {
            let p = vertices[v as usize];
            candidates.push(((p.x - h.x).powi(2) + (p.y - h.y).powi(2), at, entry));
        }
    }
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));

    candidates.into_iter().map(|(_, at, entry)| (at, entry)).find(|&(at, entry)| {
        let from = polygon[at] as usize;
        let a = vertices[from];
        let b = vertices[entry];
        let prev = vertices[polygon[(at + n - 1) % n] as usize];
        let next = vertices[polygon[(at + 1) % n] as usize];
        // A vertex already used by a bridge appears twice; each copy owns one wedge.
        let leaves_inside = if orient2d(prev, a, next) > 0.0 {
            orient2d(a, next, b) > 0.0 && orient2d(prev, a, b) > 0.0
        } else {
            orient2d(a, next, b) > 0.0 || orient2d(prev, a, b) > 0.0
        };
        let mid = PlanarPoint::new(0.5 * (a.x + b.x), 0.5 * (a.y + b.y));
        if !leaves_inside || !profile.contains(mid) {
            return false;
        }

        let polygon_edges = (0..n)
            .map(|i| (polygon[i] as usize, polygon[(i + 1) % n] as usize))
            .filter(|&(p, q)| p != from && q != from);
        let hole_edges = pending
            .iter()
            .flat_map(|range| {
                let (start, len) = (range.start, range.len());
                range.clone().map(move |i| (i, start + (i - start + 1) % len))
            })
            .filter(|&(p, q)| p != entry && q != entry);
        !polygon_edges
            .chain(hole_edges)
            .any(|(p, q)| segments_intersect(a, b, vertices[p], vertices[q], tol))
    })
}

/// Walk out along the bridge at `polygon[at]`, once around the hole starting at
/// `entry`, and back.
fn splice_hole(polygon: &[u32], at: usize, hole: Range<usize>, entry: usize) -> Vec<u32> {
    let len = hole.len();
    let offset = entry - hole.start;
    let mut spliced = Vec::with_capacity(polygon.len() + len + 2);
    spliced.extend_from_slice(&polygon[..=at]);
    spliced.extend((0..=len).map(|k| to_index(hole.start + (offset + k) % len)));
    spliced.push(polygon[at]);
    spliced.extend_from_slice(&polygon[at + 1..]);
    spliced
}

/// Clip a counter-clockwise polygon into triangles, resuming each search next
/// to the last ear.
fn clip_ears(mut ring: Vec<u32>, vertices: &[PlanarPoint], tol: Tolerance) -> Result<Vec<u32>, ProfileError> {
    let mut indices = Vec::with_capacity(ring.len().saturating_sub(2) * 3);
    let mut cursor = 0usize;
    while ring.len() > 3 {
        let n = ring.len();
        let ear = (0..n)
            .map(|k| (cursor + k) % n)
            .find(|&i| is_ear(&ring, i, vertices, tol))
            .ok_or_else(|| ProfileError::Triangulation(format!("no ear among {n} remaining vertices")))?;
        indices.extend_from_slice(&[ring[(ear + n - 1) % n], ring[ear], ring[(ear + 1) % n]]);
        ring.remove(ear);
        cursor = if ear == 0 { n - 2 } else { ear - 1 };
    }

    let [a, b, c] = [ring[0], ring[1], ring[2]].map(|i| vertices[i as usize]);
    if orient2d(a, b, c) > tol.eps {
        indices.extend_from_slice(&ring);
    }
    if indices.is_empty() {
        return Err(ProfileError::Triangulation("profile has no area".to_string()));
    }
    Ok(indices)
}

/// Convex corner whose triangle holds no other polygon vertex. Bridge copies
/// share an index with a corner and are skipped.
fn is_ear(ring: &[u32], i: usize, vertices: &[PlanarPoint], tol: Tolerance) -> bool {
    let n = ring.len();
    let corners = [ring[(i + n - 1) % n], ring[i], ring[(i + 1) % n]];
    let [a, b, c] = corners.map(|v| vertices[v as usize]);
    if orient2d(a, b, c) <= tol.eps {
        return false;
    }
    !ring.iter().filter(|&&v| !corners.contains(&v)).any(|&v| {
        let p = vertices[v as usize];
        orient2d(a, b, p) >= -tol.eps && orient2d(b, c, p) >= -tol.eps && orient2d(c, a, p) >= -tol.eps
    })
}
