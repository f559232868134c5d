//! Ring-based shell emission shared by every fitting builder.
//!
//! This module provides:
//! - `emit_grid`: a wrapped vertex grid as one surface group, facing either way
//! - `emit_tube_shell`: circular rings swept through a list of stations
//! - `emit_annulus`: a flat ring between two radii (end caps, flange-less stub tips)
//! - `rail_frames`: frames along a sampled centerline with a caller-chosen roll

use std::f64::consts::TAU;

use super::mesh::{MeshBuilder, SurfaceKind};
use super::triangulation::{reverse_winding, triangulate_grid_wrapped};
use super::{FrenetFrame, Point3, Vec3};

/// Which side of a shell its triangles face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellFacing {
    /// Away from the ring axis (pipe outer wall, flange rim, weld bead).
    Outward,
    /// Toward the ring axis (bore, bolt hole walls).
    Inward,
}

/// Which way a flat annulus faces along its frame's tangent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapFacing {
    Forward,
    Backward,
}

/// One cross-section of a tube: a circle of `radius` in the frame's
/// normal/binormal plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingStation {
    pub origin: Point3,
    pub frame: FrenetFrame,
    pub radius: f64,
}

/// Angle of segment `i` of `segments`; every emitter uses this so shared
/// boundaries land on bit-identical positions.
#[must_use]
pub fn ring_angle(i: usize, segments: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let t = i as f64 / segments as f64;
    TAU * t
}

/// Emit `points` (row-major, `u_count` per row) as one surface group.
///
/// `u` must run counter-clockwise about the direction in which `v` advances;
/// `Outward` then faces away from that axis.
pub fn emit_grid(
    builder: &mut MeshBuilder,
    kind: SurfaceKind,
    points: &[Point3],
    u_count: usize,
    wrap_v: bool,
    facing: ShellFacing,
) {
    if u_count == 0 || points.is_empty() {
        return;
    }
    let v_count = points.len() / u_count;
    builder.begin(kind);
    let base = u32::try_from(builder.vertex_count()).unwrap_or(u32::MAX);
    for p in points {
        builder.vertex(*p);
    }
    let mut indices = triangulate_grid_wrapped(u_count, v_count, true, wrap_v);
    if facing == ShellFacing::Inward {
        reverse_winding(&mut indices);
    }
    for tri in indices.chunks_exact(3) {
        builder.triangle(base + tri[0], base + tri[1], base + tri[2]);
    }
    builder.end();
}

/// Sweep a circle through `stations`; `closed` joins the last station back to
/// the first (torus-like loops).
pub fn emit_tube_shell(
    builder: &mut MeshBuilder,
    kind: SurfaceKind,
    stations: &[RingStation],
    radial_segments: usize,
    closed: bool,
    facing: ShellFacing,
) {
    let mut points = Vec::with_capacity(stations.len() * radial_segments);
    for station in stations {
        for seg in 0..radial_segments {
            let angle = ring_angle(seg, radial_segments);
            points.push(station.frame.ring_point(station.origin, station.radius, angle));
        }
    }
    emit_grid(builder, kind, &points, radial_segments, closed, facing);
}

/// Flat ring between `inner_radius` and `outer_radius` at a station.
#[allow(clippy::too_many_arguments)]
pub fn emit_annulus(
    builder: &mut MeshBuilder,
    kind: SurfaceKind,
    origin: Point3,
    frame: FrenetFrame,
    outer_radius: f64,
    inner_radius: f64,
    radial_segments: usize,
    facing: CapFacing,
) {
    builder.begin(kind);
    let outer_start = builder.vertex_count();
    for seg in 0..radial_segments {
        builder.vertex(frame.ring_point(origin, outer_radius, ring_angle(seg, radial_segments)));
    }
    let inner_start = builder.vertex_count();
    for seg in 0..radial_segments {
        builder.vertex(frame.ring_point(origin, inner_radius, ring_angle(seg, radial_segments)));
    }

    let index = |start: usize, seg: usize| u32::try_from(start + seg % radial_segments).unwrap_or(u32::MAX);
    for seg in 0..radial_segments {
        let o0 = index(outer_start, seg);
        let o1 = index(outer_start, seg + 1);
        let i0 = index(inner_start, seg);
        let i1 = index(inner_start, seg + 1);
        match facing {
            CapFacing::Forward => {
                builder.triangle(o0, o1, i0);
                builder.triangle(i0, o1, i1);
            }
            CapFacing::Backward => {
                builder.triangle(o0, i0, o1);
                builder.triangle(i0, i1, o1);
            }
        }
    }
    builder.end();
}

/// Frames along sampled centerline `points`.
///
/// Tangents come from central differences (one-sided at the ends of an open
/// rail). Each normal is `reference(i)` projected off the tangent, which fixes
/// the roll of every ring without accumulating twist around closed loops.
pub fn rail_frames(
    points: &[Point3],
    closed: bool,
    reference: impl Fn(usize) -> Vec3,
) -> Option<Vec<FrenetFrame>> {
    let n = points.len();
    if n < 2 {
        return None;
    }

    let mut frames = Vec::with_capacity(n);
    let mut previous_tangent: Option<Vec3> = None;
    for i in 0..n {
        let (prev, next) = if closed {
            ((i + n - 1) % n, (i + 1) % n)
        } else {
            (i.saturating_sub(1), (i + 1).min(n - 1))
        };
        let tangent = points[next]
            .sub_point(points[prev])
            .normalized()
            .or(previous_tangent)?;
        previous_tangent = Some(tangent);
        frames.push(FrenetFrame::from_tangent_with_reference(tangent, reference(i))?);
    }
    Some(frames)
}
