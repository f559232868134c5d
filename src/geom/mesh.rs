use std::collections::BTreeMap;
use std::ops::Range;

use serde::Serialize;

use super::diagnostics::GeomMeshDiagnostics;
use super::{BBox, Point3, Tolerance, Transform};

/// What a run of triangles represents on the physical fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    OuterWall,
    InnerWall,
    EndCap,
    WeldBead,
    FlangeRim,
    FlangeBore,
    FlangeFace,
    BoltHole,
    RetainingRing,
}

impl SurfaceKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OuterWall => "outer_wall",
            Self::InnerWall => "inner_wall",
            Self::EndCap => "end_cap",
            Self::WeldBead => "weld_bead",
            Self::FlangeRim => "flange_rim",
            Self::FlangeBore => "flange_bore",
            Self::FlangeFace => "flange_face",
            Self::BoltHole => "bolt_hole",
            Self::RetainingRing => "retaining_ring",
        }
    }
}

/// A contiguous vertex and index range belonging to one surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshGroup {
    pub kind: SurfaceKind,
    pub vertices: Range<usize>,
    pub indices: Range<usize>,
}

/// Triangle mesh handed to the scene layer.
///
/// `normals` are always derived from the triangles (area-weighted vertex
/// normals), so they follow the winding: outward for walls, into the bore for
/// inner shells and hole walls.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GeomMesh {
    pub positions: Vec<[f64; 3]>,
    pub indices: Vec<u32>,
    pub normals: Vec<[f64; 3]>,
    pub groups: Vec<MeshGroup>,
}

impl GeomMesh {
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns true if any vertex position contains NaN or Inf values.
    #[must_use]
    pub fn has_invalid_vertices(&self) -> bool {
        self.positions
            .iter()
            .any(|p| !p[0].is_finite() || !p[1].is_finite() || !p[2].is_finite())
    }

    /// Returns true if all vertex indices are within bounds.
    #[must_use]
    pub fn has_valid_indices(&self) -> bool {
        let n = self.positions.len();
        self.indices.iter().all(|&i| (i as usize) < n)
    }

    /// # Errors
    /// A message naming the first broken buffer invariant.
    pub fn validate(&self) -> Result<(), String> {
        if self.indices.len() % 3 != 0 {
            return Err("mesh indices are not a triangle list (len % 3 != 0)".to_string());
        }
        if self.has_invalid_vertices() {
            return Err("mesh has invalid vertex coordinates (NaN/Inf)".to_string());
        }
        if !self.has_valid_indices() {
            return Err("mesh has out-of-bounds vertex indices".to_string());
        }
        if self.normals.len() != self.positions.len() {
            return Err("mesh normal buffer does not match vertex count".to_string());
        }
        Ok(())
    }

    #[must_use]
    pub fn bbox(&self) -> Option<BBox> {
        BBox::from_points(self.positions.iter().copied().map(Point3::from_array))
    }

    /// Groups tagged with `kind`, in emission order.
    pub fn groups_of(&self, kind: SurfaceKind) -> impl Iterator<Item = &MeshGroup> + '_ {
        self.groups.iter().filter(move |g| g.kind == kind)
    }

    /// `(position, normal)` pairs of every vertex in groups tagged with `kind`.
    pub fn vertices_of(&self, kind: SurfaceKind) -> impl Iterator<Item = (Point3, [f64; 3])> + '_ {
        self.groups_of(kind).flat_map(move |g| {
            g.vertices
                .clone()
                .map(move |i| (Point3::from_array(self.positions[i]), self.normals[i]))
        })
    }

    /// Append `other`, re-basing its indices and group ranges.
    pub fn append(&mut self, other: &GeomMesh) {
        let vertex_offset = self.positions.len();
        let index_offset = self.indices.len();
        let base = u32::try_from(vertex_offset).unwrap_or(u32::MAX);

        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|&i| i + base));
        self.groups.extend(other.groups.iter().map(|g| MeshGroup {
            kind: g.kind,
            vertices: g.vertices.start + vertex_offset..g.vertices.end + vertex_offset,
            indices: g.indices.start + index_offset..g.indices.end + index_offset,
        }));
    }

    /// Concatenate several meshes into one.
    #[must_use]
    pub fn merged<'a>(meshes: impl IntoIterator<Item = &'a GeomMesh>) -> Self {
        let mut out = Self::default();
        for mesh in meshes {
            out.append(mesh);
        }
        out
    }

    /// Apply a rigid transform; winding is reversed for mirroring transforms so
    /// derived normals keep their orientation.
    #[must_use]
    pub fn transformed(&self, transform: Transform) -> Self {
        let positions: Vec<Point3> = self
            .positions
            .iter()
            .map(|&p| transform.apply_point(Point3::from_array(p)))
            .collect();
        let mut indices = self.indices.clone();
        if transform.is_mirroring() {
            for tri in indices.chunks_exact_mut(3) {
                tri.swap(1, 2);
            }
        }
        let normals = compute_smooth_normals(&positions, &indices);
        Self {
            positions: positions.into_iter().map(Point3::to_array).collect(),
            indices,
            normals,
            groups: self.groups.clone(),
        }
    }

    /// Topology and sanity report.
    ///
    /// Edges are keyed on positions snapped to [`Tolerance::WELD`], so separately
    /// emitted surfaces that share a boundary (a wall and its cap) count as joined.
    #[must_use]
    pub fn diagnostics(&self) -> GeomMeshDiagnostics {
        let mut diagnostics = GeomMeshDiagnostics {
            vertex_count: self.vertex_count(),
            triangle_count: self.triangle_count(),
            group_count: self.groups.len(),
            non_finite_vertex_count: self
                .positions
                .iter()
                .filter(|p| !Point3::from_array(**p).is_finite())
                .count(),
            ..GeomMeshDiagnostics::default()
        };

        let (welded, keys) = weld_keys(&self.positions, Tolerance::WELD);
        diagnostics.coincident_vertex_count = welded;

        let points: Vec<Point3> = self.positions.iter().copied().map(Point3::from_array).collect();
        diagnostics.degenerate_triangle_count = count_degenerate_triangles(&points, &self.indices, &keys);

        let (open, non_manifold) = count_edge_topology(&self.indices, &keys);
        diagnostics.open_edge_count = open;
        diagnostics.non_manifold_edge_count = non_manifold;

        if diagnostics.non_finite_vertex_count > 0 {
            diagnostics.add_warning("mesh has non-finite vertices");
        }
        if non_manifold > 0 {
            diagnostics.add_warning("mesh has non-manifold edges");
        }
        diagnostics
    }
}

/// Accumulates vertices and triangles surface by surface.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    positions: Vec<Point3>,
    indices: Vec<u32>,
    groups: Vec<MeshGroup>,
    open_group: Option<(SurfaceKind, usize, usize)>,
}

impl MeshBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new surface group; closes any group still open.
    pub fn begin(&mut self, kind: SurfaceKind) {
        self.end();
        self.open_group = Some((kind, self.positions.len(), self.indices.len()));
    }

    pub fn end(&mut self) {
        if let Some((kind, v0, i0)) = self.open_group.take() {
            if self.indices.len() > i0 {
                self.groups.push(MeshGroup {
                    kind,
                    vertices: v0..self.positions.len(),
                    indices: i0..self.indices.len(),
                });
            }
        }
    }

    /// Push a vertex and return its index.
    pub fn vertex(&mut self, p: Point3) -> u32 {
        let index = u32::try_from(self.positions.len()).unwrap_or(u32::MAX);
        self.positions.push(p);
        index
    }

    pub fn triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Close the last group and derive normals.
    #[must_use]
    pub fn finish(mut self) -> GeomMesh {
        self.end();
        let normals = compute_smooth_normals(&self.positions, &self.indices);
        GeomMesh {
            positions: self.positions.into_iter().map(Point3::to_array).collect(),
            indices: self.indices,
            normals,
            groups: self.groups,
        }
    }
}

fn quantize(value: f64, eps: f64) -> i64 {
    #[allow(clippy::cast_possible_truncation)]
    let q = (value / eps).round() as i64;
    q
}

/// Map every vertex to the first vertex sharing its snapped position.
fn weld_keys(positions: &[[f64; 3]], tol: Tolerance) -> (usize, Vec<u32>) {
    let mut first_by_key: BTreeMap<[i64; 3], u32> = BTreeMap::new();
    let mut keys = Vec::with_capacity(positions.len());
    let mut welded = 0usize;

    for (i, p) in positions.iter().enumerate() {
        let key = [quantize(p[0], tol.eps), quantize(p[1], tol.eps), quantize(p[2], tol.eps)];
        let candidate = u32::try_from(i).unwrap_or(u32::MAX);
        let canonical = *first_by_key.entry(key).or_insert(candidate);
        if canonical != candidate {
            welded += 1;
        }
        keys.push(canonical);
    }

    (welded, keys)
}

fn count_degenerate_triangles(points: &[Point3], indices: &[u32], keys: &[u32]) -> usize {
    indices
        .chunks_exact(3)
        .filter(|tri| {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let (Some(&ka), Some(&kb), Some(&kc)) = (keys.get(a), keys.get(b), keys.get(c)) else {
                return true;
            };
            if ka == kb || kb == kc || ka == kc {
                return true;
            }
            let (Some(pa), Some(pb), Some(pc)) = (points.get(a), points.get(b), points.get(c)) else {
                return true;
            };
            let area2 = pb.sub_point(*pa).cross(pc.sub_point(*pa)).length();
            !(area2.is_finite() && area2 > Tolerance::DEFAULT.eps)
        })
        .count()
}

fn count_edge_topology(indices: &[u32], keys: &[u32]) -> (usize, usize) {
    let mut edge_counts: BTreeMap<(u32, u32), u32> = BTreeMap::new();

    for tri in indices.chunks_exact(3) {
        let mapped: Vec<u32> = tri
            .iter()
            .map(|&i| keys.get(i as usize).copied().unwrap_or(i))
            .collect();
        let (i0, i1, i2) = (mapped[0], mapped[1], mapped[2]);

        if i0 == i1 || i1 == i2 || i0 == i2 {
            continue;
        }

        for (ea, eb) in [(i0, i1), (i1, i2), (i2, i0)] {
            let edge = if ea <= eb { (ea, eb) } else { (eb, ea) };
            *edge_counts.entry(edge).or_insert(0) += 1;
        }
    }

    let mut open_edge_count = 0usize;
    let mut non_manifold_edge_count = 0usize;
    for count in edge_counts.into_values() {
        if count == 1 {
            open_edge_count += 1;
        } else if count > 2 {
            non_manifold_edge_count += 1;
        }
    }

    (open_edge_count, non_manifold_edge_count)
}

pub(crate) fn compute_smooth_normals(points: &[Point3], indices: &[u32]) -> Vec<[f64; 3]> {
    let mut normals = vec![[0.0, 0.0, 0.0]; points.len()];

    for tri in indices.chunks_exact(3) {
        let i0 = tri[0] as usize;
        let i1 = tri[1] as usize;
        let i2 = tri[2] as usize;

        let (Some(a), Some(b), Some(c)) = (points.get(i0), points.get(i1), points.get(i2)) else {
            continue;
        };

        let n = b.sub_point(*a).cross(c.sub_point(*a));
        for i in [i0, i1, i2] {
            normals[i][0] += n.x;
            normals[i][1] += n.y;
            normals[i][2] += n.z;
        }
    }

    for n in &mut normals {
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        if len.is_finite() && len > 0.0 {
            let inv = 1.0 / len;
            n[0] *= inv;
            n[1] *= inv;
            n[2] *= inv;
        } else {
            *n = [0.0, 0.0, 1.0];
        }
    }

    normals
}
