//! Mesh diagnostics for generated fittings.
//!
//! Diagnostics are computed on demand from a finished [`GeomMesh`](super::GeomMesh)
//! and are used for:
//!
//! - validating closed parts (capped pipe runs, blank flanges) as watertight
//! - spotting degenerate or non-finite output before it reaches the scene layer
//! - the quantized snapshots printed by `spool_cli`
//!
//! # Example
//!
//! ```ignore
//! use spool_mesh::fitting::{build_hollow_cylinder, CylinderCaps, GeometryConfig};
//!
//! let mesh = build_hollow_cylinder(start, end, 30.0, 25.0, CylinderCaps::BOTH, &GeometryConfig::default())?;
//! let diagnostics = mesh.diagnostics();
//! assert!(diagnostics.is_watertight());
//! ```

use std::fmt;

/// Topology and sanity counts for one mesh.
///
/// # Topology Metrics
///
/// - `open_edge_count`: edges with only one adjacent triangle (holes in mesh)
/// - `non_manifold_edge_count`: edges with more than two adjacent triangles
///
/// Both are measured after snapping positions, so `coincident_vertex_count`
/// reports how many vertices were folded onto an earlier one.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GeomMeshDiagnostics {
    /// Total number of vertices in the mesh.
    pub vertex_count: usize,

    /// Total number of triangles in the mesh.
    pub triangle_count: usize,

    /// Number of tagged surface groups.
    pub group_count: usize,

    /// Vertices that share a snapped position with an earlier vertex.
    ///
    /// Seams between separately emitted surfaces (wall and cap, face and hole
    /// wall) show up here; it is not an error.
    pub coincident_vertex_count: usize,

    /// Number of zero-area or collapsed triangles.
    pub degenerate_triangle_count: usize,

    /// Number of open (boundary) edges in the mesh.
    ///
    /// A watertight mesh has zero open edges.
    pub open_edge_count: usize,

    /// Number of non-manifold edges in the mesh.
    pub non_manifold_edge_count: usize,

    /// Vertices with NaN or infinite coordinates.
    pub non_finite_vertex_count: usize,

    /// Human-readable warnings about mesh issues.
    pub warnings: Vec<String>,
}

impl GeomMeshDiagnostics {
    /// Returns `true` if the mesh is watertight (no open edges).
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.open_edge_count == 0
    }

    /// Returns `true` if the mesh is manifold (no non-manifold edges).
    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.non_manifold_edge_count == 0
    }

    #[must_use]
    pub fn is_valid_solid(&self) -> bool {
        self.is_watertight() && self.is_manifold()
    }

    /// No degenerate or non-finite geometry and no warnings. Open edges are
    /// allowed: an uncapped run is still clean.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.non_manifold_edge_count == 0
            && self.degenerate_triangle_count == 0
            && self.non_finite_vertex_count == 0
            && self.warnings.is_empty()
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Format: `"V:{vertices} T:{triangles} [issues...]"`
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("V:{} T:{}", self.vertex_count, self.triangle_count)];

        if self.degenerate_triangle_count > 0 {
            parts.push(format!("degenerate:{}", self.degenerate_triangle_count));
        }
        if self.open_edge_count > 0 {
            parts.push(format!("open:{}", self.open_edge_count));
        }
        if self.non_manifold_edge_count > 0 {
            parts.push(format!("non-manifold:{}", self.non_manifold_edge_count));
        }
        if self.non_finite_vertex_count > 0 {
            parts.push(format!("non-finite:{}", self.non_finite_vertex_count));
        }

        parts.join(" ")
    }
}

impl fmt::Display for GeomMeshDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mesh Diagnostics:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Triangles: {}", self.triangle_count)?;
        writeln!(f, "  Groups: {}", self.group_count)?;

        if self.open_edge_count > 0 || self.non_manifold_edge_count > 0 {
            writeln!(f, "  Topology:")?;
            if self.open_edge_count > 0 {
                writeln!(f, "    - Open edges: {}", self.open_edge_count)?;
            }
            if self.non_manifold_edge_count > 0 {
                writeln!(f, "    - Non-manifold edges: {}", self.non_manifold_edge_count)?;
            }
        }

        if self.degenerate_triangle_count > 0 {
            writeln!(f, "  Degenerate triangles: {}", self.degenerate_triangle_count)?;
        }

        if !self.warnings.is_empty() {
            writeln!(f, "  Warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "    - {warning}")?;
            }
        }

        let status = if !self.is_clean() {
            "ISSUES DETECTED"
        } else if self.is_watertight() {
            "CLOSED"
        } else {
            "OPEN"
        };
        writeln!(f, "  Status: {status}")?;

        Ok(())
    }
}
