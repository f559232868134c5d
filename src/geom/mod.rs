mod core;
mod curve;
mod diagnostics;
mod frame;
mod mesh;
mod pipe;
mod profile;
mod triangulation;

pub use core::{BBox, Point3, Tolerance, Transform, Vec3};
pub use curve::{ArcCurve, Curve3, SaddleAxis, SaddleCurve, tessellate_curve_uniform};
pub use diagnostics::GeomMeshDiagnostics;
pub use frame::FrenetFrame;
pub use mesh::{GeomMesh, MeshBuilder, MeshGroup, SurfaceKind};
pub use pipe::{
    CapFacing, RingStation, ShellFacing,
    emit_annulus, emit_grid, emit_tube_shell, rail_frames, ring_angle,
};
pub use profile::{FaceProfile, PlanarPoint, ProfileError, ProfileLoop, circle_loop_points};
pub use triangulation::{
    ProfileTriangulation, reverse_winding, triangulate_grid_wrapped, triangulate_profile,
};

#[cfg(test)]
mod tests;
