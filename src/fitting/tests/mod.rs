mod test_bend_basic;
mod test_catalog_basic;
mod test_flange_basic;
mod test_straight_basic;

use crate::geom::{GeomMesh, Point3, SurfaceKind, Vec3};

/// Component of `p − origin` perpendicular to the unit `axis`.
pub(super) fn radial(p: Point3, origin: Point3, axis: Vec3) -> Vec3 {
    let d = p.sub_point(origin);
    d.sub(axis.mul_scalar(d.dot(axis)))
}

pub(super) fn group_count(mesh: &GeomMesh, kind: SurfaceKind) -> usize {
    mesh.groups_of(kind).count()
}
