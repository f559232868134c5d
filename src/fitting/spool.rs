//! Whole-spool assembly: independent items built and scaled to scene units.

use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::bend::{BendParameters, build_continuous_bend, build_mitered_bend};
use super::branch::{BranchStub, build_branch_stub};
use super::catalog::FlangeCatalog;
use super::config::GeometryConfig;
use super::dimensions::PipeCrossSection;
use super::error::FittingError;
use super::flange::{FlangeKind, build_flange, build_retaining_ring};
use super::straight::{CylinderCaps, build_hollow_cylinder};
use crate::geom::{GeomMesh, Point3, Transform, Vec3};

/// One component of a spool, with its placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpoolItem {
    Straight {
        start: Point3,
        end: Point3,
        section: PipeCrossSection,
        #[serde(default)]
        cap_start: bool,
        #[serde(default)]
        cap_end: bool,
    },
    ContinuousBend {
        bend: BendParameters,
        section: PipeCrossSection,
    },
    MiteredBend {
        bend: BendParameters,
        section: PipeCrossSection,
    },
    BranchStub(BranchStub),
    /// Catalog flange centered on `center`, its axis along `normal`.
    Flange {
        center: Point3,
        normal: Vec3,
        nominal_bore: f64,
        section: PipeCrossSection,
        #[serde(default)]
        kind: FlangeKind,
    },
    RetainingRing {
        center: Point3,
        normal: Vec3,
        pipe_outer_radius: f64,
    },
}

impl SpoolItem {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Straight { .. } => "straight",
            Self::ContinuousBend { .. } => "continuous_bend",
            Self::MiteredBend { .. } => "mitered_bend",
            Self::BranchStub(_) => "branch_stub",
            Self::Flange { .. } => "flange",
            Self::RetainingRing { .. } => "retaining_ring",
        }
    }

    /// Build this item in millimetres.
    ///
    /// # Errors
    /// Whatever the underlying builder rejects.
    pub fn build(&self, catalog: &FlangeCatalog, config: &GeometryConfig) -> Result<GeomMesh, FittingError> {
        match self {
            Self::Straight {
                start,
                end,
                section,
                cap_start,
                cap_end,
            } => {
                let caps = CylinderCaps {
                    start: *cap_start,
                    end: *cap_end,
                };
                build_hollow_cylinder(*start, *end, section.outer_radius, section.inner_radius, caps, config)
            }
            Self::ContinuousBend { bend, section } => build_continuous_bend(bend, section, config),
            Self::MiteredBend { bend, section } => build_mitered_bend(bend, section, config),
            Self::BranchStub(stub) => Ok(build_branch_stub(stub, catalog, config)?.combined()),
            Self::Flange {
                center,
                normal,
                nominal_bore,
                section,
                kind,
            } => {
                let matched = catalog.resolve(*nominal_bore)?;
                let flange = build_flange(section.outer_radius, section.inner_radius, &matched.spec, *kind, config)?;
                let placement = Transform::placement(*center, *normal).ok_or(FittingError::DegenerateAxis)?;
                Ok(flange.placed(placement).mesh)
            }
            Self::RetainingRing {
                center,
                normal,
                pipe_outer_radius,
            } => {
                let ring = build_retaining_ring(*pipe_outer_radius, config)?;
                let placement = Transform::placement(*center, *normal).ok_or(FittingError::DegenerateAxis)?;
                Ok(ring.transformed(placement))
            }
        }
    }
}

fn build_scene_item(
    item: &SpoolItem,
    catalog: &FlangeCatalog,
    config: &GeometryConfig,
) -> Result<GeomMesh, FittingError> {
    let mesh = item.build(catalog, config)?;
    Ok(config.to_scene(&mesh))
}

#[cfg(feature = "parallel")]
fn build_items(
    items: &[SpoolItem],
    catalog: &FlangeCatalog,
    config: &GeometryConfig,
) -> Result<Vec<GeomMesh>, FittingError> {
    items
        .par_iter()
        .map(|item| build_scene_item(item, catalog, config))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn build_items(
    items: &[SpoolItem],
    catalog: &FlangeCatalog,
    config: &GeometryConfig,
) -> Result<Vec<GeomMesh>, FittingError> {
    items
        .iter()
        .map(|item| build_scene_item(item, catalog, config))
        .collect()
}

/// Build every item, in order, in scene units.
///
/// # Errors
/// The first failing item's error, or an invalid config.
pub fn build_spool(
    items: &[SpoolItem],
    catalog: &FlangeCatalog,
    config: &GeometryConfig,
) -> Result<Vec<GeomMesh>, FittingError> {
    config.validate()?;
    let meshes = build_items(items, catalog, config)?;
    log::debug!(
        "spool: {} items, {} triangles",
        meshes.len(),
        meshes.iter().map(GeomMesh::triangle_count).sum::<usize>()
    );
    Ok(meshes)
}

/// Concatenate built items into one mesh.
#[must_use]
pub fn merge_spool_meshes(meshes: &[GeomMesh]) -> GeomMesh {
    GeomMesh::merged(meshes)
}
