mod bend;
mod branch;
mod catalog;
mod config;
mod dimensions;
mod error;
mod flange;
mod spool;
mod straight;
mod weld;

pub use bend::{BendParameters, build_continuous_bend, build_mitered_bend};
pub use branch::{BranchStub, BranchStubMesh, StubTip, build_branch_stub};
pub use catalog::{CatalogEntry, CatalogMatch, FlangeCatalog, FlangeSpec, MatchKind};
pub use config::GeometryConfig;
pub use dimensions::{
    AWS_EFFECTIVE_DIVISOR, PipeCrossSection, STEINMETZ_FACTOR, effective_weld_length,
    outside_diameter, sabs_719_wall_thickness, steinmetz_weld_length, visual_wall_thickness,
};
pub use error::{CatalogError, ConfigError, FittingError};
pub use flange::{BoltHole, FlangeKind, FlangeMesh, build_flange, build_retaining_ring};
pub use spool::{SpoolItem, build_spool, merge_spool_meshes};
pub use straight::{CylinderCaps, build_hollow_cylinder};
pub use weld::{SaddleJoin, build_saddle_weld, build_weld_ring};

#[cfg(test)]
mod tests;
