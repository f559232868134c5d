use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::geom::{GeomMesh, Transform};

/// Resolutions, ratios and clearances shared by every fitting builder.
///
/// Builders work in millimetres. `scale` converts a finished mesh to scene
/// units through [`GeometryConfig::to_scene`]; spool assembly applies it once per
/// item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Scene units per millimetre.
    pub scale: f64,
    /// Segments around a pipe, flange rim or bore.
    pub radial_segments: usize,
    /// Longitudinal samples along a continuous bend.
    pub bend_samples: usize,
    /// Segments around a weld ring's centerline.
    pub weld_ring_segments: usize,
    /// Segments around a weld ring's tube.
    pub weld_tube_segments: usize,
    /// Samples along the saddle weld loop.
    pub saddle_weld_samples: usize,
    pub saddle_weld_tube_segments: usize,
    /// Branch stub grid size, both around and along.
    pub stub_grid_segments: usize,
    pub bolt_hole_segments: usize,
    pub retaining_ring_tube_segments: usize,
    /// Weld bead tube radius as a fraction of the pipe outer radius.
    pub weld_tube_ratio: f64,
    /// Weld ring radius over pipe outer radius.
    pub weld_ring_oversize: f64,
    /// Saddle weld loop radius over stub outer radius.
    pub saddle_weld_oversize: f64,
    /// Flange thickness as a fraction of its outer diameter.
    pub flange_thickness_ratio: f64,
    pub bore_clearance: f64,
    pub rotating_bore_clearance: f64,
    /// Retaining ring outer radius over pipe outer radius.
    pub retaining_ring_ratio: f64,
    /// Lower bound on displayed wall thickness as a fraction of the OD.
    pub min_visual_wall_ratio: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            radial_segments: 32,
            bend_samples: 64,
            weld_ring_segments: 32,
            weld_tube_segments: 12,
            saddle_weld_samples: 64,
            saddle_weld_tube_segments: 8,
            stub_grid_segments: 32,
            bolt_hole_segments: 16,
            retaining_ring_tube_segments: 16,
            weld_tube_ratio: 0.04,
            weld_ring_oversize: 1.02,
            saddle_weld_oversize: 1.05,
            flange_thickness_ratio: 0.075,
            bore_clearance: 1.02,
            rotating_bore_clearance: 1.1,
            retaining_ring_ratio: 1.15,
            min_visual_wall_ratio: 0.02,
        }
    }
}

impl GeometryConfig {
    /// # Errors
    /// Returns the first out-of-range value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("radial_segments", self.radial_segments),
            ("bend_samples", self.bend_samples),
            ("weld_ring_segments", self.weld_ring_segments),
            ("weld_tube_segments", self.weld_tube_segments),
            ("saddle_weld_samples", self.saddle_weld_samples),
            ("saddle_weld_tube_segments", self.saddle_weld_tube_segments),
            ("stub_grid_segments", self.stub_grid_segments),
            ("bolt_hole_segments", self.bolt_hole_segments),
            ("retaining_ring_tube_segments", self.retaining_ring_tube_segments),
        ] {
            if value < 3 {
                return Err(ConfigError::TooFewSegments { field, value });
            }
        }

        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ConfigError::InvalidScale(self.scale));
        }

        for (field, value, max) in [
            ("weld_ring_oversize", self.weld_ring_oversize, 1.1),
            ("saddle_weld_oversize", self.saddle_weld_oversize, 1.2),
        ] {
            if !(value > 1.0 && value <= max) {
                return Err(ConfigError::OversizeOutOfRange {
                    field,
                    value,
                    min: 1.0,
                    max,
                });
            }
        }

        for (field, value) in [
            ("weld_tube_ratio", self.weld_tube_ratio),
            ("flange_thickness_ratio", self.flange_thickness_ratio),
            ("min_visual_wall_ratio", self.min_visual_wall_ratio),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(ConfigError::RatioOutOfRange { field, value });
            }
        }

        for (field, value) in [
            ("bore_clearance", self.bore_clearance),
            ("rotating_bore_clearance", self.rotating_bore_clearance),
            ("retaining_ring_ratio", self.retaining_ring_ratio),
        ] {
            if !(value.is_finite() && value >= 1.0) {
                return Err(ConfigError::ClearanceBelowOne { field, value });
            }
        }

        Ok(())
    }

    /// Convert a millimetre mesh to scene units.
    #[must_use]
    pub fn to_scene(&self, mesh: &GeomMesh) -> GeomMesh {
        if (self.scale - 1.0).abs() <= f64::EPSILON {
            return mesh.clone();
        }
        mesh.transformed(Transform::uniform_scale(self.scale))
    }
}
