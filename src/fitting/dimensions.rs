//! Pipe sizes: nominal bore to outside diameter, wall thickness, and the
//! cross-section radii the builders consume.

use serde::{Deserialize, Serialize};

use super::config::GeometryConfig;
use super::error::FittingError;

/// ASME B36.10 outside diameters (mm) by nominal bore.
const NB_TO_OD: [(f64, f64); 26] = [
    (15.0, 21.3),
    (20.0, 26.7),
    (25.0, 33.4),
    (32.0, 42.2),
    (40.0, 48.3),
    (50.0, 60.3),
    (65.0, 73.0),
    (80.0, 88.9),
    (100.0, 114.3),
    (125.0, 139.7),
    (150.0, 168.3),
    (200.0, 219.1),
    (250.0, 273.0),
    (300.0, 323.9),
    (350.0, 355.6),
    (400.0, 406.4),
    (450.0, 457.2),
    (500.0, 508.0),
    (600.0, 609.6),
    (750.0, 762.0),
    (800.0, 812.8),
    (850.0, 863.6),
    (900.0, 914.4),
    (1000.0, 1016.0),
    (1050.0, 1066.8),
    (1200.0, 1219.2),
];

/// SABS 719 wall thickness (mm), keyed by the smallest NB of each band.
const SABS_719_WALL: [(f64, f64); 5] = [
    (200.0, 5.2),
    (300.0, 6.4),
    (650.0, 8.0),
    (850.0, 9.5),
    (1200.0, 12.7),
];

/// Saddle weld length of a perpendicular branch, as a multiple of the branch OD.
pub const STEINMETZ_FACTOR: f64 = 2.7;

/// Ratio between the Steinmetz length and the effective weld length.
pub const AWS_EFFECTIVE_DIVISOR: f64 = 1.5;

/// Below the table the OD is estimated from the bore.
const SMALL_BORE_OD_FACTOR: f64 = 1.05;

/// Value of the closest entry at or below `key`, `None` below the table.
fn closest_below(table: &[(f64, f64)], key: f64) -> Option<f64> {
    let upper = table.partition_point(|&(k, _)| k <= key);
    upper.checked_sub(1).map(|index| table[index].1)
}

/// Outside diameter for a nominal bore. Sizes between entries take the closest
/// smaller entry; sizes below the table are estimated as `nb × 1.05`.
#[must_use]
pub fn outside_diameter(nominal_bore: f64) -> f64 {
    closest_below(&NB_TO_OD, nominal_bore).unwrap_or(nominal_bore * SMALL_BORE_OD_FACTOR)
}

/// SABS 719 wall thickness; bores below the table use its thinnest wall.
#[must_use]
pub fn sabs_719_wall_thickness(nominal_bore: f64) -> f64 {
    closest_below(&SABS_719_WALL, nominal_bore).unwrap_or(SABS_719_WALL[0].1)
}

/// Wall thickness as displayed: never thinner than `od × min_visual_wall_ratio`.
#[must_use]
pub fn visual_wall_thickness(wall: f64, outside_diameter: f64, config: &GeometryConfig) -> f64 {
    let floor = outside_diameter * config.min_visual_wall_ratio;
    if wall < floor {
        log::debug!("wall {wall} raised to visual minimum {floor}");
    }
    wall.max(floor)
}

/// Saddle weld length for a branch of outside diameter `od`.
#[must_use]
pub fn steinmetz_weld_length(od: f64) -> f64 {
    od * STEINMETZ_FACTOR
}

#[must_use]
pub fn effective_weld_length(weld_length: f64) -> f64 {
    weld_length / AWS_EFFECTIVE_DIVISOR
}

/// Outer and inner radius of a pipe wall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipeCrossSection {
    pub outer_radius: f64,
    pub inner_radius: f64,
}

impl PipeCrossSection {
    /// # Errors
    /// `InvalidCrossSection` unless `outer_radius > inner_radius > 0`.
    pub fn new(outer_radius: f64, inner_radius: f64) -> Result<Self, FittingError> {
        let section = Self {
            outer_radius,
            inner_radius,
        };
        section.validate()?;
        Ok(section)
    }

    /// # Errors
    /// `InvalidCrossSection` unless `outer_radius > inner_radius > 0`.
    pub fn validate(&self) -> Result<(), FittingError> {
        let valid = self.outer_radius.is_finite()
            && self.inner_radius.is_finite()
            && self.inner_radius > 0.0
            && self.outer_radius > self.inner_radius;
        if valid {
            Ok(())
        } else {
            Err(FittingError::InvalidCrossSection {
                outer: self.outer_radius,
                inner: self.inner_radius,
            })
        }
    }

    /// Radii for a nominal bore: OD from the size table and the SABS 719 wall
    /// unless `wall_override` is given, widened to the visual minimum.
    ///
    /// # Errors
    /// `InvalidDimension` for a non-positive bore or override, and
    /// `InvalidCrossSection` when the wall consumes the whole pipe.
    pub fn from_nominal_bore(
        nominal_bore: f64,
        wall_override: Option<f64>,
        config: &GeometryConfig,
    ) -> Result<Self, FittingError> {
        super::error::require_positive("nominal bore", nominal_bore)?;
        let wall = match wall_override {
            Some(wall) => super::error::require_positive("wall thickness", wall)?,
            None => sabs_719_wall_thickness(nominal_bore),
        };
        let od = outside_diameter(nominal_bore);
        let wall = visual_wall_thickness(wall, od, config);
        let outer_radius = od * 0.5;
        Self::new(outer_radius, outer_radius - wall)
    }

    #[must_use]
    pub fn wall_thickness(&self) -> f64 {
        self.outer_radius - self.inner_radius
    }
}
