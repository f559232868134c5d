use crate::geom::ProfileError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be at least 3 segments, got {value}")]
    TooFewSegments { field: &'static str, value: usize },
    #[error("scale must be finite and > 0, got {0}")]
    InvalidScale(f64),
    #[error("{field} must lie in ({min}, {max}], got {value}")]
    OversizeOutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{field} must lie in (0, 1), got {value}")]
    RatioOutOfRange { field: &'static str, value: f64 },
    #[error("{field} must be finite and >= 1, got {value}")]
    ClearanceBelowOne { field: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("flange spec for bore {bore} is invalid: {reason}")]
    InvalidSpec { bore: f64, reason: &'static str },
    #[error("catalog lists bore {0} more than once")]
    DuplicateBore(f64),
    #[error("catalog has no entries")]
    EmptyCatalog,
    #[error("nominal bore {requested} is outside the catalog range {min}..={max}")]
    OutOfCatalogRange { requested: f64, min: f64, max: f64 },
    #[error("nominal bore must be finite and > 0, got {0}")]
    InvalidNominalBore(f64),
}

/// Errors raised by the fitting builders.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FittingError {
    #[error("invalid cross-section: outer radius {outer} must exceed inner radius {inner} > 0")]
    InvalidCrossSection { outer: f64, inner: f64 },
    #[error("axis is degenerate: start and end points coincide")]
    DegenerateAxis,
    #[error("{name} must be finite and > 0, got {value}")]
    InvalidDimension { name: &'static str, value: f64 },
    #[error("segment count must be >= 1, got {0}")]
    InvalidSegmentCount(usize),
    #[error("bore radius {bore_radius} reaches the flange radius {flange_radius}")]
    BoreExceedsFlange { bore_radius: f64, flange_radius: f64 },
    #[error("flange layout is invalid: {0}")]
    InvalidFlangeLayout(#[source] ProfileError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// `InvalidDimension` unless `value` is finite and positive.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64, FittingError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(FittingError::InvalidDimension { name, value })
    }
}
