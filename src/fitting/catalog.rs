//! Nominal bore to flange dimension lookup.
//!
//! The catalog is a sorted array of `(bore, FlangeSpec)` entries searched with
//! `partition_point`. A request without an exact entry falls back to the largest
//! entry whose bore does not exceed it; see [`MatchKind`] for the edge cases.

use serde::{Deserialize, Serialize};

use super::error::CatalogError;

/// Flange outline, bolt circle and bolt holes, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlangeSpec {
    pub flange_od: f64,
    pub bolt_circle_diameter: f64,
    pub bolt_hole_diameter: f64,
    pub bolt_hole_count: usize,
}

impl FlangeSpec {
    /// # Errors
    /// `CatalogError::InvalidSpec` when a dimension is non-positive, fewer than
    /// three holes are requested, or the bolt circle does not fit the outline.
    pub fn new(
        flange_od: f64,
        bolt_circle_diameter: f64,
        bolt_hole_diameter: f64,
        bolt_hole_count: usize,
    ) -> Result<Self, CatalogError> {
        let spec = Self {
            flange_od,
            bolt_circle_diameter,
            bolt_hole_diameter,
            bolt_hole_count,
        };
        spec.check(0.0)?;
        Ok(spec)
    }

    fn check(&self, bore: f64) -> Result<(), CatalogError> {
        let invalid = |reason| Err(CatalogError::InvalidSpec { bore, reason });
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.flange_od) || !positive(self.bolt_circle_diameter) || !positive(self.bolt_hole_diameter) {
            return invalid("dimensions must be finite and > 0");
        }
        if self.bolt_hole_count < 3 {
            return invalid("at least 3 bolt holes are required");
        }
        if self.bolt_circle_diameter >= self.flange_od {
            return invalid("bolt circle must be smaller than the flange outline");
        }
        Ok(())
    }

    #[must_use]
    pub fn outer_radius(&self) -> f64 {
        self.flange_od * 0.5
    }

    #[must_use]
    pub fn bolt_circle_radius(&self) -> f64 {
        self.bolt_circle_diameter * 0.5
    }

    #[must_use]
    pub fn bolt_hole_radius(&self) -> f64 {
        self.bolt_hole_diameter * 0.5
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub nominal_bore: f64,
    #[serde(flatten)]
    pub spec: FlangeSpec,
}

/// How a request was matched to a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    /// Largest entry below the request.
    FallbackBelow,
    /// Request is smaller than every entry; the smallest entry is used.
    BelowRange,
    /// Request is larger than every entry; the largest entry is used.
    AboveRange,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogMatch {
    pub requested: f64,
    pub matched_bore: f64,
    pub spec: FlangeSpec,
    pub kind: MatchKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CatalogEntry>", into = "Vec<CatalogEntry>")]
pub struct FlangeCatalog {
    bores: Vec<f64>,
    specs: Vec<FlangeSpec>,
}

impl FlangeCatalog {
    /// # Errors
    /// Rejects an empty list, a repeated bore or an invalid spec.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Result<Self, CatalogError> {
        let mut entries: Vec<CatalogEntry> = entries.into_iter().collect();
        if entries.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }
        for entry in &entries {
            if !(entry.nominal_bore.is_finite() && entry.nominal_bore > 0.0) {
                return Err(CatalogError::InvalidNominalBore(entry.nominal_bore));
            }
            entry.spec.check(entry.nominal_bore)?;
        }
        entries.sort_by(|a, b| a.nominal_bore.total_cmp(&b.nominal_bore));
        if let Some(pair) = entries.windows(2).find(|w| w[0].nominal_bore == w[1].nominal_bore) {
            return Err(CatalogError::DuplicateBore(pair[0].nominal_bore));
        }

        Ok(Self {
            bores: entries.iter().map(|e| e.nominal_bore).collect(),
            specs: entries.iter().map(|e| e.spec).collect(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bores.is_empty()
    }

    /// Entries in ascending bore order.
    pub fn entries(&self) -> impl Iterator<Item = CatalogEntry> + '_ {
        self.bores
            .iter()
            .zip(&self.specs)
            .map(|(&nominal_bore, &spec)| CatalogEntry { nominal_bore, spec })
    }

    /// Exact lookup, no fallback.
    #[must_use]
    pub fn get(&self, nominal_bore: f64) -> Option<FlangeSpec> {
        let index = self.bores.partition_point(|&b| b < nominal_bore);
        (self.bores.get(index) == Some(&nominal_bore)).then(|| self.specs[index])
    }

    /// Largest entry whose bore is `<= nominal_bore`.
    ///
    /// Below the range the smallest entry is used. Above the range the largest
    /// entry is used and a warning is logged; see [`Self::resolve_strict`].
    ///
    /// # Errors
    /// `InvalidNominalBore` for a non-finite or non-positive request.
    pub fn resolve(&self, nominal_bore: f64) -> Result<CatalogMatch, CatalogError> {
        if !(nominal_bore.is_finite() && nominal_bore > 0.0) {
            return Err(CatalogError::InvalidNominalBore(nominal_bore));
        }
        let (Some(&min), Some(&max)) = (self.bores.first(), self.bores.last()) else {
            return Err(CatalogError::EmptyCatalog);
        };

        let (index, kind) = if nominal_bore < min {
            (0, MatchKind::BelowRange)
        } else if nominal_bore > max {
            log::warn!("nominal bore {nominal_bore} exceeds the flange catalog (max {max}); using {max}");
            (self.bores.len() - 1, MatchKind::AboveRange)
        } else {
            let upper = self.bores.partition_point(|&b| b <= nominal_bore);
            let index = upper - 1;
            let kind = if self.bores[index] == nominal_bore {
                MatchKind::Exact
            } else {
                MatchKind::FallbackBelow
            };
            (index, kind)
        };

        let matched = CatalogMatch {
            requested: nominal_bore,
            matched_bore: self.bores[index],
            spec: self.specs[index],
            kind,
        };
        log::debug!(
            "flange catalog: NB {} -> {} ({:?})",
            matched.requested,
            matched.matched_bore,
            matched.kind
        );
        Ok(matched)
    }

    /// Like [`Self::resolve`] but a request above the largest entry is an error.
    ///
    /// # Errors
    /// `OutOfCatalogRange` above the range, `InvalidNominalBore` for bad input.
    pub fn resolve_strict(&self, nominal_bore: f64) -> Result<CatalogMatch, CatalogError> {
        if let Some(&max) = self.bores.last() {
            if nominal_bore > max {
                return Err(CatalogError::OutOfCatalogRange {
                    requested: nominal_bore,
                    min: self.bores[0],
                    max,
                });
            }
        }
        self.resolve(nominal_bore)
    }

    /// SABS 1123 PN16 flanges, DN15 to DN900.
    #[must_use]
    pub fn sabs_1123_pn16() -> Self {
        // (NB, flange OD, PCD, holes, hole diameter)
        const TABLE: [(f64, f64, f64, usize, f64); 25] = [
            (15.0, 95.0, 65.0, 4, 14.0),
            (20.0, 105.0, 75.0, 4, 14.0),
            (25.0, 115.0, 85.0, 4, 14.0),
            (32.0, 140.0, 100.0, 4, 18.0),
            (40.0, 150.0, 110.0, 4, 18.0),
            (50.0, 165.0, 125.0, 4, 18.0),
            (65.0, 185.0, 145.0, 4, 18.0),
            (80.0, 200.0, 160.0, 8, 18.0),
            (100.0, 220.0, 180.0, 8, 18.0),
            (125.0, 250.0, 210.0, 8, 18.0),
            (150.0, 285.0, 240.0, 8, 22.0),
            (200.0, 340.0, 295.0, 12, 22.0),
            (250.0, 405.0, 355.0, 12, 26.0),
            (300.0, 460.0, 410.0, 12, 26.0),
            (350.0, 520.0, 470.0, 16, 26.0),
            (400.0, 580.0, 525.0, 16, 30.0),
            (450.0, 640.0, 585.0, 20, 30.0),
            (500.0, 670.0, 620.0, 20, 26.0),
            (600.0, 780.0, 725.0, 20, 30.0),
            (650.0, 830.0, 775.0, 20, 30.0),
            (700.0, 885.0, 830.0, 24, 30.0),
            (750.0, 940.0, 880.0, 24, 33.0),
            (800.0, 1015.0, 950.0, 24, 33.0),
            (850.0, 1065.0, 1000.0, 24, 33.0),
            (900.0, 1115.0, 1050.0, 28, 33.0),
        ];

        Self {
            bores: TABLE.iter().map(|row| row.0).collect(),
            specs: TABLE
                .iter()
                .map(|&(_, flange_od, bolt_circle_diameter, bolt_hole_count, bolt_hole_diameter)| FlangeSpec {
                    flange_od,
                    bolt_circle_diameter,
                    bolt_hole_diameter,
                    bolt_hole_count,
                })
                .collect(),
        }
    }
}

impl Default for FlangeCatalog {
    fn default() -> Self {
        Self::sabs_1123_pn16()
    }
}

impl TryFrom<Vec<CatalogEntry>> for FlangeCatalog {
    type Error = CatalogError;

    fn try_from(entries: Vec<CatalogEntry>) -> Result<Self, Self::Error> {
        Self::from_entries(entries)
    }
}

impl From<FlangeCatalog> for Vec<CatalogEntry> {
    fn from(catalog: FlangeCatalog) -> Self {
        catalog.entries().collect()
    }
}
