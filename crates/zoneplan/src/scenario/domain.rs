use geo::Polygon;
use serde::{Deserialize, Serialize};

use crate::geometry;

/// Identifier of a stored parcel record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParcelId(pub String);

/// A land parcel: the immutable boundary a proposal is evaluated against.
///
/// The boundary is a single non-self-intersecting polygon (holes allowed) in
/// meters-equivalent planar coordinates; `area_sqm` is precomputed by the
/// storage layer and must match the planar area of the boundary.
#[derive(Debug, Clone)]
pub struct Parcel {
    pub id: ParcelId,
    pub name: String,
    pub zone: String,
    pub boundary: Polygon<f64>,
    pub area_sqm: f64,
}

/// Source reference backing a numeric rule (district plan section etc.).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub title: String,
    pub section: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Numeric planning constraints for one zone label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneRule {
    pub zone: String,
    pub max_height_m: f64,
    pub min_setback_m: f64,
    pub max_site_coverage_pct: f64,
    #[serde(default)]
    pub citations: Vec<Citation>,
}

/// The three numbers a user proposes for a building on the parcel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRequest {
    pub height_m: f64,
    pub footprint_sqm: f64,
    pub min_setback_m: f64,
}

impl ScenarioRequest {
    /// Rejects non-finite or out-of-domain inputs before any geometry runs.
    pub fn validate(&self) -> Result<(), InputError> {
        if !self.height_m.is_finite() {
            return Err(InputError::NotFinite { field: "height_m" });
        }
        if !self.footprint_sqm.is_finite() {
            return Err(InputError::NotFinite {
                field: "footprint_sqm",
            });
        }
        if !self.min_setback_m.is_finite() {
            return Err(InputError::NotFinite {
                field: "min_setback_m",
            });
        }
        if self.height_m <= 0.0 {
            return Err(InputError::NonPositiveHeight(self.height_m));
        }
        if self.footprint_sqm <= 0.0 {
            return Err(InputError::NonPositiveFootprint(self.footprint_sqm));
        }
        if self.min_setback_m < 0.0 {
            return Err(InputError::NegativeSetback(self.min_setback_m));
        }
        Ok(())
    }
}

/// Validation errors for scenario inputs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("height must be a positive number of meters (got {0})")]
    NonPositiveHeight(f64),
    #[error("footprint area must be a positive number of square meters (got {0})")]
    NonPositiveFootprint(f64),
    #[error("setback must be zero or more meters (got {0})")]
    NegativeSetback(f64),
}

/// The proposed building outline: an axis-aligned square polygon closed by
/// repeating its first vertex, in the parcel's coordinate space.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint(Polygon<f64>);

impl Footprint {
    pub(crate) fn new(polygon: Polygon<f64>) -> Self {
        Self(polygon)
    }

    pub fn polygon(&self) -> &Polygon<f64> {
        &self.0
    }

    pub fn area_sqm(&self) -> f64 {
        geometry::area(&self.0)
    }

    pub fn to_geojson(&self) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::from(&self.0))
    }
}

/// One of the three independent compliance checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceCheck {
    Height,
    Coverage,
    Setback,
}

impl ComplianceCheck {
    pub fn label(&self) -> &'static str {
        match self {
            ComplianceCheck::Height => "height",
            ComplianceCheck::Coverage => "coverage",
            ComplianceCheck::Setback => "setback",
        }
    }
}

/// Structured pass/fail outcome of a compliance evaluation.
///
/// Notes carry one human-readable line per failed check, always in the
/// order height, coverage, setback; callers key off that ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub height_ok: bool,
    pub coverage_ok: bool,
    pub setback_ok: bool,
    pub all_ok: bool,
    pub notes: Vec<String>,
}

impl Verdict {
    /// Labels of the failed checks, for downstream explanation tooling.
    pub fn failed_checks(&self) -> Vec<ComplianceCheck> {
        let mut failed = Vec::new();
        if !self.height_ok {
            failed.push(ComplianceCheck::Height);
        }
        if !self.coverage_ok {
            failed.push(ComplianceCheck::Coverage);
        }
        if !self.setback_ok {
            failed.push(ComplianceCheck::Setback);
        }
        failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(height_m: f64, footprint_sqm: f64, min_setback_m: f64) -> ScenarioRequest {
        ScenarioRequest {
            height_m,
            footprint_sqm,
            min_setback_m,
        }
    }

    #[test]
    fn validate_accepts_sensible_inputs() {
        assert_eq!(request(8.0, 300.0, 3.0).validate(), Ok(()));
        assert_eq!(request(0.1, 0.1, 0.0).validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_out_of_domain_numbers() {
        assert_eq!(
            request(0.0, 300.0, 3.0).validate(),
            Err(InputError::NonPositiveHeight(0.0))
        );
        assert_eq!(
            request(8.0, -10.0, 3.0).validate(),
            Err(InputError::NonPositiveFootprint(-10.0))
        );
        assert_eq!(
            request(8.0, 300.0, -1.0).validate(),
            Err(InputError::NegativeSetback(-1.0))
        );
    }

    #[test]
    fn validate_rejects_non_finite_numbers() {
        assert_eq!(
            request(f64::NAN, 300.0, 3.0).validate(),
            Err(InputError::NotFinite { field: "height_m" })
        );
        assert_eq!(
            request(8.0, f64::INFINITY, 3.0).validate(),
            Err(InputError::NotFinite {
                field: "footprint_sqm"
            })
        );
    }

    #[test]
    fn failed_checks_follow_fixed_order() {
        let verdict = Verdict {
            height_ok: false,
            coverage_ok: false,
            setback_ok: false,
            all_ok: false,
            notes: Vec::new(),
        };
        let labels: Vec<_> = verdict
            .failed_checks()
            .iter()
            .map(ComplianceCheck::label)
            .collect();
        assert_eq!(labels, vec!["height", "coverage", "setback"]);
    }
}
